// riftdraft entry point.
//
// Startup sequence:
// 1. Load config (seeding config/ from defaults/)
// 2. Initialize tracing (log to file, not terminal)
// 3. Build the HTTP backend and the draft session
// 4. Load the champion catalog
// 5. Run the prompt loop until `quit` or end of input

mod commands;

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use riftdraft_core::backend::HttpBackend;
use riftdraft_core::config::{self, LoggingConfig};
use riftdraft_core::display::{format_confidence, format_percent, WinRateBand};
use riftdraft_core::draft::{Role, Side};
use riftdraft_core::prediction::{PredictionPanel, PredictionStatus};
use riftdraft_core::session::DraftSession;

use commands::{parse_command, Command, HELP};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load config
    let config = config::load_config().context("failed to load configuration")?;

    // 2. Initialize tracing
    init_tracing(&config.logging)?;
    info!(
        base_url = %config.backend.base_url,
        timeout_secs = config.backend.request_timeout_secs,
        "riftdraft starting up"
    );

    // 3. Backend + session
    let backend = HttpBackend::from_config(&config.backend)
        .context("failed to build backend client")?;
    let session = DraftSession::new(Arc::new(backend), config.catalog.clone());

    // 4. Catalog. The prompt still works without one; names go unvalidated.
    match session.initialize().await {
        Ok(count) => println!("Loaded {count} champions."),
        Err(e) => {
            warn!(error = %e, "continuing without champion catalog");
            println!("{e}; continuing without the champion list.");
        }
    }
    println!("Type `help` for commands.");

    // 5. Prompt loop
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt()?;
        let Some(line) = lines.next_line().await.context("failed to read input")? else {
            break;
        };
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }
        run_command(&session, command).await;
    }

    info!("riftdraft shut down cleanly");
    Ok(())
}

async fn run_command(session: &DraftSession, command: Command) {
    match command {
        Command::Select { side, role } => {
            session.select(side, role);
            println!("Selected {side} {role}.");
        }
        Command::Assign {
            side,
            role,
            champion,
        } => match session.assign(side, role, &champion) {
            Ok(()) if champion.is_empty() => println!("Cleared {side} {role}."),
            Ok(()) => println!("{side} {role}: {champion}"),
            Err(e) => println!("{e}"),
        },
        Command::Pick { query } => match session.submit(&query) {
            Ok(name) => println!("Picked {name}."),
            Err(e) => println!("{e}"),
        },
        Command::Hover { side, role } => {
            for line in session.hover(side, role).await.lines() {
                println!("{line}");
            }
        }
        Command::Details { side, role } => {
            if !session.open_details(side, role) {
                println!("{side} {role} is empty.");
                return;
            }
            session.detail_settled().await;
            for line in session.detail_panel().lines() {
                println!("{line}");
            }
        }
        Command::Predict => {
            let panel = session.predict().await;
            print_prediction(&panel);
        }
        Command::Show => show(session),
        Command::Help => println!("{HELP}"),
        Command::Quit => {}
    }
}

fn show(session: &DraftSession) {
    for side in [Side::Blue, Side::Red] {
        println!("{side}");
        let roster = session.roster(side);
        for role in Role::ALL {
            let champion = roster.get(role).unwrap_or("-");
            let marker = match session.active_selection() {
                Some(active) if active.side == side && active.role == role => "*",
                _ => " ",
            };
            println!("{marker} {:<8} {champion}", role.display_str());
        }
    }
    println!();
    for line in session.detail_panel().lines() {
        println!("{line}");
    }
    println!();
    print_prediction(&session.prediction_panel());
}

fn print_prediction(panel: &PredictionPanel) {
    match &panel.status {
        PredictionStatus::Idle => println!("No prediction yet."),
        PredictionStatus::Loading => println!("Predicting..."),
        PredictionStatus::Notice(message) => println!("{message}"),
        PredictionStatus::Failed(message) => println!("Prediction failed: {message}"),
        PredictionStatus::Ready => {}
    }
    if let Some(result) = &panel.result {
        let band = match WinRateBand::classify(result.win_rate_percent) {
            WinRateBand::Favored => "favored",
            WinRateBand::Unfavored => "unfavored",
        };
        println!(
            "Blue win rate: {} ({band})",
            format_percent(result.win_rate_percent)
        );
        for ally in &result.suggested_allies {
            println!("  {}: {}", ally.champion, format_confidence(ally.confidence));
        }
    }
}

fn prompt() -> anyhow::Result<()> {
    print!("> ");
    std::io::stdout().flush().context("failed to flush stdout")?;
    Ok(())
}

/// Initialize tracing to log to a file (not the terminal, which is used by
/// the prompt). `RUST_LOG` overrides the configured filter.
fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = Path::new(&logging.log_dir);
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create log dir {}", log_dir.display()))?;

    let log_file = std::fs::File::create(log_dir.join("riftdraft.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&logging.filter)),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
