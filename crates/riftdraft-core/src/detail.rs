// Detailed suggestion view, driven by `OpenSuggestions` events.
//
// The view subscribes on attach and reads the opposing champion from the
// roster store when the event is delivered, not when it was published. Each
// delivery bumps a generation counter; a lookup that finishes after a newer
// delivery is discarded.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::backend::SuggestionResult;
use crate::display::{suggestion_lines, TooltipContent};
use crate::draft::RosterStore;
use crate::events::{Event, EventChannel, OpenSuggestions, Subscription, Topic};
use crate::suggest::{SuggestionCache, SuggestionError};

#[derive(Debug, Clone, PartialEq)]
pub enum DetailStatus {
    Idle,
    NoOpponent,
    Loading,
    Ready(SuggestionResult),
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailPanel {
    pub selection: Option<OpenSuggestions>,
    pub status: DetailStatus,
}

impl Default for DetailPanel {
    fn default() -> Self {
        Self {
            selection: None,
            status: DetailStatus::Idle,
        }
    }
}

impl DetailPanel {
    /// Text for the panel: a title line followed by the status body.
    pub fn lines(&self) -> Vec<String> {
        let Some(selection) = &self.selection else {
            return vec!["Select a filled role to see suggestions.".to_string()];
        };
        let mut lines = vec![format!(
            "{} ({}, {})",
            selection.champion, selection.role, selection.side
        )];
        match &self.status {
            DetailStatus::Idle => {}
            DetailStatus::NoOpponent => lines.extend(TooltipContent::NoOpponent.lines()),
            DetailStatus::Loading => lines.extend(TooltipContent::Loading.lines()),
            DetailStatus::Ready(result) => lines.extend(suggestion_lines(result)),
            DetailStatus::Unavailable(message) => {
                lines.extend(TooltipContent::Unavailable.lines());
                lines.push(message.clone());
            }
        }
        lines
    }
}

struct DetailState {
    generation: AtomicU64,
    panel: Mutex<DetailPanel>,
    latest: Mutex<Option<JoinHandle<()>>>,
}

impl DetailState {
    fn panel(&self) -> MutexGuard<'_, DetailPanel> {
        self.panel.lock().expect("detail panel mutex poisoned")
    }

    fn latest(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.latest.lock().expect("detail task mutex poisoned")
    }

    /// Write a lookup outcome unless a newer delivery has happened. The
    /// generation is compared under the panel lock, the same lock `on_open`
    /// holds while bumping it.
    fn apply(&self, generation: u64, outcome: Result<SuggestionResult, SuggestionError>) {
        let mut panel = self.panel();
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "discarding stale detail lookup");
            return;
        }
        panel.status = match outcome {
            Ok(result) => DetailStatus::Ready(result),
            Err(SuggestionError::NoOpponent) => DetailStatus::NoOpponent,
            Err(e) => {
                warn!(generation, error = %e, "detail lookup failed");
                DetailStatus::Unavailable(e.to_string())
            }
        };
    }
}

/// Subscriber half of the roster/detail split. Dropping the view drops its
/// subscription.
pub struct DetailView {
    state: Arc<DetailState>,
    _subscription: Subscription,
}

impl DetailView {
    pub fn attach(events: &EventChannel, roster: Arc<RosterStore>, cache: SuggestionCache) -> Self {
        let state = Arc::new(DetailState {
            generation: AtomicU64::new(0),
            panel: Mutex::new(DetailPanel::default()),
            latest: Mutex::new(None),
        });

        let handler_state = Arc::clone(&state);
        let subscription = events.subscribe(Topic::OpenSuggestions, move |event| {
            let Event::OpenSuggestions(request) = event;
            on_open(&handler_state, &roster, &cache, request);
        });

        Self {
            state,
            _subscription: subscription,
        }
    }

    pub fn panel(&self) -> DetailPanel {
        self.state.panel().clone()
    }

    /// Wait until the most recently started lookup has been applied.
    pub async fn settled(&self) {
        loop {
            let Some(handle) = self.state.latest().take() else {
                return;
            };
            if let Err(e) = handle.await {
                warn!(error = %e, "detail lookup task ended abnormally");
            }
        }
    }
}

fn on_open(
    state: &Arc<DetailState>,
    roster: &RosterStore,
    cache: &SuggestionCache,
    request: &OpenSuggestions,
) {
    let enemy = roster.champion(request.side.opponent(), request.role);

    let generation = {
        let mut panel = state.panel();
        let generation = state.generation.fetch_add(1, Ordering::SeqCst) + 1;
        panel.selection = Some(request.clone());
        panel.status = if enemy.is_some() {
            DetailStatus::Loading
        } else {
            DetailStatus::NoOpponent
        };
        generation
    };

    info!(
        generation,
        champion = %request.champion,
        role = %request.role,
        side = %request.side,
        "opening suggestions"
    );

    let Some(enemy) = enemy else {
        return;
    };

    let runtime = match tokio::runtime::Handle::try_current() {
        Ok(runtime) => runtime,
        Err(e) => {
            warn!(error = %e, "no runtime available for detail lookup");
            state.apply(generation, Err(SuggestionError::FetchFailed(e.to_string())));
            return;
        }
    };

    let task_state = Arc::clone(state);
    let cache = cache.clone();
    let champion = request.champion.clone();
    let role = request.role;
    let handle = runtime.spawn(async move {
        let outcome = cache.resolve(&champion, &enemy, role).await;
        task_state.apply(generation, outcome);
    });
    *state.latest() = Some(handle);
}
