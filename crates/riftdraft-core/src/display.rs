// Text formatting shared by the views: percentages, the 50% band, tooltips.

use crate::backend::SuggestionResult;

/// Threshold at which a win rate is shown as favorable.
pub const FAVORED_THRESHOLD: f64 = 50.0;

/// `56.3` -> `"56.30%"`.
pub fn format_percent(value: f64) -> String {
    format!("{value:.2}%")
}

/// Confidence in 0..=1 as a percentage: `0.1234` -> `"12.34%"`.
pub fn format_confidence(confidence: f64) -> String {
    format_percent(confidence * 100.0)
}

/// Display treatment of a win rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WinRateBand {
    /// At or above 50%.
    Favored,
    Unfavored,
}

impl WinRateBand {
    pub fn classify(win_rate_percent: f64) -> Self {
        if win_rate_percent >= FAVORED_THRESHOLD {
            WinRateBand::Favored
        } else {
            WinRateBand::Unfavored
        }
    }
}

/// What the hover tooltip of a role shows.
#[derive(Debug, Clone, PartialEq)]
pub enum TooltipContent {
    /// The opposing role is unfilled (or this one is).
    NoOpponent,
    Loading,
    /// No cached result, including after a failed lookup.
    Unavailable,
    Ready(SuggestionResult),
}

impl TooltipContent {
    pub fn lines(&self) -> Vec<String> {
        match self {
            TooltipContent::NoOpponent => vec!["No enemy champion in this lane.".to_string()],
            TooltipContent::Loading => vec!["Loading...".to_string()],
            TooltipContent::Unavailable => vec!["No suggestions available.".to_string()],
            TooltipContent::Ready(result) => suggestion_lines(result),
        }
    }
}

/// Header, win rate and ranked allies of a matchup result.
pub fn suggestion_lines(result: &SuggestionResult) -> Vec<String> {
    let mut lines = vec![
        format!(
            "{} vs {} ({})",
            result.my_champion, result.enemy_champion, result.lane
        ),
        format!(
            "Win Rate: {} ({} matches)",
            format_percent(result.win_rate_percent),
            result.matches_analyzed
        ),
        "Suggested Allies:".to_string(),
    ];
    if result.suggested_allies.is_empty() {
        lines.push("No suggestions available.".to_string());
    } else {
        lines.extend(
            result
                .suggested_allies
                .iter()
                .map(|a| format!("{}: {}", a.champion, format_confidence(a.confidence))),
        );
    }
    lines
}
