// Full-roster win-rate prediction.
//
// Sanitizes both rosters, refuses to call the backend until each side has at
// least one champion, and applies the display policy for the prediction
// panel. Unlike matchup suggestions nothing is memoized here.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::backend::{BackendClient, SanitizedTeam, TeamPredictionResult};
use crate::display::WinRateBand;
use crate::draft::{Roster, SanitizedName};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    #[error("assign at least one champion to each side before predicting")]
    InsufficientRoster,

    #[error("win-rate prediction failed: {0}")]
    FetchFailed(String),
}

/// Filled roles of `roster` in backend form. Unfilled roles are dropped
/// rather than sent as null.
pub fn sanitize_roster(roster: &Roster) -> SanitizedTeam {
    roster
        .filled()
        .map(|(role, champion)| (role, SanitizedName::from_display(champion)))
        .filter(|(_, name)| !name.is_empty())
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub enum PredictionStatus {
    Idle,
    Loading,
    Ready,
    /// Precondition not met; informational, any shown result is kept.
    Notice(String),
    /// Backend failure; the previous result has been cleared.
    Failed(String),
}

/// State of the win-rate panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionPanel {
    pub result: Option<TeamPredictionResult>,
    pub status: PredictionStatus,
}

impl Default for PredictionPanel {
    fn default() -> Self {
        Self {
            result: None,
            status: PredictionStatus::Idle,
        }
    }
}

impl PredictionPanel {
    pub fn band(&self) -> Option<WinRateBand> {
        self.result
            .as_ref()
            .map(|r| WinRateBand::classify(r.win_rate_percent))
    }
}

pub struct PredictionWorkflow {
    backend: Arc<dyn BackendClient>,
    /// Stamp of the latest `refresh`. Responses carrying an older stamp are
    /// discarded.
    generation: AtomicU64,
    panel: Mutex<PredictionPanel>,
}

impl PredictionWorkflow {
    pub fn new(backend: Arc<dyn BackendClient>) -> Self {
        Self {
            backend,
            generation: AtomicU64::new(0),
            panel: Mutex::new(PredictionPanel::default()),
        }
    }

    fn panel_mut(&self) -> MutexGuard<'_, PredictionPanel> {
        self.panel.lock().expect("prediction panel mutex poisoned")
    }

    pub fn panel(&self) -> PredictionPanel {
        self.panel_mut().clone()
    }

    /// Sanitize both rosters; `InsufficientRoster` unless both sides have a
    /// champion.
    pub fn prepare(
        blue: &Roster,
        red: &Roster,
    ) -> Result<(SanitizedTeam, SanitizedTeam), PredictionError> {
        let blue_team = sanitize_roster(blue);
        let red_team = sanitize_roster(red);
        if blue_team.is_empty() || red_team.is_empty() {
            return Err(PredictionError::InsufficientRoster);
        }
        Ok((blue_team, red_team))
    }

    /// One independent backend prediction for the given rosters.
    pub async fn predict_team_win_rate(
        &self,
        blue: &Roster,
        red: &Roster,
    ) -> Result<TeamPredictionResult, PredictionError> {
        let (blue_team, red_team) = Self::prepare(blue, red)?;
        self.request(&blue_team, &red_team).await
    }

    async fn request(
        &self,
        blue_team: &SanitizedTeam,
        red_team: &SanitizedTeam,
    ) -> Result<TeamPredictionResult, PredictionError> {
        info!(
            blue = blue_team.len(),
            red = red_team.len(),
            "requesting team win-rate prediction"
        );
        self.backend
            .predict_team_win_rate(blue_team, red_team)
            .await
            .map_err(|e| PredictionError::FetchFailed(e.to_string()))
    }

    /// Run a prediction and apply the outcome to the panel:
    /// - insufficient roster: notice, no request, shown result untouched
    /// - success: result + Ready
    /// - failure: result cleared + Failed
    ///
    /// If another `refresh` started while this one was waiting, this outcome
    /// is dropped and the panel is left to the newer request.
    pub async fn refresh(&self, blue: &Roster, red: &Roster) -> PredictionPanel {
        // Generation is bumped and compared only under the panel lock.
        let (generation, blue_team, red_team) = {
            let mut panel = self.panel_mut();
            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            match Self::prepare(blue, red) {
                Ok((blue_team, red_team)) => {
                    panel.status = PredictionStatus::Loading;
                    (generation, blue_team, red_team)
                }
                Err(e) => {
                    debug!(generation, "prediction skipped: {e}");
                    panel.status = PredictionStatus::Notice(e.to_string());
                    return panel.clone();
                }
            }
        };

        let outcome = self.request(&blue_team, &red_team).await;

        let mut panel = self.panel_mut();
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "discarding stale prediction response");
            return panel.clone();
        }
        match outcome {
            Ok(result) => {
                info!(generation, win_rate = result.win_rate_percent, "prediction ready");
                panel.result = Some(result);
                panel.status = PredictionStatus::Ready;
            }
            Err(e) => {
                warn!(generation, error = %e, "prediction failed");
                panel.result = None;
                panel.status = PredictionStatus::Failed(e.to_string());
            }
        }
        panel.clone()
    }
}
