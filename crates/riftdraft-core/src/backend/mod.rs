// Analytics backend interface.
//
// The backend owns champion data, matchup statistics and the prediction
// model. The core only sees this trait, so tests drive it with scripted
// in-memory implementations and the binary plugs in `HttpBackend`.

pub mod http;
pub mod models;

use async_trait::async_trait;
use thiserror::Error;

use crate::draft::SanitizedName;

pub use http::HttpBackend;
pub use models::{
    AllySuggestion, ChampionRecord, SanitizedTeam, SuggestionResult, TeamPredictionResult,
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BackendError {
    #[error("network error: {0}")]
    Transport(String),

    #[error("backend returned status {status}: {detail}")]
    Status { status: u16, detail: String },

    #[error("failed to decode {endpoint} response: {message}")]
    Decode {
        endpoint: &'static str,
        message: String,
    },
}

impl BackendError {
    pub(crate) fn decode(endpoint: &'static str, err: serde_json::Error) -> Self {
        BackendError::Decode {
            endpoint,
            message: err.to_string(),
        }
    }
}

#[async_trait]
pub trait BackendClient: Send + Sync {
    /// `GET /champions`
    async fn fetch_champions(&self) -> Result<Vec<ChampionRecord>, BackendError>;

    /// `POST /suggest_allies`. `lane` is the upper-cased role name.
    async fn suggest_allies(
        &self,
        champion: &SanitizedName,
        enemy_champion: &SanitizedName,
        lane: &str,
    ) -> Result<SuggestionResult, BackendError>;

    /// `POST /predict_team_win_rate`
    async fn predict_team_win_rate(
        &self,
        blue_team: &SanitizedTeam,
        red_team: &SanitizedTeam,
    ) -> Result<TeamPredictionResult, BackendError>;
}
