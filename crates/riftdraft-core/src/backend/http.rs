// reqwest-backed implementation of the analytics backend.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::models::{
    self, ChampionRecord, PredictTeamRequest, SanitizedTeam, SuggestAlliesRequest,
    SuggestionResult, TeamPredictionResult,
};
use super::{BackendClient, BackendError};
use crate::config::BackendConfig;
use crate::draft::SanitizedName;

/// HTTP/JSON client for the analytics service.
pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self, BackendError> {
        Self::new(
            config.base_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Read the body of `response`, turning non-2xx statuses into
    /// `BackendError::Status` with the server's `detail` message.
    async fn read_body(response: reqwest::Response) -> Result<String, BackendError> {
        let status = response.status();
        let body = response.text().await.map_err(transport)?;

        if !status.is_success() {
            let detail = models::parse_error_detail(&body)
                .or_else(|| status.canonical_reason().map(str::to_string))
                .unwrap_or_default();
            warn!(status = status.as_u16(), %detail, "backend request failed");
            return Err(BackendError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        Ok(body)
    }
}

fn transport(err: reqwest::Error) -> BackendError {
    BackendError::Transport(err.to_string())
}

#[async_trait]
impl BackendClient for HttpBackend {
    async fn fetch_champions(&self) -> Result<Vec<ChampionRecord>, BackendError> {
        let url = self.endpoint("champions");
        debug!(%url, "fetching champion catalog");
        let response = self.http.get(&url).send().await.map_err(transport)?;
        let body = Self::read_body(response).await?;
        models::parse_champions(&body)
    }

    async fn suggest_allies(
        &self,
        champion: &SanitizedName,
        enemy_champion: &SanitizedName,
        lane: &str,
    ) -> Result<SuggestionResult, BackendError> {
        let request = SuggestAlliesRequest {
            champion,
            enemy_champion,
            lane,
        };
        debug!(%champion, %enemy_champion, lane, "POST suggest_allies");
        let response = self
            .http
            .post(self.endpoint("suggest_allies"))
            .json(&request)
            .send()
            .await
            .map_err(transport)?;
        let body = Self::read_body(response).await?;
        models::parse_suggestion(&body)
    }

    async fn predict_team_win_rate(
        &self,
        blue_team: &SanitizedTeam,
        red_team: &SanitizedTeam,
    ) -> Result<TeamPredictionResult, BackendError> {
        let request = PredictTeamRequest::new(blue_team, red_team);
        debug!(
            blue = blue_team.len(),
            red = red_team.len(),
            "POST predict_team_win_rate"
        );
        let response = self
            .http
            .post(self.endpoint("predict_team_win_rate"))
            .json(&request)
            .send()
            .await
            .map_err(transport)?;
        let body = Self::read_body(response).await?;
        models::parse_team_prediction(&body)
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
