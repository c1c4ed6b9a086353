// Scripted in-memory backend shared by the integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use riftdraft_core::backend::{
    AllySuggestion, BackendClient, BackendError, ChampionRecord, SanitizedTeam, SuggestionResult,
    TeamPredictionResult,
};
use riftdraft_core::draft::SanitizedName;

type PredictionStep = (Option<Arc<Notify>>, Result<TeamPredictionResult, BackendError>);

/// Matchups are answered from a table keyed by the sanitized request; a miss
/// is a 404. Predictions are answered in script order, each optionally held
/// until its gate is notified.
#[derive(Default)]
pub struct ScriptedBackend {
    champions: Vec<ChampionRecord>,
    matchups: Mutex<HashMap<(String, String, String), SuggestionResult>>,
    predictions: Mutex<VecDeque<PredictionStep>>,
    pub suggest_requests: Mutex<Vec<(String, String, String)>>,
    pub predict_requests: Mutex<Vec<(SanitizedTeam, SanitizedTeam)>>,
    pub champion_fetches: AtomicUsize,
}

impl ScriptedBackend {
    pub fn with_champions(names: &[&str]) -> Self {
        let champions = names
            .iter()
            .map(|name| {
                let id = SanitizedName::from_display(name).to_string();
                ChampionRecord {
                    image_full: Some(format!("{id}.png")),
                    id,
                    name: name.to_string(),
                    version: Some("15.5.1".into()),
                }
            })
            .collect();
        Self {
            champions,
            ..Default::default()
        }
    }

    pub fn matchup(self, ally: &str, enemy: &str, lane: &str, win_rate: f64) -> Self {
        let result = SuggestionResult {
            my_champion: ally.to_string(),
            enemy_champion: enemy.to_string(),
            lane: lane.to_string(),
            win_rate_percent: win_rate,
            matches_analyzed: 120,
            suggested_allies: vec![
                AllySuggestion {
                    champion: "Lee Sin".into(),
                    confidence: 0.61,
                },
                AllySuggestion {
                    champion: "Thresh".into(),
                    confidence: 0.1234,
                },
            ],
        };
        self.matchups
            .lock()
            .unwrap()
            .insert((ally.into(), enemy.into(), lane.into()), result);
        self
    }

    pub fn push_prediction(&self, win_rate: f64) {
        self.push_step(None, Ok(prediction(win_rate)));
    }

    pub fn push_gated_prediction(&self, gate: Arc<Notify>, win_rate: f64) {
        self.push_step(Some(gate), Ok(prediction(win_rate)));
    }

    pub fn push_prediction_failure(&self, detail: &str) {
        self.push_step(
            None,
            Err(BackendError::Status {
                status: 500,
                detail: detail.to_string(),
            }),
        );
    }

    fn push_step(
        &self,
        gate: Option<Arc<Notify>>,
        outcome: Result<TeamPredictionResult, BackendError>,
    ) {
        self.predictions.lock().unwrap().push_back((gate, outcome));
    }

    pub fn suggest_calls(&self) -> usize {
        self.suggest_requests.lock().unwrap().len()
    }

    pub fn predict_calls(&self) -> usize {
        self.predict_requests.lock().unwrap().len()
    }
}

fn prediction(win_rate: f64) -> TeamPredictionResult {
    TeamPredictionResult {
        win_rate_percent: win_rate,
        suggested_allies: vec![AllySuggestion {
            champion: "Orianna".into(),
            confidence: 0.4,
        }],
    }
}

#[async_trait]
impl BackendClient for ScriptedBackend {
    async fn fetch_champions(&self) -> Result<Vec<ChampionRecord>, BackendError> {
        self.champion_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.champions.clone())
    }

    async fn suggest_allies(
        &self,
        champion: &SanitizedName,
        enemy_champion: &SanitizedName,
        lane: &str,
    ) -> Result<SuggestionResult, BackendError> {
        let key = (
            champion.to_string(),
            enemy_champion.to_string(),
            lane.to_string(),
        );
        self.suggest_requests.lock().unwrap().push(key.clone());
        self.matchups
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .ok_or_else(|| BackendError::Status {
                status: 404,
                detail: "No matchup data".into(),
            })
    }

    async fn predict_team_win_rate(
        &self,
        blue_team: &SanitizedTeam,
        red_team: &SanitizedTeam,
    ) -> Result<TeamPredictionResult, BackendError> {
        self.predict_requests
            .lock()
            .unwrap()
            .push((blue_team.clone(), red_team.clone()));
        let step = self.predictions.lock().unwrap().pop_front();
        let Some((gate, outcome)) = step else {
            return Err(BackendError::Transport("no scripted prediction".into()));
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }
        outcome
    }
}

pub async fn let_tasks_run() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}
