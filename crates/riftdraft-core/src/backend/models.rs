// Result types returned by the analytics backend, plus the JSON wire shapes
// they are decoded from.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::BackendError;
use crate::draft::{Role, SanitizedName};

// ---------------------------------------------------------------------------
// Domain results
// ---------------------------------------------------------------------------

/// One ranked ally recommendation.
#[derive(Debug, Clone, PartialEq)]
pub struct AllySuggestion {
    pub champion: String,
    /// Backend confidence in 0..=1.
    pub confidence: f64,
}

/// Outcome of a single matchup lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionResult {
    /// Names as echoed back by the backend (sanitized form).
    pub my_champion: String,
    pub enemy_champion: String,
    pub lane: String,
    pub win_rate_percent: f64,
    pub matches_analyzed: u64,
    /// Ordered by backend ranking; never re-sorted.
    pub suggested_allies: Vec<AllySuggestion>,
}

/// Outcome of a full-roster prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamPredictionResult {
    pub win_rate_percent: f64,
    pub suggested_allies: Vec<AllySuggestion>,
}

/// Champion as listed by `GET /champions`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChampionRecord {
    pub id: String,
    pub name: String,
    pub version: Option<String>,
    pub image_full: Option<String>,
}

/// A side's filled roles, sanitized for the backend.
pub type SanitizedTeam = BTreeMap<Role, SanitizedName>;

// ---------------------------------------------------------------------------
// Wire shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub(crate) struct SuggestAlliesRequest<'a> {
    pub champion: &'a SanitizedName,
    pub enemy_champion: &'a SanitizedName,
    pub lane: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct PredictTeamRequest<'a> {
    pub blue_team: BTreeMap<&'static str, &'a SanitizedName>,
    pub red_team: BTreeMap<&'static str, &'a SanitizedName>,
}

impl<'a> PredictTeamRequest<'a> {
    pub fn new(blue: &'a SanitizedTeam, red: &'a SanitizedTeam) -> Self {
        Self {
            blue_team: upper_keyed(blue),
            red_team: upper_keyed(red),
        }
    }
}

/// Roles are keyed by their upper-cased name only on the wire.
fn upper_keyed(team: &SanitizedTeam) -> BTreeMap<&'static str, &SanitizedName> {
    team.iter()
        .map(|(role, name)| (role.upper_name(), name))
        .collect()
}

/// The backend encodes each ally as a single-key object `{ "<name>": conf }`.
type RankedAllies = Vec<BTreeMap<String, f64>>;

fn flatten_allies(ranked: RankedAllies) -> Vec<AllySuggestion> {
    ranked
        .into_iter()
        .flat_map(|entry| entry.into_iter())
        .map(|(champion, confidence)| AllySuggestion {
            champion,
            confidence,
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct SuggestAlliesResponse {
    #[serde(default)]
    my_champion: String,
    #[serde(default)]
    enemy_champion: String,
    #[serde(default)]
    lane: String,
    win_rate: f64,
    #[serde(default)]
    matches_analyzed: u64,
    #[serde(default)]
    suggested_allies: RankedAllies,
}

#[derive(Debug, Deserialize)]
struct PredictTeamResponse {
    win_rate: f64,
    #[serde(default)]
    suggested_allies: RankedAllies,
}

#[derive(Debug, Deserialize)]
struct ChampionListResponse {
    data: BTreeMap<String, ChampionData>,
}

#[derive(Debug, Deserialize)]
struct ChampionData {
    name: String,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    image: Option<ChampionImage>,
}

#[derive(Debug, Deserialize)]
struct ChampionImage {
    full: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Parsing helpers
// ---------------------------------------------------------------------------

pub(crate) fn parse_suggestion(body: &str) -> Result<SuggestionResult, BackendError> {
    let raw: SuggestAlliesResponse =
        serde_json::from_str(body).map_err(|e| BackendError::decode("suggest_allies", e))?;
    Ok(SuggestionResult {
        my_champion: raw.my_champion,
        enemy_champion: raw.enemy_champion,
        lane: raw.lane,
        win_rate_percent: raw.win_rate,
        matches_analyzed: raw.matches_analyzed,
        suggested_allies: flatten_allies(raw.suggested_allies),
    })
}

pub(crate) fn parse_team_prediction(body: &str) -> Result<TeamPredictionResult, BackendError> {
    let raw: PredictTeamResponse = serde_json::from_str(body)
        .map_err(|e| BackendError::decode("predict_team_win_rate", e))?;
    Ok(TeamPredictionResult {
        win_rate_percent: raw.win_rate,
        suggested_allies: flatten_allies(raw.suggested_allies),
    })
}

/// Champion records ordered by id.
pub(crate) fn parse_champions(body: &str) -> Result<Vec<ChampionRecord>, BackendError> {
    let raw: ChampionListResponse =
        serde_json::from_str(body).map_err(|e| BackendError::decode("champions", e))?;
    Ok(raw
        .data
        .into_iter()
        .map(|(id, champ)| ChampionRecord {
            id,
            name: champ.name,
            version: champ.version,
            image_full: champ.image.map(|i| i.full),
        })
        .collect())
}

/// Extract the `detail` field of an error body, if the body has one.
pub(crate) fn parse_error_detail(body: &str) -> Option<String> {
    let err: ErrorBody = serde_json::from_str(body).ok()?;
    match err.detail {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}
