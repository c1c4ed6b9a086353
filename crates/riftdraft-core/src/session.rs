// Draft session: composition root for one drafting screen.
//
// Owns the roster store, suggestion cache, event channel, detail view and
// prediction workflow, and exposes the operations a front end invokes.

use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::backend::BackendClient;
use crate::catalog::ChampionCatalog;
use crate::config::CatalogConfig;
use crate::detail::{DetailPanel, DetailView};
use crate::display::TooltipContent;
use crate::draft::{ActiveSelection, Role, Roster, RosterStore, Side};
use crate::events::{Event, EventChannel, OpenSuggestions};
use crate::prediction::{PredictionPanel, PredictionWorkflow};
use crate::suggest::{CacheState, SuggestionCache, SuggestionError};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("unknown champion: {0}")]
    UnknownChampion(String),

    #[error("no role selected; select a side and role first")]
    NoActiveSelection,

    #[error("champion list unavailable: {0}")]
    CatalogUnavailable(String),
}

pub struct DraftSession {
    backend: Arc<dyn BackendClient>,
    catalog_config: CatalogConfig,
    catalog: Mutex<Option<ChampionCatalog>>,
    roster: Arc<RosterStore>,
    cache: SuggestionCache,
    events: EventChannel,
    detail: DetailView,
    prediction: PredictionWorkflow,
}

impl DraftSession {
    pub fn new(backend: Arc<dyn BackendClient>, catalog_config: CatalogConfig) -> Self {
        let roster = Arc::new(RosterStore::new());
        let cache = SuggestionCache::new(Arc::clone(&backend));
        let events = EventChannel::new();
        let detail = DetailView::attach(&events, Arc::clone(&roster), cache.clone());
        let prediction = PredictionWorkflow::new(Arc::clone(&backend));

        Self {
            backend,
            catalog_config,
            catalog: Mutex::new(None),
            roster,
            cache,
            events,
            detail,
            prediction,
        }
    }

    fn catalog_slot(&self) -> MutexGuard<'_, Option<ChampionCatalog>> {
        self.catalog.lock().expect("catalog mutex poisoned")
    }

    /// Fetch the champion list. Returns the number of champions loaded.
    /// May be called again to refresh; a failure keeps any earlier catalog.
    pub async fn initialize(&self) -> Result<usize, SessionError> {
        let records = self.backend.fetch_champions().await.map_err(|e| {
            warn!(error = %e, "champion catalog fetch failed");
            SessionError::CatalogUnavailable(e.to_string())
        })?;
        let catalog = ChampionCatalog::new(records, &self.catalog_config.fallback_version);
        let count = catalog.len();
        info!(count, version = catalog.version(), "champion catalog loaded");
        *self.catalog_slot() = Some(catalog);
        Ok(count)
    }

    pub fn catalog(&self) -> Option<ChampionCatalog> {
        self.catalog_slot().clone()
    }

    /// Channel carrying `OpenSuggestions`; extra views may subscribe here.
    pub fn events(&self) -> &EventChannel {
        &self.events
    }

    pub fn roster(&self, side: Side) -> Roster {
        self.roster.roster(side)
    }

    pub fn active_selection(&self) -> Option<ActiveSelection> {
        self.roster.active_selection()
    }

    pub fn select(&self, side: Side, role: Role) {
        debug!(%side, %role, "role focused");
        self.roster.set_active_selection(side, role);
    }

    /// Put `champion` in `side`/`role`. An empty name clears the slot. With
    /// name validation on and a catalog loaded, names outside the catalog
    /// are rejected before the roster changes.
    pub fn assign(&self, side: Side, role: Role, champion: &str) -> Result<(), SessionError> {
        let champion = champion.trim();
        if !champion.is_empty() && self.catalog_config.validate_names {
            if let Some(catalog) = self.catalog_slot().as_ref() {
                if !catalog.contains(champion) {
                    return Err(SessionError::UnknownChampion(champion.to_string()));
                }
            }
        }
        info!(%side, %role, champion, "champion assigned");
        self.roster.set_champion(side, role, champion);
        Ok(())
    }

    /// Assign the first catalog match for `query` to the focused role and
    /// return the chosen name.
    pub fn submit(&self, query: &str) -> Result<String, SessionError> {
        let selection = self
            .roster
            .active_selection()
            .ok_or(SessionError::NoActiveSelection)?;
        let name = {
            let catalog = self.catalog_slot();
            let catalog = catalog.as_ref().ok_or_else(|| {
                SessionError::CatalogUnavailable("catalog not loaded".to_string())
            })?;
            catalog
                .find_first(query)
                .ok_or_else(|| SessionError::UnknownChampion(query.trim().to_string()))?
                .to_string()
        };
        self.assign(selection.side, selection.role, &name)?;
        Ok(name)
    }

    fn matchup(&self, side: Side, role: Role) -> Option<(String, String)> {
        let ally = self.roster.champion(side, role)?;
        let enemy = self.roster.champion(side.opponent(), role)?;
        Some((ally, enemy))
    }

    /// Resolve the matchup suggestions for a hovered role.
    pub async fn hover(&self, side: Side, role: Role) -> TooltipContent {
        let Some((ally, enemy)) = self.matchup(side, role) else {
            return TooltipContent::NoOpponent;
        };
        match self.cache.resolve(&ally, &enemy, role).await {
            Ok(result) => TooltipContent::Ready(result),
            Err(SuggestionError::NoOpponent) => TooltipContent::NoOpponent,
            Err(SuggestionError::FetchFailed(_)) => TooltipContent::Unavailable,
        }
    }

    /// Tooltip for a role from the cache alone; never issues a request.
    pub fn tooltip(&self, side: Side, role: Role) -> TooltipContent {
        let Some((ally, enemy)) = self.matchup(side, role) else {
            return TooltipContent::NoOpponent;
        };
        match self.cache.peek(&ally, &enemy, role) {
            Some(CacheState::Pending) => TooltipContent::Loading,
            Some(CacheState::Ready(result)) => TooltipContent::Ready(result),
            None => TooltipContent::Unavailable,
        }
    }

    /// Ask the detail view to show `side`/`role`. Unfilled roles publish
    /// nothing; returns whether an event went out.
    pub fn open_details(&self, side: Side, role: Role) -> bool {
        let Some(champion) = self.roster.champion(side, role) else {
            debug!(%side, %role, "details requested for empty role");
            return false;
        };
        self.events.publish(&Event::OpenSuggestions(OpenSuggestions {
            champion,
            role,
            side,
        }));
        true
    }

    pub fn detail_panel(&self) -> DetailPanel {
        self.detail.panel()
    }

    pub async fn detail_settled(&self) {
        self.detail.settled().await
    }

    /// Predict the current rosters and update the prediction panel.
    pub async fn predict(&self) -> PredictionPanel {
        let blue = self.roster.roster(Side::Blue);
        let red = self.roster.roster(Side::Red);
        self.prediction.refresh(&blue, &red).await
    }

    pub fn prediction_panel(&self) -> PredictionPanel {
        self.prediction.panel()
    }

    pub fn icon_url(&self, name: &str) -> Option<String> {
        self.catalog_slot()
            .as_ref()?
            .icon_url(&self.catalog_config.icon_cdn, name)
    }

    pub fn cached_matchups(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{
        BackendError, ChampionRecord, SanitizedTeam, SuggestionResult, TeamPredictionResult,
    };
    use crate::draft::SanitizedName;
    use async_trait::async_trait;

    struct CatalogOnly {
        fail: bool,
    }

    #[async_trait]
    impl BackendClient for CatalogOnly {
        async fn fetch_champions(&self) -> Result<Vec<ChampionRecord>, BackendError> {
            if self.fail {
                return Err(BackendError::Transport("connection refused".into()));
            }
            Ok(["Ahri", "Akali", "Kai'Sa", "Zed"]
                .iter()
                .map(|name| ChampionRecord {
                    id: SanitizedName::from_display(name).to_string(),
                    name: name.to_string(),
                    version: Some("14.1.1".into()),
                    image_full: Some(format!("{}.png", SanitizedName::from_display(name))),
                })
                .collect())
        }

        async fn suggest_allies(
            &self,
            _champion: &SanitizedName,
            _enemy_champion: &SanitizedName,
            _lane: &str,
        ) -> Result<SuggestionResult, BackendError> {
            Err(BackendError::Transport("unused".into()))
        }

        async fn predict_team_win_rate(
            &self,
            _blue_team: &SanitizedTeam,
            _red_team: &SanitizedTeam,
        ) -> Result<TeamPredictionResult, BackendError> {
            Err(BackendError::Transport("unused".into()))
        }
    }

    fn session(fail: bool) -> DraftSession {
        DraftSession::new(Arc::new(CatalogOnly { fail }), CatalogConfig::default())
    }

    #[tokio::test]
    async fn initialize_reports_count() {
        let session = session(false);
        assert_eq!(session.initialize().await, Ok(4));
        assert_eq!(session.catalog().unwrap().version(), "14.1.1");
    }

    #[tokio::test]
    async fn initialize_failure_is_catalog_unavailable() {
        let session = session(true);
        let err = session.initialize().await.unwrap_err();
        assert!(matches!(err, SessionError::CatalogUnavailable(_)));
        assert!(session.catalog().is_none());
    }

    #[tokio::test]
    async fn assign_validates_against_loaded_catalog() {
        let session = session(false);
        session.initialize().await.unwrap();

        assert_eq!(
            session.assign(Side::Blue, Role::Top, "Teemo"),
            Err(SessionError::UnknownChampion("Teemo".into()))
        );
        assert_eq!(session.roster(Side::Blue).get(Role::Top), None);

        session.assign(Side::Blue, Role::Top, "Ahri").unwrap();
        assert_eq!(session.roster(Side::Blue).get(Role::Top), Some("Ahri"));
    }

    #[test]
    fn assign_without_catalog_is_unvalidated() {
        let session = session(false);
        session.assign(Side::Red, Role::Mid, "Anyone").unwrap();
        assert_eq!(session.roster(Side::Red).get(Role::Mid), Some("Anyone"));
    }

    #[tokio::test]
    async fn submit_assigns_first_match_to_focused_role() {
        let session = session(false);
        session.initialize().await.unwrap();

        assert_eq!(session.submit("ak"), Err(SessionError::NoActiveSelection));

        session.select(Side::Red, Role::Bottom);
        assert_eq!(session.submit("kai").unwrap(), "Kai'Sa");
        assert_eq!(session.roster(Side::Red).get(Role::Bottom), Some("Kai'Sa"));
        assert_eq!(session.active_selection(), None);
    }

    #[tokio::test]
    async fn submit_with_no_match_keeps_focus() {
        let session = session(false);
        session.initialize().await.unwrap();
        session.select(Side::Blue, Role::Jungle);

        assert_eq!(
            session.submit("xyz"),
            Err(SessionError::UnknownChampion("xyz".into()))
        );
        assert!(session.active_selection().is_some());
    }

    #[test]
    fn open_details_on_empty_role_publishes_nothing() {
        let session = session(false);
        assert!(!session.open_details(Side::Blue, Role::Top));
        assert_eq!(session.detail_panel(), DetailPanel::default());
    }

    #[tokio::test]
    async fn hover_without_opponent_skips() {
        let session = session(false);
        session.assign(Side::Blue, Role::Top, "Ahri").unwrap();
        assert_eq!(
            session.hover(Side::Blue, Role::Top).await,
            TooltipContent::NoOpponent
        );
        assert_eq!(session.cached_matchups(), 0);
    }

    #[tokio::test]
    async fn icon_url_uses_catalog_version() {
        let session = session(false);
        assert_eq!(session.icon_url("Ahri"), None);
        session.initialize().await.unwrap();
        assert_eq!(
            session.icon_url("Kai'Sa").as_deref(),
            Some("https://ddragon.leagueoflegends.com/cdn/14.1.1/img/champion/KaiSa.png")
        );
    }
}
