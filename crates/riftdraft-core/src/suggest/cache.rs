// Memoizing, in-flight-deduplicating cache for matchup suggestions.
//
// Every MatchupKey is in one of three states: absent, Pending (one backend
// call outstanding, shared by every caller that asks meanwhile) or Ready.
// A failed call removes its Pending marker, so the next resolve retries.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use futures_util::future::{BoxFuture, FutureExt, Shared};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::key::MatchupKey;
use crate::backend::{BackendClient, SuggestionResult};
use crate::draft::Role;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SuggestionError {
    /// One of the two champions is missing. Callers treat this as "skip",
    /// not as a user-facing failure.
    #[error("no opposing champion in this lane")]
    NoOpponent,

    #[error("suggestion lookup failed: {0}")]
    FetchFailed(String),
}

type LookupOutcome = Result<SuggestionResult, SuggestionError>;
type Lookup = Shared<BoxFuture<'static, LookupOutcome>>;
type EntryMap = Mutex<HashMap<MatchupKey, CacheEntry>>;

enum CacheEntry {
    /// `ticket` identifies the lookup that owns this marker.
    Pending { ticket: u64, lookup: Lookup },
    Ready(SuggestionResult),
}

/// Observable state of a key, for views that must not trigger a request.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheState {
    Pending,
    Ready(SuggestionResult),
}

/// Cheap to clone; clones share the same entries.
#[derive(Clone)]
pub struct SuggestionCache {
    backend: Arc<dyn BackendClient>,
    entries: Arc<EntryMap>,
    next_ticket: Arc<AtomicU64>,
}

impl SuggestionCache {
    pub fn new(backend: Arc<dyn BackendClient>) -> Self {
        Self {
            backend,
            entries: Arc::new(Mutex::new(HashMap::new())),
            next_ticket: Arc::new(AtomicU64::new(1)),
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<MatchupKey, CacheEntry>> {
        self.entries.lock().expect("suggestion cache mutex poisoned")
    }

    /// Suggestions for `ally` facing `enemy` in `role`.
    ///
    /// Must run inside a tokio runtime: the backend call is spawned as its
    /// own task so it completes (and settles the entry) even if every caller
    /// stops waiting.
    pub async fn resolve(&self, ally: &str, enemy: &str, role: Role) -> LookupOutcome {
        let key = MatchupKey::new(ally, enemy, role).ok_or(SuggestionError::NoOpponent)?;
        self.resolve_key(key).await
    }

    pub async fn resolve_key(&self, key: MatchupKey) -> LookupOutcome {
        let lookup = {
            let mut entries = self.entries();
            match entries.get(&key) {
                Some(CacheEntry::Ready(result)) => {
                    debug!(%key, "suggestion cache hit");
                    return Ok(result.clone());
                }
                Some(CacheEntry::Pending { lookup, .. }) => {
                    debug!(%key, "joining in-flight suggestion lookup");
                    lookup.clone()
                }
                None => {
                    let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);
                    let lookup = self.start_lookup(key.clone(), ticket);
                    entries.insert(
                        key.clone(),
                        CacheEntry::Pending {
                            ticket,
                            lookup: lookup.clone(),
                        },
                    );
                    lookup
                }
            }
        };
        lookup.await
    }

    fn start_lookup(&self, key: MatchupKey, ticket: u64) -> Lookup {
        let backend = Arc::clone(&self.backend);
        let entries = Arc::downgrade(&self.entries);
        let task_key = key.clone();
        let task_entries = entries.clone();

        info!(%key, ticket, "requesting ally suggestions");
        let task = tokio::spawn(async move {
            let outcome = backend
                .suggest_allies(
                    task_key.ally(),
                    task_key.enemy(),
                    task_key.role().upper_name(),
                )
                .await
                .map_err(|e| SuggestionError::FetchFailed(e.to_string()));
            settle(&task_entries, &task_key, ticket, &outcome);
            outcome
        });

        async move {
            match task.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    let outcome = Err(SuggestionError::FetchFailed(format!(
                        "lookup task ended abnormally: {e}"
                    )));
                    settle(&entries, &key, ticket, &outcome);
                    outcome
                }
            }
        }
        .boxed()
        .shared()
    }

    /// Current state of a matchup without issuing a request. `None` means
    /// absent, including after a failed lookup.
    pub fn peek(&self, ally: &str, enemy: &str, role: Role) -> Option<CacheState> {
        let key = MatchupKey::new(ally, enemy, role)?;
        let entries = self.entries();
        match entries.get(&key)? {
            CacheEntry::Pending { .. } => Some(CacheState::Pending),
            CacheEntry::Ready(result) => Some(CacheState::Ready(result.clone())),
        }
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Replace the Pending marker owned by `ticket` with the lookup's outcome.
/// A marker owned by another ticket is left untouched.
fn settle(entries: &Weak<EntryMap>, key: &MatchupKey, ticket: u64, outcome: &LookupOutcome) {
    let Some(entries) = entries.upgrade() else {
        return;
    };
    let mut entries = entries.lock().expect("suggestion cache mutex poisoned");
    let owned = matches!(
        entries.get(key),
        Some(CacheEntry::Pending { ticket: t, .. }) if *t == ticket
    );
    if !owned {
        return;
    }
    match outcome {
        Ok(result) => {
            debug!(%key, "suggestion cached");
            entries.insert(key.clone(), CacheEntry::Ready(result.clone()));
        }
        Err(e) => {
            warn!(%key, error = %e, "suggestion lookup failed; entry dropped");
            entries.remove(key);
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{
        BackendError, ChampionRecord, SanitizedTeam, TeamPredictionResult,
    };
    use crate::draft::SanitizedName;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    /// Counts suggest calls; optionally parks each call on `gate` and fails
    /// the first `failures` calls.
    #[derive(Default)]
    struct StubBackend {
        calls: AtomicUsize,
        failures: AtomicUsize,
        gate: Option<Arc<Notify>>,
        requests: Mutex<Vec<(String, String, String)>>,
    }

    impl StubBackend {
        fn gated(gate: Arc<Notify>) -> Self {
            Self {
                gate: Some(gate),
                ..Default::default()
            }
        }

        fn failing(failures: usize) -> Self {
            Self {
                failures: AtomicUsize::new(failures),
                ..Default::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl BackendClient for StubBackend {
        async fn fetch_champions(&self) -> Result<Vec<ChampionRecord>, BackendError> {
            Ok(vec![])
        }

        async fn suggest_allies(
            &self,
            champion: &SanitizedName,
            enemy_champion: &SanitizedName,
            lane: &str,
        ) -> Result<SuggestionResult, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push((
                champion.to_string(),
                enemy_champion.to_string(),
                lane.to_string(),
            ));
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            let remaining = self.failures.load(Ordering::SeqCst);
            if remaining > 0 {
                self.failures.store(remaining - 1, Ordering::SeqCst);
                return Err(BackendError::Transport("connection reset".into()));
            }
            Ok(SuggestionResult {
                my_champion: champion.to_string(),
                enemy_champion: enemy_champion.to_string(),
                lane: lane.to_string(),
                win_rate_percent: 56.3,
                matches_analyzed: 120,
                suggested_allies: vec![],
            })
        }

        async fn predict_team_win_rate(
            &self,
            _blue_team: &SanitizedTeam,
            _red_team: &SanitizedTeam,
        ) -> Result<TeamPredictionResult, BackendError> {
            Err(BackendError::Transport("unused".into()))
        }
    }

    async fn let_tasks_run() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn concurrent_resolves_share_one_request() {
        let gate = Arc::new(Notify::new());
        let backend = Arc::new(StubBackend::gated(Arc::clone(&gate)));
        let cache = SuggestionCache::new(backend.clone());

        let (a, b, c, _) = tokio::join!(
            cache.resolve("Ahri", "Zed", Role::Top),
            cache.resolve("Ahri", "Zed", Role::Top),
            cache.resolve("Ahri", "Zed", Role::Top),
            async {
                let_tasks_run().await;
                assert_eq!(
                    cache.peek("Ahri", "Zed", Role::Top),
                    Some(CacheState::Pending)
                );
                gate.notify_one();
            }
        );

        assert_eq!(backend.calls(), 1);
        assert_eq!(a.unwrap(), b.clone().unwrap());
        assert_eq!(b.unwrap(), c.unwrap());
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn ready_entry_is_memoized() {
        let backend = Arc::new(StubBackend::default());
        let cache = SuggestionCache::new(backend.clone());

        let first = cache.resolve("Ahri", "Zed", Role::Top).await.unwrap();
        for _ in 0..5 {
            let again = cache.resolve("Ahri", "Zed", Role::Top).await.unwrap();
            assert_eq!(again, first);
        }
        assert_eq!(backend.calls(), 1);
        assert!(matches!(
            cache.peek("Ahri", "Zed", Role::Top),
            Some(CacheState::Ready(_))
        ));
    }

    #[tokio::test]
    async fn sends_sanitized_names_and_upper_lane() {
        let backend = Arc::new(StubBackend::default());
        let cache = SuggestionCache::new(backend.clone());

        cache
            .resolve("Kai'Sa", "Cho'Gath", Role::Bottom)
            .await
            .unwrap();
        let requests = backend.requests.lock().unwrap().clone();
        assert_eq!(
            requests,
            vec![("KaiSa".into(), "ChoGath".into(), "BOTTOM".into())]
        );
    }

    #[tokio::test]
    async fn display_variants_share_an_entry() {
        let backend = Arc::new(StubBackend::default());
        let cache = SuggestionCache::new(backend.clone());

        cache.resolve("Kai'Sa", "Zed", Role::Mid).await.unwrap();
        cache.resolve("KaiSa", "Zed", Role::Mid).await.unwrap();
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn different_roles_are_independent() {
        let backend = Arc::new(StubBackend::default());
        let cache = SuggestionCache::new(backend.clone());

        cache.resolve("Ahri", "Zed", Role::Top).await.unwrap();
        cache.resolve("Ahri", "Zed", Role::Mid).await.unwrap();
        assert_eq!(backend.calls(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn missing_champion_is_no_opponent_without_call() {
        let backend = Arc::new(StubBackend::default());
        let cache = SuggestionCache::new(backend.clone());

        let err = cache.resolve("Ahri", "", Role::Top).await.unwrap_err();
        assert_eq!(err, SuggestionError::NoOpponent);
        assert_eq!(backend.calls(), 0);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn failure_is_not_retained_and_retry_succeeds() {
        let backend = Arc::new(StubBackend::failing(1));
        let cache = SuggestionCache::new(backend.clone());

        let err = cache.resolve("Ahri", "Zed", Role::Top).await.unwrap_err();
        assert!(matches!(err, SuggestionError::FetchFailed(_)));
        assert_eq!(cache.peek("Ahri", "Zed", Role::Top), None);

        let ok = cache.resolve("Ahri", "Zed", Role::Top).await.unwrap();
        assert_eq!(ok.matches_analyzed, 120);
        assert_eq!(backend.calls(), 2);
    }

    #[tokio::test]
    async fn waiters_on_failed_lookup_all_see_the_error() {
        let gate = Arc::new(Notify::new());
        let backend = Arc::new(StubBackend {
            failures: AtomicUsize::new(1),
            gate: Some(Arc::clone(&gate)),
            ..Default::default()
        });
        let cache = SuggestionCache::new(backend.clone());

        let (a, b, _) = tokio::join!(
            cache.resolve("Ahri", "Zed", Role::Top),
            cache.resolve("Ahri", "Zed", Role::Top),
            async {
                let_tasks_run().await;
                gate.notify_one();
            }
        );
        assert!(matches!(a, Err(SuggestionError::FetchFailed(_))));
        assert_eq!(a, b);
        assert_eq!(backend.calls(), 1);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn abandoned_lookup_still_settles() {
        let gate = Arc::new(Notify::new());
        let backend = Arc::new(StubBackend::gated(Arc::clone(&gate)));
        let cache = SuggestionCache::new(backend.clone());

        // Start a resolve and give up on it before the backend answers.
        let abandoned = tokio::time::timeout(
            std::time::Duration::from_millis(10),
            cache.resolve("Ahri", "Zed", Role::Top),
        )
        .await;
        assert!(abandoned.is_err());
        assert_eq!(
            cache.peek("Ahri", "Zed", Role::Top),
            Some(CacheState::Pending)
        );

        gate.notify_one();
        let_tasks_run().await;
        assert!(matches!(
            cache.peek("Ahri", "Zed", Role::Top),
            Some(CacheState::Ready(_))
        ));
        assert_eq!(backend.calls(), 1);
    }
}
