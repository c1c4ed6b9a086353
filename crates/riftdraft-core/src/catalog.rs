// Champion catalog: the name list behind the picker and icon resolution.

use crate::backend::ChampionRecord;

/// Champion list fetched once at session start.
#[derive(Debug, Clone, PartialEq)]
pub struct ChampionCatalog {
    version: String,
    champions: Vec<ChampionRecord>,
}

impl ChampionCatalog {
    /// Build from backend records (already ordered by id). The data-dragon
    /// version is taken from the first record that reports one.
    pub fn new(champions: Vec<ChampionRecord>, fallback_version: &str) -> Self {
        let version = champions
            .iter()
            .find_map(|c| c.version.clone())
            .unwrap_or_else(|| fallback_version.to_string());
        Self { version, champions }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn len(&self) -> usize {
        self.champions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.champions.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.champions.iter().map(|c| c.name.as_str())
    }

    /// Exact display-name membership.
    pub fn contains(&self, name: &str) -> bool {
        self.champions.iter().any(|c| c.name == name)
    }

    /// First champion whose name contains `query`, ignoring case.
    pub fn find_first(&self, query: &str) -> Option<&str> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return None;
        }
        self.champions
            .iter()
            .map(|c| c.name.as_str())
            .find(|name| name.to_lowercase().contains(&query))
    }

    /// `{cdn}/{version}/img/champion/{image}` for a display name.
    pub fn icon_url(&self, cdn: &str, name: &str) -> Option<String> {
        let image = self
            .champions
            .iter()
            .find(|c| c.name == name)?
            .image_full
            .as_deref()?;
        Some(format!(
            "{}/{}/img/champion/{}",
            cdn.trim_end_matches('/'),
            self.version,
            image
        ))
    }
}
