// Champion name normalization for the backend boundary.

use serde::Serialize;
use std::fmt;

/// A champion name reduced to ASCII letters, the form the analytics backend
/// indexes on ("Kai'Sa" -> "KaiSa", "Nunu & Willump" -> "NunuWillump").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SanitizedName(String);

impl SanitizedName {
    pub fn from_display(name: &str) -> Self {
        SanitizedName(name.chars().filter(|c| c.is_ascii_alphabetic()).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SanitizedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
