use std::fmt;

use crate::draft::{Role, SanitizedName};

/// Identity of a matchup lookup: (ally, enemy, role) in sanitized form.
///
/// Only constructible when both names survive sanitization, so "Kai'Sa" and
/// "KaiSa" share one key while an empty slot never produces one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchupKey {
    ally: SanitizedName,
    enemy: SanitizedName,
    role: Role,
}

impl MatchupKey {
    pub fn new(ally: &str, enemy: &str, role: Role) -> Option<Self> {
        let ally = SanitizedName::from_display(ally);
        let enemy = SanitizedName::from_display(enemy);
        if ally.is_empty() || enemy.is_empty() {
            return None;
        }
        Some(Self { ally, enemy, role })
    }

    pub fn ally(&self) -> &SanitizedName {
        &self.ally
    }

    pub fn enemy(&self) -> &SanitizedName {
        &self.enemy
    }

    pub fn role(&self) -> Role {
        self.role
    }
}

impl fmt::Display for MatchupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} vs {} ({})", self.ally, self.enemy, self.role.upper_name())
    }
}
