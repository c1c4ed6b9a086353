// Lane roles and team sides.

use std::fmt;

/// The five lane roles, in draft display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    Top,
    Jungle,
    Mid,
    Bottom,
    Support,
}

impl Role {
    /// All roles in their fixed order.
    pub const ALL: [Role; 5] = [Role::Top, Role::Jungle, Role::Mid, Role::Bottom, Role::Support];

    /// Parse a role name, case-insensitively.
    ///
    /// Accepts the display names plus the common shorthands used in lobby
    /// chat: "jg"/"jungler", "middle", "bot"/"adc", "sup"/"supp".
    pub fn from_str_role(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "top" => Some(Role::Top),
            "jungle" | "jg" | "jungler" => Some(Role::Jungle),
            "mid" | "middle" => Some(Role::Mid),
            "bottom" | "bot" | "adc" => Some(Role::Bottom),
            "support" | "sup" | "supp" => Some(Role::Support),
            _ => None,
        }
    }

    /// Display name ("Top", "Jungle", ...).
    pub fn display_str(&self) -> &'static str {
        match self {
            Role::Top => "Top",
            Role::Jungle => "Jungle",
            Role::Mid => "Mid",
            Role::Bottom => "Bottom",
            Role::Support => "Support",
        }
    }

    /// Upper-cased name sent to the backend ("TOP", "JUNGLE", ...).
    pub fn upper_name(&self) -> &'static str {
        match self {
            Role::Top => "TOP",
            Role::Jungle => "JUNGLE",
            Role::Mid => "MID",
            Role::Bottom => "BOTTOM",
            Role::Support => "SUPPORT",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Role::Top => 0,
            Role::Jungle => 1,
            Role::Mid => 2,
            Role::Bottom => 3,
            Role::Support => 4,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_str())
    }
}

/// Which team a roster belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Blue,
    Red,
}

impl Side {
    pub fn from_str_side(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "blue" | "b" => Some(Side::Blue),
            "red" | "r" => Some(Side::Red),
            _ => None,
        }
    }

    /// The side across the map.
    pub fn opponent(&self) -> Side {
        match self {
            Side::Blue => Side::Red,
            Side::Red => Side::Blue,
        }
    }

    pub fn team_name(&self) -> &'static str {
        match self {
            Side::Blue => "Blue Team",
            Side::Red => "Red Team",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.team_name())
    }
}
