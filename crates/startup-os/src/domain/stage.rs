use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle position of a startup on the fixed six-point scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Idea,
    Validation,
    Mvp,
    Revenue,
    Fundraising,
    Growth,
}

impl Stage {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Idea,
            Self::Validation,
            Self::Mvp,
            Self::Revenue,
            Self::Fundraising,
            Self::Growth,
        ]
    }

    /// Canonical position on the scale, used for adjacency checks.
    pub const fn index(self) -> usize {
        match self {
            Self::Idea => 0,
            Self::Validation => 1,
            Self::Mvp => 2,
            Self::Revenue => 3,
            Self::Fundraising => 4,
            Self::Growth => 5,
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Idea => "idea",
            Self::Validation => "validation",
            Self::Mvp => "mvp",
            Self::Revenue => "revenue",
            Self::Fundraising => "fundraising",
            Self::Growth => "growth",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Idea => "Idea",
            Self::Validation => "Validation",
            Self::Mvp => "MVP",
            Self::Revenue => "Revenue",
            Self::Fundraising => "Fundraising",
            Self::Growth => "Growth",
        }
    }

    /// Parse a stored stage key. Unknown keys yield `None` rather than an error.
    pub fn parse(raw: &str) -> Option<Self> {
        let needle = raw.trim();
        Self::ordered()
            .into_iter()
            .find(|stage| stage.key().eq_ignore_ascii_case(needle))
    }

    /// Whether two stages sit at most one step apart.
    pub fn is_adjacent(self, other: Self) -> bool {
        self.index().abs_diff(other.index()) <= 1
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
