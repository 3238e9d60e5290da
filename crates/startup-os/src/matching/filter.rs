//! Browsing-surface filters layered over the ranked list. Filters never touch scores.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::RankedProfile;
use crate::domain::{Stage, StartupProfile};

/// Sentinel accepted by the role, industry and stage filters to disable them.
pub const ALL: &str = "all";

/// The three discovery surfaces backed by the match engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectorySurface {
    Community,
    Network,
    Founders,
}

impl DirectorySurface {
    pub const fn key(self) -> &'static str {
        match self {
            Self::Community => "community",
            Self::Network => "network",
            Self::Founders => "founders",
        }
    }
}

impl fmt::Display for DirectorySurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for DirectorySurface {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "community" => Ok(Self::Community),
            "network" => Ok(Self::Network),
            "founders" => Ok(Self::Founders),
            other => Err(format!("unknown directory surface '{other}'")),
        }
    }
}

/// User-selected filters; which of them apply depends on the surface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryFilter {
    #[serde(rename = "q")]
    pub query: Option<String>,
    pub role: Option<String>,
    pub industry: Option<String>,
    pub stage: Option<String>,
}

impl DirectoryFilter {
    pub fn matches(&self, surface: DirectorySurface, profile: &StartupProfile) -> bool {
        match surface {
            DirectorySurface::Community => {
                self.matches_text(&[Field::Name, Field::Types], profile)
                    && self.matches_role(profile)
                    && self.matches_industry(profile)
            }
            DirectorySurface::Network => {
                self.matches_text(&[Field::Name, Field::Types, Field::City], profile)
                    && self.matches_stage(profile)
            }
            DirectorySurface::Founders => self.matches_text(
                &[Field::Name, Field::Types, Field::City, Field::Country],
                profile,
            ),
        }
    }

    /// Keep ranked entries that pass the surface's filters, preserving rank order.
    pub fn apply(
        &self,
        surface: DirectorySurface,
        ranked: Vec<RankedProfile>,
    ) -> Vec<RankedProfile> {
        ranked
            .into_iter()
            .filter(|entry| self.matches(surface, &entry.profile))
            .collect()
    }

    fn matches_text(&self, fields: &[Field], profile: &StartupProfile) -> bool {
        let Some(needle) = active(&self.query) else {
            return true;
        };
        let needle = needle.to_lowercase();

        fields.iter().any(|field| match field {
            Field::Name => contains_folded(&profile.name, &needle),
            Field::Types => profile
                .types
                .iter()
                .any(|tag| contains_folded(tag, &needle)),
            Field::City => profile
                .city
                .as_deref()
                .is_some_and(|city| contains_folded(city, &needle)),
            Field::Country => profile
                .country
                .as_deref()
                .is_some_and(|country| contains_folded(country, &needle)),
        })
    }

    fn matches_role(&self, profile: &StartupProfile) -> bool {
        match selected(&self.role) {
            Some(role) => contains_folded(&profile.role, &role.to_lowercase()),
            None => true,
        }
    }

    fn matches_industry(&self, profile: &StartupProfile) -> bool {
        match selected(&self.industry) {
            Some(industry) => profile.types.iter().any(|tag| tag == industry),
            None => true,
        }
    }

    fn matches_stage(&self, profile: &StartupProfile) -> bool {
        match selected(&self.stage) {
            // An unrecognised stage filter matches nothing, like an unknown dropdown value.
            Some(stage) => {
                Stage::parse(stage).is_some_and(|wanted| profile.stage == Some(wanted))
            }
            None => true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Field {
    Name,
    Types,
    City,
    Country,
}

fn active(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn selected(value: &Option<String>) -> Option<&str> {
    active(value).filter(|value| !value.eq_ignore_ascii_case(ALL))
}

fn contains_folded(haystack: &str, lowered_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowered_needle)
}

/// Headline counts shown above a directory listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryStats {
    pub members: usize,
    pub founders: usize,
    pub investors: usize,
}

impl DirectoryStats {
    pub fn from_profiles<'a>(profiles: impl IntoIterator<Item = &'a StartupProfile>) -> Self {
        profiles
            .into_iter()
            .fold(Self::default(), |mut stats, profile| {
                stats.members += 1;
                if profile.is_founder() {
                    stats.founders += 1;
                }
                if profile.is_investor() {
                    stats.investors += 1;
                }
                stats
            })
    }
}
