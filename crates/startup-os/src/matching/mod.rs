//! Pairwise compatibility scoring and ranking of startup profiles.

pub mod filter;

pub use filter::{DirectoryFilter, DirectoryStats, DirectorySurface};

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::StartupProfile;

const SHARED_INDUSTRY_POINTS: u16 = 20;
const ADJACENT_STAGE_POINTS: u16 = 25;
const SAME_COUNTRY_POINTS: u16 = 10;
const SAME_CITY_POINTS: u16 = 15;
const COMPLEMENTARY_ROLE_POINTS: u16 = 30;
const MAX_MATCH_SCORE: u16 = 100;

/// Signal-by-signal contribution for one pair, before the final clamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchBreakdown {
    pub shared_industries: u16,
    pub stage_proximity: u16,
    pub same_country: u16,
    pub same_city: u16,
    pub complementary_roles: u16,
}

impl MatchBreakdown {
    pub fn raw_total(&self) -> u16 {
        self.shared_industries
            .saturating_add(self.stage_proximity)
            .saturating_add(self.same_country)
            .saturating_add(self.same_city)
            .saturating_add(self.complementary_roles)
    }

    pub fn score(&self) -> u8 {
        self.raw_total().min(MAX_MATCH_SCORE) as u8
    }
}

/// Candidate profile annotated with its match score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedProfile {
    #[serde(flatten)]
    pub profile: StartupProfile,
    /// `None` while the viewer has no profile to compare against.
    pub match_score: Option<u8>,
}

/// Score one candidate against the viewer's profile.
pub fn score_pair(me: &StartupProfile, candidate: &StartupProfile) -> MatchBreakdown {
    // Each industry counts once no matter how often either side repeats it.
    let mine: HashSet<&str> = me.types.iter().map(String::as_str).collect();
    let theirs: HashSet<&str> = candidate.types.iter().map(String::as_str).collect();
    let shared = u16::try_from(mine.intersection(&theirs).count()).unwrap_or(u16::MAX);

    let stage_proximity = match (me.stage, candidate.stage) {
        (Some(mine), Some(theirs)) if mine.is_adjacent(theirs) => ADJACENT_STAGE_POINTS,
        _ => 0,
    };

    MatchBreakdown {
        shared_industries: shared.saturating_mul(SHARED_INDUSTRY_POINTS),
        stage_proximity,
        same_country: location_bonus(&me.country, &candidate.country, SAME_COUNTRY_POINTS),
        same_city: location_bonus(&me.city, &candidate.city, SAME_CITY_POINTS),
        complementary_roles: if complementary_roles(me, candidate) {
            COMPLEMENTARY_ROLE_POINTS
        } else {
            0
        },
    }
}

/// Rank candidates by descending match score.
///
/// Ties keep their input order. Without a viewer profile the candidates come back unscored and
/// unsorted so browsing still works before onboarding completes.
pub fn rank_matches(
    me: Option<&StartupProfile>,
    candidates: Vec<StartupProfile>,
) -> Vec<RankedProfile> {
    let Some(me) = me else {
        return candidates
            .into_iter()
            .map(|profile| RankedProfile {
                profile,
                match_score: None,
            })
            .collect();
    };

    let mut ranked: Vec<RankedProfile> = candidates
        .into_iter()
        .map(|profile| {
            let score = score_pair(me, &profile).score();
            RankedProfile {
                profile,
                match_score: Some(score),
            }
        })
        .collect();

    // `sort_by` is stable, which is what keeps tied candidates in input order.
    ranked.sort_by(|left, right| right.match_score.cmp(&left.match_score));
    ranked
}

fn location_bonus(mine: &Option<String>, theirs: &Option<String>, points: u16) -> u16 {
    match (mine, theirs) {
        (Some(mine), Some(theirs)) if mine == theirs => points,
        _ => 0,
    }
}

fn complementary_roles(me: &StartupProfile, candidate: &StartupProfile) -> bool {
    (me.is_founder() && candidate.is_investor()) || (me.is_investor() && candidate.is_founder())
}
