//! Team (competition-scoped entrant) and its statistical record.

use crate::models::group::GroupId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a team (used in matches and lookups).
pub type TeamId = Uuid;

/// Running record for standings. `goal_difference` is recomputed from its
/// components whenever either changes, never adjusted on its own.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TeamStats {
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i32,
    pub points: u32,
}

/// A team registered into one competition.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    /// Explicit bracket priority; unseeded teams rank below all seeded ones
    /// in their registration order.
    pub seed: Option<u32>,
    pub group_id: Option<GroupId>,
    pub stats: TeamStats,
}

impl Team {
    /// Create a new team with the given name. Stats start at zero.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            seed: None,
            group_id: None,
            stats: TeamStats::default(),
        }
    }

    pub fn seeded(name: impl Into<String>, seed: u32) -> Self {
        Self {
            seed: Some(seed),
            ..Self::new(name)
        }
    }
}
