//! Match, participant slots, and typed progression references.

use crate::models::group::GroupId;
use crate::models::team::TeamId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Goals per side (home, away).
pub type Score = (u32, u32);

/// Lifecycle of a single match.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Scheduled,
    Live,
    Completed,
    Cancelled,
}

/// Which outcome of the source match fills a slot.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotOutcome {
    Winner,
    Loser,
}

/// Reference to an earlier match whose outcome fills a participant slot.
/// Resolution is by sequence lookup; the "Winner of match 7" string shown to
/// operators is derived from this, never parsed back.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SlotSource {
    pub match_sequence: u32,
    pub outcome: SlotOutcome,
}

impl SlotSource {
    pub fn winner_of(match_sequence: u32) -> Self {
        Self {
            match_sequence,
            outcome: SlotOutcome::Winner,
        }
    }

    pub fn loser_of(match_sequence: u32) -> Self {
        Self {
            match_sequence,
            outcome: SlotOutcome::Loser,
        }
    }

    /// Display text for a slot that is still waiting on this source.
    pub fn describe(&self) -> String {
        match self.outcome {
            SlotOutcome::Winner => format!("Winner of match {}", self.match_sequence),
            SlotOutcome::Loser => format!("Loser of match {}", self.match_sequence),
        }
    }
}

/// One participant slot. Generation produces either a resolved team (first
/// round, or a bye advancing straight into round 2) or a source to wait on.
/// Propagation fills `team` and keeps `source` as provenance, which is what
/// lets a reset restore the generation-time shape without guessing.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchSlot {
    pub team: Option<TeamId>,
    pub source: Option<SlotSource>,
}

impl MatchSlot {
    /// A slot already holding a known team.
    pub fn resolved(team: TeamId) -> Self {
        Self {
            team: Some(team),
            source: None,
        }
    }

    /// A slot waiting on an earlier match's outcome.
    pub fn awaiting(source: SlotSource) -> Self {
        Self {
            team: None,
            source: Some(source),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.team.is_some()
    }
}

/// The schedulable unit: one fixture between two slots.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    /// Unique within the competition and stable once assigned; progression
    /// references address matches by this number.
    pub sequence: u32,
    pub round: u32,
    /// Human round label, e.g. "Semifinal" (bracket rounds only).
    pub round_label: Option<String>,
    pub home: MatchSlot,
    pub away: MatchSlot,
    pub scheduled_at: DateTime<Utc>,
    pub venue: Option<String>,
    pub group_id: Option<GroupId>,
    pub status: MatchStatus,
    pub score: Option<Score>,
    pub overtime_score: Option<Score>,
    pub penalty_score: Option<Score>,
    pub winner: Option<TeamId>,
    pub is_draw: bool,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl Match {
    pub fn new(
        sequence: u32,
        round: u32,
        home: MatchSlot,
        away: MatchSlot,
        scheduled_at: DateTime<Utc>,
        venue: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            sequence,
            round,
            round_label: None,
            home,
            away,
            scheduled_at,
            venue,
            group_id: None,
            status: MatchStatus::Scheduled,
            score: None,
            overtime_score: None,
            penalty_score: None,
            winner: None,
            is_draw: false,
            started_at: None,
            ended_at: None,
            notes: None,
        }
    }

    /// A match may only go live once both slots hold a team.
    pub fn is_startable(&self) -> bool {
        self.home.is_resolved() && self.away.is_resolved()
    }

    /// Clear everything a recorded result may have written. Slots are not
    /// touched; the reset engine owns those.
    pub fn clear_result(&mut self) {
        self.status = MatchStatus::Scheduled;
        self.score = None;
        self.overtime_score = None;
        self.penalty_score = None;
        self.winner = None;
        self.is_draw = false;
        self.started_at = None;
        self.ended_at = None;
        self.notes = None;
    }
}
