//! Pure stats arithmetic for a single recorded result.

use crate::models::{ScheduleSettings, TeamStats};

/// Result of a match from one team's perspective.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MatchOutcome {
    Win,
    Draw,
    Loss,
}

impl MatchOutcome {
    pub fn reversed(self) -> Self {
        match self {
            MatchOutcome::Win => MatchOutcome::Loss,
            MatchOutcome::Draw => MatchOutcome::Draw,
            MatchOutcome::Loss => MatchOutcome::Win,
        }
    }
}

/// Fold one outcome into a team's record. Goal difference is recomputed from
/// the accumulated goals; points come from the competition's configured
/// values for win/draw/loss.
pub fn apply_outcome(
    stats: TeamStats,
    outcome: MatchOutcome,
    goals_for: u32,
    goals_against: u32,
    settings: &ScheduleSettings,
) -> TeamStats {
    let mut next = stats;
    next.played += 1;
    match outcome {
        MatchOutcome::Win => {
            next.wins += 1;
            next.points += settings.points_for_win;
        }
        MatchOutcome::Draw => {
            next.draws += 1;
            next.points += settings.points_for_draw;
        }
        MatchOutcome::Loss => {
            next.losses += 1;
            next.points += settings.points_for_loss;
        }
    }
    next.goals_for += goals_for;
    next.goals_against += goals_against;
    next.goal_difference = next.goals_for as i32 - next.goals_against as i32;
    next
}
