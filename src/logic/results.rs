//! Result recording: outcome resolution, stats, and winner propagation.

use crate::logic::stats::{apply_outcome, MatchOutcome};
use crate::models::{
    Competition, CompetitionError, CompetitionStatus, MatchId, MatchStatus, Score, SlotOutcome,
    TeamId,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// One result as submitted by an operator.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResultEntry {
    pub score: Score,
    #[serde(default)]
    pub overtime_score: Option<Score>,
    #[serde(default)]
    pub penalty_score: Option<Score>,
    /// Live or Completed; only a completed result touches stats and the
    /// bracket.
    pub status: MatchStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Which side won, if any.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Side {
    Home,
    Away,
}

/// Record a result for one match of an active competition.
///
/// Persists the score fields, resolved winner or draw flag, status, notes,
/// and stamps the actual start/end times on the first transition into
/// Live/Completed. On completion, both teams' stats are recomputed and the
/// winner (and, for third-place fixtures, the loser) is propagated into
/// every later slot waiting on this match.
pub fn record_result(
    competition: &mut Competition,
    match_id: MatchId,
    entry: &ResultEntry,
) -> Result<(), CompetitionError> {
    if competition.status != CompetitionStatus::Active {
        return Err(CompetitionError::StatusConflict {
            required: CompetitionStatus::Active,
            current: competition.status,
        });
    }
    if !matches!(entry.status, MatchStatus::Live | MatchStatus::Completed) {
        return Err(CompetitionError::MalformedScore(
            "Result status must be live or completed",
        ));
    }
    if entry.overtime_score.is_some() && !competition.settings.overtime_enabled {
        return Err(CompetitionError::MalformedScore(
            "Overtime is not modeled by this competition",
        ));
    }
    if entry.penalty_score.is_some() && !competition.settings.penalties_enabled {
        return Err(CompetitionError::MalformedScore(
            "Penalty shootouts are not modeled by this competition",
        ));
    }
    if let Some((home, away)) = entry.penalty_score {
        if home == away {
            return Err(CompetitionError::MalformedScore(
                "A penalty shootout cannot end level",
            ));
        }
    }

    let idx = competition
        .matches
        .iter()
        .position(|m| m.id == match_id)
        .ok_or(CompetitionError::MatchNotFound(match_id))?;

    let decision = decide_outcome(entry);
    let now = Utc::now();

    // Copy out what the stats/propagation steps need so the mutable borrow
    // of the match ends before we touch teams or later matches.
    let (sequence, home_id, away_id, winner, loser, completed) = {
        let m = &mut competition.matches[idx];
        match m.status {
            MatchStatus::Completed => {
                return Err(CompetitionError::AlreadyCompleted {
                    sequence: m.sequence,
                })
            }
            MatchStatus::Cancelled => {
                return Err(CompetitionError::MatchCancelled {
                    sequence: m.sequence,
                })
            }
            MatchStatus::Scheduled | MatchStatus::Live => {}
        }
        let (home_id, away_id) = match (m.home.team, m.away.team) {
            (Some(home), Some(away)) => (home, away),
            _ => {
                return Err(CompetitionError::UnresolvedParticipants {
                    sequence: m.sequence,
                })
            }
        };

        m.score = Some(entry.score);
        m.overtime_score = entry.overtime_score;
        m.penalty_score = entry.penalty_score;
        m.notes = entry.notes.clone();
        if m.started_at.is_none() {
            m.started_at = Some(now);
        }
        let completed = entry.status == MatchStatus::Completed;
        if completed && m.ended_at.is_none() {
            m.ended_at = Some(now);
        }
        m.status = entry.status;

        let (winner, loser) = match decision {
            Some(Side::Home) => (Some(home_id), Some(away_id)),
            Some(Side::Away) => (Some(away_id), Some(home_id)),
            None => (None, None),
        };
        m.winner = winner;
        m.is_draw = decision.is_none();

        (m.sequence, home_id, away_id, winner, loser, completed)
    };

    if completed {
        // Shootout goals never count towards the goal record; they only
        // decide the winner.
        let (mut home_goals, mut away_goals) = entry.score;
        if let Some((home, away)) = entry.overtime_score {
            home_goals += home;
            away_goals += away;
        }
        let home_outcome = match decision {
            Some(Side::Home) => MatchOutcome::Win,
            Some(Side::Away) => MatchOutcome::Loss,
            None => MatchOutcome::Draw,
        };
        apply_team_result(competition, home_id, home_outcome, home_goals, away_goals)?;
        apply_team_result(
            competition,
            away_id,
            home_outcome.reversed(),
            away_goals,
            home_goals,
        )?;

        if let (Some(winner), Some(loser)) = (winner, loser) {
            propagate(competition, sequence, winner, loser);
            log::info!(
                "Match {} completed; winner propagated into waiting slots",
                sequence
            );
        }
    }

    Ok(())
}

/// Regulation plus overtime decide; a level total falls to the penalty pair
/// when one was supplied; otherwise the match stands as a draw.
fn decide_outcome(entry: &ResultEntry) -> Option<Side> {
    let (mut home, mut away) = entry.score;
    if let Some((h, a)) = entry.overtime_score {
        home += h;
        away += a;
    }
    if home != away {
        return Some(if home > away { Side::Home } else { Side::Away });
    }
    if let Some((h, a)) = entry.penalty_score {
        if h != a {
            return Some(if h > a { Side::Home } else { Side::Away });
        }
    }
    None
}

fn apply_team_result(
    competition: &mut Competition,
    team_id: TeamId,
    outcome: MatchOutcome,
    goals_for: u32,
    goals_against: u32,
) -> Result<(), CompetitionError> {
    let settings = competition.settings;
    let team = competition
        .team_mut(team_id)
        .ok_or(CompetitionError::TeamNotFound(team_id))?;
    team.stats = apply_outcome(team.stats, outcome, goals_for, goals_against, &settings);
    Ok(())
}

/// Fill every later slot waiting on this match: winner-sources take the
/// winner, loser-sources (the third-place fixture) take the loser. Lookup is
/// by sequence on the typed source, never by parsing display text.
fn propagate(competition: &mut Competition, sequence: u32, winner: TeamId, loser: TeamId) {
    for m in &mut competition.matches {
        for slot in [&mut m.home, &mut m.away] {
            if let Some(source) = slot.source {
                if source.match_sequence == sequence {
                    slot.team = Some(match source.outcome {
                        SlotOutcome::Winner => winner,
                        SlotOutcome::Loser => loser,
                    });
                }
            }
        }
    }
}
