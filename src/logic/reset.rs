//! Reset a competition to its generation-time shape.

use crate::models::{
    Competition, CompetitionError, CompetitionFormat, CompetitionStatus, SlotOutcome, TeamStats,
};
use std::collections::BTreeMap;

/// Reverse everything result recording has done: clear scores, winners,
/// draw flags, and timestamps on every match, restore progression slots in
/// later bracket rounds to their unresolved shape, zero all team stats, and
/// put the competition back in Draft. Idempotent, and safe on a competition
/// with no matches or no recorded results.
pub fn reset_competition(competition: &mut Competition) -> Result<(), CompetitionError> {
    match competition.format {
        CompetitionFormat::Tournament if !competition.settings.group_stage => {
            reset_bracket(competition)?
        }
        // Leagues and group stages have no progression structure; every
        // match keeps its teams and just loses its result.
        _ => {
            for m in &mut competition.matches {
                m.clear_result();
            }
        }
    }

    for team in &mut competition.teams {
        team.stats = TeamStats::default();
    }
    competition.status = CompetitionStatus::Draft;
    log::info!(
        "Reset competition {} ({}) to draft",
        competition.name,
        competition.id
    );
    Ok(())
}

/// Bracket reset. First-round matches keep their resolved teams (those came
/// from generation, not propagation) and only lose result fields. Every
/// later-round slot that carries a source gets its team cleared and the
/// source re-derived from the bracket structure: matches in sequence order
/// consume the previous round's matches in sequence order, winner-feeds and
/// loser-feeds as separate streams (only the third-place fixture takes
/// losers). Slots without a source were resolved by a first-round bye and
/// survive untouched.
fn reset_bracket(competition: &mut Competition) -> Result<(), CompetitionError> {
    let Some(first_round) = competition.matches.iter().map(|m| m.round).min() else {
        return Ok(());
    };

    let mut rounds: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
    for (i, m) in competition.matches.iter().enumerate() {
        rounds.entry(m.round).or_default().push(i);
    }
    for indices in rounds.values_mut() {
        indices.sort_by_key(|&i| competition.matches[i].sequence);
    }

    let mut prev: Vec<u32> = Vec::new();
    for (&round, indices) in &rounds {
        if round > first_round {
            let mut winner_feed = prev.iter().copied();
            let mut loser_feed = prev.iter().copied();
            for &i in indices {
                let m = &mut competition.matches[i];
                let sequence = m.sequence;
                for slot in [&mut m.home, &mut m.away] {
                    if let Some(source) = slot.source.as_mut() {
                        let feed = match source.outcome {
                            SlotOutcome::Winner => winner_feed.next(),
                            SlotOutcome::Loser => loser_feed.next(),
                        }
                        .ok_or(CompetitionError::CorruptBracket { sequence })?;
                        source.match_sequence = feed;
                        slot.team = None;
                    }
                }
            }
        }
        for &i in indices {
            competition.matches[i].clear_result();
        }
        prev = indices
            .iter()
            .map(|&i| competition.matches[i].sequence)
            .collect();
    }
    Ok(())
}
