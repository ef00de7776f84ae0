//! Group stage: independent round robins per group, rounds interleaved.

use crate::logic::league::round_robin_pairings;
use crate::logic::timeslot::SlotAllocator;
use crate::models::{GroupId, Match, MatchSlot, ScheduleSettings, TeamId};

/// Schedule a round robin inside each group (teams never meet outside their
/// group at this stage) and merge the results into one sequence-numbered,
/// time-slotted list. Rounds are interleaved across groups - round 1 of every
/// group before round 2 of any - so same-numbered rounds land on similar
/// dates. Groups are expected in display order.
pub fn schedule_group_stage(
    groups: &[(GroupId, Vec<TeamId>)],
    settings: &ScheduleSettings,
    venues: &[String],
) -> Vec<Match> {
    let per_group: Vec<(GroupId, Vec<(u32, TeamId, TeamId)>)> = groups
        .iter()
        .map(|(gid, teams)| (*gid, round_robin_pairings(teams)))
        .collect();
    let last_round = per_group
        .iter()
        .flat_map(|(_, pairings)| pairings.iter().map(|(round, _, _)| *round))
        .max()
        .unwrap_or(0);

    let mut allocator = SlotAllocator::new(settings, venues);
    let mut matches = Vec::new();
    let mut seq = 0u32;
    for round in 1..=last_round {
        for (gid, pairings) in &per_group {
            for &(_, home, away) in pairings.iter().filter(|(r, _, _)| *r == round) {
                seq += 1;
                let (at, venue) = allocator.next_slot();
                let mut m = Match::new(
                    seq,
                    round,
                    MatchSlot::resolved(home),
                    MatchSlot::resolved(away),
                    at,
                    venue,
                );
                m.group_id = Some(*gid);
                matches.push(m);
            }
        }
    }
    matches
}
