//! Single-elimination bracket: mirrored seeding, byes, progression sources.

use crate::logic::timeslot::SlotAllocator;
use crate::models::{Match, MatchSlot, ScheduleSettings, SlotSource, Team, TeamId};

/// What occupies a bracket position while rounds are laid out: a team that is
/// already known (first round, or advanced on a bye) or the match that will
/// decide it.
enum Feed {
    Team(TeamId),
    Match(u32),
}

/// Bracket slot order for a field of `size` (a power of two): seed numbers
/// arranged so seed 1 and seed 2 sit in opposite halves and can only meet in
/// the final. Built by the standard doubling rule: start with [1], then each
/// pass mirrors every seed s with `2 * len + 1 - s`.
fn seeding_order(size: usize) -> Vec<usize> {
    let mut order = vec![1usize];
    while order.len() < size {
        let next_len = order.len() * 2;
        let mut next = Vec::with_capacity(next_len);
        for &s in &order {
            next.push(s);
            next.push(next_len + 1 - s);
        }
        order = next;
    }
    order
}

/// Entrants by effective seed: explicitly seeded teams first (ascending),
/// then unseeded teams as the lowest seeds in registration order (the sort
/// is stable, so ties and the unseeded tail keep their input order).
pub fn seed_order(teams: &[Team]) -> Vec<TeamId> {
    let mut ordered: Vec<&Team> = teams.iter().collect();
    ordered.sort_by_key(|t| t.seed.unwrap_or(u32::MAX));
    ordered.into_iter().map(|t| t.id).collect()
}

/// Generic name for a bracket round, counted back from the final.
fn round_label(round: u32, total_rounds: u32) -> String {
    match total_rounds - round {
        0 => "Final".to_string(),
        1 => "Semifinal".to_string(),
        2 => "Quarterfinal".to_string(),
        _ => format!("Round {}", round),
    }
}

/// Build a seeded single-elimination bracket over teams already in effective
/// seed order (see [`seed_order`]).
///
/// With N teams and S the next power of two, S - N seeds get a first-round
/// bye. Byes are never persisted: the lone occupant of a bye pairing is
/// resolved directly into the round-2 slot it feeds. Every other unknown slot
/// carries a winner-source naming the match that decides it. The optional
/// third-place match is appended after the final with loser-sources on both
/// semifinal matches (it is skipped when byes leave fewer than two real
/// semifinals). Real matches always number N - 1, plus the third-place match.
pub fn build_bracket(
    ordered: &[TeamId],
    settings: &ScheduleSettings,
    venues: &[String],
    third_place: bool,
) -> Vec<Match> {
    let n = ordered.len();
    if n < 2 {
        return Vec::new();
    }
    let size = n.next_power_of_two();
    let total_rounds = size.trailing_zeros();
    // Bracket positions: seed numbers beyond the field are byes.
    let slots: Vec<Option<TeamId>> = seeding_order(size)
        .iter()
        .map(|&s| if s <= n { Some(ordered[s - 1]) } else { None })
        .collect();

    let mut allocator = SlotAllocator::new(settings, venues);
    let mut matches: Vec<Match> = Vec::with_capacity(n);
    let mut seq = 0u32;

    // Round 1: real pairings persist, byes advance their occupant directly.
    let mut current: Vec<Feed> = Vec::with_capacity(size / 2);
    for pair in slots.chunks(2) {
        match (pair[0], pair[1]) {
            (Some(home), Some(away)) => {
                seq += 1;
                let (at, venue) = allocator.next_slot();
                let mut m = Match::new(
                    seq,
                    1,
                    MatchSlot::resolved(home),
                    MatchSlot::resolved(away),
                    at,
                    venue,
                );
                m.round_label = Some(round_label(1, total_rounds));
                matches.push(m);
                current.push(Feed::Match(seq));
            }
            (Some(team), None) | (None, Some(team)) => current.push(Feed::Team(team)),
            // Seeding puts the stronger seed first in every pairing, so a
            // fully empty pairing cannot occur for a field of two or more.
            (None, None) => {}
        }
    }

    // Later rounds pair the previous round's feeds in bracket order.
    let mut round = 1u32;
    while current.len() > 1 {
        round += 1;
        let mut next = Vec::with_capacity(current.len() / 2);
        for pair in current.chunks(2) {
            seq += 1;
            let (at, venue) = allocator.next_slot();
            let mut m = Match::new(
                seq,
                round,
                slot_from_feed(&pair[0]),
                slot_from_feed(&pair[1]),
                at,
                venue,
            );
            m.round_label = Some(round_label(round, total_rounds));
            matches.push(m);
            next.push(Feed::Match(seq));
        }
        current = next;
    }

    if third_place {
        let semis: Vec<u32> = matches
            .iter()
            .filter(|m| m.round + 1 == total_rounds)
            .map(|m| m.sequence)
            .collect();
        if semis.len() == 2 {
            seq += 1;
            let (at, venue) = allocator.next_slot();
            let mut m = Match::new(
                seq,
                total_rounds,
                MatchSlot::awaiting(SlotSource::loser_of(semis[0])),
                MatchSlot::awaiting(SlotSource::loser_of(semis[1])),
                at,
                venue,
            );
            m.round_label = Some("Third Place Match".to_string());
            matches.push(m);
        }
    }

    matches
}

fn slot_from_feed(feed: &Feed) -> MatchSlot {
    match feed {
        Feed::Team(id) => MatchSlot::resolved(*id),
        Feed::Match(seq) => MatchSlot::awaiting(SlotSource::winner_of(*seq)),
    }
}
