//! Round-robin league generation: circle-method pairings and time slots.

use crate::logic::timeslot::SlotAllocator;
use crate::models::{Match, MatchSlot, ScheduleSettings, TeamId};

/// Every unordered pair exactly once, rotation-ordered so no team plays twice
/// in the same round: fix the first entrant and rotate the rest (circle
/// method). An odd field gets a rotating sentinel; whoever draws the sentinel
/// simply sits that round out. Returns `(round, home, away)` triples.
pub fn round_robin_pairings(teams: &[TeamId]) -> Vec<(u32, TeamId, TeamId)> {
    if teams.len() < 2 {
        return Vec::new();
    }
    let mut ring: Vec<Option<TeamId>> = teams.iter().copied().map(Some).collect();
    if ring.len() % 2 == 1 {
        ring.push(None);
    }
    let n = ring.len();
    let mut pairings = Vec::with_capacity(teams.len() * (teams.len() - 1) / 2);
    for round in 0..n - 1 {
        for i in 0..n / 2 {
            if let (Some(home), Some(away)) = (ring[i], ring[n - 1 - i]) {
                pairings.push((round as u32 + 1, home, away));
            }
        }
        ring[1..].rotate_right(1);
    }
    pairings
}

/// Full league schedule: rotation pairings in round order, each taking the
/// next day/venue slot, sequence-numbered from 1.
pub fn schedule_league(
    teams: &[TeamId],
    settings: &ScheduleSettings,
    venues: &[String],
) -> Vec<Match> {
    let mut slots = SlotAllocator::new(settings, venues);
    round_robin_pairings(teams)
        .into_iter()
        .enumerate()
        .map(|(i, (round, home, away))| {
            let (at, venue) = slots.next_slot();
            Match::new(
                i as u32 + 1,
                round,
                MatchSlot::resolved(home),
                MatchSlot::resolved(away),
                at,
                venue,
            )
        })
        .collect()
}
