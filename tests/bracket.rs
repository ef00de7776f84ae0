//! Integration tests for bracket generation: seeding, byes, third place.

use chrono::{DateTime, TimeZone, Utc};
use competition_scheduler::{
    generate_schedule, Competition, CompetitionFormat, ScheduleSettings, SlotSource, TeamId,
};

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 7, 10, 10, 0, 0).unwrap()
}

/// Tournament with teams seeded 1..=n in registration order.
fn tournament_with_seeds(n: usize) -> Competition {
    let mut c = Competition::new(
        "Summer Cup",
        CompetitionFormat::Tournament,
        ScheduleSettings::new(start()),
    );
    for i in 1..=n {
        c.add_team(format!("Seed {i}"), Some(i as u32), None).unwrap();
    }
    c
}

fn team_by_seed(c: &Competition, seed: u32) -> TeamId {
    c.teams.iter().find(|t| t.seed == Some(seed)).unwrap().id
}

#[test]
fn bracket_always_has_one_fewer_match_than_teams() {
    for n in 2..=16 {
        let mut c = tournament_with_seeds(n);
        generate_schedule(&mut c, &[]).unwrap();
        assert_eq!(c.matches.len(), n - 1, "real matches for {n} teams");
    }
}

#[test]
fn third_place_match_adds_exactly_one() {
    let mut c = tournament_with_seeds(8);
    c.settings.third_place_match = true;
    generate_schedule(&mut c, &[]).unwrap();
    assert_eq!(c.matches.len(), 8);

    let third = c.matches.last().unwrap();
    assert_eq!(third.round_label.as_deref(), Some("Third Place Match"));
    // Both slots wait on the losers of the two semifinals.
    let semis: Vec<u32> = c
        .matches
        .iter()
        .filter(|m| m.round_label.as_deref() == Some("Semifinal"))
        .map(|m| m.sequence)
        .collect();
    assert_eq!(semis.len(), 2);
    assert_eq!(third.home.source, Some(SlotSource::loser_of(semis[0])));
    assert_eq!(third.away.source, Some(SlotSource::loser_of(semis[1])));
}

#[test]
fn top_two_seeds_cannot_meet_before_the_final() {
    let mut c = tournament_with_seeds(8);
    generate_schedule(&mut c, &[]).unwrap();
    let seed1 = team_by_seed(&c, 1);
    let seed2 = team_by_seed(&c, 2);

    // First round: seed 1 opens the bracket, seed 2 opens the other half.
    let first_round: Vec<_> = c.matches.iter().filter(|m| m.round == 1).collect();
    assert_eq!(first_round.len(), 4);
    assert_eq!(first_round[0].home.team, Some(seed1));
    assert_eq!(first_round[2].home.team, Some(seed2));

    // Their first-round matches feed different semifinals.
    let semis: Vec<_> = c.matches.iter().filter(|m| m.round == 2).collect();
    assert_eq!(semis.len(), 2);
    let seed1_semi = semis
        .iter()
        .position(|m| {
            m.home.source == Some(SlotSource::winner_of(first_round[0].sequence))
                || m.away.source == Some(SlotSource::winner_of(first_round[0].sequence))
        })
        .unwrap();
    let seed2_semi = semis
        .iter()
        .position(|m| {
            m.home.source == Some(SlotSource::winner_of(first_round[2].sequence))
                || m.away.source == Some(SlotSource::winner_of(first_round[2].sequence))
        })
        .unwrap();
    assert_ne!(seed1_semi, seed2_semi);

    // And the final is fed by the two semifinals.
    let last = c.matches.last().unwrap();
    assert_eq!(last.round_label.as_deref(), Some("Final"));
    assert_eq!(last.home.source, Some(SlotSource::winner_of(semis[0].sequence)));
    assert_eq!(last.away.source, Some(SlotSource::winner_of(semis[1].sequence)));
}

#[test]
fn five_teams_get_three_byes_and_no_phantom_matches() {
    let mut c = tournament_with_seeds(5);
    generate_schedule(&mut c, &[]).unwrap();
    assert_eq!(c.matches.len(), 4); // 1 opener + 2 second-round + final

    // Only seeds 4 and 5 play in round 1; the three bye teams are pre-placed.
    let first_round: Vec<_> = c.matches.iter().filter(|m| m.round == 1).collect();
    assert_eq!(first_round.len(), 1);
    let opener = first_round[0];
    assert_eq!(opener.home.team, Some(team_by_seed(&c, 4)));
    assert_eq!(opener.away.team, Some(team_by_seed(&c, 5)));

    let second_round: Vec<_> = c.matches.iter().filter(|m| m.round == 2).collect();
    assert_eq!(second_round.len(), 2);
    // Seed 1 sits resolved next to the opener's winner; no placeholder needed.
    assert_eq!(second_round[0].home.team, Some(team_by_seed(&c, 1)));
    assert_eq!(second_round[0].home.source, None);
    assert_eq!(
        second_round[0].away.source,
        Some(SlotSource::winner_of(opener.sequence))
    );
    // Seeds 2 and 3 both advanced on byes and meet directly.
    assert_eq!(second_round[1].home.team, Some(team_by_seed(&c, 2)));
    assert_eq!(second_round[1].away.team, Some(team_by_seed(&c, 3)));

    // Every slot is either resolved or sourced; nothing dangles.
    for m in &c.matches {
        for slot in [&m.home, &m.away] {
            assert!(slot.team.is_some() || slot.source.is_some());
        }
    }
}

#[test]
fn two_team_bracket_is_just_a_final() {
    let mut c = tournament_with_seeds(2);
    generate_schedule(&mut c, &[]).unwrap();
    assert_eq!(c.matches.len(), 1);
    let m = &c.matches[0];
    assert_eq!(m.round_label.as_deref(), Some("Final"));
    assert!(m.is_startable());
}

#[test]
fn third_place_is_skipped_when_byes_leave_one_semifinal() {
    // 3 teams: seed 1 advances on a bye straight into the final.
    let mut c = tournament_with_seeds(3);
    c.settings.third_place_match = true;
    generate_schedule(&mut c, &[]).unwrap();
    assert_eq!(c.matches.len(), 2);
    assert!(c
        .matches
        .iter()
        .all(|m| m.round_label.as_deref() != Some("Third Place Match")));
}

#[test]
fn round_labels_count_back_from_the_final() {
    let mut c = tournament_with_seeds(16);
    generate_schedule(&mut c, &[]).unwrap();
    let label_of = |round: u32| {
        c.matches
            .iter()
            .find(|m| m.round == round)
            .and_then(|m| m.round_label.clone())
    };
    assert_eq!(label_of(1).as_deref(), Some("Round 1"));
    assert_eq!(label_of(2).as_deref(), Some("Quarterfinal"));
    assert_eq!(label_of(3).as_deref(), Some("Semifinal"));
    assert_eq!(label_of(4).as_deref(), Some("Final"));
}

#[test]
fn schedule_view_orders_by_round_and_derives_placeholder_text() {
    let mut c = tournament_with_seeds(4);
    generate_schedule(&mut c, &[]).unwrap();
    let view = c.schedule_view();
    assert_eq!(view.len(), 3);
    let rounds: Vec<u32> = view.iter().map(|v| v.round).collect();
    assert_eq!(rounds, vec![1, 1, 2]);
    assert_eq!(view[0].home.label, "Seed 1");
    assert_eq!(view[2].home.label, "Winner of match 1");
    assert_eq!(view[2].away.label, "Winner of match 2");
}

#[test]
fn unseeded_teams_rank_below_seeded_ones_in_registration_order() {
    let mut c = Competition::new(
        "Open Cup",
        CompetitionFormat::Tournament,
        ScheduleSettings::new(start()),
    );
    let late_seed = c.add_team("Late Seed", Some(2), None).unwrap();
    let first_unseeded = c.add_team("First Unseeded", None, None).unwrap();
    let top_seed = c.add_team("Top Seed", Some(1), None).unwrap();
    let second_unseeded = c.add_team("Second Unseeded", None, None).unwrap();

    let ordered = competition_scheduler::seed_order(&c.teams);
    assert_eq!(ordered, vec![top_seed, late_seed, first_unseeded, second_unseeded]);
}
