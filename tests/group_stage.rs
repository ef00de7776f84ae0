//! Integration tests for group-stage scheduling: per-group pairing and interleaving.

use chrono::{DateTime, TimeZone, Utc};
use competition_scheduler::{
    generate_schedule, record_result, reset_competition, Competition, CompetitionError,
    CompetitionFormat, CompetitionStatus, GroupId, MatchStatus, ResultEntry, ScheduleSettings,
};

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 3, 11, 0, 0).unwrap()
}

/// Group-stage tournament with `sizes[i]` teams in group i.
fn grouped_tournament(sizes: &[usize]) -> (Competition, Vec<GroupId>) {
    let mut c = Competition::new(
        "Group Cup",
        CompetitionFormat::Tournament,
        ScheduleSettings::new(start()),
    );
    c.settings.group_stage = true;
    let mut group_ids = Vec::new();
    for (g, &size) in sizes.iter().enumerate() {
        let name = format!("Group {}", (b'A' + g as u8) as char);
        let gid = c.add_group(name).unwrap();
        group_ids.push(gid);
        for i in 0..size {
            c.add_team(format!("G{g} Team {i}"), None, Some(gid)).unwrap();
        }
    }
    (c, group_ids)
}

#[test]
fn teams_only_meet_inside_their_group() {
    let (mut c, groups) = grouped_tournament(&[3, 3]);
    generate_schedule(&mut c, &[]).unwrap();
    assert_eq!(c.matches.len(), 6); // 3 pairings per group of 3

    for m in &c.matches {
        let gid = m.group_id.expect("group-stage match without a group");
        assert!(groups.contains(&gid));
        for slot in [&m.home, &m.away] {
            let team = c.team(slot.team.unwrap()).unwrap();
            assert_eq!(team.group_id, Some(gid));
        }
    }
}

#[test]
fn rounds_interleave_across_groups() {
    let (mut c, groups) = grouped_tournament(&[3, 3]);
    generate_schedule(&mut c, &[]).unwrap();

    // Round 1 of every group lands before round 2 of any group, and groups
    // alternate in display order within a round.
    let rounds: Vec<u32> = c.matches.iter().map(|m| m.round).collect();
    assert_eq!(rounds, vec![1, 1, 2, 2, 3, 3]);
    let group_order: Vec<GroupId> = c.matches.iter().map(|m| m.group_id.unwrap()).collect();
    assert_eq!(
        group_order,
        vec![groups[0], groups[1], groups[0], groups[1], groups[0], groups[1]]
    );
    for (i, m) in c.matches.iter().enumerate() {
        assert_eq!(m.sequence, i as u32 + 1);
    }
}

#[test]
fn uneven_groups_share_one_scheduling_cursor() {
    let (mut c, _) = grouped_tournament(&[4, 2]);
    generate_schedule(&mut c, &[]).unwrap();
    assert_eq!(c.matches.len(), 6 + 1);

    // Scheduling walks matches in generation order; times never go backwards.
    for pair in c.matches.windows(2) {
        assert!(pair[0].scheduled_at <= pair[1].scheduled_at);
    }
}

#[test]
fn every_team_needs_a_group() {
    let (mut c, _) = grouped_tournament(&[2, 2]);
    let stray = c.add_team("Unassigned", None, None).unwrap();
    assert_eq!(
        generate_schedule(&mut c, &[]),
        Err(CompetitionError::TeamWithoutGroup(stray))
    );
    assert!(c.matches.is_empty());
}

#[test]
fn a_populated_group_needs_two_teams() {
    let (mut c, _) = grouped_tournament(&[3, 1]);
    assert_eq!(
        generate_schedule(&mut c, &[]),
        Err(CompetitionError::NotEnoughTeams { required: 2 })
    );
}

#[test]
fn group_stage_results_and_reset_behave_like_a_league() {
    let (mut c, _) = grouped_tournament(&[3, 3]);
    generate_schedule(&mut c, &[]).unwrap();
    c.transition_status(CompetitionStatus::Active).unwrap();

    let m = c.matches[0].clone();
    let entry = ResultEntry {
        score: (4, 2),
        overtime_score: None,
        penalty_score: None,
        status: MatchStatus::Completed,
        notes: None,
    };
    record_result(&mut c, m.id, &entry).unwrap();
    assert_eq!(c.team(m.home.team.unwrap()).unwrap().stats.points, 3);

    reset_competition(&mut c).unwrap();
    let cleared = c.match_by_sequence(1).unwrap();
    assert_eq!(cleared.score, None);
    assert_eq!(cleared.home.team, m.home.team);
    assert_eq!(c.team(m.home.team.unwrap()).unwrap().stats.points, 0);
    assert_eq!(c.status, CompetitionStatus::Draft);
}
