//! Schedule generation: dispatch by format, persist matches, advance status.

use crate::logic::{bracket, group_stage, league};
use crate::models::{
    Competition, CompetitionError, CompetitionFormat, CompetitionStatus, GroupId, TeamId,
};

/// Generate (or regenerate) the full schedule for a competition.
///
/// Requires at least two teams and a competition that has not started;
/// regeneration after kick-off is rejected - operators reset first. Any
/// previously generated matches are dropped and rebuilt, sequence numbers
/// restart at 1, and the competition advances to Scheduled. Validation runs
/// before the first mutation, so a failed call leaves everything untouched.
///
/// A tournament with a group stage produces the group matches only; building
/// the elimination bracket from final group standings is left to the
/// operator.
pub fn generate_schedule(
    competition: &mut Competition,
    venues: &[String],
) -> Result<(), CompetitionError> {
    if !competition.is_editable() {
        return Err(CompetitionError::StatusConflict {
            required: CompetitionStatus::Draft,
            current: competition.status,
        });
    }
    if competition.teams.len() < 2 {
        return Err(CompetitionError::NotEnoughTeams { required: 2 });
    }

    let matches = match competition.format {
        CompetitionFormat::League => {
            let ids: Vec<TeamId> = competition.teams.iter().map(|t| t.id).collect();
            league::schedule_league(&ids, &competition.settings, venues)
        }
        CompetitionFormat::Tournament if competition.settings.group_stage => {
            let grouped = grouped_teams(competition)?;
            group_stage::schedule_group_stage(&grouped, &competition.settings, venues)
        }
        CompetitionFormat::Tournament => {
            let ordered = bracket::seed_order(&competition.teams);
            bracket::build_bracket(
                &ordered,
                &competition.settings,
                venues,
                competition.settings.third_place_match,
            )
        }
    };

    log::info!(
        "Generated {} matches for competition {} ({})",
        matches.len(),
        competition.name,
        competition.id
    );
    competition.matches = matches;
    competition.status = CompetitionStatus::Scheduled;
    Ok(())
}

/// Teams bucketed by group in display order. Every team must belong to an
/// existing group, and every populated group needs at least two teams.
fn grouped_teams(
    competition: &Competition,
) -> Result<Vec<(GroupId, Vec<TeamId>)>, CompetitionError> {
    let mut groups: Vec<&crate::models::Group> = competition.groups.iter().collect();
    groups.sort_by_key(|g| g.sort_order);
    let mut grouped: Vec<(GroupId, Vec<TeamId>)> =
        groups.iter().map(|g| (g.id, Vec::new())).collect();

    for team in &competition.teams {
        let gid = team
            .group_id
            .ok_or(CompetitionError::TeamWithoutGroup(team.id))?;
        let bucket = grouped
            .iter_mut()
            .find(|(id, _)| *id == gid)
            .ok_or(CompetitionError::GroupNotFound(gid))?;
        bucket.1.push(team.id);
    }

    grouped.retain(|(_, members)| !members.is_empty());
    if grouped.iter().any(|(_, members)| members.len() < 2) {
        return Err(CompetitionError::NotEnoughTeams { required: 2 });
    }
    Ok(grouped)
}
