//! Competition aggregate: configuration, status machine, and owned rows.

use crate::models::game::{Match, MatchId, MatchStatus, Score, SlotSource};
use crate::models::group::{Group, GroupId};
use crate::models::team::{Team, TeamId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur during competition operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CompetitionError {
    /// Not enough teams for the operation (scheduling needs at least 2,
    /// per group as well as overall).
    NotEnoughTeams { required: usize },
    /// Team name is empty after trimming.
    InvalidTeamName,
    /// A team with this name already exists (names are unique, case-insensitive).
    DuplicateTeamName,
    /// The competition is in the wrong status for this action.
    StatusConflict {
        required: CompetitionStatus,
        current: CompetitionStatus,
    },
    /// The requested status change is not a legal transition.
    InvalidTransition {
        from: CompetitionStatus,
        to: CompetitionStatus,
    },
    /// Match not found in this competition.
    MatchNotFound(MatchId),
    /// Team not found in this competition.
    TeamNotFound(TeamId),
    /// Group not found in this competition.
    GroupNotFound(GroupId),
    /// A group stage needs every team assigned to a group.
    TeamWithoutGroup(TeamId),
    /// A submitted score pair is invalid or not modeled by this competition.
    MalformedScore(&'static str),
    /// Match still has an undecided participant slot.
    UnresolvedParticipants { sequence: u32 },
    /// Match was cancelled and cannot take a result.
    MatchCancelled { sequence: u32 },
    /// Match already has a final result; redoing it requires a reset.
    AlreadyCompleted { sequence: u32 },
    /// A progression reference points at a match that does not exist.
    CorruptBracket { sequence: u32 },
}

impl std::fmt::Display for CompetitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompetitionError::NotEnoughTeams { required } => {
                write!(f, "Need at least {} teams", required)
            }
            CompetitionError::InvalidTeamName => write!(f, "Team name cannot be empty"),
            CompetitionError::DuplicateTeamName => {
                write!(f, "A team with this name already exists")
            }
            CompetitionError::StatusConflict { required, current } => write!(
                f,
                "Competition must be {} for this action (currently {})",
                required, current
            ),
            CompetitionError::InvalidTransition { from, to } => {
                write!(f, "Cannot move a {} competition to {}", from, to)
            }
            CompetitionError::MatchNotFound(_) => write!(f, "Match not found"),
            CompetitionError::TeamNotFound(_) => write!(f, "Team not found"),
            CompetitionError::GroupNotFound(_) => write!(f, "Group not found"),
            CompetitionError::TeamWithoutGroup(_) => {
                write!(f, "Every team must be assigned to a group before scheduling a group stage")
            }
            CompetitionError::MalformedScore(reason) => write!(f, "{}", reason),
            CompetitionError::UnresolvedParticipants { sequence } => {
                write!(f, "Match {} still has an undecided participant", sequence)
            }
            CompetitionError::MatchCancelled { sequence } => {
                write!(f, "Match {} has been cancelled", sequence)
            }
            CompetitionError::AlreadyCompleted { sequence } => write!(
                f,
                "Match {} already has a result; reset the competition to redo it",
                sequence
            ),
            CompetitionError::CorruptBracket { sequence } => write!(
                f,
                "Bracket progression for match {} references a missing match",
                sequence
            ),
        }
    }
}

/// Unique identifier for a competition.
pub type CompetitionId = Uuid;

/// Competition format.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompetitionFormat {
    /// Single round robin: every team plays every other team once.
    League,
    /// Single-elimination bracket, optionally preceded by a group stage.
    Tournament,
}

/// Lifecycle of a competition.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompetitionStatus {
    /// Editable: teams and settings may change, schedule not final.
    #[default]
    Draft,
    /// Schedule generated, competition not yet started.
    Scheduled,
    /// Underway: results may be recorded, schedule is frozen.
    Active,
    /// All done.
    Completed,
    /// Abandoned; reachable from any non-terminal status.
    Cancelled,
}

impl CompetitionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, CompetitionStatus::Completed | CompetitionStatus::Cancelled)
    }

    /// Legal pure status transitions. Schedule generation advances
    /// Draft -> Scheduled on its own and is not routed through here.
    pub fn can_transition_to(self, next: CompetitionStatus) -> bool {
        use CompetitionStatus::*;
        matches!(
            (self, next),
            (Draft, Scheduled) | (Scheduled, Active) | (Active, Completed)
        ) || (next == Cancelled && !self.is_terminal())
    }
}

impl std::fmt::Display for CompetitionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CompetitionStatus::Draft => "draft",
            CompetitionStatus::Scheduled => "scheduled",
            CompetitionStatus::Active => "active",
            CompetitionStatus::Completed => "completed",
            CompetitionStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Scheduling configuration. Frozen once the competition is active.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSettings {
    /// First kick-off; its time of day anchors every scheduling day.
    pub start_date: DateTime<Utc>,
    pub match_duration_min: u32,
    pub break_duration_min: u32,
    /// Cap per scheduling day; engine default applies when unset.
    pub max_matches_per_day: Option<u32>,
    pub points_for_win: u32,
    pub points_for_draw: u32,
    pub points_for_loss: u32,
    pub overtime_enabled: bool,
    pub penalties_enabled: bool,
    /// Tournament only: round-robin groups instead of a bracket.
    pub group_stage: bool,
    /// Tournament only: play a third-place match after the semifinals.
    pub third_place_match: bool,
}

impl ScheduleSettings {
    /// Common defaults: hour-long matches, quarter-hour breaks, 3/1/0 points.
    pub fn new(start_date: DateTime<Utc>) -> Self {
        Self {
            start_date,
            match_duration_min: 60,
            break_duration_min: 15,
            max_matches_per_day: None,
            points_for_win: 3,
            points_for_draw: 1,
            points_for_loss: 0,
            overtime_enabled: false,
            penalties_enabled: false,
            group_stage: false,
            third_place_match: false,
        }
    }
}

/// Full competition state: configuration plus owned teams, groups, and matches.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Competition {
    pub id: CompetitionId,
    pub name: String,
    pub format: CompetitionFormat,
    pub status: CompetitionStatus,
    pub settings: ScheduleSettings,
    pub teams: Vec<Team>,
    pub groups: Vec<Group>,
    pub matches: Vec<Match>,
}

impl Competition {
    /// Create a new competition in Draft status with no teams.
    pub fn new(
        name: impl Into<String>,
        format: CompetitionFormat,
        settings: ScheduleSettings,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            format,
            status: CompetitionStatus::Draft,
            settings,
            teams: Vec::new(),
            groups: Vec::new(),
            matches: Vec::new(),
        }
    }

    /// Regeneration and roster/settings edits are allowed until the
    /// competition starts.
    pub fn is_editable(&self) -> bool {
        !matches!(
            self.status,
            CompetitionStatus::Active | CompetitionStatus::Completed
        )
    }

    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn team_mut(&mut self, id: TeamId) -> Option<&mut Team> {
        self.teams.iter_mut().find(|t| t.id == id)
    }

    pub fn team_name(&self, id: TeamId) -> Option<&str> {
        self.team(id).map(|t| t.name.as_str())
    }

    pub fn match_by_id(&self, id: MatchId) -> Option<&Match> {
        self.matches.iter().find(|m| m.id == id)
    }

    pub fn match_by_sequence(&self, sequence: u32) -> Option<&Match> {
        self.matches.iter().find(|m| m.sequence == sequence)
    }

    /// Register a team. Names must be unique (case-insensitive); an optional
    /// seed and group may be supplied up front.
    pub fn add_team(
        &mut self,
        name: impl Into<String>,
        seed: Option<u32>,
        group_id: Option<GroupId>,
    ) -> Result<TeamId, CompetitionError> {
        if !self.is_editable() {
            return Err(CompetitionError::StatusConflict {
                required: CompetitionStatus::Draft,
                current: self.status,
            });
        }
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(CompetitionError::InvalidTeamName);
        }
        if self
            .teams
            .iter()
            .any(|t| t.name.eq_ignore_ascii_case(trimmed))
        {
            return Err(CompetitionError::DuplicateTeamName);
        }
        if let Some(gid) = group_id {
            if !self.groups.iter().any(|g| g.id == gid) {
                return Err(CompetitionError::GroupNotFound(gid));
            }
        }
        let mut team = Team::new(trimmed);
        team.seed = seed;
        team.group_id = group_id;
        let id = team.id;
        self.teams.push(team);
        Ok(id)
    }

    /// Bulk-add unseeded teams in the given order. All-or-nothing: the first
    /// bad name rejects the whole batch before anything is inserted.
    pub fn add_teams(&mut self, names: &[String]) -> Result<Vec<TeamId>, CompetitionError> {
        let mut seen: Vec<String> = self.teams.iter().map(|t| t.name.to_lowercase()).collect();
        for name in names {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                return Err(CompetitionError::InvalidTeamName);
            }
            let lower = trimmed.to_lowercase();
            if seen.contains(&lower) {
                return Err(CompetitionError::DuplicateTeamName);
            }
            seen.push(lower);
        }
        names
            .iter()
            .map(|name| self.add_team(name.clone(), None, None))
            .collect()
    }

    /// Remove a team (only valid in Draft, before the roster is scheduled).
    pub fn remove_team(&mut self, team_id: TeamId) -> Result<(), CompetitionError> {
        if self.status != CompetitionStatus::Draft {
            return Err(CompetitionError::StatusConflict {
                required: CompetitionStatus::Draft,
                current: self.status,
            });
        }
        let idx = self
            .teams
            .iter()
            .position(|t| t.id == team_id)
            .ok_or(CompetitionError::TeamNotFound(team_id))?;
        self.teams.remove(idx);
        Ok(())
    }

    /// Add a group; display order follows insertion.
    pub fn add_group(&mut self, name: impl Into<String>) -> Result<GroupId, CompetitionError> {
        if !self.is_editable() {
            return Err(CompetitionError::StatusConflict {
                required: CompetitionStatus::Draft,
                current: self.status,
            });
        }
        let group = Group::new(name, self.groups.len() as u32 + 1);
        let id = group.id;
        self.groups.push(group);
        Ok(id)
    }

    /// Assign an existing team to an existing group.
    pub fn assign_team_to_group(
        &mut self,
        team_id: TeamId,
        group_id: GroupId,
    ) -> Result<(), CompetitionError> {
        if !self.is_editable() {
            return Err(CompetitionError::StatusConflict {
                required: CompetitionStatus::Draft,
                current: self.status,
            });
        }
        if !self.groups.iter().any(|g| g.id == group_id) {
            return Err(CompetitionError::GroupNotFound(group_id));
        }
        let team = self
            .team_mut(team_id)
            .ok_or(CompetitionError::TeamNotFound(team_id))?;
        team.group_id = Some(group_id);
        Ok(())
    }

    /// Pure status transition; everything else about the competition stays
    /// untouched. Illegal jumps are rejected.
    pub fn transition_status(
        &mut self,
        next: CompetitionStatus,
    ) -> Result<(), CompetitionError> {
        if !self.status.can_transition_to(next) {
            return Err(CompetitionError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }

    /// Replace the scheduling settings. Rejected once the competition is
    /// active or completed; the schedule-affecting fields are frozen then.
    pub fn update_settings(
        &mut self,
        settings: ScheduleSettings,
    ) -> Result<(), CompetitionError> {
        if !self.is_editable() {
            return Err(CompetitionError::StatusConflict {
                required: CompetitionStatus::Draft,
                current: self.status,
            });
        }
        self.settings = settings;
        Ok(())
    }

    /// Change the format (same freeze rule as the settings).
    pub fn set_format(&mut self, format: CompetitionFormat) -> Result<(), CompetitionError> {
        if !self.is_editable() {
            return Err(CompetitionError::StatusConflict {
                required: CompetitionStatus::Draft,
                current: self.status,
            });
        }
        self.format = format;
        Ok(())
    }

    /// Display form of the schedule: matches ordered by round then sequence,
    /// with slot names resolved (or derived placeholder text).
    pub fn schedule_view(&self) -> Vec<MatchView> {
        let mut views: Vec<MatchView> = self.matches.iter().map(|m| self.match_view(m)).collect();
        views.sort_by_key(|v| (v.round, v.sequence));
        views
    }

    fn match_view(&self, m: &Match) -> MatchView {
        MatchView {
            id: m.id,
            sequence: m.sequence,
            round: m.round,
            round_label: m.round_label.clone(),
            home: self.slot_view(m.home.team, m.home.source),
            away: self.slot_view(m.away.team, m.away.source),
            scheduled_at: m.scheduled_at,
            venue: m.venue.clone(),
            group: m
                .group_id
                .and_then(|gid| self.groups.iter().find(|g| g.id == gid))
                .map(|g| g.name.clone()),
            status: m.status,
            score: m.score,
            overtime_score: m.overtime_score,
            penalty_score: m.penalty_score,
            winner: m.winner,
            winner_name: m
                .winner
                .and_then(|id| self.team_name(id))
                .map(str::to_string),
            is_draw: m.is_draw,
            notes: m.notes.clone(),
        }
    }

    fn slot_view(&self, team: Option<TeamId>, source: Option<SlotSource>) -> SlotView {
        let label = match (team, source) {
            (Some(id), _) => self
                .team_name(id)
                .unwrap_or("Unknown team")
                .to_string(),
            (None, Some(src)) => src.describe(),
            (None, None) => "TBD".to_string(),
        };
        SlotView {
            team_id: team,
            label,
        }
    }
}

/// One side of a match as shown to viewers.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SlotView {
    pub team_id: Option<TeamId>,
    /// Team name, or derived placeholder text such as "Winner of match 7".
    pub label: String,
}

/// Display form of one scheduled match (for API responses).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchView {
    pub id: MatchId,
    pub sequence: u32,
    pub round: u32,
    pub round_label: Option<String>,
    pub home: SlotView,
    pub away: SlotView,
    pub scheduled_at: DateTime<Utc>,
    pub venue: Option<String>,
    pub group: Option<String>,
    pub status: MatchStatus,
    pub score: Option<Score>,
    pub overtime_score: Option<Score>,
    pub penalty_score: Option<Score>,
    pub winner: Option<TeamId>,
    pub winner_name: Option<String>,
    pub is_draw: bool,
    pub notes: Option<String>,
}
