//! Data structures for competitions: teams, groups, matches, settings.

mod competition;
mod game;
mod group;
mod team;

pub use competition::{
    Competition, CompetitionError, CompetitionFormat, CompetitionId, CompetitionStatus,
    MatchView, ScheduleSettings, SlotView,
};
pub use game::{Match, MatchId, MatchSlot, MatchStatus, Score, SlotOutcome, SlotSource};
pub use group::{Group, GroupId};
pub use team::{Team, TeamId, TeamStats};
