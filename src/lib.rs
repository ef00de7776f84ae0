//! Competition scheduling engine: library with models and scheduling logic.

pub mod logic;
pub mod models;

pub use logic::{
    apply_outcome, build_bracket, generate_schedule, record_result, reset_competition,
    round_robin_pairings, schedule_group_stage, schedule_league, seed_order, MatchOutcome,
    ResultEntry, SlotAllocator, DEFAULT_MAX_MATCHES_PER_DAY,
};
pub use models::{
    Competition, CompetitionError, CompetitionFormat, CompetitionId, CompetitionStatus, Group,
    GroupId, Match, MatchId, MatchSlot, MatchStatus, MatchView, ScheduleSettings, Score,
    SlotOutcome, SlotSource, SlotView, Team, TeamId, TeamStats,
};
