//! Scheduling and result-processing logic: generation, results, reset.

mod bracket;
mod generate;
mod group_stage;
mod league;
mod reset;
mod results;
mod stats;
mod timeslot;

pub use bracket::{build_bracket, seed_order};
pub use generate::generate_schedule;
pub use group_stage::schedule_group_stage;
pub use league::{round_robin_pairings, schedule_league};
pub use reset::reset_competition;
pub use results::{record_result, ResultEntry};
pub use stats::{apply_outcome, MatchOutcome};
pub use timeslot::{SlotAllocator, DEFAULT_MAX_MATCHES_PER_DAY};
