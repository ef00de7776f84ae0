//! Day-walk time slot allocation shared by every schedule generator.

use crate::models::ScheduleSettings;
use chrono::{DateTime, Duration, Utc};

/// Matches placed on one day when the competition sets no explicit cap.
pub const DEFAULT_MAX_MATCHES_PER_DAY: u32 = 8;

/// Walks days from the start date, handing out kick-off times and venues.
/// Each day holds at most the configured number of matches; advancing to the
/// next day resets the time-of-day cursor to the start date's time of day.
/// Venues rotate round-robin through the supplied pool.
pub struct SlotAllocator {
    start: DateTime<Utc>,
    slot: Duration,
    per_day: u32,
    venues: Vec<String>,
    day: i64,
    placed_today: u32,
    venue_cursor: usize,
}

impl SlotAllocator {
    pub fn new(settings: &ScheduleSettings, venues: &[String]) -> Self {
        let minutes = (settings.match_duration_min + settings.break_duration_min) as i64;
        Self {
            start: settings.start_date,
            slot: Duration::minutes(minutes),
            per_day: settings
                .max_matches_per_day
                .unwrap_or(DEFAULT_MAX_MATCHES_PER_DAY)
                .max(1),
            venues: venues.to_vec(),
            day: 0,
            placed_today: 0,
            venue_cursor: 0,
        }
    }

    /// Kick-off time and venue for the next match.
    pub fn next_slot(&mut self) -> (DateTime<Utc>, Option<String>) {
        if self.placed_today == self.per_day {
            self.day += 1;
            self.placed_today = 0;
        }
        let at = self.start + Duration::days(self.day) + self.slot * self.placed_today as i32;
        self.placed_today += 1;

        let venue = if self.venues.is_empty() {
            None
        } else {
            let v = self.venues[self.venue_cursor % self.venues.len()].clone();
            self.venue_cursor += 1;
            Some(v)
        };
        (at, venue)
    }
}
