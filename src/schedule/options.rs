use chrono::{DateTime, Duration, Utc};

use super::anchor::CivilClock;

/// Length of a turn window unless overridden
pub const DEFAULT_TURN_DURATION_HOURS: i64 = 48;

/// Everything the scheduler needs besides the roster, the log and "now".
///
/// Callers build this explicitly (usually via `DraftConfig::schedule_options`);
/// the scheduler never falls back to hidden defaults of its own.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleOptions {
    pub season_year: i32,
    pub clock: CivilClock,
    pub turn_duration: Duration,
    /// Replaces the default 1 January opening
    pub season_start: Option<DateTime<Utc>>,
    /// Skip boundary snapping entirely. Accelerated test timelines only.
    pub bypass_anchor: bool,
}

impl ScheduleOptions {
    pub fn new(season_year: i32) -> Self {
        Self {
            season_year,
            clock: CivilClock::default(),
            turn_duration: Duration::hours(DEFAULT_TURN_DURATION_HOURS),
            season_start: None,
            bypass_anchor: false,
        }
    }

    pub fn with_clock(mut self, clock: CivilClock) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_turn_duration(mut self, turn_duration: Duration) -> Self {
        self.turn_duration = turn_duration;
        self
    }

    pub fn with_season_start(mut self, season_start: DateTime<Utc>) -> Self {
        self.season_start = Some(season_start);
        self
    }

    pub fn with_bypass_anchor(mut self, bypass_anchor: bool) -> Self {
        self.bypass_anchor = bypass_anchor;
        self
    }

    /// Snap an instant to the next daily boundary (or leave it alone when bypassed)
    pub fn anchor(&self, instant: DateTime<Utc>) -> DateTime<Utc> {
        if self.bypass_anchor {
            instant
        } else {
            self.clock.next_boundary(instant)
        }
    }

    /// Anchored instant at which the first window opens.
    ///
    /// A season year outside the calendar never opens.
    pub fn season_start(&self) -> DateTime<Utc> {
        match self
            .season_start
            .or_else(|| self.clock.season_opening(self.season_year))
        {
            Some(start) => self.anchor(start),
            None => DateTime::<Utc>::MAX_UTC,
        }
    }

    /// Close of a window opening at `window_start`.
    ///
    /// A turn length that runs past the end of the calendar never closes.
    pub fn window_limit(&self, window_start: DateTime<Utc>) -> DateTime<Utc> {
        window_start
            .checked_add_signed(self.turn_duration)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}
