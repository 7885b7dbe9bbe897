use chrono::{
    DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
};
use chrono_tz::Tz;

/// Daily boundary hour at which every turn window starts and ends
pub const ANCHOR_HOUR: u32 = 10;

/// Civil timezone the boundary hour is expressed in
pub const CIVIL_TIMEZONE: Tz = chrono_tz::America::New_York;

/// Resolves instants to the next daily boundary (e.g. 10:00:00) in a named timezone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CivilClock {
    pub timezone: Tz,
    pub hour: u32,
}

impl Default for CivilClock {
    fn default() -> Self {
        Self {
            timezone: CIVIL_TIMEZONE,
            hour: ANCHOR_HOUR,
        }
    }
}

impl CivilClock {
    pub fn new(timezone: Tz, hour: u32) -> Self {
        Self { timezone, hour }
    }

    fn boundary_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour, 0, 0).unwrap_or(NaiveTime::MIN)
    }

    /// The boundary wall time on `date`, as an absolute instant.
    ///
    /// A wall time repeated by a backward transition resolves to its first
    /// occurrence. A wall time skipped by a forward transition is read with the
    /// offset in force before the gap, which lands on the first instant after it.
    pub fn boundary_on(&self, date: NaiveDate) -> DateTime<Utc> {
        let wall = date.and_time(self.boundary_time());
        match self.timezone.from_local_datetime(&wall) {
            LocalResult::Single(local) => local.with_timezone(&Utc),
            LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
            LocalResult::None => self.read_with_prior_offset(wall),
        }
    }

    fn read_with_prior_offset(&self, wall: NaiveDateTime) -> DateTime<Utc> {
        // Transitions are never less than a day apart
        let probe = wall.checked_sub_signed(Duration::days(1)).unwrap_or(wall);
        let offset = self.timezone.offset_from_utc_datetime(&probe).fix().local_minus_utc();
        match wall.checked_sub_signed(Duration::seconds(i64::from(offset))) {
            Some(utc) => Utc.from_utc_datetime(&utc),
            // Off either end of the calendar
            None if offset < 0 => DateTime::<Utc>::MAX_UTC,
            None => DateTime::<Utc>::MIN_UTC,
        }
    }

    /// Next occurrence of the boundary at or after `instant`.
    ///
    /// An instant exactly on the boundary anchors to itself; anything later in
    /// the civil day rolls over to the following day's boundary.
    ///
    /// Near the end of the representable calendar, where no later boundary
    /// exists, the instant is returned unchanged.
    pub fn next_boundary(&self, instant: DateTime<Utc>) -> DateTime<Utc> {
        let utc = instant.naive_utc();
        let offset = self.timezone.offset_from_utc_datetime(&utc).fix().local_minus_utc();
        let local_date = match utc.checked_add_signed(Duration::seconds(i64::from(offset))) {
            Some(local) => local.date(),
            None => return instant,
        };
        let same_day = self.boundary_on(local_date);
        if same_day >= instant {
            return same_day;
        }
        match local_date.succ_opt() {
            Some(next_date) => self.boundary_on(next_date).max(instant),
            None => instant,
        }
    }

    /// Default season opening: the first boundary of 1 January of the season year.
    /// `None` when the year is outside chrono's calendar.
    pub fn season_opening(&self, year: i32) -> Option<DateTime<Utc>> {
        NaiveDate::from_ymd_opt(year, 1, 1).map(|date| self.boundary_on(date))
    }
}
