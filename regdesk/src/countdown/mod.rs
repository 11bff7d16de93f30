//! Countdown to the next occurrence of a weekly event.
//!
//! The event happens every week on a fixed weekday at a fixed local time of
//! day (e.g. "Wednesday 09:00").  Given the current instant, the countdown
//! selects the next target instant and expresses the time left as
//! days / hours / minutes / seconds.
//!
//! ```text
//!   now ──► WeeklySchedule::next_target ──► target - now ──► decompose_seconds
//!                                                  │
//!                                       ≤ 0 → Countdown holds last value
//! ```
//!
//! # Same-day policy
//! When today already is the target weekday the default policy
//! ([`SameDayPolicy::NextWeek`]) counts down to the *following* week, even if
//! today's target time is still ahead.  This mirrors the behaviour the event
//! page has always had.  [`SameDayPolicy::LaterToday`] is available for
//! deployments that want to count down to today instead.

pub mod math;
pub mod ticker;

pub use ticker::CountdownTicker;

use std::fmt;

use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDateTime, NaiveTime, TimeZone, Weekday};
use tracing::trace;

use math::{days_until_weekday, decompose_seconds, DAYS_PER_WEEK, SECONDS_PER_DAY};

/// Largest local-time gap (DST transition) skipped forward when resolving the
/// target instant, in minutes.
const MAX_LOCAL_GAP_MINUTES: i64 = 24 * 60;

// ── CountdownRemaining ────────────────────────────────────────────────────────

/// Time left until the target instant.  Never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CountdownRemaining {
    pub days: u64,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl CountdownRemaining {
    pub const ZERO: Self = Self {
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    /// Reassemble the whole-second duration this value was decomposed from.
    pub fn total_seconds(&self) -> u64 {
        self.days * SECONDS_PER_DAY as u64
            + u64::from(self.hours) * 3_600
            + u64::from(self.minutes) * 60
            + u64::from(self.seconds)
    }
}

impl fmt::Display for CountdownRemaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}:{:02}",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

// ── SameDayPolicy ─────────────────────────────────────────────────────────────

/// What to do when "now" falls on the target weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameDayPolicy {
    /// Always jump a full week ahead, even if today's target time has not
    /// passed yet.
    #[default]
    NextWeek,

    /// Count down to today's target time while it is still ahead; jump a week
    /// once it has passed.
    LaterToday,
}

// ── WeeklySchedule ────────────────────────────────────────────────────────────

/// A recurring weekly target: weekday plus local time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklySchedule {
    pub weekday: Weekday,
    pub time: NaiveTime,
    pub same_day: SameDayPolicy,
}

impl Default for WeeklySchedule {
    /// Wednesday 09:00:00, [`SameDayPolicy::NextWeek`].
    fn default() -> Self {
        Self {
            weekday: Weekday::Wed,
            time: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN),
            same_day: SameDayPolicy::NextWeek,
        }
    }
}

impl WeeklySchedule {
    pub fn new(weekday: Weekday, time: NaiveTime) -> Self {
        Self {
            weekday,
            time,
            same_day: SameDayPolicy::default(),
        }
    }

    pub fn with_same_day_policy(mut self, policy: SameDayPolicy) -> Self {
        self.same_day = policy;
        self
    }

    /// Days from `now`'s local date to the target date, in `0..=7`.
    fn days_ahead(&self, now: &NaiveDateTime) -> i64 {
        match days_until_weekday(now.weekday(), self.weekday) {
            0 => match self.same_day {
                SameDayPolicy::LaterToday if now.time() < self.time => 0,
                _ => DAYS_PER_WEEK,
            },
            days => days,
        }
    }

    /// The next target instant after `now`, in `now`'s time zone.
    pub fn next_target<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> DateTime<Tz> {
        let local = now.naive_local();
        let date = local.date() + Duration::days(self.days_ahead(&local));
        resolve_local(&now.timezone(), date.and_time(self.time))
    }

    /// Time left until [`next_target`](Self::next_target).
    ///
    /// Returns `None` when the target is not in the future (only reachable
    /// around local-time discontinuities); callers keep their previous value.
    pub fn remaining<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Option<CountdownRemaining> {
        let delta = self
            .next_target(now)
            .signed_duration_since(now.clone());
        if delta.num_milliseconds() <= 0 {
            return None;
        }
        Some(decompose_seconds(delta.num_seconds()))
    }
}

/// Map a local wall-clock time to an instant in `tz`.
///
/// Ambiguous times (clocks turned back) take the earlier instant; times inside
/// a gap (clocks turned forward) move forward to the first valid minute.
fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    for step in 0..=MAX_LOCAL_GAP_MINUTES {
        match tz.from_local_datetime(&(naive + Duration::minutes(step))) {
            LocalResult::Single(t) => return t,
            LocalResult::Ambiguous(earliest, _) => return earliest,
            LocalResult::None => continue,
        }
    }
    tz.from_utc_datetime(&naive)
}

// ── Countdown ─────────────────────────────────────────────────────────────────

/// Countdown display state: the last computed [`CountdownRemaining`].
///
/// Starts at zero.  Each [`tick`](Self::tick) recomputes from the given
/// instant; a non-positive result leaves the held value unchanged.
#[derive(Debug, Clone)]
pub struct Countdown {
    schedule: WeeklySchedule,
    last: CountdownRemaining,
}

impl Countdown {
    pub fn new(schedule: WeeklySchedule) -> Self {
        Self {
            schedule,
            last: CountdownRemaining::ZERO,
        }
    }

    pub fn schedule(&self) -> &WeeklySchedule {
        &self.schedule
    }

    /// The value shown since the last successful recomputation.
    pub fn current(&self) -> CountdownRemaining {
        self.last
    }

    pub fn tick<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> CountdownRemaining {
        match self.schedule.remaining(now) {
            Some(remaining) => {
                trace!(%remaining, "countdown tick");
                self.last = remaining;
            }
            None => trace!(held = %self.last, "target not ahead, holding countdown"),
        }
        self.last
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
