/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Pure integer helpers for the countdown: weekday distance and
//! days/hours/minutes/seconds decomposition.
//!
//! These are free functions rather than methods so they can be used and tested
//! independently of [`WeeklySchedule`](super::WeeklySchedule).

use chrono::Weekday;

use super::CountdownRemaining;

pub const SECONDS_PER_MINUTE: i64 = 60;
pub const SECONDS_PER_HOUR: i64 = 3_600;
pub const SECONDS_PER_DAY: i64 = 86_400;
pub const DAYS_PER_WEEK: i64 = 7;

/// Number of days from `current` forward to `target`, in `0..=6`.
///
/// `0` means both are the same weekday; callers decide what that means
/// (see [`SameDayPolicy`](super::SameDayPolicy)).
pub fn days_until_weekday(current: Weekday, target: Weekday) -> i64 {
    let current = i64::from(current.num_days_from_sunday());
    let target = i64::from(target.num_days_from_sunday());
    (target - current + DAYS_PER_WEEK) % DAYS_PER_WEEK
}

/// Split a whole-second duration into days / hours / minutes / seconds.
///
/// Negative input is clamped to zero – a [`CountdownRemaining`] is never
/// negative.
pub fn decompose_seconds(total: i64) -> CountdownRemaining {
    let total = total.max(0);
    CountdownRemaining {
        days: (total / SECONDS_PER_DAY) as u64,
        hours: ((total / SECONDS_PER_HOUR) % 24) as u32,
        minutes: ((total / SECONDS_PER_MINUTE) % 60) as u32,
        seconds: (total % SECONDS_PER_MINUTE) as u32,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
