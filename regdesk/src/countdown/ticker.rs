/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Periodic recomputation of a [`Countdown`] on a background tokio task.
//!
//! The ticker recomputes once immediately, then once per
//! [`TICK_INTERVAL`], and publishes every value on a `watch` channel.  The
//! task lives exactly as long as the [`CountdownTicker`] handle: stopping or
//! dropping the handle aborts it.

use std::time::Duration;

use chrono::{DateTime, TimeZone};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use super::{Countdown, CountdownRemaining, WeeklySchedule};

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Handle to a running countdown display.
#[derive(Debug)]
pub struct CountdownTicker {
    handle: JoinHandle<()>,
    rx: watch::Receiver<CountdownRemaining>,
}

impl CountdownTicker {
    /// Start ticking `schedule` against `clock`.
    ///
    /// `clock` is called once per tick; production code passes
    /// `chrono::Local::now`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<Tz, F>(schedule: WeeklySchedule, clock: F) -> Self
    where
        Tz: TimeZone + Send + 'static,
        Tz::Offset: Send,
        F: Fn() -> DateTime<Tz> + Send + 'static,
    {
        let (tx, rx) = watch::channel(CountdownRemaining::ZERO);

        let handle = tokio::spawn(async move {
            let mut countdown = Countdown::new(schedule);
            let mut ticker = tokio::time::interval(TICK_INTERVAL);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                // The first tick completes immediately.
                ticker.tick().await;
                let remaining = countdown.tick(&clock());
                tx.send_replace(remaining);
            }
        });

        debug!(weekday = %schedule.weekday, time = %schedule.time, "countdown ticker started");
        Self { handle, rx }
    }

    /// A new receiver that observes every published value.
    pub fn subscribe(&self) -> watch::Receiver<CountdownRemaining> {
        self.rx.clone()
    }

    /// The most recently published value.
    pub fn current(&self) -> CountdownRemaining {
        *self.rx.borrow()
    }

    /// Stop the ticker.  Receivers see the channel close.
    pub fn stop(self) {
        // Drop does the work.
    }
}

impl Drop for CountdownTicker {
    fn drop(&mut self) {
        self.handle.abort();
        debug!("countdown ticker stopped");
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
