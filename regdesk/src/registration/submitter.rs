/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Validate-then-deliver submission of a [`RegistrationRecord`].
//!
//! # State machine
//! ```text
//! Idle ─► Validating ─┬─► ValidationFailed
//!                     └─► Submitting ─┬─► Delivered
//!                                     └─► DeliveryFailed
//! ```
//! `ValidationFailed`, `Delivered` and `DeliveryFailed` are resting states:
//! like `Idle`, they accept the next `submit`.  Only `Submitting` rejects a
//! new attempt ([`SubmitError::InFlight`]).  Every transition is published on
//! a `watch` channel so a view can render it.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;
use tracing::{error, info, warn};

use super::error::SubmitError;
use super::schema::FormSchema;
use super::RegistrationRecord;
use crate::delivery::Delivery;

/// Where the current (or last) submission stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Validating,
    ValidationFailed,
    Submitting,
    Delivered,
    DeliveryFailed,
}

/// Validates records against a [`FormSchema`] and hands valid ones to a
/// [`Delivery`].  At most one delivery is outstanding at a time.
#[derive(Debug)]
pub struct Submitter<D> {
    schema: FormSchema,
    delivery: D,
    in_flight: AtomicBool,
    state: watch::Sender<SubmissionState>,
}

impl<D: Delivery> Submitter<D> {
    pub fn new(schema: FormSchema, delivery: D) -> Self {
        let (state, _) = watch::channel(SubmissionState::Idle);
        Self {
            schema,
            delivery,
            in_flight: AtomicBool::new(false),
            state,
        }
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn delivery(&self) -> &D {
        &self.delivery
    }

    pub fn state(&self) -> SubmissionState {
        *self.state.borrow()
    }

    /// Observe state transitions.
    pub fn subscribe(&self) -> watch::Receiver<SubmissionState> {
        self.state.subscribe()
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Return a resting state to `Idle`.
    ///
    /// Has no effect while a delivery is in flight; returns whether the state
    /// is now `Idle`.
    pub fn reset_state(&self) -> bool {
        if self.is_submitting() {
            return false;
        }
        self.state.send_if_modified(|s| {
            let changed = *s != SubmissionState::Idle;
            *s = SubmissionState::Idle;
            changed
        });
        true
    }

    /// Validate `record` and, if valid, deliver it once.
    ///
    /// `record` is only read; on any failure the caller still holds it
    /// unchanged and may call `submit` again.
    ///
    /// # Errors
    /// * [`SubmitError::InFlight`] – another delivery is pending; nothing was
    ///   validated or sent.
    /// * [`SubmitError::Validation`] – required fields are empty; nothing was
    ///   sent.
    /// * [`SubmitError::Delivery`] – the delivery call failed.
    pub async fn submit(&self, record: &RegistrationRecord) -> Result<(), SubmitError> {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight, &self.state) else {
            warn!("Submission rejected: previous delivery still pending");
            return Err(SubmitError::InFlight);
        };

        self.state.send_replace(SubmissionState::Validating);
        if let Err(e) = self.schema.validate(record) {
            warn!(missing = ?e.missing, "Registration failed validation");
            self.state.send_replace(SubmissionState::ValidationFailed);
            return Err(e.into());
        }

        let payload = self.schema.to_payload(record);
        self.state.send_replace(SubmissionState::Submitting);

        match self.delivery.send(&payload).await {
            Ok(()) => {
                info!(fields = payload.len(), "Registration delivered");
                self.state.send_replace(SubmissionState::Delivered);
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Registration delivery failed");
                self.state.send_replace(SubmissionState::DeliveryFailed);
                Err(e.into())
            }
        }
    }
}

/// Holds the in-flight flag for the duration of one `submit` call.
///
/// Released on drop, so a cancelled submission future frees the flag too; a
/// submission cancelled mid-delivery falls back to `Idle`.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
    state: &'a watch::Sender<SubmissionState>,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool, state: &'a watch::Sender<SubmissionState>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag, state })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.state.send_if_modified(|s| {
            let cancelled = *s == SubmissionState::Submitting;
            if cancelled {
                *s = SubmissionState::Idle;
            }
            cancelled
        });
        self.flag.store(false, Ordering::Release);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
