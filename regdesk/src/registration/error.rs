/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Structured error types for registration validation and submission.
//!
//! Three enums model the three failure layers:
//!
//! * [`SchemaError`] — the declared form schema itself is inconsistent
//!   (configuration time).
//! * [`ValidationError`] — a record is missing required fields (local,
//!   recovered by the visitor correcting input).
//! * [`SubmitError`] — top-level outcome of
//!   [`Submitter::submit()`](super::Submitter::submit).

use thiserror::Error;

use crate::delivery::DeliveryError;

// ── Schema ────────────────────────────────────────────────────────────────────

/// A form schema that cannot be evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("form field with an empty name")]
    EmptyName,

    #[error("form field '{0}' is declared more than once")]
    DuplicateField(String),

    /// A conditional field is gated on a field the schema does not declare.
    #[error("field '{field}' is conditional on unknown field '{controller}'")]
    UnknownController { field: String, controller: String },
}

// ── Validation ────────────────────────────────────────────────────────────────

/// One or more required (or triggered conditional) fields are empty.
///
/// `missing` lists the field names in schema order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("required field(s) missing: {}", .missing.join(", "))]
pub struct ValidationError {
    pub missing: Vec<String>,
}

impl ValidationError {
    pub fn is_missing(&self, field: &str) -> bool {
        self.missing.iter().any(|m| m == field)
    }
}

// ── Submission ────────────────────────────────────────────────────────────────

/// Why a call to `submit` did not deliver the record.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Validation failed; delivery was not attempted.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Delivery was attempted and failed.  The record is unchanged and the
    /// visitor may submit again.
    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    /// Another submission is still waiting for its delivery to settle.
    #[error("a registration is already being submitted")]
    InFlight,
}
