/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Outbound delivery of validated registrations.
//!
//! The submitter only knows the [`Delivery`] trait: one asynchronous
//! "send this template payload" call per submission.  [`emailjs`] provides the
//! production implementation over HTTP; tests substitute in-memory fakes.

pub mod emailjs;

pub use emailjs::EmailJsClient;

use std::collections::BTreeMap;
use std::future::Future;

use serde::Serialize;
use thiserror::Error;

// ── TemplatePayload ───────────────────────────────────────────────────────────

/// Flat `template parameter → value` map handed to the email template.
///
/// Serialises as a plain JSON object.  `BTreeMap` keeps the parameter order
/// deterministic in logs and request bodies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TemplatePayload(BTreeMap<String, String>);

impl TemplatePayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, param: impl Into<String>, value: impl Into<String>) {
        self.0.insert(param.into(), value.into());
    }

    pub fn get(&self, param: &str) -> Option<&str> {
        self.0.get(param).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

// ── Errors ────────────────────────────────────────────────────────────────────

/// Why a delivery attempt failed.  All variants are retryable by resubmitting.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// A credential needed to address the email service is empty.  Raised
    /// before any network I/O.
    #[error("email delivery is not configured: {0} is empty")]
    MissingCredential(&'static str),

    /// Connection, TLS, timeout or body-decoding failure.
    #[error("email delivery request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("email service rejected the message (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },
}

// ── Delivery ──────────────────────────────────────────────────────────────────

/// Hands one template payload to an external email-sending service.
///
/// One call is one attempt; implementations must not retry on their own.
pub trait Delivery: Send + Sync {
    fn send(
        &self,
        payload: &TemplatePayload,
    ) -> impl Future<Output = Result<(), DeliveryError>> + Send;
}
