/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! EmailJS REST client.
//!
//! Sends one templated email per call:
//!
//! ```text
//! POST {endpoint}
//! {
//!   "service_id":      "<service id>",
//!   "template_id":     "<template id>",
//!   "user_id":         "<public key>",
//!   "template_params": { "from_name": "...", ... }
//! }
//! ```
//!
//! Any 2xx answer is success.  Credentials come from an injected
//! [`EmailConfig`]; nothing is read from the environment here.

use serde::Serialize;
use tracing::{debug, info};

use super::{Delivery, DeliveryError, TemplatePayload};
use crate::config::EmailConfig;

/// Request body accepted by the `email/send` endpoint.
#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: &'a TemplatePayload,
}

/// [`Delivery`] over the EmailJS HTTP API.
#[derive(Debug, Clone)]
pub struct EmailJsClient {
    http: reqwest::Client,
    config: EmailConfig,
}

impl EmailJsClient {
    /// Build a client for `config`.
    ///
    /// # Errors
    /// [`DeliveryError::Transport`] if the HTTP client cannot be constructed
    /// (e.g. TLS backend initialisation failure).
    pub fn new(config: EmailConfig) -> Result<Self, DeliveryError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            config,
        })
    }

    pub fn config(&self) -> &EmailConfig {
        &self.config
    }

    fn check_credentials(&self) -> Result<(), DeliveryError> {
        let required = [
            ("service_id", &self.config.service_id),
            ("template_id", &self.config.template_id),
            ("public_key", &self.config.public_key),
        ];
        match required.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((name, _)) => Err(DeliveryError::MissingCredential(*name)),
            None => Ok(()),
        }
    }
}

impl Delivery for EmailJsClient {
    async fn send(&self, payload: &TemplatePayload) -> Result<(), DeliveryError> {
        self.check_credentials()?;

        let body = SendRequest {
            service_id: &self.config.service_id,
            template_id: &self.config.template_id,
            user_id: &self.config.public_key,
            template_params: payload,
        };

        debug!(
            endpoint = %self.config.endpoint,
            params = payload.len(),
            "Sending registration email"
        );

        let response = self
            .http
            .post(&self.config.endpoint)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        info!(
            service_id = %self.config.service_id,
            template_id = %self.config.template_id,
            status = status.as_u16(),
            "Registration email accepted"
        );
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
