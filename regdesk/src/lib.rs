/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! regdesk – registration desk for a weekly event
//!
//! Module layout:
//!
//! ```text
//! lib.rs
//! ├── countdown/      – next weekly target, remaining time, 1 s ticker
//! ├── registration/   – record, declarative form schema, submitter
//! ├── delivery/       – Delivery trait + EmailJS HTTP client
//! ├── department.rs   – department catalog and reason dialog
//! ├── page.rs         – host page: form ⇄ success view
//! └── config/         – YAML configuration + environment overrides
//! ```

pub mod config;
pub mod countdown;
pub mod delivery;
pub mod department;
pub mod page;
pub mod registration;
