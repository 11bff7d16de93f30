/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Department (track) selection.
//!
//! The visitor picks a department, is asked why, and only a non-blank reason
//! confirms the choice.  A confirmed [`DepartmentChoice`] is written into the
//! registration record as `department` / `department_reason`.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::debug;

use crate::registration::RegistrationRecord;

pub const DEPARTMENT_FIELD: &str = "department";
pub const DEPARTMENT_REASON_FIELD: &str = "department_reason";

// ── Department ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Department {
    Organization,
    Development,
    Design,
    Media,
    Marketing,
    Innovation,
}

impl Department {
    /// Catalog order, as presented to the visitor.
    pub const ALL: [Department; 6] = [
        Department::Organization,
        Department::Development,
        Department::Design,
        Department::Media,
        Department::Marketing,
        Department::Innovation,
    ];

    /// Stable identifier stored in the record and used for message lookup.
    pub fn id(self) -> &'static str {
        match self {
            Department::Organization => "organization",
            Department::Development => "development",
            Department::Design => "design",
            Department::Media => "media",
            Department::Marketing => "marketing",
            Department::Innovation => "innovation",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown department '{0}'")]
pub struct UnknownDepartment(pub String);

impl FromStr for Department {
    type Err = UnknownDepartment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Department::ALL
            .into_iter()
            .find(|d| d.id().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownDepartment(s.to_string()))
    }
}

// ── DepartmentChoice ──────────────────────────────────────────────────────────

/// A department together with the visitor's (non-blank) reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentChoice {
    department: Department,
    reason: String,
}

impl DepartmentChoice {
    /// # Errors
    /// [`DepartmentError::EmptyReason`] if `reason` is blank.
    pub fn new(department: Department, reason: impl Into<String>) -> Result<Self, DepartmentError> {
        let reason = reason.into();
        if reason.trim().is_empty() {
            return Err(DepartmentError::EmptyReason(department));
        }
        Ok(Self { department, reason })
    }

    pub fn department(&self) -> Department {
        self.department
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// `record` with the department fields set.
    pub fn apply(&self, record: &RegistrationRecord) -> RegistrationRecord {
        record
            .with_field(DEPARTMENT_FIELD, self.department.id())
            .with_field(DEPARTMENT_REASON_FIELD, self.reason.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DepartmentError {
    #[error("no department selected")]
    NothingSelected,

    #[error("a reason is required to join {0}")]
    EmptyReason(Department),
}

// ── DepartmentPicker ──────────────────────────────────────────────────────────

/// Selection state: the confirmed choice plus an optional open reason dialog.
#[derive(Debug, Clone, Default)]
pub struct DepartmentPicker {
    confirmed: Option<DepartmentChoice>,
    dialog: Option<(Department, String)>,
}

impl DepartmentPicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the reason dialog for `department` with an empty reason.
    pub fn select(&mut self, department: Department) {
        debug!(%department, "department selected");
        self.dialog = Some((department, String::new()));
    }

    /// Department whose dialog is open, if any.
    pub fn pending(&self) -> Option<Department> {
        self.dialog.as_ref().map(|(d, _)| *d)
    }

    pub fn set_reason(&mut self, reason: impl Into<String>) {
        if let Some((_, current)) = &mut self.dialog {
            *current = reason.into();
        }
    }

    pub fn can_confirm(&self) -> bool {
        matches!(&self.dialog, Some((_, reason)) if !reason.trim().is_empty())
    }

    /// Confirm the open dialog.  On error the dialog stays open.
    pub fn confirm(&mut self) -> Result<&DepartmentChoice, DepartmentError> {
        let (department, reason) = self.dialog.as_ref().ok_or(DepartmentError::NothingSelected)?;
        let choice = DepartmentChoice::new(*department, reason.clone())?;
        self.dialog = None;
        Ok(&*self.confirmed.insert(choice))
    }

    /// Close the dialog; the previously confirmed choice is kept.
    pub fn cancel(&mut self) {
        self.dialog = None;
    }

    pub fn confirmed(&self) -> Option<&DepartmentChoice> {
        self.confirmed.as_ref()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_from_str() {
        for d in Department::ALL {
            assert_eq!(d.id().parse::<Department>().unwrap(), d);
        }
        assert_eq!(" Design ".parse::<Department>().unwrap(), Department::Design);
        assert!("finance".parse::<Department>().is_err());
    }

    #[test]
    fn confirm_requires_non_blank_reason() {
        let mut picker = DepartmentPicker::new();
        picker.select(Department::Media);
        assert!(!picker.can_confirm());

        picker.set_reason("   ");
        assert!(!picker.can_confirm());
        assert_eq!(
            picker.confirm().unwrap_err(),
            DepartmentError::EmptyReason(Department::Media)
        );
        assert_eq!(picker.pending(), Some(Department::Media));

        picker.set_reason("I edit videos");
        assert!(picker.can_confirm());
        let choice = picker.confirm().unwrap().clone();
        assert_eq!(choice.department(), Department::Media);
        assert_eq!(picker.pending(), None);
        assert_eq!(picker.confirmed(), Some(&choice));
    }

    #[test]
    fn confirm_without_selection_fails() {
        let mut picker = DepartmentPicker::new();
        assert_eq!(picker.confirm().unwrap_err(), DepartmentError::NothingSelected);
    }

    #[test]
    fn cancel_keeps_previous_choice() {
        let mut picker = DepartmentPicker::new();
        picker.select(Department::Design);
        picker.set_reason("Typography");
        picker.confirm().unwrap();

        picker.select(Department::Marketing);
        picker.set_reason("Campaigns");
        picker.cancel();

        assert_eq!(picker.pending(), None);
        assert_eq!(picker.confirmed().unwrap().department(), Department::Design);
    }

    #[test]
    fn selecting_again_starts_with_empty_reason() {
        let mut picker = DepartmentPicker::new();
        picker.select(Department::Design);
        picker.set_reason("Typography");
        picker.select(Department::Innovation);
        assert!(!picker.can_confirm());
    }

    #[test]
    fn apply_writes_record_fields() {
        let choice = DepartmentChoice::new(Department::Development, "Rust backends").unwrap();
        let record = choice.apply(&RegistrationRecord::new().with_field("name", "Ada"));
        assert_eq!(record.get(DEPARTMENT_FIELD), Some("development"));
        assert_eq!(record.get(DEPARTMENT_REASON_FIELD), Some("Rust backends"));
        assert_eq!(record.get("name"), Some("Ada"));
    }
}
