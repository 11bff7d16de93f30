/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Declarative form schema: which fields exist, when each one is required,
//! and which email-template parameter it maps to.
//!
//! Adding or removing a survey field is a schema change only; the validation
//! loop evaluates every [`Requirement`] the same way.

use std::collections::HashSet;

use super::error::{SchemaError, ValidationError};
use super::RegistrationRecord;
use crate::delivery::TemplatePayload;

// ── Requirement ───────────────────────────────────────────────────────────────

/// When a field must be non-empty.
#[derive(Debug, Clone)]
pub enum Requirement {
    Always,
    Optional,

    /// Required only while `field` holds exactly `equals`; ignored otherwise.
    When { field: String, equals: String },

    /// Arbitrary predicate over the whole record.
    Custom(fn(&RegistrationRecord) -> bool),
}

impl Requirement {
    pub fn is_required(&self, record: &RegistrationRecord) -> bool {
        match self {
            Requirement::Always => true,
            Requirement::Optional => false,
            Requirement::When { field, equals } => record.get(field) == Some(equals.as_str()),
            Requirement::Custom(predicate) => predicate(record),
        }
    }
}

// ── FieldSpec ─────────────────────────────────────────────────────────────────

/// One declared form field.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    /// Field name in the [`RegistrationRecord`].
    pub name: String,
    /// Template parameter the value is sent as.
    pub param: String,
    pub requirement: Requirement,
}

impl FieldSpec {
    pub fn required(name: impl Into<String>, param: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param: param.into(),
            requirement: Requirement::Always,
        }
    }

    pub fn optional(name: impl Into<String>, param: impl Into<String>) -> Self {
        Self {
            requirement: Requirement::Optional,
            ..Self::required(name, param)
        }
    }

    pub fn required_when(
        name: impl Into<String>,
        param: impl Into<String>,
        field: impl Into<String>,
        equals: impl Into<String>,
    ) -> Self {
        Self {
            requirement: Requirement::When {
                field: field.into(),
                equals: equals.into(),
            },
            ..Self::required(name, param)
        }
    }
}

// ── FormSchema ────────────────────────────────────────────────────────────────

/// Ordered list of [`FieldSpec`]s.
#[derive(Debug, Clone)]
pub struct FormSchema {
    fields: Vec<FieldSpec>,
}

impl FormSchema {
    /// Build a schema, rejecting empty or duplicate names and conditions on
    /// undeclared fields.
    pub fn try_new(fields: Vec<FieldSpec>) -> Result<Self, SchemaError> {
        let mut seen = HashSet::new();
        for spec in &fields {
            if spec.name.trim().is_empty() {
                return Err(SchemaError::EmptyName);
            }
            if !seen.insert(spec.name.as_str()) {
                return Err(SchemaError::DuplicateField(spec.name.clone()));
            }
        }
        for spec in &fields {
            if let Requirement::When { field, .. } = &spec.requirement {
                if !seen.contains(field.as_str()) {
                    return Err(SchemaError::UnknownController {
                        field: spec.name.clone(),
                        controller: field.clone(),
                    });
                }
            }
        }
        Ok(Self { fields })
    }

    /// The registration form of the weekly event.
    ///
    /// | Field | Param | Required |
    /// |---|---|---|
    /// | `name` | `from_name` | yes |
    /// | `number` | `phone_number` | yes |
    /// | `email` | `from_email` | yes |
    /// | `speciality` | `speciality` | yes |
    /// | `has_project` | `has_project` | yes |
    /// | `challenges` | `challenges` | when `has_project == "yes"` |
    /// | `event_reason` | `event_reason` | yes |
    /// | `department` | `department` | no |
    /// | `department_reason` | `department_reason` | no |
    pub fn event_registration() -> Self {
        Self {
            fields: vec![
                FieldSpec::required("name", "from_name"),
                FieldSpec::required("number", "phone_number"),
                FieldSpec::required("email", "from_email"),
                FieldSpec::required("speciality", "speciality"),
                FieldSpec::required("has_project", "has_project"),
                FieldSpec::required_when("challenges", "challenges", "has_project", "yes"),
                FieldSpec::required("event_reason", "event_reason"),
                FieldSpec::optional("department", "department"),
                FieldSpec::optional("department_reason", "department_reason"),
            ],
        }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Check every field's requirement against `record`.
    ///
    /// # Errors
    /// [`ValidationError`] listing every required field whose value is absent
    /// or blank after trimming.
    pub fn validate(&self, record: &RegistrationRecord) -> Result<(), ValidationError> {
        let missing: Vec<String> = self
            .fields
            .iter()
            .filter(|spec| spec.requirement.is_required(record))
            .filter(|spec| record.get(&spec.name).map_or(true, |v| v.trim().is_empty()))
            .map(|spec| spec.name.clone())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { missing })
        }
    }

    /// Map `record` onto the template payload: one entry per declared field,
    /// absent values sent as empty strings.  Undeclared record fields are not
    /// sent.
    pub fn to_payload(&self, record: &RegistrationRecord) -> TemplatePayload {
        let mut payload = TemplatePayload::new();
        for spec in &self.fields {
            payload.insert(spec.param.clone(), record.get(&spec.name).unwrap_or_default());
        }
        payload
    }
}

impl Default for FormSchema {
    fn default() -> Self {
        Self::event_registration()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_record() -> RegistrationRecord {
        RegistrationRecord::new()
            .with_field("name", "Ada Lovelace")
            .with_field("number", "+44 20 7946 0000")
            .with_field("email", "ada@example.org")
            .with_field("speciality", "Mathematics")
            .with_field("has_project", "no")
            .with_field("event_reason", "Meet the community")
    }

    // ── validate ──────────────────────────────────────────────────────────────

    #[test]
    fn complete_record_without_project_is_valid() {
        assert!(FormSchema::default().validate(&complete_record()).is_ok());
    }

    #[test]
    fn missing_required_field_is_reported() {
        let record = complete_record().with_field("email", "");
        let err = FormSchema::default().validate(&record).unwrap_err();
        assert_eq!(err.missing, vec!["email".to_string()]);
    }

    #[test]
    fn whitespace_only_counts_as_empty() {
        let record = complete_record().with_field("name", "   \t");
        let err = FormSchema::default().validate(&record).unwrap_err();
        assert!(err.is_missing("name"));
    }

    #[test]
    fn empty_record_lists_every_unconditional_field_in_order() {
        let err = FormSchema::default()
            .validate(&RegistrationRecord::new())
            .unwrap_err();
        assert_eq!(
            err.missing,
            vec!["name", "number", "email", "speciality", "has_project", "event_reason"]
        );
    }

    #[test]
    fn triggered_conditional_field_is_required() {
        let record = complete_record().with_field("has_project", "yes");
        let err = FormSchema::default().validate(&record).unwrap_err();
        assert_eq!(err.missing, vec!["challenges".to_string()]);

        let record = record.with_field("challenges", "Scaling the backend");
        assert!(FormSchema::default().validate(&record).is_ok());
    }

    #[test]
    fn untriggered_conditional_field_is_ignored() {
        let schema = FormSchema::default();
        let blank = complete_record().with_field("has_project", "no");
        let filled = blank.with_field("challenges", "whatever");
        assert!(schema.validate(&blank).is_ok());
        assert!(schema.validate(&filled).is_ok());
    }

    #[test]
    fn no_format_validation_is_performed() {
        let record = complete_record()
            .with_field("email", "not-an-email")
            .with_field("number", "call me");
        assert!(FormSchema::default().validate(&record).is_ok());
    }

    #[test]
    fn custom_requirement_sees_whole_record() {
        fn needs_referrer(record: &RegistrationRecord) -> bool {
            record.get("speciality") == Some("Marketing")
        }
        let mut fields = FormSchema::default().fields().to_vec();
        fields.push(FieldSpec {
            name: "referrer".into(),
            param: "referrer".into(),
            requirement: Requirement::Custom(needs_referrer),
        });
        let schema = FormSchema::try_new(fields).unwrap();

        assert!(schema.validate(&complete_record()).is_ok());
        let err = schema
            .validate(&complete_record().with_field("speciality", "Marketing"))
            .unwrap_err();
        assert_eq!(err.missing, vec!["referrer".to_string()]);
    }

    // ── to_payload ────────────────────────────────────────────────────────────

    #[test]
    fn payload_uses_template_param_names() {
        let payload = FormSchema::default().to_payload(&complete_record());
        assert_eq!(payload.get("from_name"), Some("Ada Lovelace"));
        assert_eq!(payload.get("from_email"), Some("ada@example.org"));
        assert_eq!(payload.get("phone_number"), Some("+44 20 7946 0000"));
        assert_eq!(payload.get("event_reason"), Some("Meet the community"));
        assert_eq!(payload.get("name"), None);
    }

    #[test]
    fn payload_sends_absent_fields_as_empty_strings() {
        let payload = FormSchema::default().to_payload(&complete_record());
        assert_eq!(payload.get("challenges"), Some(""));
        assert_eq!(payload.len(), FormSchema::default().fields().len());
    }

    #[test]
    fn payload_skips_undeclared_record_fields() {
        let record = complete_record().with_field("utm_source", "newsletter");
        let payload = FormSchema::default().to_payload(&record);
        assert!(payload.iter().all(|(k, _)| k != "utm_source"));
    }

    // ── try_new ───────────────────────────────────────────────────────────────

    #[test]
    fn duplicate_field_is_rejected() {
        let result = FormSchema::try_new(vec![
            FieldSpec::required("name", "from_name"),
            FieldSpec::optional("name", "other"),
        ]);
        assert_eq!(result.unwrap_err(), SchemaError::DuplicateField("name".into()));
    }

    #[test]
    fn condition_on_unknown_field_is_rejected() {
        let result = FormSchema::try_new(vec![FieldSpec::required_when(
            "challenges",
            "challenges",
            "has_project",
            "yes",
        )]);
        assert!(matches!(result, Err(SchemaError::UnknownController { .. })));
    }

    #[test]
    fn blank_field_name_is_rejected() {
        let result = FormSchema::try_new(vec![FieldSpec::required(" ", "p")]);
        assert_eq!(result.unwrap_err(), SchemaError::EmptyName);
    }
}
