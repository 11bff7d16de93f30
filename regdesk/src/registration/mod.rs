//! Registration records, their validation, and submission.
//!
//! ```text
//! set_field ──► RegistrationRecord ──► Submitter::submit
//!                                         │
//!                     FormSchema::validate├──✗──► ValidationError
//!                                         │
//!                   FormSchema::to_payload▼
//!                                   Delivery::send ──✗──► DeliveryError
//!                                         │
//!                                         ▼
//!                                     Delivered
//! ```
//!
//! A record is a flat `field name → string` map.  Values are opaque: the
//! schema only checks presence, never format.

pub mod error;
pub mod schema;
pub mod submitter;

pub use error::{SchemaError, SubmitError, ValidationError};
pub use schema::{FieldSpec, FormSchema, Requirement};
pub use submitter::{SubmissionState, Submitter};

use std::collections::BTreeMap;

/// Field values entered by the visitor for one registration attempt.
///
/// Edits use replace semantics: [`with_field`](Self::with_field) returns a
/// new record and leaves the original untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationRecord {
    fields: BTreeMap<String, String>,
}

impl RegistrationRecord {
    /// An empty record, as created at page load.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// A copy of this record with `name` set to `value`.
    pub fn with_field(&self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.fields.insert(name.into(), value.into());
        next
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for RegistrationRecord
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
