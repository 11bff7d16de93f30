//! Host page: composes the registration record, the submitter and the
//! "submitted" flag.
//!
//! The countdown is rendered by the host independently of this state (see
//! [`CountdownTicker`](crate::countdown::CountdownTicker)); the page only
//! decides between the form and the success view.

use tracing::{debug, info};

use crate::delivery::Delivery;
use crate::department::DepartmentChoice;
use crate::registration::{RegistrationRecord, SubmissionState, SubmitError, Submitter};

/// What the page shows below the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageView {
    /// The registration form, with the current submission state.
    Form(SubmissionState),
    /// Delivery succeeded; offers "register again".
    Success,
}

pub struct RegistrationPage<D> {
    submitter: Submitter<D>,
    record: RegistrationRecord,
    submitted: bool,
}

impl<D: Delivery> RegistrationPage<D> {
    pub fn new(submitter: Submitter<D>) -> Self {
        Self {
            submitter,
            record: RegistrationRecord::new(),
            submitted: false,
        }
    }

    pub fn record(&self) -> &RegistrationRecord {
        &self.record
    }

    pub fn submitter(&self) -> &Submitter<D> {
        &self.submitter
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Replace one field of the record.
    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.record = self.record.with_field(name, value);
    }

    pub fn choose_department(&mut self, choice: &DepartmentChoice) {
        self.record = choice.apply(&self.record);
    }

    /// Submit the current record.
    ///
    /// On success the record is cleared and the page switches to
    /// [`PageView::Success`]; on failure the record is kept as typed.
    pub async fn submit(&mut self) -> Result<(), SubmitError> {
        self.submitter.submit(&self.record).await?;
        info!("Registration submitted, showing success view");
        self.record = RegistrationRecord::new();
        self.submitted = true;
        Ok(())
    }

    /// Start over with an empty form.
    pub fn reset(&mut self) {
        debug!(submitted = self.submitted, "Registration page reset");
        self.record = RegistrationRecord::new();
        self.submitted = false;
        self.submitter.reset_state();
    }

    pub fn view(&self) -> PageView {
        if self.submitted {
            PageView::Success
        } else {
            PageView::Form(self.submitter.state())
        }
    }
}
