//! Required-field validation for pathway drafts.

use tracing::{debug, warn};

use crate::error::ValidationError;
use crate::models::{PathwayDraft, VerificationStatus};

/// Fields a draft must carry before it is stamped as validated.
pub const REQUIRED_FIELDS: [&str; 4] = ["id", "name", "compounds", "metadata"];

/// Notes recorded on drafts that pass validation.
pub const VALIDATION_NOTES: &str = "Basic validation passed";

/// Checks drafts for required fields and stamps their verification status.
#[derive(Debug, Clone, Default)]
pub struct PathwayValidator;

impl PathwayValidator {
    pub fn new() -> Self {
        Self
    }

    /// Return the draft with `metadata.verification_status` set to
    /// `validated`, or every missing required field.
    pub fn validate(&self, mut draft: PathwayDraft) -> Result<PathwayDraft, ValidationError> {
        let missing = draft.missing_fields(&REQUIRED_FIELDS);
        if !missing.is_empty() {
            warn!(
                id = draft.id.as_deref().unwrap_or_default(),
                missing = %missing.join(", "),
                "Validation failed"
            );
            return Err(ValidationError::MissingFields { fields: missing });
        }

        if let Some(metadata) = draft.metadata.as_mut() {
            metadata.verification_status = Some(VerificationStatus::Validated);
            metadata.llm_validation_notes = Some(VALIDATION_NOTES.to_string());
        }

        debug!(id = draft.id.as_deref().unwrap_or_default(), "Draft validated");
        Ok(draft)
    }
}
