//! Broker-summary upload: file checks and the submit lifecycle.
//!
//! ```text
//! Idle ──select──▶ Selected ──submit──▶ Submitting ──succeed──▶ Success
//!                     ▲                     │
//!                     └──────select─────────┴──fail──▶ Error ──reset──▶ Idle
//! ```

use std::fmt;

use crate::error::{TransitionError, ValidationError};
use crate::input::format_file_size;

/// Largest accepted upload: 10 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Reject files that are not `.json` or are over [`MAX_UPLOAD_BYTES`].
///
/// The extension check is case-sensitive: `summary.JSON` is rejected.
pub fn validate_upload(name: &str, size: u64) -> Result<(), ValidationError> {
    if !name.ends_with(".json") {
        return Err(ValidationError::NotJson(name.to_string()));
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(ValidationError::TooLarge {
            size,
            max: MAX_UPLOAD_BYTES,
        });
    }
    Ok(())
}

/// A file that passed [`validate_upload`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadFile {
    name: String,
    size: u64,
}

impl UploadFile {
    pub fn new(name: &str, size: u64) -> Result<Self, ValidationError> {
        validate_upload(name, size)?;
        Ok(Self {
            name: name.to_string(),
            size,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.size
    }
}

impl fmt::Display for UploadFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, format_file_size(self.size))
    }
}

/// Where an upload is in its lifecycle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum UploadState {
    #[default]
    Idle,
    Selected(UploadFile),
    Submitting(UploadFile),
    Success(UploadFile),
    Error(String),
}

impl UploadState {
    /// Short lowercase name, used in transition errors.
    pub fn name(&self) -> &'static str {
        match self {
            UploadState::Idle => "idle",
            UploadState::Selected(_) => "selected",
            UploadState::Submitting(_) => "submitting",
            UploadState::Success(_) => "success",
            UploadState::Error(_) => "error",
        }
    }

    /// The file currently held, if any.
    pub fn file(&self) -> Option<&UploadFile> {
        match self {
            UploadState::Selected(f) | UploadState::Submitting(f) | UploadState::Success(f) => {
                Some(f)
            }
            UploadState::Idle | UploadState::Error(_) => None,
        }
    }

    pub fn can_submit(&self) -> bool {
        matches!(self, UploadState::Selected(_))
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, UploadState::Submitting(_))
    }

    /// Choose a file. Replaces any previous selection; refused mid-submit.
    pub fn select(&mut self, file: UploadFile) -> Result<(), TransitionError> {
        self.guard("select a file", |s| !s.is_submitting())?;
        *self = UploadState::Selected(file);
        Ok(())
    }

    /// Start sending the selected file.
    pub fn submit(&mut self) -> Result<(), TransitionError> {
        let UploadState::Selected(file) = self else {
            return Err(self.refuse("submit"));
        };
        *self = UploadState::Submitting(file.clone());
        Ok(())
    }

    /// The service accepted the upload.
    pub fn succeed(&mut self) -> Result<(), TransitionError> {
        let UploadState::Submitting(file) = self else {
            return Err(self.refuse("complete"));
        };
        *self = UploadState::Success(file.clone());
        Ok(())
    }

    /// The service (or the transport) rejected the upload.
    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), TransitionError> {
        self.guard("fail", UploadState::is_submitting)?;
        *self = UploadState::Error(message.into());
        Ok(())
    }

    /// Drop the file and any error, back to idle.
    pub fn reset(&mut self) -> Result<(), TransitionError> {
        self.guard("reset", |s| !s.is_submitting())?;
        *self = UploadState::Idle;
        Ok(())
    }

    fn guard(
        &self,
        action: &'static str,
        allowed: impl Fn(&UploadState) -> bool,
    ) -> Result<(), TransitionError> {
        if allowed(self) {
            Ok(())
        } else {
            Err(self.refuse(action))
        }
    }

    fn refuse(&self, action: &'static str) -> TransitionError {
        TransitionError {
            action,
            state: self.name(),
        }
    }
}
