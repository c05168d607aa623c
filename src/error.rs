//! Client-side validation errors.
//!
//! These are raised before any request is made and are meant to be shown
//! inline next to the input that caused them.

/// Input rejected before it reaches the analysis service.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Uploaded file does not carry a `.json` extension.
    #[error("file must be JSON (.json): {0}")]
    NotJson(String),

    /// Uploaded file is larger than the upload limit.
    #[error("file is too large ({size} bytes); maximum is {max} bytes")]
    TooLarge { size: u64, max: u64 },

    /// Pasted text is not valid JSON.
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    /// Stock code is blank.
    #[error("stock code cannot be empty")]
    EmptyStockCode,

    /// Stock code is shorter than 2 or longer than 10 characters.
    #[error("stock code must be between 2-10 characters")]
    StockCodeLength,

    /// Stock code contains something other than letters, digits, or hyphens.
    #[error("stock code can only contain letters, numbers, and hyphens")]
    StockCodeCharset,

    /// Page size is not one of the offered options.
    #[error("rows per page must be one of 10, 20, 30, or 50, got {0}")]
    RowsPerPage(usize),
}

/// Upload state machine misuse (e.g. submitting with no file selected).
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("cannot {action} while upload is {state}")]
pub struct TransitionError {
    pub action: &'static str,
    pub state: &'static str,
}
