use thiserror::Error;

// ---------------------------------------------------------------------------
// Failure taxonomy
// ---------------------------------------------------------------------------

/// Everything that can go wrong inside one dashboard section.
///
/// None of these are fatal: each is caught where it happens and turned into a
/// message scoped to the section that produced it.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DashboardError {
    /// A data file is missing, unreadable or not valid delimited text.
    #[error("Could not load file: {path}. Error: {reason}")]
    LoadFailure { path: String, reason: String },

    /// A column the dataset needs is not in the table header.
    #[error("Required column '{column}' missing in {dataset} data")]
    SchemaMismatch { dataset: String, column: String },

    /// Too few distinct periods to fit a trend line.
    #[error("Not enough data to fit a trend: need {required} distinct years, found {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// The generative model call failed.
    #[error("{0}")]
    ServiceError(String),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
