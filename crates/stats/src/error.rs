use thiserror::Error;

/// Result type for stats operations
pub type Result<T> = std::result::Result<T, StatsError>;

/// Errors raised around the aggregation itself.
///
/// The roll-up never fails on taxonomy mismatches; these cover setup and
/// form selection only.
#[derive(Error, Debug)]
pub enum StatsError {
    /// Invalid aggregator configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Requested form is not part of the snapshot
    #[error("Form not found: {0}")]
    FormNotFound(u64),

    /// No form id given and the snapshot does not hold exactly one form
    #[error("Snapshot holds {0} forms, select one by id")]
    AmbiguousForm(usize),
}

impl StatsError {
    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
