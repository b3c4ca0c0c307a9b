// Errors surfaced by the reliability use cases
#[derive(Debug, thiserror::Error)]
pub enum ReliabilityError {
    #[error("Data unavailable for mill {mill_id}: {reason}")]
    DataUnavailable { mill_id: String, reason: String },

    #[error("Unknown mill: {0}")]
    UnknownMill(String),

    #[error("Unsupported window of {0} days (expected 7, 14, 30, 60 or 90)")]
    InvalidWindow(u32),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Mill computation task failed: {0}")]
    TaskFailed(String),
}
