use connectors::error::StoreError;
use model::status::TableStatus;
use thiserror::Error;

/// Top-level errors for the clone engine.
///
/// An activation timeout and a partial write are outcomes, not errors; they
/// are reported through [`crate::report`] so callers can inspect them.
#[derive(Debug, Error)]
pub enum CloneError {
    /// Source table missing or not active when the schema copy was
    /// attempted. `status` is `None` when the table does not exist.
    #[error("Source table '{table}' is {}", unavailable_reason(.status))]
    SourceUnavailable {
        table: String,
        status: Option<TableStatus>,
    },

    /// Destination table missing or not active and automatic creation was
    /// not requested. Nothing has been written.
    #[error("Destination table '{table}' is {}; enable auto-create to create it", unavailable_reason(.status))]
    DestinationUnavailable {
        table: String,
        status: Option<TableStatus>,
    },

    /// Store-level failure, propagated unmodified.
    #[error(transparent)]
    Store(#[from] StoreError),
}

fn unavailable_reason(status: &Option<TableStatus>) -> String {
    match status {
        Some(status) => format!("not active (status {status})"),
        None => "missing".to_string(),
    }
}
