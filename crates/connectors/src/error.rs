use thiserror::Error;

type SourceError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors crossing the store boundary. A table that simply does not exist is
/// not an error; probes report that as [`model::probe::TableProbe::Missing`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// DescribeTable failed for a reason other than the table being absent.
    #[error("Failed to describe table '{table}': {source}")]
    Describe {
        table: String,
        #[source]
        source: SourceError,
    },

    /// CreateTable rejected the request (malformed schema, duplicate table).
    #[error("Failed to create table '{table}': {source}")]
    Create {
        table: String,
        #[source]
        source: SourceError,
    },

    #[error("Failed to scan table '{table}': {source}")]
    Scan {
        table: String,
        #[source]
        source: SourceError,
    },

    #[error("Batch write to table '{table}' failed: {source}")]
    BatchWrite {
        table: String,
        #[source]
        source: SourceError,
    },

    #[error("Failed to list tables: {source}")]
    ListTables {
        #[source]
        source: SourceError,
    },

    /// The store returned a table description missing fields required to
    /// rebuild the schema.
    #[error("Invalid description for table '{table}': {reason}")]
    InvalidDescription { table: String, reason: String },
}
