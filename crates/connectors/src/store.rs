use crate::error::StoreError;
use async_trait::async_trait;
use model::{probe::TableProbe, schema::TableSchema};
use std::collections::HashMap;

pub use aws_sdk_dynamodb::types::AttributeValue;

/// An item is an opaque attribute map. It is rewritten verbatim between
/// stores and never inspected or transformed on the way through.
pub type Item = HashMap<String, AttributeValue>;

/// Narrow interface the clone engine needs from a keyed table store.
///
/// Source and destination are independent, stateless instances of this;
/// nothing is shared between them beyond the item payloads being copied.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Read-only existence and status check. Never mutates the target.
    /// Absence surfaces as [`TableProbe::Missing`]; transport and
    /// authorization failures propagate as errors.
    async fn probe(&self, table: &str) -> Result<TableProbe, StoreError>;

    /// Create `table` with the given schema. Fails loud on malformed
    /// requests and duplicate-table conflicts.
    async fn create_table(&self, table: &str, schema: &TableSchema) -> Result<(), StoreError>;

    /// Full scan of `table`, following the continuation key until the store
    /// reports no further pages.
    async fn scan(&self, table: &str) -> Result<Vec<Item>, StoreError>;

    /// Bulk put of one chunk. Returns the items the store reported as
    /// unprocessed for `table`, in the order they were reported.
    async fn write_batch(&self, table: &str, items: Vec<Item>) -> Result<Vec<Item>, StoreError>;
}
