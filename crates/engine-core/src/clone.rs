use crate::{
    error::CloneError,
    progress::ProgressSink,
    report::{CloneOutcome, CopyReport, SchemaReport},
    settings::CloneSettings,
};
use connectors::store::{Item, TableStore};
use model::probe::TableProbe;
use std::sync::Arc;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

/// Options for a full clone run.
#[derive(Debug, Clone, Copy, Default)]
pub struct CloneOptions {
    /// Create the destination table from the source schema when it is
    /// missing or not active.
    pub create_if_missing: bool,
}

/// Owns one source-to-destination clone of a single table.
///
/// All remote operations are issued and awaited one at a time; the only
/// accumulating state is the unprocessed-items list.
pub struct CloneEngine {
    table: String,
    source: Arc<dyn TableStore>,
    destination: Arc<dyn TableStore>,
    sink: Arc<dyn ProgressSink>,
    settings: CloneSettings,
}

impl CloneEngine {
    pub fn new(
        table: impl Into<String>,
        source: Arc<dyn TableStore>,
        destination: Arc<dyn TableStore>,
        sink: Arc<dyn ProgressSink>,
        settings: CloneSettings,
    ) -> Self {
        CloneEngine {
            table: table.into(),
            source,
            destination,
            sink,
            settings,
        }
    }

    /// Recreates the source table's schema on the destination and waits for
    /// it to become active.
    ///
    /// Fails with [`CloneError::SourceUnavailable`] before issuing any
    /// create request when the source is missing or not active.
    pub async fn copy_schema(&self) -> Result<SchemaReport, CloneError> {
        let descriptor = match self.source.probe(&self.table).await? {
            TableProbe::Found(descriptor) if descriptor.status.is_active() => descriptor,
            TableProbe::Found(descriptor) => {
                return Err(CloneError::SourceUnavailable {
                    table: self.table.clone(),
                    status: Some(descriptor.status),
                });
            }
            TableProbe::Missing => {
                return Err(CloneError::SourceUnavailable {
                    table: self.table.clone(),
                    status: None,
                });
            }
        };

        self.sink.notify("Creating destination table...");
        self.destination
            .create_table(&self.table, &descriptor.schema)
            .await?;

        let active = self.await_activation().await?;
        self.sink.notify(if active {
            "Destination table created!"
        } else {
            "Destination table failed to become active"
        });
        Ok(SchemaReport { active })
    }

    /// Timed activation loop: probe, and if not yet active sleep one
    /// interval, until the budget is spent. A table stuck creating and a
    /// creation that failed outright both surface as a timeout.
    async fn await_activation(&self) -> Result<bool, CloneError> {
        let started = Instant::now();
        loop {
            self.sink.notify("Waiting for table creation...");
            if self.destination.probe(&self.table).await?.is_active() {
                return Ok(true);
            }
            if started.elapsed() + self.settings.poll_interval >= self.settings.activation_budget {
                warn!(
                    table = %self.table,
                    "Table did not become active within {:?}",
                    self.settings.activation_budget
                );
                return Ok(false);
            }
            sleep(self.settings.poll_interval).await;
        }
    }

    /// Scans the whole source table and replays every item onto the
    /// destination in fixed-size chunks. Destination existence is the
    /// caller's concern, see [`CloneEngine::clone`].
    pub async fn copy_items(&self) -> Result<CopyReport, CloneError> {
        self.sink.notify("Copying table items");
        let items = self.source.scan(&self.table).await?;
        let total = items.len();
        info!(table = %self.table, total, "Scanned source table");

        let unprocessed = self.write_chunks(items).await?;
        let unprocessed = self.retry_unprocessed(unprocessed).await?;

        let report = CopyReport { total, unprocessed };
        self.sink.notify(&format!(
            "Copy completed: {} of {} copied successfully",
            report.copied(),
            report.total
        ));
        Ok(report)
    }

    /// One ordered pass: `ceil(len / chunk_size)` bulk writes, strictly
    /// sequential, collecting whatever the store reports unprocessed in
    /// chunk order.
    async fn write_chunks(&self, items: Vec<Item>) -> Result<Vec<Item>, CloneError> {
        let chunk_size = self.settings.chunk_size.max(1);
        let total_chunks = items.len().div_ceil(chunk_size);
        let mut unprocessed = Vec::new();

        for (index, chunk) in items.chunks(chunk_size).enumerate() {
            self.sink
                .notify(&format!("Copying chunk {} of {}", index + 1, total_chunks));
            let leftovers = self
                .destination
                .write_batch(&self.table, chunk.to_vec())
                .await?;
            unprocessed.extend(leftovers);
        }
        Ok(unprocessed)
    }

    /// Bounded re-submission of unprocessed leftovers with exponential
    /// backoff. Items still unprocessed after the last round are returned
    /// as the terminal partial-failure state, never retried again.
    async fn retry_unprocessed(&self, mut unprocessed: Vec<Item>) -> Result<Vec<Item>, CloneError> {
        let policy = self.settings.write_retry.clone();
        for round in 1..policy.max_attempts {
            if unprocessed.is_empty() {
                break;
            }
            let delay = policy.backoff_delay(round - 1);
            debug!(
                count = unprocessed.len(),
                round,
                "Retrying unprocessed items after {:?}",
                delay
            );
            sleep(delay).await;
            self.sink
                .notify(&format!("Retrying {} unprocessed items", unprocessed.len()));
            unprocessed = self.write_chunks(unprocessed).await?;
        }
        Ok(unprocessed)
    }

    /// Full clone: probe the destination, create it from the source schema
    /// if requested, then copy all items.
    pub async fn clone(&self, options: CloneOptions) -> Result<CloneOutcome, CloneError> {
        let destination = self.destination.probe(&self.table).await?;
        if !destination.is_active() {
            if !options.create_if_missing {
                return Err(CloneError::DestinationUnavailable {
                    table: self.table.clone(),
                    status: destination.into_status(),
                });
            }
            if !self.copy_schema().await?.active {
                return Ok(CloneOutcome::SchemaTimedOut);
            }
        }

        Ok(CloneOutcome::Copied(self.copy_items().await?))
    }
}
