use connectors::store::Item;

/// Outcome of a schema copy: whether the destination reached ACTIVE within
/// the wait budget. A timeout is data, not an error; the caller decides
/// whether to proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaReport {
    pub active: bool,
}

/// Outcome of an item copy. `unprocessed` holds whatever the store reported
/// as not durably committed, in the order it was reported, after any retry
/// rounds have drained.
#[derive(Debug, Clone, Default)]
pub struct CopyReport {
    pub total: usize,
    pub unprocessed: Vec<Item>,
}

impl CopyReport {
    pub fn succeeded(&self) -> bool {
        self.unprocessed.is_empty()
    }

    pub fn copied(&self) -> usize {
        self.total.saturating_sub(self.unprocessed.len())
    }
}

/// Result of a full clone.
#[derive(Debug)]
pub enum CloneOutcome {
    /// The destination schema never became active; no items were touched.
    SchemaTimedOut,
    /// The item copy ran to completion, possibly with leftovers.
    Copied(CopyReport),
}

impl CloneOutcome {
    pub fn succeeded(&self) -> bool {
        match self {
            CloneOutcome::SchemaTimedOut => false,
            CloneOutcome::Copied(report) => report.succeeded(),
        }
    }
}
