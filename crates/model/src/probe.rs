use crate::{schema::TableSchema, status::TableStatus};
use serde::{Deserialize, Serialize};

/// What a probe learned about a remote table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescriptor {
    pub schema: TableSchema,
    pub status: TableStatus,
}

/// Outcome of probing a table. Absence is a value, not an error, so callers
/// can branch on it without catching anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableProbe {
    Found(TableDescriptor),
    Missing,
}

impl TableProbe {
    /// True only for a found table reporting ACTIVE.
    pub fn is_active(&self) -> bool {
        matches!(self, TableProbe::Found(descriptor) if descriptor.status.is_active())
    }

    pub fn descriptor(&self) -> Option<&TableDescriptor> {
        match self {
            TableProbe::Found(descriptor) => Some(descriptor),
            TableProbe::Missing => None,
        }
    }

    /// The observed status, or `None` when the table is missing.
    pub fn into_status(self) -> Option<TableStatus> {
        match self {
            TableProbe::Found(descriptor) => Some(descriptor.status),
            TableProbe::Missing => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{AttributeKind, AttributeSpec, KeyElement, KeyRole};

    fn descriptor(status: TableStatus) -> TableDescriptor {
        TableDescriptor {
            schema: TableSchema {
                key_schema: vec![KeyElement::new("id", KeyRole::Hash)],
                attributes: vec![AttributeSpec::new("id", AttributeKind::String)],
                billing_mode: None,
                deletion_protection: false,
                local_indexes: vec![],
                global_indexes: vec![],
            },
            status,
        }
    }

    #[test]
    fn missing_table_is_never_active() {
        assert!(!TableProbe::Missing.is_active());
        assert_eq!(TableProbe::Missing.into_status(), None);
    }

    #[test]
    fn found_table_is_active_only_when_status_says_so() {
        assert!(TableProbe::Found(descriptor(TableStatus::Active)).is_active());
        assert!(!TableProbe::Found(descriptor(TableStatus::Creating)).is_active());
    }

    #[test]
    fn into_status_surfaces_the_observed_status() {
        let probe = TableProbe::Found(descriptor(TableStatus::Deleting));
        assert_eq!(probe.into_status(), Some(TableStatus::Deleting));
    }
}
