use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status a table reports when probed.
///
/// Derived fresh on every probe, never cached across calls. Anything outside
/// the states this tool acts on is preserved verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableStatus {
    Creating,
    Active,
    Deleting,
    Updating,
    Other(String),
}

impl TableStatus {
    pub fn parse(tag: &str) -> Self {
        match tag {
            "CREATING" => TableStatus::Creating,
            "ACTIVE" => TableStatus::Active,
            "DELETING" => TableStatus::Deleting,
            "UPDATING" => TableStatus::Updating,
            other => TableStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TableStatus::Creating => "CREATING",
            TableStatus::Active => "ACTIVE",
            TableStatus::Deleting => "DELETING",
            TableStatus::Updating => "UPDATING",
            TableStatus::Other(tag) => tag,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, TableStatus::Active)
    }
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
