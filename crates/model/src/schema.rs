use serde::{Deserialize, Serialize};

/// Role of an attribute within a key schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyRole {
    Hash,
    Range,
}

/// One entry of a key schema, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyElement {
    pub name: String,
    pub role: KeyRole,
}

impl KeyElement {
    pub fn new(name: &str, role: KeyRole) -> Self {
        KeyElement {
            name: name.to_string(),
            role,
        }
    }
}

/// Scalar type of a declared key attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    String,
    Number,
    Binary,
}

/// A declared key attribute and its scalar type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSpec {
    pub name: String,
    pub kind: AttributeKind,
}

impl AttributeSpec {
    pub fn new(name: &str, kind: AttributeKind) -> Self {
        AttributeSpec {
            name: name.to_string(),
            kind,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingMode {
    Provisioned,
    PayPerRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionKind {
    All,
    KeysOnly,
    Include,
}

/// Attribute projection of a secondary index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projection {
    pub kind: ProjectionKind,
    /// Non-key attributes carried by an `Include` projection; empty otherwise.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub non_key_attributes: Vec<String>,
}

impl Projection {
    pub fn all() -> Self {
        Projection {
            kind: ProjectionKind::All,
            non_key_attributes: Vec::new(),
        }
    }
}

/// A secondary index reduced to what carries over to a newly created table:
/// name, key schema, and projection. Throughput and capacity settings do not
/// carry over and have no representation here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondaryIndex {
    pub name: String,
    pub key_schema: Vec<KeyElement>,
    pub projection: Projection,
}

/// Snapshot of a table's schema as retrieved from a probe.
///
/// Read-only: it is never mutated, only re-shaped into a creation request by
/// the store connector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub key_schema: Vec<KeyElement>,
    pub attributes: Vec<AttributeSpec>,
    /// `None` when the store did not report a billing mode; creation then
    /// falls back to the store default.
    pub billing_mode: Option<BillingMode>,
    pub deletion_protection: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub local_indexes: Vec<SecondaryIndex>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub global_indexes: Vec<SecondaryIndex>,
}

impl TableSchema {
    /// Name of the hash (partition) key, if the key schema declares one.
    pub fn hash_key(&self) -> Option<&str> {
        self.key_schema
            .iter()
            .find(|key| key.role == KeyRole::Hash)
            .map(|key| key.name.as_str())
    }

    /// Name of the range (sort) key, if the key schema declares one.
    pub fn range_key(&self) -> Option<&str> {
        self.key_schema
            .iter()
            .find(|key| key.role == KeyRole::Range)
            .map(|key| key.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schema() -> TableSchema {
        TableSchema {
            key_schema: vec![
                KeyElement::new("pk", KeyRole::Hash),
                KeyElement::new("sk", KeyRole::Range),
            ],
            attributes: vec![
                AttributeSpec::new("pk", AttributeKind::String),
                AttributeSpec::new("sk", AttributeKind::Number),
            ],
            billing_mode: Some(BillingMode::PayPerRequest),
            deletion_protection: false,
            local_indexes: vec![],
            global_indexes: vec![],
        }
    }

    #[test]
    fn resolves_key_names_by_role() {
        let schema = sample_schema();
        assert_eq!(schema.hash_key(), Some("pk"));
        assert_eq!(schema.range_key(), Some("sk"));
    }

    #[test]
    fn hash_only_schema_has_no_range_key() {
        let mut schema = sample_schema();
        schema.key_schema.truncate(1);
        assert_eq!(schema.range_key(), None);
    }

    #[test]
    fn serializes_without_empty_index_lists() {
        let schema = sample_schema();
        let json = serde_json::to_value(&schema).unwrap();
        assert!(json.get("local_indexes").is_none());
        assert!(json.get("global_indexes").is_none());
    }
}
