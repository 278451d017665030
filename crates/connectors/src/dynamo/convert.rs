use crate::{error::StoreError, store::Item};
use aws_sdk_dynamodb::{
    error::BuildError, operation::create_table::builders::CreateTableFluentBuilder, types as sdk,
};
use model::{
    probe::TableDescriptor,
    schema::{
        AttributeKind, AttributeSpec, BillingMode, KeyElement, KeyRole, Projection,
        ProjectionKind, SecondaryIndex, TableSchema,
    },
    status::TableStatus,
};
use std::collections::HashMap;

/// Reads the wire description into the reduced snapshot this tool works
/// with. Index throughput, size, and status fields are dropped here.
pub(crate) fn descriptor_from(
    table: &str,
    description: &sdk::TableDescription,
) -> Result<TableDescriptor, StoreError> {
    let status = description
        .table_status
        .as_ref()
        .map(|status| TableStatus::parse(status.as_str()))
        .ok_or_else(|| invalid(table, "missing table status"))?;

    Ok(TableDescriptor {
        schema: schema_from(table, description)?,
        status,
    })
}

pub(crate) fn schema_from(
    table: &str,
    description: &sdk::TableDescription,
) -> Result<TableSchema, StoreError> {
    let key_schema = key_schema_from(table, description.key_schema.as_deref().unwrap_or_default())?;
    if key_schema.is_empty() {
        return Err(invalid(table, "empty key schema"));
    }

    let attributes = description
        .attribute_definitions
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|definition| attribute_from(table, definition))
        .collect::<Result<Vec<_>, _>>()?;
    if attributes.is_empty() {
        return Err(invalid(table, "no attribute definitions"));
    }

    let billing_mode = description
        .billing_mode_summary
        .as_ref()
        .and_then(|summary| summary.billing_mode.as_ref())
        .and_then(billing_mode_from);

    let local_indexes = description
        .local_secondary_indexes
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|index| {
            secondary_index_from(
                table,
                index.index_name.as_deref(),
                index.key_schema.as_deref(),
                index.projection.as_ref(),
            )
        })
        .collect::<Result<Vec<_>, _>>()?;

    let global_indexes = description
        .global_secondary_indexes
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|index| {
            secondary_index_from(
                table,
                index.index_name.as_deref(),
                index.key_schema.as_deref(),
                index.projection.as_ref(),
            )
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TableSchema {
        key_schema,
        attributes,
        billing_mode,
        deletion_protection: description.deletion_protection_enabled.unwrap_or(false),
        local_indexes,
        global_indexes,
    })
}

fn key_schema_from(
    table: &str,
    elements: &[sdk::KeySchemaElement],
) -> Result<Vec<KeyElement>, StoreError> {
    elements
        .iter()
        .map(|element| {
            let role = match &element.key_type {
                sdk::KeyType::Hash => KeyRole::Hash,
                sdk::KeyType::Range => KeyRole::Range,
                other => {
                    return Err(invalid(
                        table,
                        format!(
                            "unknown key type '{}' for attribute '{}'",
                            other.as_str(),
                            element.attribute_name
                        ),
                    ));
                }
            };
            Ok(KeyElement {
                name: element.attribute_name.clone(),
                role,
            })
        })
        .collect()
}

fn attribute_from(
    table: &str,
    definition: &sdk::AttributeDefinition,
) -> Result<AttributeSpec, StoreError> {
    let kind = match &definition.attribute_type {
        sdk::ScalarAttributeType::S => AttributeKind::String,
        sdk::ScalarAttributeType::N => AttributeKind::Number,
        sdk::ScalarAttributeType::B => AttributeKind::Binary,
        other => {
            return Err(invalid(
                table,
                format!(
                    "unknown attribute type '{}' for attribute '{}'",
                    other.as_str(),
                    definition.attribute_name
                ),
            ));
        }
    };
    Ok(AttributeSpec {
        name: definition.attribute_name.clone(),
        kind,
    })
}

fn billing_mode_from(mode: &sdk::BillingMode) -> Option<BillingMode> {
    match mode {
        sdk::BillingMode::PayPerRequest => Some(BillingMode::PayPerRequest),
        sdk::BillingMode::Provisioned => Some(BillingMode::Provisioned),
        _ => None,
    }
}

fn secondary_index_from(
    table: &str,
    name: Option<&str>,
    key_schema: Option<&[sdk::KeySchemaElement]>,
    projection: Option<&sdk::Projection>,
) -> Result<SecondaryIndex, StoreError> {
    let name = name.ok_or_else(|| invalid(table, "secondary index without a name"))?;

    let key_schema = key_schema_from(table, key_schema.unwrap_or_default())?;
    if key_schema.is_empty() {
        return Err(invalid(
            table,
            format!("secondary index '{name}' has an empty key schema"),
        ));
    }

    Ok(SecondaryIndex {
        name: name.to_string(),
        key_schema,
        projection: projection_from(table, name, projection)?,
    })
}

fn projection_from(
    table: &str,
    index: &str,
    projection: Option<&sdk::Projection>,
) -> Result<Projection, StoreError> {
    let projection =
        projection.ok_or_else(|| invalid(table, format!("index '{index}' has no projection")))?;

    let kind = match projection.projection_type.as_ref() {
        Some(sdk::ProjectionType::All) => ProjectionKind::All,
        Some(sdk::ProjectionType::KeysOnly) => ProjectionKind::KeysOnly,
        Some(sdk::ProjectionType::Include) => ProjectionKind::Include,
        Some(other) => {
            return Err(invalid(
                table,
                format!(
                    "unknown projection type '{}' on index '{index}'",
                    other.as_str()
                ),
            ));
        }
        None => {
            return Err(invalid(
                table,
                format!("index '{index}' projection has no type"),
            ));
        }
    };

    Ok(Projection {
        kind,
        non_key_attributes: projection.non_key_attributes.clone().unwrap_or_default(),
    })
}

fn invalid(table: &str, reason: impl Into<String>) -> StoreError {
    StoreError::InvalidDescription {
        table: table.to_string(),
        reason: reason.into(),
    }
}

/// Re-shapes the snapshot into a creation request. Secondary indexes carry
/// exactly name, key schema, and projection; nothing else is set on them.
pub(crate) fn create_request(
    mut request: CreateTableFluentBuilder,
    schema: &TableSchema,
) -> Result<CreateTableFluentBuilder, BuildError> {
    for key in &schema.key_schema {
        request = request.key_schema(key_schema_element(key)?);
    }
    for attribute in &schema.attributes {
        request = request.attribute_definitions(attribute_definition(attribute)?);
    }
    if let Some(mode) = schema.billing_mode {
        request = request.billing_mode(sdk_billing_mode(mode));
    }
    request = request.deletion_protection_enabled(schema.deletion_protection);
    for index in &schema.local_indexes {
        request = request.local_secondary_indexes(local_index(index)?);
    }
    for index in &schema.global_indexes {
        request = request.global_secondary_indexes(global_index(index)?);
    }
    Ok(request)
}

fn key_schema_element(key: &KeyElement) -> Result<sdk::KeySchemaElement, BuildError> {
    sdk::KeySchemaElement::builder()
        .attribute_name(key.name.clone())
        .key_type(match key.role {
            KeyRole::Hash => sdk::KeyType::Hash,
            KeyRole::Range => sdk::KeyType::Range,
        })
        .build()
}

fn attribute_definition(attribute: &AttributeSpec) -> Result<sdk::AttributeDefinition, BuildError> {
    sdk::AttributeDefinition::builder()
        .attribute_name(attribute.name.clone())
        .attribute_type(match attribute.kind {
            AttributeKind::String => sdk::ScalarAttributeType::S,
            AttributeKind::Number => sdk::ScalarAttributeType::N,
            AttributeKind::Binary => sdk::ScalarAttributeType::B,
        })
        .build()
}

fn sdk_billing_mode(mode: BillingMode) -> sdk::BillingMode {
    match mode {
        BillingMode::Provisioned => sdk::BillingMode::Provisioned,
        BillingMode::PayPerRequest => sdk::BillingMode::PayPerRequest,
    }
}

fn sdk_projection(projection: &Projection) -> sdk::Projection {
    let mut builder = sdk::Projection::builder().projection_type(match projection.kind {
        ProjectionKind::All => sdk::ProjectionType::All,
        ProjectionKind::KeysOnly => sdk::ProjectionType::KeysOnly,
        ProjectionKind::Include => sdk::ProjectionType::Include,
    });
    if !projection.non_key_attributes.is_empty() {
        builder = builder.set_non_key_attributes(Some(projection.non_key_attributes.clone()));
    }
    builder.build()
}

pub(crate) fn local_index(index: &SecondaryIndex) -> Result<sdk::LocalSecondaryIndex, BuildError> {
    let mut builder = sdk::LocalSecondaryIndex::builder().index_name(index.name.clone());
    for key in &index.key_schema {
        builder = builder.key_schema(key_schema_element(key)?);
    }
    builder.projection(sdk_projection(&index.projection)).build()
}

pub(crate) fn global_index(
    index: &SecondaryIndex,
) -> Result<sdk::GlobalSecondaryIndex, BuildError> {
    let mut builder = sdk::GlobalSecondaryIndex::builder().index_name(index.name.clone());
    for key in &index.key_schema {
        builder = builder.key_schema(key_schema_element(key)?);
    }
    builder.projection(sdk_projection(&index.projection)).build()
}

pub(crate) fn put_requests(items: Vec<Item>) -> Result<Vec<sdk::WriteRequest>, BuildError> {
    items
        .into_iter()
        .map(|item| {
            let put = sdk::PutRequest::builder().set_item(Some(item)).build()?;
            Ok(sdk::WriteRequest::builder().put_request(put).build())
        })
        .collect()
}

/// Pulls the unprocessed put items for `table` out of a bulk-write response,
/// preserving the order the store reported them in.
pub(crate) fn unprocessed_for(
    table: &str,
    unprocessed: Option<HashMap<String, Vec<sdk::WriteRequest>>>,
) -> Vec<Item> {
    unprocessed
        .and_then(|mut by_table| by_table.remove(table))
        .unwrap_or_default()
        .into_iter()
        .filter_map(|request| request.put_request.map(|put| put.item))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_dynamodb::types::AttributeValue;

    fn key_element(name: &str, key_type: sdk::KeyType) -> sdk::KeySchemaElement {
        sdk::KeySchemaElement::builder()
            .attribute_name(name)
            .key_type(key_type)
            .build()
            .unwrap()
    }

    fn attribute(name: &str, kind: sdk::ScalarAttributeType) -> sdk::AttributeDefinition {
        sdk::AttributeDefinition::builder()
            .attribute_name(name)
            .attribute_type(kind)
            .build()
            .unwrap()
    }

    fn described_table() -> sdk::TableDescription {
        sdk::TableDescription::builder()
            .table_status(sdk::TableStatus::Active)
            .key_schema(key_element("pk", sdk::KeyType::Hash))
            .key_schema(key_element("sk", sdk::KeyType::Range))
            .attribute_definitions(attribute("pk", sdk::ScalarAttributeType::S))
            .attribute_definitions(attribute("sk", sdk::ScalarAttributeType::N))
            .billing_mode_summary(
                sdk::BillingModeSummary::builder()
                    .billing_mode(sdk::BillingMode::PayPerRequest)
                    .build(),
            )
            .deletion_protection_enabled(true)
            .build()
    }

    fn item(id: &str) -> Item {
        HashMap::from([("pk".to_string(), AttributeValue::S(id.to_string()))])
    }

    #[test]
    fn reads_the_reduced_schema_from_a_description() {
        let descriptor = descriptor_from("orders", &described_table()).unwrap();

        assert_eq!(descriptor.status, TableStatus::Active);
        assert_eq!(descriptor.schema.hash_key(), Some("pk"));
        assert_eq!(descriptor.schema.range_key(), Some("sk"));
        assert_eq!(
            descriptor.schema.billing_mode,
            Some(BillingMode::PayPerRequest)
        );
        assert!(descriptor.schema.deletion_protection);
        assert_eq!(descriptor.schema.attributes.len(), 2);
    }

    #[test]
    fn missing_billing_summary_leaves_billing_mode_unset() {
        let description = sdk::TableDescription::builder()
            .table_status(sdk::TableStatus::Active)
            .key_schema(key_element("pk", sdk::KeyType::Hash))
            .attribute_definitions(attribute("pk", sdk::ScalarAttributeType::S))
            .build();

        let schema = schema_from("orders", &description).unwrap();
        assert_eq!(schema.billing_mode, None);
    }

    #[test]
    fn rejects_a_description_without_key_schema() {
        let description = sdk::TableDescription::builder()
            .table_status(sdk::TableStatus::Active)
            .attribute_definitions(attribute("pk", sdk::ScalarAttributeType::S))
            .build();

        let err = schema_from("orders", &description).unwrap_err();
        assert!(matches!(err, StoreError::InvalidDescription { .. }));
    }

    #[test]
    fn described_indexes_reduce_to_name_keys_and_projection() {
        let description = sdk::TableDescription::builder()
            .table_status(sdk::TableStatus::Active)
            .key_schema(key_element("pk", sdk::KeyType::Hash))
            .attribute_definitions(attribute("pk", sdk::ScalarAttributeType::S))
            .global_secondary_indexes(
                sdk::GlobalSecondaryIndexDescription::builder()
                    .index_name("by-owner")
                    .key_schema(key_element("owner", sdk::KeyType::Hash))
                    .projection(
                        sdk::Projection::builder()
                            .projection_type(sdk::ProjectionType::Include)
                            .non_key_attributes("created_at")
                            .build(),
                    )
                    // capacity and size details must not survive the reduction
                    .provisioned_throughput(
                        sdk::ProvisionedThroughputDescription::builder()
                            .read_capacity_units(5)
                            .write_capacity_units(5)
                            .build(),
                    )
                    .index_size_bytes(4096)
                    .item_count(17)
                    .index_status(sdk::IndexStatus::Active)
                    .build(),
            )
            .build();

        let schema = schema_from("orders", &description).unwrap();
        assert_eq!(schema.global_indexes.len(), 1);

        let index = &schema.global_indexes[0];
        assert_eq!(index.name, "by-owner");
        assert_eq!(index.key_schema, vec![KeyElement::new("owner", KeyRole::Hash)]);
        assert_eq!(index.projection.kind, ProjectionKind::Include);
        assert_eq!(index.projection.non_key_attributes, vec!["created_at"]);
    }

    #[test]
    fn outbound_indexes_carry_no_throughput() {
        let index = SecondaryIndex {
            name: "by-owner".to_string(),
            key_schema: vec![KeyElement::new("owner", KeyRole::Hash)],
            projection: Projection::all(),
        };

        let gsi = global_index(&index).unwrap();
        assert_eq!(gsi.index_name, "by-owner");
        assert!(gsi.provisioned_throughput.is_none());
        assert!(gsi.on_demand_throughput.is_none());

        let lsi = local_index(&index).unwrap();
        assert_eq!(lsi.index_name, "by-owner");
        assert_eq!(lsi.key_schema.len(), 1);
    }

    #[test]
    fn keys_only_projection_omits_non_key_attributes() {
        let projection = sdk_projection(&Projection {
            kind: ProjectionKind::KeysOnly,
            non_key_attributes: vec![],
        });
        assert_eq!(
            projection.projection_type,
            Some(sdk::ProjectionType::KeysOnly)
        );
        assert!(projection.non_key_attributes.is_none());
    }

    #[test]
    fn put_requests_preserve_item_order() {
        let items = vec![item("a"), item("b"), item("c")];
        let requests = put_requests(items).unwrap();

        let ids: Vec<_> = requests
            .iter()
            .map(|request| {
                request
                    .put_request
                    .as_ref()
                    .unwrap()
                    .item
                    .get("pk")
                    .unwrap()
                    .as_s()
                    .unwrap()
                    .clone()
            })
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn unprocessed_extraction_is_scoped_to_the_table() {
        let leftover = |id: &str| {
            sdk::WriteRequest::builder()
                .put_request(
                    sdk::PutRequest::builder()
                        .set_item(Some(item(id)))
                        .build()
                        .unwrap(),
                )
                .build()
        };
        let by_table = HashMap::from([
            ("orders".to_string(), vec![leftover("x"), leftover("y")]),
            ("other".to_string(), vec![leftover("z")]),
        ]);

        let unprocessed = unprocessed_for("orders", Some(by_table));
        let ids: Vec<_> = unprocessed
            .iter()
            .map(|item| item.get("pk").unwrap().as_s().unwrap().clone())
            .collect();
        assert_eq!(ids, vec!["x", "y"]);

        assert!(unprocessed_for("orders", None).is_empty());
    }
}
