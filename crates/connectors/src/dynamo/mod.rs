pub mod convert;

use crate::{
    error::StoreError,
    store::{Item, TableStore},
};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::Client;
use model::{probe::TableProbe, schema::TableSchema};
use tracing::debug;

/// Connection overrides for one store endpoint. Anything left `None` falls
/// back to the ambient AWS configuration (environment, shared config files,
/// instance metadata).
#[derive(Debug, Clone, Default)]
pub struct ConnectionSettings {
    /// Endpoint URL override, e.g. a local emulator.
    pub endpoint: Option<String>,
    pub region: Option<String>,
    /// Named credentials profile.
    pub profile: Option<String>,
}

/// DynamoDB-backed implementation of [`TableStore`]. Source and destination
/// sides of a clone each hold their own instance.
#[derive(Debug, Clone)]
pub struct DynamoStore {
    client: Client,
}

impl DynamoStore {
    /// Builds a client from the ambient AWS configuration plus the given
    /// overrides.
    pub async fn connect(settings: &ConnectionSettings) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(profile) = &settings.profile {
            loader = loader.profile_name(profile);
        }
        if let Some(region) = &settings.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }
        let sdk_config = loader.load().await;

        let mut builder = aws_sdk_dynamodb::config::Builder::from(&sdk_config);
        if let Some(endpoint) = &settings.endpoint {
            builder = builder.endpoint_url(endpoint);
        }

        DynamoStore {
            client: Client::from_conf(builder.build()),
        }
    }

    /// Wraps a pre-built client (used by tests and embedders).
    pub fn from_client(client: Client) -> Self {
        DynamoStore { client }
    }

    /// Cheap connectivity check against the endpoint.
    pub async fn ping(&self) -> Result<(), StoreError> {
        self.client
            .list_tables()
            .limit(1)
            .send()
            .await
            .map_err(|err| StoreError::ListTables {
                source: Box::new(err),
            })?;
        Ok(())
    }
}

#[async_trait]
impl TableStore for DynamoStore {
    async fn probe(&self, table: &str) -> Result<TableProbe, StoreError> {
        match self.client.describe_table().table_name(table).send().await {
            Ok(output) => {
                let description =
                    output
                        .table
                        .as_ref()
                        .ok_or_else(|| StoreError::InvalidDescription {
                            table: table.to_string(),
                            reason: "response carried no table description".to_string(),
                        })?;
                let descriptor = convert::descriptor_from(table, description)?;
                Ok(TableProbe::Found(descriptor))
            }
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|service| service.is_resource_not_found_exception()) =>
            {
                debug!(table, "Probe found no table");
                Ok(TableProbe::Missing)
            }
            Err(err) => Err(StoreError::Describe {
                table: table.to_string(),
                source: Box::new(err),
            }),
        }
    }

    async fn create_table(&self, table: &str, schema: &TableSchema) -> Result<(), StoreError> {
        let request = self.client.create_table().table_name(table);
        let request =
            convert::create_request(request, schema).map_err(|err| StoreError::Create {
                table: table.to_string(),
                source: Box::new(err),
            })?;

        request.send().await.map_err(|err| StoreError::Create {
            table: table.to_string(),
            source: Box::new(err),
        })?;
        Ok(())
    }

    async fn scan(&self, table: &str) -> Result<Vec<Item>, StoreError> {
        let mut items: Vec<Item> = Vec::new();
        let mut start_key: Option<Item> = None;

        loop {
            let mut request = self.client.scan().table_name(table);
            if start_key.is_some() {
                request = request.set_exclusive_start_key(start_key.take());
            }

            let page = request.send().await.map_err(|err| StoreError::Scan {
                table: table.to_string(),
                source: Box::new(err),
            })?;

            items.extend(page.items.unwrap_or_default());

            start_key = continuation(page.last_evaluated_key);
            if start_key.is_none() {
                break;
            }
        }

        debug!(table, count = items.len(), "Scan complete");
        Ok(items)
    }

    async fn write_batch(&self, table: &str, items: Vec<Item>) -> Result<Vec<Item>, StoreError> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let requests = convert::put_requests(items).map_err(|err| StoreError::BatchWrite {
            table: table.to_string(),
            source: Box::new(err),
        })?;

        let output = self
            .client
            .batch_write_item()
            .request_items(table, requests)
            .send()
            .await
            .map_err(|err| StoreError::BatchWrite {
                table: table.to_string(),
                source: Box::new(err),
            })?;

        Ok(convert::unprocessed_for(table, output.unprocessed_items))
    }
}

/// A scan is exhausted when the store returns no continuation key; an empty
/// key map means the same thing.
fn continuation(last_evaluated_key: Option<Item>) -> Option<Item> {
    last_evaluated_key.filter(|key| !key.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_dynamodb::types::AttributeValue;
    use std::collections::HashMap;

    #[test]
    fn scan_stops_without_a_continuation_key() {
        assert_eq!(continuation(None), None);
        assert_eq!(continuation(Some(HashMap::new())), None);
    }

    #[test]
    fn scan_continues_from_a_non_empty_key() {
        let key: Item =
            HashMap::from([("pk".to_string(), AttributeValue::S("last".to_string()))]);
        assert_eq!(continuation(Some(key.clone())), Some(key));
    }
}
