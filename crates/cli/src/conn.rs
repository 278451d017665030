use crate::{
    commands::{ConnArgs, DestConnArgs, SourceConnArgs},
    error::CliError,
};
use async_trait::async_trait;
use connectors::dynamo::{ConnectionSettings, DynamoStore};
use connectors::store::TableStore;
use std::sync::Arc;
use tracing::info;

impl SourceConnArgs {
    pub fn settings(&self) -> ConnectionSettings {
        ConnectionSettings {
            endpoint: self.source_endpoint.clone(),
            region: self.source_region.clone(),
            profile: self.source_profile.clone(),
        }
    }
}

impl DestConnArgs {
    pub fn settings(&self) -> ConnectionSettings {
        ConnectionSettings {
            endpoint: self.dest_endpoint.clone(),
            region: self.dest_region.clone(),
            profile: self.dest_profile.clone(),
        }
    }
}

impl ConnArgs {
    pub fn settings(&self) -> ConnectionSettings {
        ConnectionSettings {
            endpoint: self.endpoint.clone(),
            region: self.region.clone(),
            profile: self.profile.clone(),
        }
    }
}

/// Builds the independent source and destination store handles.
pub async fn connect_pair(
    source: &SourceConnArgs,
    destination: &DestConnArgs,
) -> (Arc<dyn TableStore>, Arc<dyn TableStore>) {
    let source = DynamoStore::connect(&source.settings()).await;
    let destination = DynamoStore::connect(&destination.settings()).await;
    (Arc::new(source), Arc::new(destination))
}

/// Trait for "pinging" a store endpoint
#[async_trait]
pub trait ConnectionPinger {
    /// Attempts to ping; returns Err if unreachable
    async fn ping(&self) -> Result<(), CliError>;
}

pub struct DynamoConnectionPinger {
    pub settings: ConnectionSettings,
}

#[async_trait]
impl ConnectionPinger for DynamoConnectionPinger {
    async fn ping(&self) -> Result<(), CliError> {
        let endpoint = self
            .settings
            .endpoint
            .as_deref()
            .unwrap_or("the ambient AWS endpoint");
        info!("Pinging DynamoDB at '{}'", endpoint);

        let store = DynamoStore::connect(&self.settings).await;
        store.ping().await?;

        info!("Ping to '{}' succeeded", endpoint);
        Ok(())
    }
}
