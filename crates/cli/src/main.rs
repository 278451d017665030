use crate::{
    commands::{Commands, TuningArgs},
    conn::{ConnectionPinger, DynamoConnectionPinger, connect_pair},
    error::CliError,
    output::ConsoleSink,
};
use clap::Parser;
use connectors::{
    dynamo::DynamoStore,
    store::TableStore,
};
use engine_core::{
    clone::{CloneEngine, CloneOptions},
    settings::{CloneSettings, MAX_CHUNK_SIZE},
};
use model::probe::TableProbe;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod commands;
mod conn;
mod error;
mod output;

#[derive(Parser)]
#[command(name = "dynocopy", version = "0.0.1", about = "DynamoDB table clone tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    // Initialize logger; progress itself goes to stdout, so default to warn
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Clone {
            table,
            source,
            destination,
            create_if_not_exist,
            tuning,
            json,
        } => {
            let settings = clone_settings(&tuning)?;
            let (source, destination) = connect_pair(&source, &destination).await;
            let engine = build_engine(table, source, destination, settings);

            let outcome = engine
                .clone(CloneOptions {
                    create_if_missing: create_if_not_exist,
                })
                .await?;
            output::print_clone_outcome(&outcome, json)?;

            if !outcome.succeeded() {
                return Err(CliError::Incomplete);
            }
        }
        Commands::Schema {
            table,
            source,
            destination,
        } => {
            let (source, destination) = connect_pair(&source, &destination).await;
            let engine = build_engine(table, source, destination, CloneSettings::default());

            let report = engine.copy_schema().await?;
            output::print_schema_report(&report);

            if !report.active {
                return Err(CliError::Incomplete);
            }
        }
        Commands::Items {
            table,
            source,
            destination,
            tuning,
            json,
        } => {
            let settings = clone_settings(&tuning)?;
            let (source, destination) = connect_pair(&source, &destination).await;
            let engine = build_engine(table, source, destination, settings);

            let report = engine.copy_items().await?;
            output::print_copy_report(&report, json)?;

            if !report.succeeded() {
                return Err(CliError::Incomplete);
            }
        }
        Commands::Probe {
            table,
            conn,
            output: output_file,
        } => {
            let store = DynamoStore::connect(&conn.settings()).await;
            match store.probe(&table).await? {
                TableProbe::Found(descriptor) => {
                    output::write_descriptor(&descriptor, output_file).await?;
                }
                TableProbe::Missing => return Err(CliError::TableNotFound(table)),
            }
        }
        Commands::TestConn { conn } => {
            DynamoConnectionPinger {
                settings: conn.settings(),
            }
            .ping()
            .await?;
            println!("Connection OK");
        }
    }

    Ok(())
}

fn build_engine(
    table: String,
    source: Arc<dyn TableStore>,
    destination: Arc<dyn TableStore>,
    settings: CloneSettings,
) -> CloneEngine {
    CloneEngine::new(table, source, destination, Arc::new(ConsoleSink), settings)
}

fn clone_settings(tuning: &TuningArgs) -> Result<CloneSettings, CliError> {
    let mut settings = CloneSettings::default();

    if let Some(size) = tuning.chunk_size {
        if size == 0 || size > MAX_CHUNK_SIZE {
            return Err(CliError::InvalidChunkSize(size));
        }
        settings.chunk_size = size;
    }
    if let Some(attempts) = tuning.retry_attempts {
        settings.write_retry.max_attempts = attempts.max(1);
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuning(chunk_size: Option<usize>, retry_attempts: Option<usize>) -> TuningArgs {
        TuningArgs {
            chunk_size,
            retry_attempts,
        }
    }

    #[test]
    fn default_settings_apply_without_overrides() {
        let settings = clone_settings(&tuning(None, None)).unwrap();
        assert_eq!(settings.chunk_size, 24);
        assert_eq!(settings.write_retry.max_attempts, 3);
    }

    #[test]
    fn chunk_size_is_bounded_by_the_store_ceiling() {
        assert!(clone_settings(&tuning(Some(0), None)).is_err());
        assert!(clone_settings(&tuning(Some(26), None)).is_err());
        assert_eq!(
            clone_settings(&tuning(Some(25), None)).unwrap().chunk_size,
            25
        );
    }

    #[test]
    fn zero_retry_attempts_still_write_once() {
        let settings = clone_settings(&tuning(None, Some(0))).unwrap();
        assert_eq!(settings.write_retry.max_attempts, 1);
    }
}
