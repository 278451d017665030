use clap::{Args, Subcommand};

#[derive(Subcommand)]
pub enum Commands {
    /// Clone a table: copy the schema if needed, then copy all items
    Clone {
        #[arg(long, help = "Name of the table to clone")]
        table: String,

        #[command(flatten)]
        source: SourceConnArgs,

        #[command(flatten)]
        destination: DestConnArgs,

        #[arg(
            long,
            help = "Create the destination table from the source schema when it is missing"
        )]
        create_if_not_exist: bool,

        #[command(flatten)]
        tuning: TuningArgs,

        #[arg(long, help = "Print the summary as JSON instead of a table")]
        json: bool,
    },
    /// Copy only the table schema to the destination
    Schema {
        #[arg(long, help = "Name of the table to clone")]
        table: String,

        #[command(flatten)]
        source: SourceConnArgs,

        #[command(flatten)]
        destination: DestConnArgs,
    },
    /// Copy only the table items; the destination table must already be usable
    Items {
        #[arg(long, help = "Name of the table to clone")]
        table: String,

        #[command(flatten)]
        source: SourceConnArgs,

        #[command(flatten)]
        destination: DestConnArgs,

        #[command(flatten)]
        tuning: TuningArgs,

        #[arg(long, help = "Print the summary as JSON instead of a table")]
        json: bool,
    },
    /// Describe a table on one endpoint and print its reduced schema
    Probe {
        #[arg(long, help = "Name of the table to describe")]
        table: String,

        #[command(flatten)]
        conn: ConnArgs,

        #[arg(
            long,
            help = "If specified, writes the schema JSON to this file instead of stdout"
        )]
        output: Option<String>,
    },
    /// Test connectivity against one endpoint
    TestConn {
        #[command(flatten)]
        conn: ConnArgs,
    },
}

/// Source-side connection overrides; unset values fall back to the ambient
/// AWS configuration.
#[derive(Args, Debug)]
pub struct SourceConnArgs {
    #[arg(long, help = "Source endpoint URL, e.g. a local emulator")]
    pub source_endpoint: Option<String>,

    #[arg(long, help = "Source AWS region")]
    pub source_region: Option<String>,

    #[arg(long, help = "Source credentials profile")]
    pub source_profile: Option<String>,
}

/// Destination-side connection overrides.
#[derive(Args, Debug)]
pub struct DestConnArgs {
    #[arg(long, help = "Destination endpoint URL, e.g. a local emulator")]
    pub dest_endpoint: Option<String>,

    #[arg(long, help = "Destination AWS region")]
    pub dest_region: Option<String>,

    #[arg(long, help = "Destination credentials profile")]
    pub dest_profile: Option<String>,
}

/// Single-endpoint connection overrides for probe/test commands.
#[derive(Args, Debug)]
pub struct ConnArgs {
    #[arg(long, help = "Endpoint URL, e.g. a local emulator")]
    pub endpoint: Option<String>,

    #[arg(long, help = "AWS region")]
    pub region: Option<String>,

    #[arg(long, help = "Credentials profile")]
    pub profile: Option<String>,
}

#[derive(Args, Debug)]
pub struct TuningArgs {
    #[arg(long, help = "Items per bulk-write call (1-25, default 24)")]
    pub chunk_size: Option<usize>,

    #[arg(
        long,
        help = "Total write attempts per item, first pass included; 1 disables retries"
    )]
    pub retry_attempts: Option<usize>,
}
