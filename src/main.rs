//! Metrics Aggregator CLI
//!
//! Composes extra metrics and groups dashboard rows from JSON input bundles.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use metrics_aggregator::commands::{
    display_version, execute_bridges, execute_chains, execute_protocols, execute_series,
    BridgesArgs, ChainsArgs, EntityKindArg, ProtocolsArgs, SeriesArgs,
};

/// Metrics Aggregator - composition and grouping for dashboard tables
#[derive(Parser, Debug)]
#[command(name = "metrics-aggregator")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Format the protocols table
    Protocols {
        /// Input bundle: { "protocols": [...], "parentProtocols": [...] }
        #[arg(short, long)]
        input: PathBuf,

        /// Extra TVL category to switch on (repeatable)
        #[arg(short, long = "toggle")]
        toggles: Vec<String>,

        /// Keep grouped children flat and add parents as summary rows
        #[arg(long)]
        no_subrows: bool,

        /// Output path for JSON report
        #[arg(short, long, default_value = "protocols.json")]
        output: PathBuf,
    },

    /// Group chains or pegged assets under configured parents
    Chains {
        /// JSON array of entity rows
        #[arg(short, long)]
        input: PathBuf,

        /// TOML grouping configuration
        #[arg(short, long, env = "METRICS_GROUPING_CONFIG")]
        config: PathBuf,

        /// Kind of entity rows
        #[arg(short, long, value_enum, default_value_t = EntityKindArg::Chain)]
        kind: EntityKindArg,

        /// Output path for JSON report
        #[arg(short, long, default_value = "chains.json")]
        output: PathBuf,
    },

    /// Compose a chart series with daily totals and dominance
    Series {
        /// JSON array of [date, { name: snapshot }] points
        #[arg(short, long)]
        input: PathBuf,

        /// Field to compose
        #[arg(short, long, default_value = "tvl")]
        field: String,

        /// Extra category to switch on (repeatable)
        #[arg(short, long = "toggle")]
        toggles: Vec<String>,

        /// Output path for JSON report
        #[arg(short, long, default_value = "series.json")]
        output: PathBuf,
    },

    /// Attribute pegged assets to their bridge sources
    Bridges {
        /// Input bundle: { "assets": [...], "bridgeInfo": { id: { name } } }
        #[arg(short, long)]
        input: PathBuf,

        /// Output path for JSON report
        #[arg(short, long, default_value = "bridges.json")]
        output: PathBuf,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Protocols {
            input,
            toggles,
            no_subrows,
            output,
        } => execute_protocols(ProtocolsArgs {
            input,
            toggles,
            no_subrows,
            output,
        })?,

        Commands::Chains {
            input,
            config,
            kind,
            output,
        } => execute_chains(ChainsArgs {
            input,
            config,
            kind,
            output,
        })?,

        Commands::Series {
            input,
            field,
            toggles,
            output,
        } => execute_series(SeriesArgs {
            input,
            field,
            toggles,
            output,
        })?,

        Commands::Bridges { input, output } => execute_bridges(BridgesArgs { input, output })?,

        Commands::Version => display_version(),
    }

    Ok(())
}
