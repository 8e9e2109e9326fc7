//! Bridges command: attribute pegged assets to their bridge sources.

use super::models::{BridgesArgs, BridgesInput};
use crate::attribution::attribute_bridges;
use crate::output::{read_json, write_report};
use crate::schema::Report;
use anyhow::{Context, Result};
use log::{debug, info};
use std::time::Instant;

/// Execute the bridges command
///
/// **Public** - main entry point called from main.rs
pub fn execute_bridges(args: BridgesArgs) -> Result<()> {
    let start_time = Instant::now();

    info!("Step 1/3: Reading assets from {}", args.input.display());
    let input: BridgesInput = read_json(&args.input)
        .with_context(|| format!("Failed to read bridges bundle {}", args.input.display()))?;

    debug!("{} known bridges", input.bridge_info.len());

    info!("Step 2/3: Attributing {} assets...", input.assets.len());
    let rows = attribute_bridges(&input.assets, &input.bridge_info);

    info!("Step 3/3: Writing {} rows...", rows.len());
    write_report(&Report::new(rows), &args.output).context("Failed to write bridges report")?;

    info!("✓ Report written to: {}", args.output.display());
    info!("Bridges completed in {:.2}s", start_time.elapsed().as_secs_f64());

    Ok(())
}
