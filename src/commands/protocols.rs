//! Protocols command: compose, flag, share and group the protocols table.

use super::models::{toggles_from_args, ProtocolsArgs, ProtocolsInput};
use crate::compose::format_protocols_list;
use crate::output::{read_json, write_report};
use crate::schema::Report;
use anyhow::{Context, Result};
use log::{debug, info};
use std::time::Instant;

/// Execute the protocols command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Input file missing or not a protocols bundle
/// * Report write errors
pub fn execute_protocols(args: ProtocolsArgs) -> Result<()> {
    let start_time = Instant::now();

    info!("Step 1/3: Reading protocols from {}", args.input.display());
    let input: ProtocolsInput = read_json(&args.input)
        .with_context(|| format!("Failed to read protocols bundle {}", args.input.display()))?;

    debug!(
        "Loaded {} protocols and {} parent protocols",
        input.protocols.len(),
        input.parent_protocols.len()
    );

    info!("Step 2/3: Formatting protocols table...");
    let toggles = toggles_from_args(&args.toggles);
    let rows = format_protocols_list(
        &input.protocols,
        &input.parent_protocols,
        &toggles,
        args.no_subrows,
    );

    info!("Step 3/3: Writing {} rows...", rows.len());
    write_report(&Report::new(rows), &args.output).context("Failed to write protocols report")?;

    info!("✓ Report written to: {}", args.output.display());
    info!("Protocols completed in {:.2}s", start_time.elapsed().as_secs_f64());

    Ok(())
}
