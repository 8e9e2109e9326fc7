//! Series command: compose a chart series and its dominance shares.

use super::models::{toggles_from_args, SeriesArgs, SeriesOutput};
use crate::compose::{compose_series, SeriesPoint};
use crate::output::{read_json, write_report};
use crate::schema::Report;
use anyhow::{Context, Result};
use log::info;
use std::time::Instant;

/// Execute the series command
///
/// **Public** - main entry point called from main.rs
pub fn execute_series(args: SeriesArgs) -> Result<()> {
    let start_time = Instant::now();

    info!("Step 1/3: Reading series from {}", args.input.display());
    let series: Vec<SeriesPoint> = read_json(&args.input)
        .with_context(|| format!("Failed to read series {}", args.input.display()))?;

    info!("Step 2/3: Composing '{}' across {} dates...", args.field, series.len());
    let toggles = toggles_from_args(&args.toggles);
    let composition = compose_series(&series, &args.field, &toggles);
    let dominance = composition.dominance();

    let output = SeriesOutput {
        field: args.field,
        composition,
        dominance,
    };

    info!("Step 3/3: Writing series report...");
    write_report(&Report::new(output), &args.output).context("Failed to write series report")?;

    info!("✓ Report written to: {}", args.output.display());
    info!("Series completed in {:.2}s", start_time.elapsed().as_secs_f64());

    Ok(())
}
