//! Chains command: roll configured children up into parent entities.

use super::models::{ChainsArgs, EntityKindArg};
use crate::grouping::{group_entities, load_grouping_config, ChainKind, PeggedKind};
use crate::output::{read_json, write_report};
use crate::schema::{Entity, Report};
use anyhow::{Context, Result};
use log::{debug, info};
use std::time::Instant;

/// Execute the chains command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Input or config file missing or malformed
/// * Report write errors
pub fn execute_chains(args: ChainsArgs) -> Result<()> {
    let start_time = Instant::now();

    info!("Step 1/4: Reading entities from {}", args.input.display());
    let entities: Vec<Entity> = read_json(&args.input)
        .with_context(|| format!("Failed to read entities {}", args.input.display()))?;

    info!("Step 2/4: Loading grouping config from {}", args.config.display());
    let config = load_grouping_config(&args.config)
        .with_context(|| format!("Failed to load grouping config {}", args.config.display()))?;

    debug!(
        "{} relations, enabled group types: {:?}",
        config.relations.len(),
        config.enabled_group_types
    );

    info!("Step 3/4: Grouping {} entities...", entities.len());
    let rows = match args.kind {
        EntityKindArg::Chain => {
            group_entities::<ChainKind>(&entities, &config.relations, &config.enabled_group_types)
        }
        EntityKindArg::Pegged => {
            group_entities::<PeggedKind>(&entities, &config.relations, &config.enabled_group_types)
        }
    };

    info!("Step 4/4: Writing {} rows...", rows.len());
    write_report(&Report::new(rows), &args.output).context("Failed to write chains report")?;

    info!("✓ Report written to: {}", args.output.display());
    info!("Chains completed in {:.2}s", start_time.elapsed().as_secs_f64());

    Ok(())
}
