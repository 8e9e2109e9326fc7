//! Argument and input-bundle types shared by the commands.

use crate::compose::SeriesComposition;
use crate::schema::{BridgeInfo, ParentSpec, PeggedAssetWithBridges, ProtocolRow, ToggleSet};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

/// Arguments for the protocols command
#[derive(Debug, Clone)]
pub struct ProtocolsArgs {
    /// Input bundle with protocols and parent protocols
    pub input: PathBuf,

    /// Extra TVL categories to switch on
    pub toggles: Vec<String>,

    /// Keep grouped children flat and add parents as summary rows
    pub no_subrows: bool,

    /// Output path for the JSON report
    pub output: PathBuf,
}

/// Arguments for the chains command
#[derive(Debug, Clone)]
pub struct ChainsArgs {
    /// JSON array of flat entity rows
    pub input: PathBuf,

    /// TOML grouping configuration
    pub config: PathBuf,

    pub kind: EntityKindArg,

    pub output: PathBuf,
}

/// Arguments for the series command
#[derive(Debug, Clone)]
pub struct SeriesArgs {
    /// JSON array of `[date, { name: snapshot }]` points
    pub input: PathBuf,

    /// Scalar field to compose
    pub field: String,

    pub toggles: Vec<String>,

    pub output: PathBuf,
}

/// Arguments for the bridges command
#[derive(Debug, Clone)]
pub struct BridgesArgs {
    /// Input bundle with assets and bridge info
    pub input: PathBuf,

    pub output: PathBuf,
}

/// Which entity rows the chains command groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum EntityKindArg {
    /// Chains, ranked by TVL
    #[default]
    Chain,
    /// Pegged assets per chain, ranked by market cap
    Pegged,
}

/// Input of the protocols command
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProtocolsInput {
    #[serde(default)]
    pub protocols: Vec<ProtocolRow>,

    #[serde(rename = "parentProtocols", default)]
    pub parent_protocols: Vec<ParentSpec>,
}

/// Input of the bridges command
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BridgesInput {
    #[serde(default)]
    pub assets: Vec<PeggedAssetWithBridges>,

    #[serde(rename = "bridgeInfo", default)]
    pub bridge_info: HashMap<String, BridgeInfo>,
}

/// Output rows of the series command
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeriesOutput {
    pub field: String,

    #[serde(flatten)]
    pub composition: SeriesComposition,

    pub dominance: BTreeMap<i64, BTreeMap<String, f64>>,
}

/// Build a toggle set from repeated `--toggle` flags
pub fn toggles_from_args(names: &[String]) -> ToggleSet {
    ToggleSet::from_enabled(names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()))
}
