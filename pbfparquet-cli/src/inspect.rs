//! Inspect command: row counts and relation geometry types of a result.

use std::collections::BTreeMap;
use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use pbfparquet_core::{FeatureKind, FeatureTable, GeometryKind};
use pbfparquet_data::read_geoparquet;
use serde::{Deserialize, Serialize};

use crate::convert::require_existing;
use crate::{ARG_PARQUET_FILE, CliError, ENV_PARQUET_FILE};

/// CLI arguments for the `inspect` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(about = "Print feature counts of a GeoParquet result")]
#[ortho_config(prefix = "PBFPARQUET")]
pub(crate) struct InspectArgs {
    /// Path to a GeoParquet file written by `convert`.
    #[arg(value_name = "parquet_file")]
    #[serde(default)]
    pub(crate) parquet_file: Option<Utf8PathBuf>,
}

/// Counts printed by `inspect`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TableSummary {
    pub(crate) features: usize,
    pub(crate) relations: usize,
    pub(crate) relation_geometries: BTreeMap<GeometryKind, usize>,
}

impl TableSummary {
    pub(crate) fn of(table: &FeatureTable) -> Self {
        Self {
            features: table.len(),
            relations: table.of_kind(FeatureKind::Relation).count(),
            relation_geometries: table.geometry_kind_counts(FeatureKind::Relation),
        }
    }

    fn write_to(&self, writer: &mut dyn Write) -> std::io::Result<()> {
        writeln!(writer, "Total features: {}", self.features)?;
        writeln!(writer, "Total relations: {}", self.relations)?;
        writeln!(writer, "Relation geometry types:")?;
        for (kind, count) in &self.relation_geometries {
            writeln!(writer, "  {kind}: {count}")?;
        }
        Ok(())
    }
}

pub(crate) fn run_inspect(args: InspectArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let path = merged.parquet_file.ok_or(CliError::MissingArgument {
        field: ARG_PARQUET_FILE,
        env: ENV_PARQUET_FILE,
    })?;
    require_existing(&path, ARG_PARQUET_FILE)?;
    let table = read_geoparquet(&path).map_err(|source| CliError::ReadGeoParquet {
        path: path.clone(),
        source,
    })?;
    TableSummary::of(&table)
        .write_to(writer)
        .map_err(CliError::WriteOutput)
}
