//! Convert command implementation for the pbfparquet CLI.

use camino::{Utf8Path, Utf8PathBuf};
use clap::{ArgAction, Parser};
use log::debug;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use pbfparquet_core::{ConversionOptions, VerbosityMode};
use pbfparquet_data::PbfFileReader;
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::{ARG_PBF_FILE, CliError, DEFAULT_OUTPUT_DIR, ENV_PBF_FILE};

/// CLI arguments for the `convert` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Convert an OpenStreetMap PBF file into a GeoParquet file with \
                 one row per tagged node, way and relation. Relation handling \
                 can come from CLI flags, configuration files, or environment \
                 variables.",
    about = "Convert a PBF file into GeoParquet"
)]
#[ortho_config(prefix = "PBFPARQUET")]
pub(crate) struct ConvertArgs {
    /// Path to the OpenStreetMap PBF file.
    #[arg(value_name = "pbf_file")]
    #[serde(default)]
    pub(crate) pbf_file: Option<Utf8PathBuf>,
    /// Directory receiving the result (defaults to `files_all_relations`).
    #[arg(value_name = "output_dir")]
    #[serde(default)]
    pub(crate) output_dir: Option<Utf8PathBuf>,
    /// Include every relation type and line-shaped relation geometries.
    #[arg(long, value_name = "bool")]
    #[serde(default)]
    pub(crate) include_non_closed_relations: Option<bool>,
    /// Emit relations whose only members are nodes as points.
    #[arg(long, value_name = "bool")]
    #[serde(default)]
    pub(crate) include_node_only_relations: Option<bool>,
    /// Convert again even when a cached result exists.
    #[arg(long, action = ArgAction::SetTrue)]
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub(crate) ignore_cache: bool,
    /// Progress output: silent, transient or verbose.
    #[arg(long, value_name = "mode")]
    #[serde(default)]
    pub(crate) verbosity: Option<VerbosityMode>,
    /// Keep the temporary directory and write `stats.json` into it.
    #[arg(long, action = ArgAction::SetTrue)]
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub(crate) debug_memory: bool,
    /// Log how long each pipeline stage took.
    #[arg(long, action = ArgAction::SetTrue)]
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub(crate) debug_times: bool,
}

impl ConvertArgs {
    pub(crate) fn into_config(self) -> Result<ConvertConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ConvertConfig::try_from(merged)
    }
}

/// Resolved `convert` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ConvertConfig {
    /// Path to the PBF input.
    pub(crate) pbf_file: Utf8PathBuf,
    /// Working directory for results.
    pub(crate) output_dir: Utf8PathBuf,
    /// Options passed to the conversion.
    pub(crate) options: ConversionOptions,
}

impl ConvertConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.pbf_file, ARG_PBF_FILE)
    }
}

impl TryFrom<ConvertArgs> for ConvertConfig {
    type Error = CliError;

    fn try_from(args: ConvertArgs) -> Result<Self, Self::Error> {
        let pbf_file = args.pbf_file.ok_or(CliError::MissingArgument {
            field: ARG_PBF_FILE,
            env: ENV_PBF_FILE,
        })?;
        let output_dir = args
            .output_dir
            .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_OUTPUT_DIR));
        let options = ConversionOptions::default()
            .with_non_closed_relations(args.include_non_closed_relations.unwrap_or(true))
            .with_node_only_relations(args.include_node_only_relations.unwrap_or(false))
            .with_ignore_cache(args.ignore_cache)
            .with_verbosity(args.verbosity.unwrap_or(VerbosityMode::Verbose))
            .with_debug_memory(args.debug_memory)
            .with_debug_times(args.debug_times);
        Ok(Self {
            pbf_file,
            output_dir,
            options,
        })
    }
}

/// Fail unless `path` names an existing regular file.
pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match pbfparquet_fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) if path.exists() => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Ok(false) => Err(CliError::MissingSourceFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

pub(crate) fn resolve_convert_config(args: ConvertArgs) -> Result<ConvertConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

pub(crate) fn run_convert(args: ConvertArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = resolve_convert_config(args)?;
    let result = execute_convert(&config)?;
    writeln!(writer, "{result}").map_err(CliError::WriteOutput)
}

pub(crate) fn execute_convert(config: &ConvertConfig) -> Result<Utf8PathBuf, CliError> {
    debug!(
        "converting {} into {} with {:?}",
        config.pbf_file, config.output_dir, config.options
    );
    PbfFileReader::new(config.options.clone())
        .with_working_directory(config.output_dir.clone())
        .convert_pbf_to_parquet(&config.pbf_file, config.options.ignore_cache)
        .map_err(|source| CliError::Convert {
            path: config.pbf_file.clone(),
            source,
        })
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<ConvertConfig, CliError> {
    let merged = ConvertArgs::merge_from_layers(layers).map_err(CliError::from)?;
    ConvertConfig::try_from(merged)
}
