//! End-to-end PBF to GeoParquet conversion with a result cache.
//!
//! Responsibilities:
//! - Name results after the input stem and the options that shape rows.
//! - Reuse an existing result unless the cache is ignored.
//! - Stage work in a temporary directory inside the working directory and
//!   move the finished file into place.
//!
//! Invariants:
//! - A failed conversion never leaves a file under the final result name.
//! - With `debug_memory` the temporary directory is kept and holds
//!   `stats.json`.

use std::collections::BTreeMap;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use pbfparquet_core::{
    AssemblyReport, ConversionOptions, FeatureAssembler, FeatureTable, pbf_stem,
};
use serde::Serialize;
use thiserror::Error;

use crate::{
    GeoParquetError, OsmIngestError, load_osm_dataset, read_geoparquet, write_geoparquet,
};

mod progress;

use progress::StageReporter;

/// Working directory used when none is configured.
pub const DEFAULT_WORKING_DIRECTORY: &str = "files";

/// File written into the retained temporary directory with `debug_memory`.
pub const STATS_FILE_NAME: &str = "stats.json";

const TEMP_DIR_PREFIX: &str = "pbfparquet-";

/// Errors returned by a conversion.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// The PBF path does not name an existing file.
    #[error("PBF file not found at {path}")]
    MissingInput {
        /// Requested input path.
        path: Utf8PathBuf,
    },
    /// The PBF file could not be opened or decoded.
    #[error("failed to read OSM data")]
    Ingest(#[from] OsmIngestError),
    /// The working directory or a temporary file could not be managed.
    #[error("working directory operation failed at {path}")]
    Workspace {
        /// Path involved in the failed operation.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// Writing or reading the GeoParquet result failed.
    #[error("GeoParquet encoding failed")]
    GeoParquet(#[from] GeoParquetError),
    /// The statistics file could not be serialised.
    #[error("failed to serialise conversion statistics")]
    Stats(#[from] serde_json::Error),
}

impl ConversionError {
    /// Short name of the error variant, as printed by the command line.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MissingInput { .. } => "MissingInput",
            Self::Ingest(_) => "Ingest",
            Self::Workspace { .. } => "Workspace",
            Self::GeoParquet(_) => "GeoParquet",
            Self::Stats(_) => "Stats",
        }
    }

    fn workspace(path: &Utf8Path) -> impl FnOnce(io::Error) -> Self + '_ {
        move |source| Self::Workspace {
            path: path.to_owned(),
            source,
        }
    }
}

/// Diagnostics written to `stats.json` when `debug_memory` is set.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionStats {
    /// Name of the result file.
    pub result_file: String,
    /// Nodes, ways and relations decoded from the input.
    pub pbf_elements: [u64; 3],
    /// Referenced nodes left without coordinates.
    pub unresolved_nodes: usize,
    /// What assembly kept and dropped.
    pub assembly: AssemblyReport,
    /// Stage durations in milliseconds.
    pub stage_millis: BTreeMap<String, u128>,
}

/// Converts PBF files with fixed options into one working directory.
///
/// # Examples
/// ```no_run
/// use camino::Utf8Path;
/// use pbfparquet_core::ConversionOptions;
/// use pbfparquet_data::PbfFileReader;
///
/// # fn main() -> Result<(), pbfparquet_data::ConversionError> {
/// let reader = PbfFileReader::new(
///     ConversionOptions::default()
///         .with_non_closed_relations(true)
///         .with_node_only_relations(true),
/// )
/// .with_working_directory("files_all_relations");
/// let path = reader.convert_pbf_to_parquet(Utf8Path::new("monaco.osm.pbf"), false)?;
/// assert!(path.as_str().ends_with("_nonclosedrelas_nodeonlyrelas.parquet"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PbfFileReader {
    options: ConversionOptions,
    working_directory: Utf8PathBuf,
}

impl Default for PbfFileReader {
    fn default() -> Self {
        Self::new(ConversionOptions::default())
    }
}

impl PbfFileReader {
    /// Create a reader writing into [`DEFAULT_WORKING_DIRECTORY`].
    #[must_use]
    pub fn new(options: ConversionOptions) -> Self {
        Self {
            options,
            working_directory: Utf8PathBuf::from(DEFAULT_WORKING_DIRECTORY),
        }
    }

    /// Use `directory` for results and temporary files.
    #[must_use]
    pub fn with_working_directory(mut self, directory: impl Into<Utf8PathBuf>) -> Self {
        self.working_directory = directory.into();
        self
    }

    /// Options applied to every conversion.
    #[must_use]
    pub const fn options(&self) -> &ConversionOptions {
        &self.options
    }

    /// Directory holding results.
    #[must_use]
    pub fn working_directory(&self) -> &Utf8Path {
        &self.working_directory
    }

    /// Name of the result file for `pbf` under the reader's options.
    #[must_use]
    pub fn result_file_name(&self, pbf: &Utf8Path) -> String {
        let stem = pbf_stem(pbf.file_name().unwrap_or(pbf.as_str()));
        self.options.result_file_name(stem)
    }

    /// Where the result for `pbf` is, or will be, written.
    #[must_use]
    pub fn result_path(&self, pbf: &Utf8Path) -> Utf8PathBuf {
        self.working_directory.join(self.result_file_name(pbf))
    }

    /// Convert `pbf` and return the GeoParquet result path.
    ///
    /// An existing result is reused unless `ignore_cache` or the reader's
    /// own `ignore_cache` option is set.
    ///
    /// # Errors
    /// See [`ConversionError`].
    pub fn convert_pbf_to_parquet(
        &self,
        pbf: &Utf8Path,
        ignore_cache: bool,
    ) -> Result<Utf8PathBuf, ConversionError> {
        if !pbfparquet_fs::file_is_file(pbf).map_err(ConversionError::workspace(pbf))? {
            return Err(ConversionError::MissingInput {
                path: pbf.to_owned(),
            });
        }
        let result_path = self.result_path(pbf);
        let mut reporter =
            StageReporter::new(self.options.verbosity_mode, self.options.debug_times);

        let cached = pbfparquet_fs::file_is_file(&result_path)
            .map_err(ConversionError::workspace(&result_path))?;
        if cached && !ignore_cache && !self.options.ignore_cache {
            reporter.summary(format_args!("Using cached result {result_path}"));
            return Ok(result_path);
        }

        pbfparquet_fs::ensure_dir(&self.working_directory)
            .map_err(ConversionError::workspace(&self.working_directory))?;
        let temp_dir = tempfile::Builder::new()
            .prefix(TEMP_DIR_PREFIX)
            .tempdir_in(&self.working_directory)
            .map_err(ConversionError::workspace(&self.working_directory))?;
        let temp_root = Utf8PathBuf::from_path_buf(temp_dir.path().to_path_buf()).map_err(|_| {
            ConversionError::Workspace {
                path: self.working_directory.clone(),
                source: io::Error::other("temporary directory path is not UTF-8"),
            }
        })?;

        let ingested = reporter.stage("Reading PBF file", || {
            load_osm_dataset(pbf.as_std_path(), &self.options)
        })?;
        let (nodes, ways, relations) = ingested.dataset.counts();
        reporter.detail(format_args!(
            "Loaded {nodes} tagged nodes, {ways} ways and {relations} relations"
        ));

        let assembly = reporter.stage("Assembling features", || {
            FeatureAssembler::new(&self.options).assemble(&ingested.dataset)
        });
        reporter.detail(format_args!(
            "Kept {} nodes, {} ways and {} relations",
            assembly.report.nodes, assembly.report.ways, assembly.report.relations
        ));

        let file_name = self.result_file_name(pbf);
        let staged = temp_root.join(&file_name);
        reporter.stage("Writing GeoParquet", || {
            write_geoparquet(&staged, &assembly.features)
        })?;
        pbfparquet_fs::rename_file(&staged, &result_path)
            .map_err(ConversionError::workspace(&result_path))?;

        if self.options.debug_memory {
            let stats = ConversionStats {
                result_file: file_name,
                pbf_elements: [
                    ingested.summary.nodes,
                    ingested.summary.ways,
                    ingested.summary.relations,
                ],
                unresolved_nodes: ingested.unresolved_nodes,
                assembly: assembly.report,
                stage_millis: reporter.timings(),
            };
            let stats_path = temp_root.join(STATS_FILE_NAME);
            pbfparquet_fs::write_utf8_file(&stats_path, &serde_json::to_vec_pretty(&stats)?)
                .map_err(ConversionError::workspace(&stats_path))?;
            let kept = temp_dir.keep();
            reporter.summary(format_args!("Kept temporary files in {}", kept.display()));
        }

        reporter.summary(format_args!("Finished conversion: {result_path}"));
        Ok(result_path)
    }

    /// Convert `pbf` and load the result as a [`FeatureTable`].
    ///
    /// # Errors
    /// See [`ConversionError`].
    pub fn convert_pbf_to_features(
        &self,
        pbf: &Utf8Path,
        ignore_cache: bool,
    ) -> Result<FeatureTable, ConversionError> {
        let path = self.convert_pbf_to_parquet(pbf, ignore_cache)?;
        Ok(read_geoparquet(&path)?)
    }
}

/// Convert `pbf` into `working_directory` with `options`.
///
/// Shorthand for a one-off [`PbfFileReader`]; honours `options.ignore_cache`.
///
/// # Errors
/// See [`ConversionError`].
pub fn convert_pbf_to_parquet(
    pbf: &Utf8Path,
    working_directory: &Utf8Path,
    options: &ConversionOptions,
) -> Result<Utf8PathBuf, ConversionError> {
    PbfFileReader::new(options.clone())
        .with_working_directory(working_directory)
        .convert_pbf_to_parquet(pbf, options.ignore_cache)
}
