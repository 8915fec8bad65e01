//! Error types emitted by the pbfparquet CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use pbfparquet_data::{ConversionError, GeoParquetError};
use thiserror::Error;

/// Errors emitted by the pbfparquet CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (pass <{field}> or set {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The conversion pipeline failed.
    #[error("conversion of {path:?} failed")]
    Convert {
        path: Utf8PathBuf,
        #[source]
        source: ConversionError,
    },
    /// Reading a GeoParquet file failed.
    #[error("failed to read GeoParquet file {path:?}")]
    ReadGeoParquet {
        path: Utf8PathBuf,
        #[source]
        source: GeoParquetError,
    },
    /// Writing command output failed.
    #[error("failed to write command output: {0}")]
    WriteOutput(#[source] std::io::Error),
}

impl CliError {
    /// Short name printed before the message.
    ///
    /// Conversion failures report the pipeline's own error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ArgumentParsing(_) => "ArgumentParsing",
            Self::Configuration(_) => "Configuration",
            Self::MissingArgument { .. } => "MissingArgument",
            Self::MissingSourceFile { .. } => "MissingSourceFile",
            Self::SourcePathNotFile { .. } => "SourcePathNotFile",
            Self::InspectSourcePath { .. } => "InspectSourcePath",
            Self::Convert { source, .. } => source.kind(),
            Self::ReadGeoParquet { .. } => "ReadGeoParquet",
            Self::WriteOutput(_) => "WriteOutput",
        }
    }

    /// Process exit status for this error.
    ///
    /// Help and version requests surface as clap errors but exit successfully;
    /// every other failure exits with `1`.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ArgumentParsing(err) if !err.use_stderr() => 0,
            _ => 1,
        }
    }

    /// Whether the `convert` usage text should accompany this error.
    #[must_use]
    pub fn shows_usage(&self) -> bool {
        match self {
            Self::MissingArgument { field, .. }
            | Self::MissingSourceFile { field, .. }
            | Self::SourcePathNotFile { field, .. } => *field == crate::ARG_PBF_FILE,
            _ => false,
        }
    }
}
