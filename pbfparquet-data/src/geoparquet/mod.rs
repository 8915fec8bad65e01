//! GeoParquet encoding of feature tables.
//!
//! Responsibilities:
//! - Write `feature_id`, `tags` and WKB `geometry` columns with Snappy.
//! - Embed the GeoParquet 1.0.0 `geo` metadata entry.
//! - Read written files back into a [`pbfparquet_core::FeatureTable`].
//!
//! Boundaries:
//! - Geometry is stored as two-dimensional WKB in WGS84; no CRS entry is
//!   written, which GeoParquet reads as OGC:CRS84.

use camino::Utf8PathBuf;
use thiserror::Error;

mod metadata;
mod reader;
mod writer;

pub use metadata::{GEOPARQUET_VERSION, GeoColumnMetadata, GeoMetadata, WKB_ENCODING};
pub use reader::{read_geo_metadata, read_geoparquet};
pub use writer::write_geoparquet;

/// Parquet key-value metadata key holding the GeoParquet JSON.
pub const GEO_METADATA_KEY: &str = "geo";
/// Column holding `"<kind>/<id>"` identifiers.
pub const FEATURE_ID_COLUMN: &str = "feature_id";
/// Column holding the tag map.
pub const TAGS_COLUMN: &str = "tags";
/// Column holding WKB geometries.
pub const GEOMETRY_COLUMN: &str = "geometry";

/// Errors raised while writing or reading GeoParquet files.
#[derive(Debug, Error)]
pub enum GeoParquetError {
    /// The file could not be created or opened.
    #[error("failed to access GeoParquet file at {path}")]
    Io {
        /// Path being accessed.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Arrow rejected a column or batch.
    #[error("failed to build Arrow record batch")]
    Arrow(#[from] arrow_schema::ArrowError),
    /// The Parquet writer or reader failed.
    #[error("failed to encode or decode Parquet data")]
    Parquet(#[from] parquet::errors::ParquetError),
    /// A geometry could not be converted to or from WKB.
    #[error("failed to convert geometry of {feature_id} through WKB")]
    Wkb {
        /// Identifier of the offending row.
        feature_id: String,
        /// Underlying codec error.
        #[source]
        source: geozero::error::GeozeroError,
    },
    /// The `geo` metadata could not be serialised or parsed.
    #[error("invalid GeoParquet metadata")]
    Metadata(#[from] serde_json::Error),
    /// The file carries no `geo` metadata entry.
    #[error("file has no GeoParquet metadata entry")]
    MissingGeoMetadata,
    /// A required column is absent or has an unexpected type.
    #[error("column {column} is missing or has an unexpected type")]
    MissingColumn {
        /// Column name.
        column: &'static str,
    },
    /// A `feature_id` value is malformed.
    #[error("invalid feature identifier")]
    FeatureId(#[from] pbfparquet_core::FeatureIdParseError),
}
