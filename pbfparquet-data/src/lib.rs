//! File formats and the conversion pipeline for pbfparquet.
//!
//! Responsibilities:
//! - Decode OSM PBF files into an [`pbfparquet_core::OsmDataset`].
//! - Encode and decode GeoParquet files holding feature tables.
//! - Drive a cached conversion from a PBF file to a GeoParquet result.
//!
//! Boundaries:
//! - Do not encode geometry rules (these live in `pbfparquet-core`).
//! - Touch the filesystem only through `pbfparquet-fs` helpers or the
//!   decoders' own readers.
//!
//! Invariants:
//! - Results are written to a temporary directory and renamed into place.
//! - No global mutable state.

pub mod convert;
pub mod geoparquet;
pub mod ingest;

pub use convert::{
    ConversionError, ConversionStats, DEFAULT_WORKING_DIRECTORY, PbfFileReader, STATS_FILE_NAME,
    convert_pbf_to_parquet,
};
pub use geoparquet::{
    FEATURE_ID_COLUMN, GEO_METADATA_KEY, GEOMETRY_COLUMN, GEOPARQUET_VERSION, GeoColumnMetadata,
    GeoMetadata, GeoParquetError, TAGS_COLUMN, WKB_ENCODING, read_geo_metadata, read_geoparquet,
    write_geoparquet,
};
pub use ingest::{OsmIngestError, OsmIngestReport, OsmIngestSummary, load_osm_dataset};
