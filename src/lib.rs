//! Facade crate for pbfparquet, the OpenStreetMap PBF to GeoParquet converter.
//!
//! This crate re-exports the feature model from `pbfparquet-core` and the
//! conversion pipeline from `pbfparquet-data`.
//!
//! # Examples
//! ```no_run
//! use camino::Utf8Path;
//! use pbfparquet::{ConversionOptions, PbfFileReader};
//!
//! # fn main() -> Result<(), pbfparquet::ConversionError> {
//! let reader = PbfFileReader::new(ConversionOptions::default().with_non_closed_relations(true));
//! let table = reader.convert_pbf_to_features(Utf8Path::new("monaco.osm.pbf"), false)?;
//! println!("{} features", table.len());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub use pbfparquet_core::{
    ConversionOptions, Feature, FeatureId, FeatureKind, FeatureTable, GeometryKind,
    NESTED_RELATION_IDS_TAG, Tags, TagsFilter, VerbosityMode,
};
pub use pbfparquet_data::{
    ConversionError, GeoParquetError, PbfFileReader, convert_pbf_to_parquet, read_geoparquet,
};
