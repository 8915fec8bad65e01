//! Encode features as Arrow record batches and write them with Snappy.

use std::sync::Arc;

use arrow_array::builder::{BinaryBuilder, MapBuilder, StringBuilder};
use arrow_array::{Array, ArrayRef, RecordBatch};
use arrow_schema::{DataType, Field, Schema, SchemaRef};
use camino::Utf8Path;
use geozero::{CoordDimensions, ToWkb};
use log::debug;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::metadata::KeyValue;
use parquet::file::properties::WriterProperties;
use pbfparquet_core::Feature;

use super::{
    FEATURE_ID_COLUMN, GEO_METADATA_KEY, GEOMETRY_COLUMN, GeoMetadata, GeoParquetError,
    TAGS_COLUMN,
};

/// Rows per record batch and row group.
const BATCH_ROWS: usize = 65_536;

fn encode_batch(features: &[Feature]) -> Result<RecordBatch, GeoParquetError> {
    let mut ids = StringBuilder::new();
    let mut tags = MapBuilder::new(None, StringBuilder::new(), StringBuilder::new());
    let mut geometries = BinaryBuilder::new();

    for feature in features {
        ids.append_value(feature.id.to_string());
        for (key, value) in &feature.tags {
            tags.keys().append_value(key);
            tags.values().append_value(value);
        }
        tags.append(true)?;
        let wkb = feature
            .geometry
            .to_wkb(CoordDimensions::xy())
            .map_err(|source| GeoParquetError::Wkb {
                feature_id: feature.id.to_string(),
                source,
            })?;
        geometries.append_value(wkb);
    }

    let columns: Vec<ArrayRef> = vec![
        Arc::new(ids.finish()),
        Arc::new(tags.finish()),
        Arc::new(geometries.finish()),
    ];
    Ok(RecordBatch::try_new(feature_schema(), columns)?)
}

/// Arrow schema of the feature table.
///
/// The tags type is taken from the builder so that batches always match.
fn feature_schema() -> SchemaRef {
    let tags_type = MapBuilder::new(None, StringBuilder::new(), StringBuilder::new())
        .finish()
        .data_type()
        .clone();
    Arc::new(Schema::new(vec![
        Field::new(FEATURE_ID_COLUMN, DataType::Utf8, false),
        Field::new(TAGS_COLUMN, tags_type, false),
        Field::new(GEOMETRY_COLUMN, DataType::Binary, false),
    ]))
}

/// Write `features` to a GeoParquet file at `path`, replacing any existing file.
///
/// Returns the `geo` metadata that was embedded in the file.
///
/// # Examples
/// ```no_run
/// use camino::Utf8Path;
/// use geo::{Geometry, Point};
/// use pbfparquet_core::{Feature, FeatureId, Tags};
/// use pbfparquet_data::write_geoparquet;
///
/// # fn main() -> Result<(), pbfparquet_data::GeoParquetError> {
/// let cafe = Feature::new(
///     FeatureId::node(20),
///     Tags::from([("amenity".to_owned(), "cafe".to_owned())]),
///     Geometry::Point(Point::new(7.415, 43.705)),
/// );
/// let metadata = write_geoparquet(Utf8Path::new("cafe.parquet"), &[cafe])?;
/// assert_eq!(metadata.primary_column, "geometry");
/// # Ok(())
/// # }
/// ```
pub fn write_geoparquet(
    path: &Utf8Path,
    features: &[Feature],
) -> Result<GeoMetadata, GeoParquetError> {
    let metadata = GeoMetadata::for_features(features);
    let encoded_metadata = serde_json::to_string(&metadata)?;

    let file = pbfparquet_fs::create_utf8_file(path)
        .map_err(|source| GeoParquetError::Io {
            path: path.to_owned(),
            source,
        })?
        .into_std();
    let properties = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .set_max_row_group_size(BATCH_ROWS)
        .build();
    let mut writer = ArrowWriter::try_new(file, feature_schema(), Some(properties))?;
    for chunk in features.chunks(BATCH_ROWS) {
        writer.write(&encode_batch(chunk)?)?;
    }
    writer.append_key_value_metadata(KeyValue::new(
        GEO_METADATA_KEY.to_owned(),
        encoded_metadata,
    ));
    writer.close()?;

    debug!("Wrote {} features to {path}", features.len());
    Ok(metadata)
}
