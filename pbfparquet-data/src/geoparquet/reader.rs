//! Load a GeoParquet feature table back into memory.

use std::fs::File;

use arrow_array::cast::AsArray;
use arrow_array::{Array, MapArray, RecordBatch};
use camino::Utf8Path;
use geozero::ToGeo;
use geozero::wkb::Wkb;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use pbfparquet_core::{Feature, FeatureId, FeatureTable, Tags};

use super::{
    FEATURE_ID_COLUMN, GEO_METADATA_KEY, GEOMETRY_COLUMN, GeoMetadata, GeoParquetError,
    TAGS_COLUMN,
};

fn open(path: &Utf8Path) -> Result<ParquetRecordBatchReaderBuilder<File>, GeoParquetError> {
    let file = pbfparquet_fs::open_utf8_file(path)
        .map_err(|source| GeoParquetError::Io {
            path: path.to_owned(),
            source,
        })?
        .into_std();
    Ok(ParquetRecordBatchReaderBuilder::try_new(file)?)
}

fn geo_metadata(
    builder: &ParquetRecordBatchReaderBuilder<File>,
) -> Result<GeoMetadata, GeoParquetError> {
    let encoded = builder
        .metadata()
        .file_metadata()
        .key_value_metadata()
        .and_then(|entries| {
            entries
                .iter()
                .find(|entry| entry.key == GEO_METADATA_KEY)
                .and_then(|entry| entry.value.as_deref())
        })
        .ok_or(GeoParquetError::MissingGeoMetadata)?;
    Ok(serde_json::from_str(encoded)?)
}

/// Read only the `geo` metadata of a GeoParquet file.
///
/// # Errors
/// Fails when the file cannot be opened, is not Parquet, or lacks a valid
/// `geo` entry.
pub fn read_geo_metadata(path: &Utf8Path) -> Result<GeoMetadata, GeoParquetError> {
    geo_metadata(&open(path)?)
}

/// Read every row of a GeoParquet file written by [`super::write_geoparquet`].
///
/// # Examples
/// ```no_run
/// use camino::Utf8Path;
/// use pbfparquet_core::FeatureKind;
/// use pbfparquet_data::read_geoparquet;
///
/// # fn main() -> Result<(), pbfparquet_data::GeoParquetError> {
/// let table = read_geoparquet(Utf8Path::new("files/monaco_nofilter_noclip_compact.parquet"))?;
/// let relations = table.of_kind(FeatureKind::Relation).count();
/// assert!(relations <= table.len());
/// # Ok(())
/// # }
/// ```
pub fn read_geoparquet(path: &Utf8Path) -> Result<FeatureTable, GeoParquetError> {
    let builder = open(path)?;
    geo_metadata(&builder)?;
    let mut features = Vec::new();
    for batch_result in builder.build()? {
        decode_batch(&batch_result?, &mut features)?;
    }
    Ok(FeatureTable::from(features))
}

fn decode_batch(batch: &RecordBatch, features: &mut Vec<Feature>) -> Result<(), GeoParquetError> {
    let ids = batch
        .column_by_name(FEATURE_ID_COLUMN)
        .and_then(|column| column.as_string_opt::<i32>())
        .ok_or(GeoParquetError::MissingColumn {
            column: FEATURE_ID_COLUMN,
        })?;
    let tags = batch
        .column_by_name(TAGS_COLUMN)
        .and_then(|column| column.as_map_opt())
        .ok_or(GeoParquetError::MissingColumn {
            column: TAGS_COLUMN,
        })?;
    let geometries = batch
        .column_by_name(GEOMETRY_COLUMN)
        .and_then(|column| column.as_binary_opt::<i32>())
        .ok_or(GeoParquetError::MissingColumn {
            column: GEOMETRY_COLUMN,
        })?;

    for row in 0..batch.num_rows() {
        let id: FeatureId = ids.value(row).parse()?;
        let geometry = Wkb(geometries.value(row).to_vec())
            .to_geo()
            .map_err(|source| GeoParquetError::Wkb {
                feature_id: id.to_string(),
                source,
            })?;
        features.push(Feature::new(id, row_tags(tags, row)?, geometry));
    }
    Ok(())
}

fn row_tags(tags: &MapArray, row: usize) -> Result<Tags, GeoParquetError> {
    let entries = tags.value(row);
    let keys = entries
        .column_by_name("keys")
        .and_then(|column| column.as_string_opt::<i32>())
        .ok_or(GeoParquetError::MissingColumn {
            column: TAGS_COLUMN,
        })?;
    let values = entries
        .column_by_name("values")
        .and_then(|column| column.as_string_opt::<i32>())
        .ok_or(GeoParquetError::MissingColumn {
            column: TAGS_COLUMN,
        })?;
    Ok((0..entries.len())
        .filter(|index| !values.is_null(*index))
        .map(|index| (keys.value(index).to_owned(), values.value(index).to_owned()))
        .collect())
}
