//! The `geo` file metadata entry required by GeoParquet 1.0.0.

use std::collections::{BTreeMap, BTreeSet};

use geo::{BoundingRect, Coord, Rect};
use pbfparquet_core::{Feature, GeometryKind};
use serde::{Deserialize, Serialize};

use super::GEOMETRY_COLUMN;

/// GeoParquet format version written by this crate.
pub const GEOPARQUET_VERSION: &str = "1.0.0";

/// Only geometry encoding this crate writes.
pub const WKB_ENCODING: &str = "WKB";

/// Parsed value of the `geo` key-value metadata entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoMetadata {
    /// GeoParquet format version.
    pub version: String,
    /// Name of the default geometry column.
    pub primary_column: String,
    /// Per geometry column metadata.
    pub columns: BTreeMap<String, GeoColumnMetadata>,
}

/// Metadata describing one geometry column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoColumnMetadata {
    /// Geometry encoding, always `WKB` here.
    pub encoding: String,
    /// Distinct geometry type names present in the column.
    pub geometry_types: Vec<String>,
    /// `[min_x, min_y, max_x, max_y]` over every geometry, absent when empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<[f64; 4]>,
}

impl GeoMetadata {
    /// Describe the geometry column of `features`.
    #[must_use]
    pub fn for_features(features: &[Feature]) -> Self {
        let kinds: BTreeSet<GeometryKind> = features.iter().map(Feature::geometry_kind).collect();
        let bounds = features
            .iter()
            .filter_map(|feature| feature.geometry.bounding_rect())
            .reduce(merge_rects);
        let column = GeoColumnMetadata {
            encoding: WKB_ENCODING.to_owned(),
            geometry_types: kinds.iter().map(|kind| kind.as_str().to_owned()).collect(),
            bbox: bounds.map(|rect| [rect.min().x, rect.min().y, rect.max().x, rect.max().y]),
        };
        Self {
            version: GEOPARQUET_VERSION.to_owned(),
            primary_column: GEOMETRY_COLUMN.to_owned(),
            columns: BTreeMap::from([(GEOMETRY_COLUMN.to_owned(), column)]),
        }
    }

    /// Metadata of the primary geometry column.
    #[must_use]
    pub fn primary(&self) -> Option<&GeoColumnMetadata> {
        self.columns.get(&self.primary_column)
    }
}

fn merge_rects(left: Rect<f64>, right: Rect<f64>) -> Rect<f64> {
    Rect::new(
        Coord {
            x: left.min().x.min(right.min().x),
            y: left.min().y.min(right.min().y),
        },
        Coord {
            x: left.max().x.max(right.max().x),
            y: left.max().y.max(right.max().y),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Geometry, LineString, Point};
    use pbfparquet_core::{FeatureId, Tags};

    #[test]
    fn metadata_lists_types_and_bounds() {
        let features = vec![
            Feature::new(
                FeatureId::node(1),
                Tags::new(),
                Geometry::Point(Point::new(7.4, 43.7)),
            ),
            Feature::new(
                FeatureId::way(2),
                Tags::new(),
                Geometry::LineString(LineString::from(vec![(7.5, 43.6), (7.6, 43.8)])),
            ),
        ];
        let metadata = GeoMetadata::for_features(&features);
        let column = metadata.primary().expect("geometry column");
        assert_eq!(column.geometry_types, vec!["Point", "LineString"]);
        assert_eq!(column.bbox, Some([7.4, 43.6, 7.6, 43.8]));

        let json = serde_json::to_value(&metadata).expect("serialise");
        assert_eq!(json["version"], "1.0.0");
        assert_eq!(json["primary_column"], "geometry");
        assert_eq!(json["columns"]["geometry"]["encoding"], "WKB");
    }

    #[test]
    fn empty_tables_omit_bbox() {
        let metadata = GeoMetadata::for_features(&[]);
        let json = serde_json::to_string(&metadata).expect("serialise");
        assert!(!json.contains("bbox"), "unexpected bbox in {json}");
    }
}
