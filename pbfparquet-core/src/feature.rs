//! Output features and their identifiers.
//!
//! A [`Feature`] is one row of the converted table: a kind-prefixed
//! identifier, the element tags and a WGS84 geometry.
//!
//! # Examples
//! ```
//! use pbfparquet_core::FeatureId;
//!
//! assert_eq!(FeatureId::relation(530_299).to_string(), "relation/530299");
//! assert_eq!("way/42".parse::<FeatureId>(), Ok(FeatureId::way(42)));
//! ```

use std::fmt;
use std::str::FromStr;

use geo::Geometry;
use thiserror::Error;

use crate::Tags;

/// The OSM element kind a feature was built from.
///
/// Variants are ordered the way rows are written: nodes, ways, relations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeatureKind {
    /// A tagged node.
    Node,
    /// A tagged way.
    Way,
    /// A relation.
    Relation,
}

impl FeatureKind {
    /// Return the identifier prefix used for this kind.
    ///
    /// # Examples
    /// ```
    /// use pbfparquet_core::FeatureKind;
    ///
    /// assert_eq!(FeatureKind::Way.as_str(), "way");
    /// ```
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Way => "way",
            Self::Relation => "relation",
        }
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-prefixed OSM identifier, rendered as `"<kind>/<id>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeatureId {
    /// Element kind.
    pub kind: FeatureKind,
    /// Raw OSM identifier.
    pub id: i64,
}

impl FeatureId {
    /// Identifier for a node.
    #[must_use]
    pub const fn node(id: i64) -> Self {
        Self {
            kind: FeatureKind::Node,
            id,
        }
    }

    /// Identifier for a way.
    #[must_use]
    pub const fn way(id: i64) -> Self {
        Self {
            kind: FeatureKind::Way,
            id,
        }
    }

    /// Identifier for a relation.
    #[must_use]
    pub const fn relation(id: i64) -> Self {
        Self {
            kind: FeatureKind::Relation,
            id,
        }
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.id)
    }
}

/// Errors returned when parsing a [`FeatureId`] from text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FeatureIdParseError {
    /// The value has no `/` separator.
    #[error("feature id '{0}' is missing the '<kind>/' prefix")]
    MissingPrefix(String),
    /// The prefix is not `node`, `way` or `relation`.
    #[error("unknown feature kind '{0}'")]
    UnknownKind(String),
    /// The identifier part is not a decimal integer.
    #[error("feature id '{0}' does not end in a numeric identifier")]
    InvalidNumber(String),
}

impl FromStr for FeatureId {
    type Err = FeatureIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (prefix, number) = s
            .split_once('/')
            .ok_or_else(|| FeatureIdParseError::MissingPrefix(s.to_owned()))?;
        let kind = match prefix {
            "node" => FeatureKind::Node,
            "way" => FeatureKind::Way,
            "relation" => FeatureKind::Relation,
            other => return Err(FeatureIdParseError::UnknownKind(other.to_owned())),
        };
        let id = number
            .parse::<i64>()
            .map_err(|_| FeatureIdParseError::InvalidNumber(s.to_owned()))?;
        Ok(Self { kind, id })
    }
}

/// Geometry type names as reported in GeoParquet metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GeometryKind {
    /// A single point.
    Point,
    /// Several points.
    MultiPoint,
    /// A single open or closed line.
    LineString,
    /// Several lines.
    MultiLineString,
    /// A single polygon, possibly with holes.
    Polygon,
    /// Several polygons.
    MultiPolygon,
    /// Any other `geo` geometry variant.
    Other,
}

impl GeometryKind {
    /// Classify a geometry.
    ///
    /// # Examples
    /// ```
    /// use geo::{Geometry, Point};
    /// use pbfparquet_core::GeometryKind;
    ///
    /// let point = Geometry::Point(Point::new(7.42, 43.73));
    /// assert_eq!(GeometryKind::of(&point), GeometryKind::Point);
    /// ```
    #[must_use]
    pub const fn of(geometry: &Geometry<f64>) -> Self {
        match geometry {
            Geometry::Point(_) => Self::Point,
            Geometry::MultiPoint(_) => Self::MultiPoint,
            Geometry::LineString(_) => Self::LineString,
            Geometry::MultiLineString(_) => Self::MultiLineString,
            Geometry::Polygon(_) => Self::Polygon,
            Geometry::MultiPolygon(_) => Self::MultiPolygon,
            _ => Self::Other,
        }
    }

    /// Return the GeoParquet name of the geometry type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Point => "Point",
            Self::MultiPoint => "MultiPoint",
            Self::LineString => "LineString",
            Self::MultiLineString => "MultiLineString",
            Self::Polygon => "Polygon",
            Self::MultiPolygon => "MultiPolygon",
            Self::Other => "GeometryCollection",
        }
    }

    /// Whether the geometry is areal.
    #[must_use]
    pub const fn is_areal(&self) -> bool {
        matches!(self, Self::Polygon | Self::MultiPolygon)
    }

    /// Whether the geometry is point-like.
    #[must_use]
    pub const fn is_puntal(&self) -> bool {
        matches!(self, Self::Point | Self::MultiPoint)
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One converted OSM element.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// Kind-prefixed identifier.
    pub id: FeatureId,
    /// OSM tags, including synthetic entries.
    pub tags: Tags,
    /// WGS84 geometry, `x = longitude`, `y = latitude`.
    pub geometry: Geometry<f64>,
}

impl Feature {
    /// Construct a feature.
    #[must_use]
    pub const fn new(id: FeatureId, tags: Tags, geometry: Geometry<f64>) -> Self {
        Self { id, tags, geometry }
    }

    /// Geometry type of this feature.
    #[must_use]
    pub const fn geometry_kind(&self) -> GeometryKind {
        GeometryKind::of(&self.geometry)
    }
}
