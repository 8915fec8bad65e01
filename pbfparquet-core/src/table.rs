//! An ordered, in-memory view of converted features.
//!
//! [`FeatureTable`] is what a conversion produces before it is written and
//! what reading a result file gives back. Lookups are linear; tables are
//! small enough for inspection and tests.

use std::collections::BTreeMap;

use crate::{Feature, FeatureId, FeatureKind, GeometryKind};

/// Features in row order.
///
/// # Examples
/// ```
/// use geo::{Geometry, Point};
/// use pbfparquet_core::{Feature, FeatureId, FeatureKind, FeatureTable, Tags};
///
/// let table = FeatureTable::from(vec![Feature::new(
///     FeatureId::node(20),
///     Tags::new(),
///     Geometry::Point(Point::new(7.415, 43.705)),
/// )]);
/// assert_eq!(table.len(), 1);
/// assert!(table.contains(FeatureId::node(20)));
/// assert_eq!(table.of_kind(FeatureKind::Relation).count(), 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureTable {
    features: Vec<Feature>,
}

impl FeatureTable {
    /// An empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            features: Vec::new(),
        }
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Rows in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Feature> {
        self.features.iter()
    }

    /// The row with the given identifier, if any.
    #[must_use]
    pub fn get(&self, id: FeatureId) -> Option<&Feature> {
        self.features.iter().find(|feature| feature.id == id)
    }

    /// Whether a row with the given identifier exists.
    #[must_use]
    pub fn contains(&self, id: FeatureId) -> bool {
        self.get(id).is_some()
    }

    /// Rows built from elements of `kind`.
    pub fn of_kind(&self, kind: FeatureKind) -> impl Iterator<Item = &Feature> {
        self.features
            .iter()
            .filter(move |feature| feature.id.kind == kind)
    }

    /// Geometry type histogram for rows of `kind`.
    #[must_use]
    pub fn geometry_kind_counts(&self, kind: FeatureKind) -> BTreeMap<GeometryKind, usize> {
        let mut counts = BTreeMap::new();
        for feature in self.of_kind(kind) {
            *counts.entry(feature.geometry_kind()).or_default() += 1;
        }
        counts
    }

    /// Identifiers appearing on more than one row, ascending.
    #[must_use]
    pub fn duplicate_ids(&self) -> Vec<FeatureId> {
        let mut seen: BTreeMap<FeatureId, usize> = BTreeMap::new();
        for feature in &self.features {
            *seen.entry(feature.id).or_default() += 1;
        }
        seen.into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(id, _)| id)
            .collect()
    }

    /// Consume the table, returning its rows.
    #[must_use]
    pub fn into_features(self) -> Vec<Feature> {
        self.features
    }
}

impl From<Vec<Feature>> for FeatureTable {
    fn from(features: Vec<Feature>) -> Self {
        Self { features }
    }
}

impl FromIterator<Feature> for FeatureTable {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self {
            features: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for FeatureTable {
    type Item = Feature;
    type IntoIter = std::vec::IntoIter<Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.into_iter()
    }
}

impl<'a> IntoIterator for &'a FeatureTable {
    type Item = &'a Feature;
    type IntoIter = std::slice::Iter<'a, Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.iter()
    }
}
