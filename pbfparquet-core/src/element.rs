//! Raw OSM elements and the in-memory dataset assembled from a PBF file.
//!
//! Responsibilities:
//! - Hold tagged nodes, every way and every relation read from the source.
//! - Resolve node coordinates, including untagged nodes fetched on demand.
//! - Report which node coordinates are still required before assembly.
//!
//! Invariants:
//! - Coordinates are WGS84 with `x = longitude`, `y = latitude`, in range.
//! - Merging two datasets keeps the first value seen for duplicate ids.

use std::collections::{BTreeMap, HashMap, HashSet};

use geo::Coord;

use crate::{ConversionOptions, Tags};

/// A node carrying at least one tag.
#[derive(Debug, Clone, PartialEq)]
pub struct OsmNode {
    /// OSM node id.
    pub id: i64,
    /// Node position.
    pub location: Coord<f64>,
    /// Node tags.
    pub tags: Tags,
}

/// A way and its ordered node references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsmWay {
    /// OSM way id.
    pub id: i64,
    /// Ordered node ids.
    pub refs: Vec<i64>,
    /// Way tags, possibly empty.
    pub tags: Tags,
}

impl OsmWay {
    /// Whether the first and last reference are the same node.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.refs.len() > 2 && self.refs.first() == self.refs.last()
    }
}

/// The element type a relation member refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// A node member.
    Node,
    /// A way member.
    Way,
    /// A nested relation member.
    Relation,
}

/// One member of a relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationMember {
    /// Referenced element type.
    pub kind: MemberKind,
    /// Referenced element id.
    pub id: i64,
    /// Member role, empty when unset.
    pub role: String,
}

impl RelationMember {
    /// Construct a member.
    pub fn new(kind: MemberKind, id: i64, role: impl Into<String>) -> Self {
        Self {
            kind,
            id,
            role: role.into(),
        }
    }
}

/// A relation with its ordered members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsmRelation {
    /// OSM relation id.
    pub id: i64,
    /// Ordered members.
    pub members: Vec<RelationMember>,
    /// Relation tags.
    pub tags: Tags,
}

impl OsmRelation {
    /// Value of the `type` tag, if any.
    #[must_use]
    pub fn relation_type(&self) -> Option<&str> {
        self.tags.get("type").map(String::as_str)
    }

    /// Members of the given kind, in member order.
    pub fn members_of(&self, kind: MemberKind) -> impl Iterator<Item = &RelationMember> {
        self.members.iter().filter(move |member| member.kind == kind)
    }
}

/// Everything the assembler needs from a PBF file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OsmDataset {
    nodes: BTreeMap<i64, OsmNode>,
    coordinates: HashMap<i64, Coord<f64>>,
    ways: BTreeMap<i64, OsmWay>,
    relations: BTreeMap<i64, OsmRelation>,
}

impl OsmDataset {
    /// An empty dataset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tagged node; its position also becomes a known coordinate.
    pub fn insert_node(&mut self, node: OsmNode) {
        self.nodes.entry(node.id).or_insert(node);
    }

    /// Record the position of an (untagged) node.
    pub fn insert_coordinate(&mut self, id: i64, location: Coord<f64>) {
        self.coordinates.entry(id).or_insert(location);
    }

    /// Add a way.
    pub fn insert_way(&mut self, way: OsmWay) {
        self.ways.entry(way.id).or_insert(way);
    }

    /// Add a relation.
    pub fn insert_relation(&mut self, relation: OsmRelation) {
        self.relations.entry(relation.id).or_insert(relation);
    }

    /// Merge another partial dataset into this one.
    #[must_use]
    pub fn combine(mut self, other: Self) -> Self {
        for (id, node) in other.nodes {
            self.nodes.entry(id).or_insert(node);
        }
        for (id, coord) in other.coordinates {
            self.coordinates.entry(id).or_insert(coord);
        }
        for (id, way) in other.ways {
            self.ways.entry(id).or_insert(way);
        }
        for (id, relation) in other.relations {
            self.relations.entry(id).or_insert(relation);
        }
        self
    }

    /// Known position of a node, tagged or not.
    #[must_use]
    pub fn coordinate(&self, id: i64) -> Option<Coord<f64>> {
        self.coordinates
            .get(&id)
            .copied()
            .or_else(|| self.nodes.get(&id).map(|node| node.location))
    }

    /// Tagged nodes ordered by id.
    pub fn nodes(&self) -> impl Iterator<Item = &OsmNode> {
        self.nodes.values()
    }

    /// Ways ordered by id.
    pub fn ways(&self) -> impl Iterator<Item = &OsmWay> {
        self.ways.values()
    }

    /// Relations ordered by id.
    pub fn relations(&self) -> impl Iterator<Item = &OsmRelation> {
        self.relations.values()
    }

    /// Look up a way by id.
    #[must_use]
    pub fn way(&self, id: i64) -> Option<&OsmWay> {
        self.ways.get(&id)
    }

    /// Look up a relation by id.
    #[must_use]
    pub fn relation(&self, id: i64) -> Option<&OsmRelation> {
        self.relations.get(&id)
    }

    /// Node ids whose coordinates assembly will ask for but are not yet known.
    ///
    /// Covers references of tagged ways, of ways used by relations, and node
    /// members of relations when node-only relations are emitted.
    #[must_use]
    pub fn missing_coordinates(&self, options: &ConversionOptions) -> HashSet<i64> {
        let mut wanted_ways: HashSet<i64> = self
            .ways
            .values()
            .filter(|way| !way.tags.is_empty())
            .map(|way| way.id)
            .collect();
        let mut wanted_nodes = HashSet::new();
        for relation in self.relations.values() {
            wanted_ways.extend(relation.members_of(MemberKind::Way).map(|member| member.id));
            if options.emits_node_only_relations() {
                wanted_nodes.extend(relation.members_of(MemberKind::Node).map(|member| member.id));
            }
        }
        for way_id in wanted_ways {
            if let Some(way) = self.ways.get(&way_id) {
                wanted_nodes.extend(way.refs.iter().copied());
            }
        }
        wanted_nodes.retain(|id| self.coordinate(*id).is_none());
        wanted_nodes
    }

    /// Element counts: tagged nodes, ways, relations.
    #[must_use]
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.nodes.len(), self.ways.len(), self.relations.len())
    }
}

/// Validate a WGS84 position, returning `None` when out of range or NaN.
///
/// # Examples
/// ```
/// use pbfparquet_core::validated_coord;
///
/// assert!(validated_coord(7.42, 43.73).is_some());
/// assert!(validated_coord(181.0, 0.0).is_none());
/// assert!(validated_coord(f64::NAN, 0.0).is_none());
/// ```
#[must_use]
pub fn validated_coord(lon: f64, lat: f64) -> Option<Coord<f64>> {
    (lon.is_finite()
        && lat.is_finite()
        && (-180.0..=180.0).contains(&lon)
        && (-90.0..=90.0).contains(&lat))
    .then_some(Coord { x: lon, y: lat })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn way(id: i64, refs: &[i64], tags: &[(&str, &str)]) -> OsmWay {
        OsmWay {
            id,
            refs: refs.to_vec(),
            tags: crate::collect_tags(tags.iter().copied()),
        }
    }

    #[test]
    fn combine_keeps_first_duplicate() {
        let mut left = OsmDataset::new();
        left.insert_coordinate(1, Coord { x: 1.0, y: 1.0 });
        let mut right = OsmDataset::new();
        right.insert_coordinate(1, Coord { x: 2.0, y: 2.0 });
        right.insert_coordinate(2, Coord { x: 3.0, y: 3.0 });
        let merged = left.combine(right);
        assert_eq!(merged.coordinate(1), Some(Coord { x: 1.0, y: 1.0 }));
        assert_eq!(merged.coordinate(2), Some(Coord { x: 3.0, y: 3.0 }));
    }

    #[test]
    fn missing_coordinates_cover_tagged_and_member_ways() {
        let mut dataset = OsmDataset::new();
        dataset.insert_way(way(10, &[1, 2], &[("highway", "primary")]));
        dataset.insert_way(way(11, &[3, 4], &[]));
        dataset.insert_way(way(12, &[5, 6], &[]));
        dataset.insert_relation(OsmRelation {
            id: 100,
            members: vec![
                RelationMember::new(MemberKind::Way, 11, "outer"),
                RelationMember::new(MemberKind::Node, 7, ""),
            ],
            tags: Tags::new(),
        });
        dataset.insert_coordinate(2, Coord { x: 0.0, y: 0.0 });

        let missing = dataset.missing_coordinates(&ConversionOptions::default());
        assert_eq!(missing, HashSet::from([1, 3, 4]));

        let node_only = ConversionOptions::default().with_node_only_relations(true);
        assert_eq!(
            dataset.missing_coordinates(&node_only),
            HashSet::from([1, 3, 4])
        );

        let with_nodes = dataset.missing_coordinates(&node_only.with_non_closed_relations(true));
        assert_eq!(with_nodes, HashSet::from([1, 3, 4, 7]));
    }

    #[test]
    fn closed_ways_need_three_references() {
        assert!(way(1, &[1, 2, 3, 1], &[]).is_closed());
        assert!(!way(1, &[1, 1], &[]).is_closed());
        assert!(!way(1, &[1, 2, 3], &[]).is_closed());
    }
}
