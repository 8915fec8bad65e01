//! Internal accumulators for OpenStreetMap (OSM) PBF ingestion.
//!
//! [`OsmDatasetAccumulator`] collects elements from one decoded blob and is
//! merged with its siblings by `par_map_reduce`. [`CoordinateResolver`]
//! fills in node positions during the second pass.
use std::collections::HashSet;

use osmpbf::{Element, RelMemberType};
use pbfparquet_core::{
    MemberKind, OsmDataset, OsmNode, OsmRelation, OsmWay, RelationMember, collect_tags,
    validated_coord,
};

use super::OsmIngestSummary;

#[derive(Debug, Default)]
pub(super) struct OsmDatasetAccumulator {
    summary: OsmIngestSummary,
    dataset: OsmDataset,
}

impl OsmDatasetAccumulator {
    pub(super) fn process_element(&mut self, element: Element<'_>) {
        match element {
            Element::Node(node) => self.process_node(node.id(), node.lon(), node.lat(), node.tags()),
            Element::DenseNode(node) => {
                self.process_node(node.id(), node.lon(), node.lat(), node.tags());
            }
            Element::Way(way) => {
                self.summary.record_way();
                self.dataset.insert_way(OsmWay {
                    id: way.id(),
                    refs: way.refs().collect(),
                    tags: collect_tags(way.tags()),
                });
            }
            Element::Relation(relation) => {
                self.summary.record_relation();
                let members = relation
                    .members()
                    .map(|member| {
                        let kind = match member.member_type {
                            RelMemberType::Node => MemberKind::Node,
                            RelMemberType::Way => MemberKind::Way,
                            RelMemberType::Relation => MemberKind::Relation,
                        };
                        RelationMember::new(kind, member.member_id, member.role().unwrap_or(""))
                    })
                    .collect();
                self.dataset.insert_relation(OsmRelation {
                    id: relation.id(),
                    members,
                    tags: collect_tags(relation.tags()),
                });
            }
        }
    }

    fn process_node<'a, T>(&mut self, id: i64, lon: f64, lat: f64, tags: T)
    where
        T: IntoIterator<Item = (&'a str, &'a str)>,
    {
        self.summary.record_node(lon, lat);
        let mut tags = tags.into_iter().peekable();
        if tags.peek().is_none() {
            return;
        }
        // Tagged nodes with unusable positions cannot become points.
        let Some(location) = validated_coord(lon, lat) else {
            return;
        };
        self.dataset.insert_node(OsmNode {
            id,
            location,
            tags: collect_tags(tags),
        });
    }

    pub(super) fn combine(mut self, other: Self) -> Self {
        self.summary = self.summary.combine(other.summary);
        self.dataset = self.dataset.combine(other.dataset);
        self
    }

    pub(super) fn into_parts(self) -> (OsmIngestSummary, OsmDataset) {
        (self.summary, self.dataset)
    }
}

/// Records coordinates for a fixed set of wanted node ids.
pub(super) struct CoordinateResolver<'d> {
    pending: HashSet<i64>,
    dataset: &'d mut OsmDataset,
}

impl<'d> CoordinateResolver<'d> {
    pub(super) fn new(pending: HashSet<i64>, dataset: &'d mut OsmDataset) -> Self {
        Self { pending, dataset }
    }

    pub(super) fn resolve(&mut self, id: i64, lon: f64, lat: f64) {
        if !self.pending.contains(&id) {
            return;
        }
        // Invalid positions stay pending and are reported as unresolved.
        if let Some(location) = validated_coord(lon, lat) {
            self.pending.remove(&id);
            self.dataset.insert_coordinate(id, location);
        }
    }

    pub(super) fn pending_count(&self) -> usize {
        self.pending.len()
    }
}
