//! Build output features from an [`OsmDataset`].
//!
//! Responsibilities:
//! - Emit tagged nodes as points and tagged ways as lines or polygons.
//! - Gate relations by type and member composition, then build areas, lines
//!   or points for them.
//! - Attach the nested relation ids tag and count every drop.
//!
//! Boundaries:
//! - No I/O; the dataset is fully resolved by the caller.
//! - Nested relations are listed in a tag, never resolved into geometry.

mod geometry;
mod relation;
mod report;

use geo::Geometry;

pub use relation::{
    AREA_RELATION_TYPES, RelationComposition, is_area_relation, nested_relation_ids,
};
pub use report::{AssemblyReport, DropReason};

use crate::{
    ConversionOptions, Feature, FeatureId, FeatureKind, MemberKind, NESTED_RELATION_IDS_TAG,
    OsmDataset, OsmNode, OsmRelation, OsmWay, UnclosedRing, is_area, merge_lines, stitch_rings,
};

/// Features in output order together with the assembly counters.
#[derive(Debug, Clone, PartialEq)]
pub struct Assembly {
    /// Nodes, then ways, then relations, each ascending by id.
    pub features: Vec<Feature>,
    /// What was kept and dropped.
    pub report: AssemblyReport,
}

/// Applies [`ConversionOptions`] to a dataset.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use pbfparquet_core::{ConversionOptions, FeatureAssembler, OsmDataset, OsmNode, Tags};
///
/// let mut dataset = OsmDataset::new();
/// dataset.insert_node(OsmNode {
///     id: 20,
///     location: Coord { x: 7.415, y: 43.705 },
///     tags: Tags::from([("amenity".to_owned(), "cafe".to_owned())]),
/// });
/// let assembly = FeatureAssembler::new(&ConversionOptions::default()).assemble(&dataset);
/// assert_eq!(assembly.features.len(), 1);
/// assert_eq!(assembly.report.nodes, 1);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FeatureAssembler<'a> {
    options: &'a ConversionOptions,
}

impl<'a> FeatureAssembler<'a> {
    /// Create an assembler for the given options.
    #[must_use]
    pub const fn new(options: &'a ConversionOptions) -> Self {
        Self { options }
    }

    /// Build every feature the options allow.
    #[must_use]
    pub fn assemble(&self, dataset: &OsmDataset) -> Assembly {
        let mut report = AssemblyReport::default();
        let mut features = Vec::new();

        let nodes = dataset
            .nodes()
            .map(|node| (FeatureKind::Node, self.node_feature(node)));
        let ways = dataset
            .ways()
            .filter(|way| !way.tags.is_empty())
            .map(|way| (FeatureKind::Way, self.way_feature(dataset, way)));
        let relations = dataset.relations().map(|relation| {
            (
                FeatureKind::Relation,
                self.relation_feature(dataset, relation),
            )
        });

        for (kind, outcome) in nodes.chain(ways).chain(relations) {
            match outcome {
                Ok(feature) => {
                    report.record_kept(kind);
                    if feature.tags.contains_key(NESTED_RELATION_IDS_TAG) {
                        report.relations_with_nested_ids += 1;
                    }
                    features.push(feature);
                }
                Err(reason) => report.record_dropped(kind, reason),
            }
        }

        Assembly { features, report }
    }

    fn node_feature(&self, node: &OsmNode) -> Result<Feature, DropReason> {
        if !self.options.tags_filter.matches(&node.tags) {
            return Err(DropReason::FilteredByTags);
        }
        Ok(Feature::new(
            FeatureId::node(node.id),
            node.tags.clone(),
            Geometry::Point(node.location.into()),
        ))
    }

    fn way_feature(&self, dataset: &OsmDataset, way: &OsmWay) -> Result<Feature, DropReason> {
        if !self.options.tags_filter.matches(&way.tags) {
            return Err(DropReason::FilteredByTags);
        }
        let coords =
            geometry::resolve_all(dataset, &way.refs).ok_or(DropReason::UnresolvedWay)?;
        let shape = if way.is_closed() && coords.len() >= 4 && is_area(&way.tags) {
            geometry::polygons_from_rings(vec![coords], Vec::new())
        } else {
            geometry::lines(vec![coords])
        }
        .ok_or(DropReason::EmptyGeometry)?;
        Ok(Feature::new(FeatureId::way(way.id), way.tags.clone(), shape))
    }

    fn relation_feature(
        &self,
        dataset: &OsmDataset,
        relation: &OsmRelation,
    ) -> Result<Feature, DropReason> {
        if !relation::has_descriptive_tags(relation) {
            return Err(DropReason::UntaggedRelation);
        }
        if !self.options.tags_filter.matches(&relation.tags) {
            return Err(DropReason::FilteredByTags);
        }
        let area_type = is_area_relation(relation);
        if !area_type && !self.options.include_non_closed_relations {
            return Err(DropReason::ExcludedRelationType);
        }

        let shape = match RelationComposition::of(relation) {
            RelationComposition::NodeOnly if self.options.emits_node_only_relations() => {
                let members: Vec<i64> = relation
                    .members_of(MemberKind::Node)
                    .map(|member| member.id)
                    .collect();
                geometry::points(geometry::resolve_known(dataset, &members))
                    .ok_or(DropReason::EmptyGeometry)?
            }
            RelationComposition::NodeOnly => return Err(DropReason::NodeOnlyRelation),
            RelationComposition::WithoutGeometryMembers => {
                return Err(DropReason::NoGeometryMembers);
            }
            RelationComposition::WithWays => {
                self.way_member_geometry(dataset, relation, area_type)?
            }
        };

        let mut tags = relation.tags.clone();
        if let Some(nested) = nested_relation_ids(relation) {
            tags.insert(NESTED_RELATION_IDS_TAG.to_owned(), nested);
        }
        Ok(Feature::new(FeatureId::relation(relation.id), tags, shape))
    }

    fn way_member_geometry(
        &self,
        dataset: &OsmDataset,
        relation: &OsmRelation,
        area_type: bool,
    ) -> Result<Geometry<f64>, DropReason> {
        let non_closed = self.options.include_non_closed_relations;
        if area_type || !relation::is_linear_relation(relation) {
            match area_geometry(dataset, relation) {
                Ok(shape) => return Ok(shape),
                Err(reason) if !non_closed => return Err(reason),
                Err(_) => {}
            }
        }
        line_geometry(dataset, relation).ok_or(DropReason::EmptyGeometry)
    }
}

fn member_way_refs<'d>(
    dataset: &'d OsmDataset,
    relation: &OsmRelation,
    role_filter: impl Fn(&str) -> bool,
) -> Vec<&'d [i64]> {
    relation
        .members_of(MemberKind::Way)
        .filter(|member| role_filter(&member.role))
        .filter_map(|member| dataset.way(member.id))
        .map(|way| way.refs.as_slice())
        .collect()
}

fn resolved_rings(
    dataset: &OsmDataset,
    sequences: Vec<&[i64]>,
) -> Result<Vec<Vec<geo::Coord<f64>>>, DropReason> {
    let rings = stitch_rings(sequences.into_iter().map(<[i64]>::to_vec).collect())
        .map_err(|UnclosedRing { .. }| DropReason::UnclosedArea)?;
    rings
        .iter()
        .map(|ring| geometry::resolve_all(dataset, ring).ok_or(DropReason::UnclosedArea))
        .collect()
}

fn area_geometry(
    dataset: &OsmDataset,
    relation: &OsmRelation,
) -> Result<Geometry<f64>, DropReason> {
    let outers = resolved_rings(
        dataset,
        member_way_refs(dataset, relation, |role| role != "inner"),
    )?;
    let inners = resolved_rings(
        dataset,
        member_way_refs(dataset, relation, |role| role == "inner"),
    )?;
    geometry::polygons_from_rings(outers, inners).ok_or(DropReason::UnclosedArea)
}

fn line_geometry(dataset: &OsmDataset, relation: &OsmRelation) -> Option<Geometry<f64>> {
    let sequences = member_way_refs(dataset, relation, |_| true)
        .into_iter()
        .map(<[i64]>::to_vec)
        .collect();
    let merged = merge_lines(sequences);
    geometry::lines(
        merged
            .iter()
            .map(|line| geometry::resolve_known(dataset, line))
            .collect(),
    )
}
