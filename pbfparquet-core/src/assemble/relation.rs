//! Relation classification: type gating, member composition and the nested
//! relation ids tag.

use itertools::Itertools;

use crate::{MemberKind, OsmRelation};

/// Relation types emitted when non-closed relations are disabled.
pub const AREA_RELATION_TYPES: [&str; 2] = ["multipolygon", "boundary"];

/// Relation types that are never closed into polygons, even when their way
/// members happen to form a loop.
const LINEAR_RELATION_TYPES: [&str; 7] = [
    "multilinestring",
    "network",
    "restriction",
    "route",
    "street",
    "superroute",
    "waterway",
];

/// Which members a relation's geometry can be built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationComposition {
    /// At least one way member.
    WithWays,
    /// Only node members, at least one.
    NodeOnly,
    /// No way members and not purely nodes (relation members, mixtures, or empty).
    WithoutGeometryMembers,
}

impl RelationComposition {
    /// Classify a relation by its members.
    #[must_use]
    pub fn of(relation: &OsmRelation) -> Self {
        if relation.members_of(MemberKind::Way).next().is_some() {
            Self::WithWays
        } else if !relation.members.is_empty()
            && relation
                .members
                .iter()
                .all(|member| member.kind == MemberKind::Node)
        {
            Self::NodeOnly
        } else {
            Self::WithoutGeometryMembers
        }
    }
}

/// Whether the relation is `type=multipolygon` or `type=boundary`.
#[must_use]
pub fn is_area_relation(relation: &OsmRelation) -> bool {
    relation
        .relation_type()
        .is_some_and(|kind| AREA_RELATION_TYPES.contains(&kind))
}

pub(super) fn is_linear_relation(relation: &OsmRelation) -> bool {
    relation
        .relation_type()
        .is_some_and(|kind| LINEAR_RELATION_TYPES.contains(&kind))
}

/// Whether the relation has a tag other than `type`.
pub(super) fn has_descriptive_tags(relation: &OsmRelation) -> bool {
    relation.tags.keys().any(|key| key != "type")
}

/// Comma-separated ids of nested relation members, first occurrence order.
///
/// Non-positive ids, which only occur in unuploaded editor data, are skipped
/// so the value stays digits and commas. Returns `None` when no relation
/// member remains.
///
/// # Examples
/// ```
/// use pbfparquet_core::{MemberKind, OsmRelation, RelationMember, Tags, nested_relation_ids};
///
/// let relation = OsmRelation {
///     id: 1,
///     members: vec![
///         RelationMember::new(MemberKind::Relation, 30, ""),
///         RelationMember::new(MemberKind::Way, 7, "outer"),
///         RelationMember::new(MemberKind::Relation, 12, ""),
///         RelationMember::new(MemberKind::Relation, 30, ""),
///     ],
///     tags: Tags::new(),
/// };
/// assert_eq!(nested_relation_ids(&relation).as_deref(), Some("30,12"));
/// ```
#[must_use]
pub fn nested_relation_ids(relation: &OsmRelation) -> Option<String> {
    let joined = relation
        .members_of(MemberKind::Relation)
        .map(|member| member.id)
        .filter(|id| *id > 0)
        .unique()
        .join(",");
    (!joined.is_empty()).then_some(joined)
}
