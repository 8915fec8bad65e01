//! Counters describing what assembly kept and why it dropped the rest.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::FeatureKind;

/// Why an element did not become a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Tags did not satisfy the configured tags filter.
    FilteredByTags,
    /// A way referenced nodes without known coordinates.
    UnresolvedWay,
    /// A relation carried no tag other than `type`.
    UntaggedRelation,
    /// The relation type is outside the enabled set.
    ExcludedRelationType,
    /// A node-only relation while node-only relations are disabled.
    NodeOnlyRelation,
    /// A relation with no way or node members to build geometry from.
    NoGeometryMembers,
    /// Area members did not close into rings.
    UnclosedArea,
    /// Members resolved to an empty geometry.
    EmptyGeometry,
}

impl DropReason {
    /// Return the reason as a `snake_case` label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FilteredByTags => "filtered_by_tags",
            Self::UnresolvedWay => "unresolved_way",
            Self::UntaggedRelation => "untagged_relation",
            Self::ExcludedRelationType => "excluded_relation_type",
            Self::NodeOnlyRelation => "node_only_relation",
            Self::NoGeometryMembers => "no_geometry_members",
            Self::UnclosedArea => "unclosed_area",
            Self::EmptyGeometry => "empty_geometry",
        }
    }
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kept and dropped counts per element kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssemblyReport {
    /// Node features written.
    pub nodes: usize,
    /// Way features written.
    pub ways: usize,
    /// Relation features written.
    pub relations: usize,
    /// Relation features carrying the nested relation ids tag.
    pub relations_with_nested_ids: usize,
    /// Dropped elements per kind and reason.
    pub dropped: BTreeMap<String, BTreeMap<DropReason, usize>>,
}

impl AssemblyReport {
    pub(crate) fn record_kept(&mut self, kind: FeatureKind) {
        match kind {
            FeatureKind::Node => self.nodes += 1,
            FeatureKind::Way => self.ways += 1,
            FeatureKind::Relation => self.relations += 1,
        }
    }

    pub(crate) fn record_dropped(&mut self, kind: FeatureKind, reason: DropReason) {
        *self
            .dropped
            .entry(kind.as_str().to_owned())
            .or_default()
            .entry(reason)
            .or_default() += 1;
    }

    /// How many elements of `kind` were dropped for `reason`.
    #[must_use]
    pub fn dropped_count(&self, kind: FeatureKind, reason: DropReason) -> usize {
        self.dropped
            .get(kind.as_str())
            .and_then(|reasons| reasons.get(&reason))
            .copied()
            .unwrap_or_default()
    }

    /// Total features written.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.nodes + self.ways + self.relations
    }
}
