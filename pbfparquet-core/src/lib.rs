//! Core domain types for the pbfparquet converter.
//!
//! This crate holds everything that does not touch the filesystem: raw OSM
//! elements and the dataset built from them, the conversion options, the
//! rules deciding which elements become features, and the geometry assembly
//! that turns node references into WGS84 shapes.
//!
//! # Examples
//! ```
//! use pbfparquet_core::{ConversionOptions, FeatureAssembler, OsmDataset};
//!
//! let options = ConversionOptions::default().with_non_closed_relations(true);
//! let assembly = FeatureAssembler::new(&options).assemble(&OsmDataset::new());
//! assert!(assembly.features.is_empty());
//! assert_eq!(assembly.report.total(), 0);
//! ```

pub mod area;
pub mod assemble;
pub mod element;
pub mod feature;
pub mod options;
pub mod rings;
pub mod table;
pub mod tags;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use area::is_area;
pub use assemble::{
    AREA_RELATION_TYPES, Assembly, AssemblyReport, DropReason, FeatureAssembler,
    RelationComposition, is_area_relation, nested_relation_ids,
};
pub use element::{
    MemberKind, OsmDataset, OsmNode, OsmRelation, OsmWay, RelationMember, validated_coord,
};
pub use feature::{Feature, FeatureId, FeatureIdParseError, FeatureKind, GeometryKind};
pub use options::{
    ConversionOptions, NODE_ONLY_RELATIONS_SUFFIX, NON_CLOSED_RELATIONS_SUFFIX,
    ParseVerbosityModeError, VerbosityMode, pbf_stem,
};
pub use rings::{UnclosedRing, merge_lines, stitch_rings};
pub use table::FeatureTable;
pub use tags::{NESTED_RELATION_IDS_TAG, TagSelector, Tags, TagsFilter, collect_tags};
