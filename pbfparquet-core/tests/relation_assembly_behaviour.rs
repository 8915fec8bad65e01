//! Behavioural tests for relation gating in `FeatureAssembler`.

use std::{cell::RefCell, fs, path::PathBuf};

use geo::{Coord, Geometry};
use pbfparquet_core::{
    Assembly, ConversionOptions, DropReason, FeatureAssembler, FeatureId, FeatureKind,
    MemberKind, OsmDataset, OsmRelation, OsmWay, RelationMember, Tags, collect_tags,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

const WATERWAY_ID: i64 = 1;
const SITE_ID: i64 = 2;

#[fixture]
fn dataset() -> RefCell<OsmDataset> {
    RefCell::new(OsmDataset::new())
}

#[fixture]
fn assembly() -> RefCell<Option<Assembly>> {
    RefCell::new(None)
}

fn assemble_with(
    options: &ConversionOptions,
    dataset: &RefCell<OsmDataset>,
    assembly: &RefCell<Option<Assembly>>,
) {
    let built = FeatureAssembler::new(options).assemble(&dataset.borrow());
    assembly.replace(Some(built));
}

fn relation_geometry(assembly: &RefCell<Option<Assembly>>, id: i64) -> Geometry<f64> {
    let borrowed = assembly.borrow();
    let built = borrowed.as_ref().expect("dataset was assembled");
    built
        .features
        .iter()
        .find(|feature| feature.id == FeatureId::relation(id))
        .map(|feature| feature.geometry.clone())
        .unwrap_or_else(|| panic!("relation {id} missing from {:?}", built.report))
}

fn dropped(assembly: &RefCell<Option<Assembly>>, reason: DropReason) -> usize {
    let borrowed = assembly.borrow();
    let built = borrowed.as_ref().expect("dataset was assembled");
    built.report.dropped_count(FeatureKind::Relation, reason)
}

#[given("a waterway relation whose ways form a loop")]
fn looped_waterway(#[from(dataset)] dataset: &RefCell<OsmDataset>) {
    let mut data = dataset.borrow_mut();
    for (id, x, y) in [(1, 0.0, 0.0), (2, 1.0, 0.0), (3, 1.0, 1.0), (4, 0.0, 1.0)] {
        data.insert_coordinate(id, Coord { x, y });
    }
    for (id, refs) in [(10, vec![1, 2, 3]), (11, vec![3, 4, 1])] {
        data.insert_way(OsmWay {
            id,
            refs,
            tags: Tags::new(),
        });
    }
    data.insert_relation(OsmRelation {
        id: WATERWAY_ID,
        members: vec![
            RelationMember::new(MemberKind::Way, 10, "main_stream"),
            RelationMember::new(MemberKind::Way, 11, "main_stream"),
        ],
        tags: collect_tags([("type", "waterway"), ("name", "Moat")]),
    });
}

#[given("a site relation with two node members")]
fn two_node_site(#[from(dataset)] dataset: &RefCell<OsmDataset>) {
    let mut data = dataset.borrow_mut();
    data.insert_coordinate(5, Coord { x: 2.0, y: 2.0 });
    data.insert_coordinate(6, Coord { x: 3.0, y: 2.5 });
    data.insert_relation(OsmRelation {
        id: SITE_ID,
        members: vec![
            RelationMember::new(MemberKind::Node, 5, ""),
            RelationMember::new(MemberKind::Node, 6, ""),
        ],
        tags: collect_tags([("type", "site"), ("name", "Campus")]),
    });
}

#[when("I assemble the dataset with default options")]
fn assemble_default(
    #[from(dataset)] dataset: &RefCell<OsmDataset>,
    #[from(assembly)] assembly: &RefCell<Option<Assembly>>,
) {
    assemble_with(&ConversionOptions::default(), dataset, assembly);
}

#[when("I assemble the dataset with non-closed relations")]
fn assemble_non_closed(
    #[from(dataset)] dataset: &RefCell<OsmDataset>,
    #[from(assembly)] assembly: &RefCell<Option<Assembly>>,
) {
    let options = ConversionOptions::default().with_non_closed_relations(true);
    assemble_with(&options, dataset, assembly);
}

#[when("I assemble the dataset with every relation option")]
fn assemble_everything(
    #[from(dataset)] dataset: &RefCell<OsmDataset>,
    #[from(assembly)] assembly: &RefCell<Option<Assembly>>,
) {
    let options = ConversionOptions::default()
        .with_non_closed_relations(true)
        .with_node_only_relations(true);
    assemble_with(&options, dataset, assembly);
}

#[then("the waterway relation is dropped as an excluded type")]
fn waterway_excluded(#[from(assembly)] assembly: &RefCell<Option<Assembly>>) {
    assert_eq!(dropped(assembly, DropReason::ExcludedRelationType), 1);
}

#[then("the waterway relation is a single closed line")]
fn waterway_line(#[from(assembly)] assembly: &RefCell<Option<Assembly>>) {
    match relation_geometry(assembly, WATERWAY_ID) {
        Geometry::LineString(line) => {
            assert!(line.is_closed(), "expected a closed loop: {line:?}");
            assert_eq!(line.0.len(), 5);
        }
        other => panic!("expected a LineString, got {other:?}"),
    }
}

#[then("the site relation is a MultiPoint with {count} points")]
fn site_points(#[from(assembly)] assembly: &RefCell<Option<Assembly>>, count: usize) {
    match relation_geometry(assembly, SITE_ID) {
        Geometry::MultiPoint(points) => assert_eq!(points.0.len(), count),
        other => panic!("expected a MultiPoint, got {other:?}"),
    }
}

#[then("the site relation is dropped as node-only")]
fn site_skipped(#[from(assembly)] assembly: &RefCell<Option<Assembly>>) {
    assert_eq!(dropped(assembly, DropReason::NodeOnlyRelation), 1);
}

#[test]
fn scenario_indices_follow_feature_order() {
    let feature = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/features/relation_assembly.feature");
    let contents = fs::read_to_string(&feature).unwrap_or_else(|err| {
        panic!("failed to read feature file {feature:?}: {err}");
    });
    let titles: Vec<&str> = contents
        .lines()
        .filter_map(|line| line.trim().strip_prefix("Scenario: "))
        .collect();
    assert_eq!(
        titles,
        [
            "excluding a waterway relation by default",
            "keeping a looped waterway as a line",
            "emitting a two-node site as points",
            "skipping a two-node site without the node-only option",
        ]
    );
}

#[scenario(path = "tests/features/relation_assembly.feature", index = 0)]
fn excluding_waterway(dataset: RefCell<OsmDataset>, assembly: RefCell<Option<Assembly>>) {
    let _ = (dataset, assembly);
}

#[scenario(path = "tests/features/relation_assembly.feature", index = 1)]
fn keeping_waterway_line(dataset: RefCell<OsmDataset>, assembly: RefCell<Option<Assembly>>) {
    let _ = (dataset, assembly);
}

#[scenario(path = "tests/features/relation_assembly.feature", index = 2)]
fn emitting_site_points(dataset: RefCell<OsmDataset>, assembly: RefCell<Option<Assembly>>) {
    let _ = (dataset, assembly);
}

#[scenario(path = "tests/features/relation_assembly.feature", index = 3)]
fn skipping_site_points(dataset: RefCell<OsmDataset>, assembly: RefCell<Option<Assembly>>) {
    let _ = (dataset, assembly);
}
