use super::*;
use pbfparquet_core::MemberKind;
use rstest::{fixture, rstest};
use std::path::PathBuf;
use tempfile::TempPath;

mod support {
    include!(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/support.rs"));
}

use support::{assert_close, decode_fixture};

#[fixture]
fn fixtures_dir() -> PathBuf {
    support::fixtures_dir()
}

#[fixture]
fn relations_pbf(#[from(fixtures_dir)] dir: PathBuf) -> TempPath {
    decode_fixture(&dir, "relations")
}

#[fixture]
fn invalid_pbf(#[from(fixtures_dir)] dir: PathBuf) -> TempPath {
    decode_fixture(&dir, "invalid")
}

#[rstest]
fn summarises_relations_fixture(relations_pbf: TempPath) -> Result<(), OsmIngestError> {
    let report = load_osm_dataset(relations_pbf.as_ref(), &ConversionOptions::default())?;
    let summary = report.summary;
    assert_eq!(summary.nodes, 24, "expected 24 nodes");
    assert_eq!(summary.ways, 8, "expected eight ways");
    assert_eq!(summary.relations, 9, "expected nine relations");

    let bounds = summary.bounds.expect("expected bounds for sample nodes");
    assert_close(bounds.min().x, 7.40);
    assert_close(bounds.max().x, 7.471);
    assert_close(bounds.min().y, 43.70);
    assert_close(bounds.max().y, 43.761);
    Ok(())
}

#[rstest]
fn keeps_tagged_nodes_and_all_ways_and_relations(
    relations_pbf: TempPath,
) -> Result<(), OsmIngestError> {
    let report = load_osm_dataset(relations_pbf.as_ref(), &ConversionOptions::default())?;
    assert_eq!(report.dataset.counts(), (2, 8, 9));

    let cafe = report
        .dataset
        .nodes()
        .find(|node| node.id == 20)
        .expect("tagged cafe node");
    assert_eq!(
        cafe.tags.get("name").map(String::as_str),
        Some("Café du Port")
    );

    let route = report.dataset.relation(1_057_560).expect("route relation");
    let kinds: Vec<MemberKind> = route.members.iter().map(|member| member.kind).collect();
    assert_eq!(kinds, vec![MemberKind::Node, MemberKind::Way, MemberKind::Way]);
    assert_eq!(
        route.members.first().map(|member| member.role.as_str()),
        Some("stop")
    );
    Ok(())
}

#[rstest]
fn second_pass_resolves_way_nodes(relations_pbf: TempPath) -> Result<(), OsmIngestError> {
    let report = load_osm_dataset(relations_pbf.as_ref(), &ConversionOptions::default())?;
    let corner = report.dataset.coordinate(1).expect("outer ring corner");
    assert_close(corner.x, 7.40);
    assert_close(corner.y, 43.70);
    // Way 208 points at node 999, which the file does not contain.
    assert_eq!(report.unresolved_nodes, 1);
    assert!(
        report
            .dataset
            .missing_coordinates(&ConversionOptions::default())
            .contains(&999)
    );
    Ok(())
}

#[rstest]
fn node_only_relations_request_member_nodes(
    relations_pbf: TempPath,
) -> Result<(), OsmIngestError> {
    let without = load_osm_dataset(relations_pbf.as_ref(), &ConversionOptions::default())?;
    assert!(without.dataset.coordinate(30).is_none());

    let node_only = ConversionOptions::default().with_node_only_relations(true);
    let alone = load_osm_dataset(relations_pbf.as_ref(), &node_only)?;
    assert!(alone.dataset.coordinate(30).is_none());

    let options = node_only.with_non_closed_relations(true);
    let with = load_osm_dataset(relations_pbf.as_ref(), &options)?;
    let site = with.dataset.coordinate(30).expect("site member node");
    assert_close(site.x, 7.43);
    assert_close(site.y, 43.74);
    Ok(())
}

#[rstest]
fn propagates_open_error(#[from(fixtures_dir)] dir: PathBuf) {
    let missing = dir.join("missing.osm.pbf");
    let err = load_osm_dataset(&missing, &ConversionOptions::default())
        .expect_err("expected failure for missing file");
    match err {
        OsmIngestError::Open { path, .. } => assert_eq!(path, missing),
        other => panic!("expected open error, got {other:?}"),
    }
}

#[rstest]
fn rejects_invalid_payload(invalid_pbf: TempPath) {
    let err = load_osm_dataset(invalid_pbf.as_ref(), &ConversionOptions::default())
        .expect_err("expected failure when decoding invalid data");
    match err {
        OsmIngestError::Decode { source, path } => {
            let extension = path.extension().and_then(|ext| ext.to_str());
            assert_eq!(extension, Some("pbf"), "unexpected path in error: {path:?}");
            assert!(
                !source.to_string().is_empty(),
                "decode error should preserve the source message"
            );
        }
        other => panic!("expected decode error, got {other:?}"),
    }
}
