//! End-to-end checks of relation handling, from a PBF file to a read-back table.

use camino::Utf8PathBuf;
use pbfparquet_core::{
    ConversionOptions, FeatureId, FeatureKind, FeatureTable, GeometryKind,
    NESTED_RELATION_IDS_TAG, NODE_ONLY_RELATIONS_SUFFIX, NON_CLOSED_RELATIONS_SUFFIX,
    VerbosityMode,
};
use pbfparquet_data::{PbfFileReader, read_geo_metadata};
use rstest::{fixture, rstest};
use tempfile::TempDir;

mod support;

const ROUTE: FeatureId = FeatureId::relation(1_057_560);
const SINGLE_NODE_SITE: FeatureId = FeatureId::relation(530_299);
const TWO_NODE_SITE: FeatureId = FeatureId::relation(530_300);

struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
    pbf: Utf8PathBuf,
}

impl Workspace {
    fn reader(&self, non_closed: bool, node_only: bool) -> PbfFileReader {
        let options = ConversionOptions::default()
            .with_non_closed_relations(non_closed)
            .with_node_only_relations(node_only)
            .with_verbosity(VerbosityMode::Silent);
        PbfFileReader::new(options).with_working_directory(self.root.join("files"))
    }

    fn features(&self, non_closed: bool, node_only: bool) -> FeatureTable {
        self.reader(non_closed, node_only)
            .convert_pbf_to_features(&self.pbf, false)
            .expect("conversion succeeds")
    }
}

#[fixture]
fn workspace() -> Workspace {
    let dir = tempfile::tempdir().expect("temp dir");
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir");
    let pbf = root.join("monaco.osm.pbf");
    support::decode_fixture_to(&support::fixtures_dir(), "relations", pbf.as_std_path());
    Workspace {
        _dir: dir,
        root,
        pbf,
    }
}

#[rstest]
#[case(false, false, 8)]
#[case(true, false, 11)]
#[case(false, true, 8)]
#[case(true, true, 13)]
fn every_option_combination_yields_rows(
    workspace: Workspace,
    #[case] non_closed: bool,
    #[case] node_only: bool,
    #[case] expected: usize,
) {
    let table = workspace.features(non_closed, node_only);
    assert_eq!(table.len(), expected);
    assert!(table.duplicate_ids().is_empty());
    for kind in [FeatureKind::Node, FeatureKind::Way, FeatureKind::Relation] {
        assert!(
            table.of_kind(kind).next().is_some(),
            "expected at least one {kind} row"
        );
    }
}

#[rstest]
fn default_relations_are_areal(workspace: Workspace) {
    let table = workspace.features(false, false);
    let histogram = table.geometry_kind_counts(FeatureKind::Relation);
    assert!(!histogram.is_empty());
    assert!(
        histogram.keys().all(GeometryKind::is_areal),
        "unexpected relation geometries: {histogram:?}"
    );
    assert!(!table.contains(ROUTE));
}

#[rstest]
fn route_appears_with_non_closed_relations(workspace: Workspace) {
    let table = workspace.features(true, false);
    let route = table.get(ROUTE).expect("route relation row");
    assert_eq!(route.geometry_kind(), GeometryKind::LineString);
    assert_eq!(route.tags.get("name").map(String::as_str), Some("TER"));
    assert!(!table.contains(SINGLE_NODE_SITE));
}

#[rstest]
fn node_only_sites_need_both_options(workspace: Workspace) {
    let partial = workspace.features(false, true);
    assert!(!partial.contains(SINGLE_NODE_SITE));
    assert!(!partial.contains(TWO_NODE_SITE));

    let table = workspace.features(true, true);
    let single = table.get(SINGLE_NODE_SITE).expect("single-node site");
    assert_eq!(single.geometry_kind(), GeometryKind::Point);
    let pair = table.get(TWO_NODE_SITE).expect("two-node site");
    assert_eq!(pair.geometry_kind(), GeometryKind::MultiPoint);

    let histogram = table.geometry_kind_counts(FeatureKind::Relation);
    assert_eq!(histogram.get(&GeometryKind::Point), Some(&1));
    assert_eq!(histogram.get(&GeometryKind::MultiPoint), Some(&1));
}

#[rstest]
#[case(false)]
#[case(true)]
fn nested_relation_ids_are_comma_separated_digits(workspace: Workspace, #[case] non_closed: bool) {
    let table = workspace.features(non_closed, false);
    let nested: Vec<&str> = table
        .of_kind(FeatureKind::Relation)
        .filter_map(|feature| feature.tags.get(NESTED_RELATION_IDS_TAG))
        .map(String::as_str)
        .collect();
    assert!(!nested.is_empty());
    for value in nested {
        assert!(
            value
                .split(',')
                .all(|id| !id.is_empty() && id.bytes().all(|byte| byte.is_ascii_digit())),
            "malformed nested id list {value:?}"
        );
    }
}

#[rstest]
#[case(false, false, "monaco_nofilter_noclip_compact.parquet")]
#[case(true, false, "monaco_nofilter_noclip_compact_nonclosedrelas.parquet")]
#[case(false, true, "monaco_nofilter_noclip_compact_nodeonlyrelas.parquet")]
#[case(
    true,
    true,
    "monaco_nofilter_noclip_compact_nonclosedrelas_nodeonlyrelas.parquet"
)]
fn result_names_carry_option_markers(
    workspace: Workspace,
    #[case] non_closed: bool,
    #[case] node_only: bool,
    #[case] expected: &str,
) {
    let path = workspace
        .reader(non_closed, node_only)
        .convert_pbf_to_parquet(&workspace.pbf, false)
        .expect("conversion succeeds");
    assert_eq!(path.file_name(), Some(expected));
    assert_eq!(path.as_str().contains(NON_CLOSED_RELATIONS_SUFFIX), non_closed);
    assert_eq!(path.as_str().contains(NODE_ONLY_RELATIONS_SUFFIX), node_only);

    let metadata = read_geo_metadata(&path).expect("geo metadata");
    assert!(metadata.primary().is_some_and(|column| column.bbox.is_some()));
}
