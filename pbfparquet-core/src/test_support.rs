//! Test-only, in-memory copy of the bundled `relations.osm.pbf` fixture used
//! by unit and behaviour tests.
//!
//! The dataset is small but covers every relation path: a multipolygon with a
//! hole, two boundaries, a route, single- and two-node `site` relations, a
//! relation-only `route_master`, a `site` nesting two relations and an
//! unclosed multipolygon.

use geo::Coord;

use crate::{MemberKind, OsmDataset, OsmNode, OsmRelation, OsmWay, RelationMember, collect_tags};

/// Relation id of the TER train route.
pub const ROUTE_RELATION_ID: i64 = 1_057_560;
/// Relation id of the `site` with a single node member.
pub const SINGLE_NODE_SITE_ID: i64 = 530_299;
/// Relation id of the `site` with two node members.
pub const TWO_NODE_SITE_ID: i64 = 530_300;
/// Relation id of the `site` nesting relations 100 and 101.
pub const NESTING_SITE_ID: i64 = 103;
/// Relation id of the multipolygon whose only member way is open.
pub const UNCLOSED_MULTIPOLYGON_ID: i64 = 104;

const COORDINATES: &[(i64, f64, f64)] = &[
    (1, 7.40, 43.70),
    (2, 7.41, 43.70),
    (3, 7.41, 43.71),
    (4, 7.40, 43.71),
    (5, 7.402, 43.702),
    (6, 7.408, 43.702),
    (7, 7.408, 43.708),
    (8, 7.402, 43.708),
    (9, 7.42, 43.72),
    (10, 7.43, 43.72),
    (11, 7.43, 43.73),
    (12, 7.42, 43.73),
    (13, 7.44, 43.74),
    (14, 7.45, 43.745),
    (15, 7.46, 43.75),
    (30, 7.43, 43.74),
    (31, 7.431, 43.741),
    (32, 7.432, 43.742),
    (40, 7.47, 43.76),
    (41, 7.471, 43.76),
    (42, 7.471, 43.761),
    (43, 7.47, 43.761),
];

fn node(id: i64, x: f64, y: f64, tags: &[(&str, &str)]) -> OsmNode {
    OsmNode {
        id,
        location: Coord { x, y },
        tags: collect_tags(tags.iter().copied()),
    }
}

fn way(id: i64, refs: &[i64], tags: &[(&str, &str)]) -> OsmWay {
    OsmWay {
        id,
        refs: refs.to_vec(),
        tags: collect_tags(tags.iter().copied()),
    }
}

fn relation(id: i64, members: &[(MemberKind, i64, &str)], tags: &[(&str, &str)]) -> OsmRelation {
    OsmRelation {
        id,
        members: members
            .iter()
            .map(|(kind, member_id, role)| RelationMember::new(*kind, *member_id, *role))
            .collect(),
        tags: collect_tags(tags.iter().copied()),
    }
}

/// The fixture dataset with every coordinate already resolved.
#[must_use]
pub fn sample_dataset() -> OsmDataset {
    use MemberKind::{Node, Relation, Way};

    let mut dataset = OsmDataset::new();
    for (id, x, y) in COORDINATES {
        dataset.insert_coordinate(*id, Coord { x: *x, y: *y });
    }
    dataset.insert_node(node(
        20,
        7.415,
        43.705,
        &[("amenity", "cafe"), ("name", "Café du Port")],
    ));
    dataset.insert_node(node(21, 7.425, 43.725, &[("tourism", "museum")]));

    for candidate in [
        way(200, &[1, 2, 3], &[]),
        way(201, &[3, 4, 1], &[]),
        way(202, &[5, 6, 7, 8, 5], &[]),
        way(203, &[9, 10, 11, 12, 9], &[]),
        way(204, &[13, 14], &[("highway", "primary")]),
        way(205, &[14, 15], &[("highway", "primary")]),
        way(206, &[40, 41, 42, 43, 40], &[("building", "yes")]),
        way(208, &[13, 999], &[("highway", "service")]),
    ] {
        dataset.insert_way(candidate);
    }

    for candidate in [
        relation(
            100,
            &[(Way, 200, "outer"), (Way, 201, "outer"), (Way, 202, "inner")],
            &[("type", "multipolygon"), ("landuse", "grass")],
        ),
        relation(
            101,
            &[(Way, 203, "outer"), (Node, 21, "admin_centre")],
            &[
                ("type", "boundary"),
                ("boundary", "administrative"),
                ("name", "Testville"),
            ],
        ),
        relation(
            102,
            &[(Relation, ROUTE_RELATION_ID, "")],
            &[("type", "route_master"), ("route_master", "train")],
        ),
        relation(
            NESTING_SITE_ID,
            &[(Way, 206, ""), (Relation, 100, ""), (Relation, 101, "")],
            &[("type", "site"), ("site", "campus")],
        ),
        relation(
            UNCLOSED_MULTIPOLYGON_ID,
            &[(Way, 204, "outer")],
            &[("type", "multipolygon"), ("natural", "scrub")],
        ),
        relation(
            105,
            &[(Way, 203, "outer"), (Relation, 100, "subarea")],
            &[("type", "boundary"), ("boundary", "protected_area")],
        ),
        relation(
            SINGLE_NODE_SITE_ID,
            &[(Node, 30, "")],
            &[("type", "site"), ("name", "Principaute de Monaco B")],
        ),
        relation(
            TWO_NODE_SITE_ID,
            &[(Node, 31, ""), (Node, 32, "")],
            &[("type", "site"), ("name", "Principaute de Monaco C")],
        ),
        relation(
            ROUTE_RELATION_ID,
            &[(Node, 13, "stop"), (Way, 204, ""), (Way, 205, "")],
            &[("type", "route"), ("route", "train"), ("name", "TER")],
        ),
    ] {
        dataset.insert_relation(candidate);
    }
    dataset
}
