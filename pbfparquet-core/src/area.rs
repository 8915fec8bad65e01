//! Decide whether a closed way describes an area or a closed line.
//!
//! The key table follows the widely used OSM polygon-features list: some keys
//! always denote areas, some only for listed values, and some for every value
//! except the listed ones. An explicit `area=yes|no` overrides the table.

use crate::Tags;

enum AreaRule {
    All,
    Only(&'static [&'static str]),
    Except(&'static [&'static str]),
}

const AREA_KEYS: &[(&str, AreaRule)] = &[
    ("aeroway", AreaRule::Except(&["taxiway"])),
    ("amenity", AreaRule::All),
    ("area:highway", AreaRule::All),
    (
        "barrier",
        AreaRule::Only(&[
            "city_wall",
            "ditch",
            "hedge",
            "retaining_wall",
            "spikes",
            "wall",
        ]),
    ),
    ("boundary", AreaRule::All),
    ("building", AreaRule::All),
    ("building:part", AreaRule::All),
    ("craft", AreaRule::All),
    ("golf", AreaRule::All),
    (
        "highway",
        AreaRule::Only(&["elevator", "escape", "rest_area", "services"]),
    ),
    ("historic", AreaRule::All),
    ("indoor", AreaRule::All),
    ("landuse", AreaRule::All),
    ("leisure", AreaRule::All),
    (
        "man_made",
        AreaRule::Except(&["cutline", "embankment", "pipeline"]),
    ),
    ("military", AreaRule::All),
    (
        "natural",
        AreaRule::Except(&["arete", "cliff", "coastline", "ridge", "tree_row"]),
    ),
    ("office", AreaRule::All),
    ("place", AreaRule::All),
    (
        "power",
        AreaRule::Only(&["generator", "plant", "substation", "transformer"]),
    ),
    ("public_transport", AreaRule::All),
    (
        "railway",
        AreaRule::Only(&["platform", "roundhouse", "station", "turntable"]),
    ),
    ("ruins", AreaRule::All),
    ("shop", AreaRule::All),
    ("tourism", AreaRule::All),
    (
        "waterway",
        AreaRule::Only(&["boatyard", "dam", "dock", "riverbank"]),
    ),
];

impl AreaRule {
    fn accepts(&self, value: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(values) => values.contains(&value),
            Self::Except(values) => !values.contains(&value),
        }
    }
}

/// Whether a closed way with these tags should become a polygon.
///
/// # Examples
/// ```
/// use pbfparquet_core::{Tags, is_area};
///
/// let building = Tags::from([("building".to_owned(), "yes".to_owned())]);
/// let roundabout = Tags::from([("highway".to_owned(), "primary".to_owned())]);
/// assert!(is_area(&building));
/// assert!(!is_area(&roundabout));
/// ```
#[must_use]
pub fn is_area(tags: &Tags) -> bool {
    match tags.get("area").map(String::as_str) {
        Some("no") => return false,
        Some(_) => return true,
        None => {}
    }
    AREA_KEYS.iter().any(|(key, rule)| {
        tags.get(*key)
            .is_some_and(|value| value != "no" && rule.accepts(value))
    })
}
