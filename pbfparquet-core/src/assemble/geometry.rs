//! Turn node id sequences into `geo` geometries.

use geo::{
    Contains, Coord, Geometry, InteriorPoint, LineString, MultiLineString, MultiPoint,
    MultiPolygon, Point, Polygon,
};

use crate::OsmDataset;

/// Resolve every id; `None` if any coordinate is unknown.
pub(super) fn resolve_all(dataset: &OsmDataset, ids: &[i64]) -> Option<Vec<Coord<f64>>> {
    ids.iter().map(|id| dataset.coordinate(*id)).collect()
}

/// Resolve the ids that are known, skipping the rest.
pub(super) fn resolve_known(dataset: &OsmDataset, ids: &[i64]) -> Vec<Coord<f64>> {
    ids.iter().filter_map(|id| dataset.coordinate(*id)).collect()
}

/// Build polygons from resolved outer and inner rings.
///
/// Each inner ring joins the first outer ring containing one of its interior
/// points; inner rings with no enclosing outer ring are discarded.
pub(super) fn polygons_from_rings(
    outers: Vec<Vec<Coord<f64>>>,
    inners: Vec<Vec<Coord<f64>>>,
) -> Option<Geometry<f64>> {
    let mut shells: Vec<(Polygon<f64>, Vec<LineString<f64>>)> = outers
        .into_iter()
        .map(|ring| (Polygon::new(LineString::from(ring), Vec::new()), Vec::new()))
        .collect();

    for inner in inners {
        let hole = LineString::from(inner);
        let Some(inside) = Polygon::new(hole.clone(), Vec::new()).interior_point() else {
            continue;
        };
        if let Some((_, holes)) = shells
            .iter_mut()
            .find(|(shell, _)| shell.contains(&inside))
        {
            holes.push(hole);
        }
    }

    let mut polygons: Vec<Polygon<f64>> = shells
        .into_iter()
        .map(|(shell, holes)| {
            let (exterior, _) = shell.into_inner();
            Polygon::new(exterior, holes)
        })
        .collect();

    match polygons.len() {
        0 => None,
        1 => polygons.pop().map(Geometry::Polygon),
        _ => Some(Geometry::MultiPolygon(MultiPolygon::new(polygons))),
    }
}

/// A single line or a multi-line from resolved sequences with two or more points.
pub(super) fn lines(sequences: Vec<Vec<Coord<f64>>>) -> Option<Geometry<f64>> {
    let mut parts: Vec<LineString<f64>> = sequences
        .into_iter()
        .filter(|coords| coords.len() >= 2)
        .map(LineString::from)
        .collect();
    match parts.len() {
        0 => None,
        1 => parts.pop().map(Geometry::LineString),
        _ => Some(Geometry::MultiLineString(MultiLineString::new(parts))),
    }
}

/// A single point or a multi-point.
pub(super) fn points(coords: Vec<Coord<f64>>) -> Option<Geometry<f64>> {
    let mut parts: Vec<Point<f64>> = coords.into_iter().map(Point::from).collect();
    match parts.len() {
        0 => None,
        1 => parts.pop().map(Geometry::Point),
        _ => Some(Geometry::MultiPoint(MultiPoint::new(parts))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Vec<Coord<f64>> {
        vec![
            Coord { x: min_x, y: min_y },
            Coord { x: max_x, y: min_y },
            Coord { x: max_x, y: max_y },
            Coord { x: min_x, y: max_y },
            Coord { x: min_x, y: min_y },
        ]
    }

    #[test]
    fn hole_joins_enclosing_shell() {
        let geometry = polygons_from_rings(
            vec![square(0.0, 0.0, 10.0, 10.0), square(20.0, 20.0, 25.0, 25.0)],
            vec![square(2.0, 2.0, 4.0, 4.0)],
        )
        .expect("geometry");
        let Geometry::MultiPolygon(multi) = geometry else {
            panic!("expected multipolygon, got {geometry:?}");
        };
        let holes: Vec<usize> = multi.iter().map(|polygon| polygon.interiors().len()).collect();
        assert_eq!(holes, vec![1, 0]);
    }

    #[test]
    fn single_shell_is_a_polygon() {
        let geometry = polygons_from_rings(vec![square(0.0, 0.0, 1.0, 1.0)], Vec::new());
        assert!(matches!(geometry, Some(Geometry::Polygon(_))));
    }

    #[test]
    fn orphan_hole_is_discarded() {
        let geometry = polygons_from_rings(
            vec![square(0.0, 0.0, 1.0, 1.0)],
            vec![square(50.0, 50.0, 51.0, 51.0)],
        )
        .expect("geometry");
        let Geometry::Polygon(polygon) = geometry else {
            panic!("expected polygon, got {geometry:?}");
        };
        assert!(polygon.interiors().is_empty());
    }

    #[test]
    fn points_and_lines_pick_single_or_multi() {
        let one = points(vec![Coord { x: 1.0, y: 1.0 }]);
        assert!(matches!(one, Some(Geometry::Point(_))));
        let two = points(vec![Coord { x: 1.0, y: 1.0 }, Coord { x: 2.0, y: 2.0 }]);
        assert!(matches!(two, Some(Geometry::MultiPoint(_))));
        assert!(points(Vec::new()).is_none());
        let dangling = lines(vec![vec![Coord { x: 0.0, y: 0.0 }]]);
        assert!(dangling.is_none());
    }
}
