use geo::{CoordsIter, LineString, MultiPolygon, Polygon, Simplify, Validation};

/// Simplify every ring of a MultiPolygon with Douglas-Peucker.
/// Polygons whose exterior collapses are dropped, unless all of them would be.
/// A valid polygon whose simplification would self-intersect is kept unsimplified.
pub(crate) fn simplify_multipolygon(mp: &MultiPolygon<f64>, tolerance: f64) -> MultiPolygon<f64> {
    if tolerance <= 0.0 { return mp.clone() }

    let simplified: Vec<Polygon<f64>> = mp.0.iter()
        .filter_map(|poly| {
            let exterior = poly.exterior().simplify(&tolerance);
            if exterior.0.len() < 4 { return None }
            let interiors: Vec<LineString<f64>> = poly.interiors().iter()
                .map(|ring| ring.simplify(&tolerance))
                .filter(|ring| ring.0.len() >= 4)
                .collect();
            let simplified = Polygon::new(exterior, interiors);
            if !simplified.is_valid() && poly.is_valid() {
                return Some(poly.clone());
            }
            Some(simplified)
        })
        .collect();

    if simplified.is_empty() && !mp.0.is_empty() { mp.clone() } else { MultiPolygon(simplified) }
}

/// Total number of coordinates across all rings.
#[inline]
pub(crate) fn vertex_count(mp: &MultiPolygon<f64>) -> usize { mp.coords_count() }

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;

    #[test]
    fn removes_collinear_vertices() {
        let mp = MultiPolygon(vec![polygon![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 0.0),
            (x: 2.0, y: 0.0),
            (x: 2.0, y: 2.0),
            (x: 0.0, y: 2.0),
            (x: 0.0, y: 0.0),
        ]]);
        let simplified = simplify_multipolygon(&mp, 0.01);
        assert_eq!(vertex_count(&mp), 6);
        assert_eq!(vertex_count(&simplified), 5);
    }

    #[test]
    fn never_drops_everything() {
        let tiny = MultiPolygon(vec![polygon![
            (x: 0.0, y: 0.0),
            (x: 0.001, y: 0.0),
            (x: 0.001, y: 0.001),
            (x: 0.0, y: 0.0),
        ]]);
        let simplified = simplify_multipolygon(&tiny, 10.0);
        assert_eq!(simplified, tiny);
    }

    #[test]
    fn keeps_topology_when_simplification_would_cross() {
        // Dropping the dip in the bottom edge would pull it above the notch tip.
        let notched = MultiPolygon(vec![polygon![
            (x: 0.0, y: 0.0),
            (x: 5.0, y: -0.5),
            (x: 10.0, y: 0.0),
            (x: 10.0, y: 10.0),
            (x: 5.05, y: 10.0),
            (x: 5.0, y: -0.2),
            (x: 4.95, y: 10.0),
            (x: 0.0, y: 10.0),
            (x: 0.0, y: 0.0),
        ]]);
        assert!(notched.is_valid());
        let simplified = simplify_multipolygon(&notched, 1.0);
        assert!(simplified.is_valid());
        assert_eq!(simplified, notched);
    }

    #[test]
    fn zero_tolerance_is_identity() {
        let mp = MultiPolygon(vec![polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 0.0)]]);
        assert_eq!(simplify_multipolygon(&mp, 0.0), mp);
    }
}
