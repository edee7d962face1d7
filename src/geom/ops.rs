use geo::{BooleanOps, Centroid, CoordsIter, Geometry, MultiPolygon, Point};

use super::simplify_multipolygon;

/// The geometry operations rollups and the optimizer rely on.
///
/// Implementations report failure as `None` so that callers can degrade a
/// single field instead of aborting.
pub trait GeometryOps {
    /// Union of all polygonal geometries in `geoms`; non-polygonal inputs are ignored.
    fn union(&self, geoms: &[&Geometry<f64>]) -> Option<Geometry<f64>>;

    /// Centroid of `geom`, `None` if empty or not finite.
    fn centroid(&self, geom: &Geometry<f64>) -> Option<Point<f64>>;

    /// Simplified copy of `geom`; non-polygonal geometries are returned unchanged.
    fn simplify(&self, geom: &Geometry<f64>, tolerance: f64) -> Geometry<f64>;
}

/// Planar (lon/lat treated as Cartesian) operations backed by the `geo` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanarOps;

impl PlanarOps {
    /// Polygonal part of `geom`, or `None` if it has none or any coordinate is not finite.
    fn polygonal(geom: &Geometry<f64>) -> Option<MultiPolygon<f64>> {
        let mp = match geom {
            Geometry::Polygon(polygon) => MultiPolygon(vec![polygon.clone()]),
            Geometry::MultiPolygon(mp) => mp.clone(),
            _ => return None,
        };
        mp.coords_iter()
            .all(|c| c.x.is_finite() && c.y.is_finite())
            .then_some(mp)
    }
}

impl GeometryOps for PlanarOps {
    fn union(&self, geoms: &[&Geometry<f64>]) -> Option<Geometry<f64>> {
        let mut parts: Vec<MultiPolygon<f64>> = geoms.iter()
            .filter_map(|geom| Self::polygonal(geom))
            .filter(|mp| !mp.0.is_empty())
            .collect();

        // Pairwise rounds keep the operands of each boolean op similar in size.
        while parts.len() > 1 {
            let mut merged = Vec::with_capacity(parts.len().div_ceil(2));
            let mut iter = parts.into_iter();
            while let Some(a) = iter.next() {
                merged.push(match iter.next() {
                    Some(b) => a.union(&b),
                    None => a,
                });
            }
            parts = merged;
        }

        parts.pop()
            .filter(|mp| !mp.0.is_empty())
            .map(Geometry::MultiPolygon)
    }

    fn centroid(&self, geom: &Geometry<f64>) -> Option<Point<f64>> {
        geom.centroid()
            .filter(|point| point.x().is_finite() && point.y().is_finite())
    }

    fn simplify(&self, geom: &Geometry<f64>, tolerance: f64) -> Geometry<f64> {
        match geom {
            Geometry::Polygon(polygon) => Geometry::MultiPolygon(
                simplify_multipolygon(&MultiPolygon(vec![polygon.clone()]), tolerance)
            ),
            Geometry::MultiPolygon(mp) => Geometry::MultiPolygon(simplify_multipolygon(mp, tolerance)),
            other => other.clone(),
        }
    }
}
