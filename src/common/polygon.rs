use anyhow::{bail, Result};
use geo::{Coord, Geometry, LineString, MultiPolygon, Point, Polygon};
use shapefile::{self as shp, PolygonRing, Shape};

/// Group shapefile rings into geo polygons: each outer ring owns the inner rings that follow it.
fn rings_to_geo<P>(rings: &[PolygonRing<P>], xy: impl Fn(&P) -> Coord<f64>) -> MultiPolygon<f64> {
    let mut polys: Vec<Polygon<f64>> = Vec::new();
    let mut exterior: Option<LineString<f64>> = None;
    let mut holes: Vec<LineString<f64>> = Vec::new();

    for ring in rings {
        let line = LineString(ring.points().iter().map(&xy).collect());
        match ring {
            PolygonRing::Outer(_) => {
                if let Some(ext) = exterior.replace(line) {
                    polys.push(Polygon::new(ext, std::mem::take(&mut holes)));
                }
            }
            // An inner ring before any outer ring is malformed; treat it as an outer ring.
            PolygonRing::Inner(_) if exterior.is_none() => exterior = Some(line),
            PolygonRing::Inner(_) => holes.push(line),
        }
    }
    if let Some(ext) = exterior {
        polys.push(Polygon::new(ext, holes));
    }

    MultiPolygon(polys)
}

/// Convert a shapefile shape into a geo geometry. Null shapes yield `None`.
pub(crate) fn shape_to_geometry(shape: Shape) -> Result<Option<Geometry<f64>>> {
    Ok(Some(match shape {
        Shape::NullShape => return Ok(None),
        Shape::Polygon(p) => Geometry::MultiPolygon(rings_to_geo(p.rings(), |pt| Coord { x: pt.x, y: pt.y })),
        Shape::PolygonM(p) => Geometry::MultiPolygon(rings_to_geo(p.rings(), |pt| Coord { x: pt.x, y: pt.y })),
        Shape::PolygonZ(p) => Geometry::MultiPolygon(rings_to_geo(p.rings(), |pt| Coord { x: pt.x, y: pt.y })),
        Shape::Point(pt) => Geometry::Point(Point::new(pt.x, pt.y)),
        other => bail!("found non-polygon shape: {:?}", other.shapetype()),
    }))
}

/// Convert a geo MultiPolygon into a shapefile Polygon.
/// `with_rings` closes rings and fixes their orientation to the shapefile convention.
pub(crate) fn multipolygon_to_shape(mp: &MultiPolygon<f64>) -> shp::Polygon {
    fn ring_points(line: &LineString<f64>) -> Vec<shp::Point> {
        line.coords().map(|c| shp::Point { x: c.x, y: c.y }).collect()
    }

    let rings = mp.0.iter()
        .flat_map(|poly| {
            std::iter::once(PolygonRing::Outer(ring_points(poly.exterior())))
                .chain(poly.interiors().iter().map(|hole| PolygonRing::Inner(ring_points(hole))))
        })
        .collect();

    shp::Polygon::with_rings(rings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, Area};

    #[test]
    fn polygon_with_hole_survives_conversion() {
        let poly = polygon!(
            exterior: [(x: 0.0, y: 0.0), (x: 4.0, y: 0.0), (x: 4.0, y: 4.0), (x: 0.0, y: 4.0), (x: 0.0, y: 0.0)],
            interiors: [[(x: 1.0, y: 1.0), (x: 1.0, y: 2.0), (x: 2.0, y: 2.0), (x: 2.0, y: 1.0), (x: 1.0, y: 1.0)]],
        );
        let shape = multipolygon_to_shape(&MultiPolygon(vec![poly]));
        let Some(Geometry::MultiPolygon(mp)) = shape_to_geometry(Shape::Polygon(shape)).unwrap() else {
            panic!("expected multipolygon");
        };
        assert_eq!(mp.0.len(), 1);
        assert_eq!(mp.0[0].interiors().len(), 1);
        assert!((mp.unsigned_area() - 15.0).abs() < 1e-9);
    }

    #[test]
    fn null_shape_has_no_geometry() {
        assert!(shape_to_geometry(Shape::NullShape).unwrap().is_none());
    }
}
