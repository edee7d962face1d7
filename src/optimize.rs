//! One-shot preprocessing: write a geometry-simplified, numerically-typed copy of a shapefile.

use std::path::Path;

use anyhow::{Context, Result};
use geo::Geometry;
use serde::Serialize;
use tracing::info;

use crate::{
    catalog::{DISTRICT_FIELD, STATE_FIELD},
    data::{FieldKind, SchemaOptions},
    geom::{vertex_count, GeometryOps, PlanarOps},
    io::shp::{write_shapefile, RawTable},
};

/// What the optimizer did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizeReport {
    pub features: usize,
    pub vertices_before: usize,
    pub vertices_after: usize,
    pub numeric_fields: Vec<String>,
    pub text_fields: Vec<String>,
}

/// Simplify every polygon of `input` with `tolerance`, coerce attribute columns to numbers
/// where any value parses (category labels and names stay text), and write the result to
/// `output`, creating its directory and copying the projection.
pub fn optimize(input: &Path, output: &Path, tolerance: f64) -> Result<OptimizeReport> {
    let table = RawTable::read(input)?;
    info!(features = table.len(), path = %input.display(), "source shapefile loaded");

    let ops = PlanarOps;
    let mut vertices_before = 0;
    let mut vertices_after = 0;
    let geometries: Vec<Option<Geometry<f64>>> = table.geometries.iter()
        .map(|geom| geom.as_ref().map(|g| {
            let simplified = ops.simplify(g, tolerance);
            vertices_before += polygon_vertices(g);
            vertices_after += polygon_vertices(&simplified);
            simplified
        }))
        .collect();
    info!(vertices_before, vertices_after, "geometries simplified");

    // Any parseable value makes a column numeric, mirroring a lenient to-numeric pass.
    let options = SchemaOptions { numeric_columns: Vec::new(), numeric_majority: f64::MIN_POSITIVE };
    let (schema, rows) = table.typed(&options)?;
    info!(fields = schema.len(), "column types optimized");

    let names: Vec<(String, String)> = table.names(STATE_FIELD)?.into_iter()
        .zip(table.names(DISTRICT_FIELD)?)
        .collect();

    write_shapefile(output, &schema, &names, &rows, &geometries, table.crs.as_deref())
        .with_context(|| format!("Failed to write optimized shapefile to {}", output.display()))?;
    info!(path = %output.display(), "optimized shapefile saved");

    Ok(OptimizeReport {
        features: table.len(),
        vertices_before,
        vertices_after,
        numeric_fields: schema.fields().iter().filter(|f| f.kind == FieldKind::Numeric).map(|f| f.name.clone()).collect(),
        text_fields: schema.fields().iter().filter(|f| f.kind == FieldKind::Text).map(|f| f.name.clone()).collect(),
    })
}

fn polygon_vertices(geom: &Geometry<f64>) -> usize {
    match geom {
        Geometry::MultiPolygon(mp) => vertex_count(mp),
        Geometry::Polygon(p) => vertex_count(&geo::MultiPolygon(vec![p.clone()])),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Dataset, Field, Record, Schema, Value};
    use geo::{polygon, MultiPolygon};

    fn wiggly_square() -> MultiPolygon<f64> {
        MultiPolygon(vec![polygon![
            (x: 0.0, y: 0.0), (x: 5.0, y: 0.001), (x: 10.0, y: 0.0),
            (x: 10.0, y: 10.0), (x: 0.0, y: 10.0), (x: 0.0, y: 0.0),
        ]])
    }

    #[test]
    fn simplifies_and_types_columns() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("raw.shp");
        let output = dir.path().join("nested/optimized.shp");

        let schema = Schema::new(vec![
            Field { name: "GW_dev_sta".into(), kind: FieldKind::Text },
            Field { name: "Adaptation".into(), kind: FieldKind::Text },
        ]);
        let names = vec![("A".to_string(), "a1".to_string())];
        let rows = vec![[
            ("GW_dev_sta".to_string(), Value::text("42.5")),
            ("Adaptation".to_string(), Value::text("Highly Suitable")),
        ].into_iter().collect()];
        write_shapefile(&input, &schema, &names, &rows, &[Some(wiggly_square().into())], Some("GEOGCS[]")).unwrap();

        let report = optimize(&input, &output, 0.01).unwrap();
        assert_eq!(report.features, 1);
        assert_eq!(report.vertices_before, 6);
        assert_eq!(report.vertices_after, 5);
        assert_eq!(report.numeric_fields, vec!["GW_dev_sta".to_string()]);
        assert_eq!(report.text_fields, vec!["Adaptation".to_string()]);

        let dataset = Dataset::read_shapefile(&output, &SchemaOptions::default()).unwrap();
        let record: &Record = &dataset.records[0];
        assert_eq!(record.number("GW_dev_sta"), Some(42.5));
        assert_eq!(record.text("Adaptation"), Some("Highly Suitable"));
        assert_eq!(dataset.crs.as_deref(), Some("GEOGCS[]"));
    }

    #[test]
    fn missing_input_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(optimize(&dir.path().join("none.shp"), &dir.path().join("out.shp"), 0.01).is_err());
    }
}
