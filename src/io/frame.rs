use anyhow::{Context, Result};
use polars::prelude::*;

use crate::{catalog::{DISTRICT_FIELD, STATE_FIELD}, data::{Dataset, FieldKind}, geom::{GeometryOps, PlanarOps}};

/// Coerce text values to numbers; anything that does not parse becomes null.
pub(crate) fn coerce_numeric(name: &str, values: &[Option<&str>]) -> Result<Vec<Option<f64>>> {
    let trimmed: Vec<Option<&str>> = values.iter()
        .map(|v| v.map(str::trim).filter(|s| !s.is_empty()))
        .collect();
    let series = Series::new(name.into(), trimmed)
        .cast(&DataType::Float64)
        .with_context(|| format!("[io::frame] Failed to coerce column {name} to numeric"))?;
    Ok(series.f64()?
        .into_iter()
        .map(|v| v.filter(|x| x.is_finite()))
        .collect())
}

impl Dataset {
    /// One row per record: level, names, every schema field, and the representative point.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let records = &self.records;

        let mut columns = vec![
            Column::new("level".into(), records.iter().map(|r| r.level.to_str()).collect::<Vec<_>>()),
            Column::new(STATE_FIELD.into(), records.iter().map(|r| r.state_name.as_str()).collect::<Vec<_>>()),
            Column::new(DISTRICT_FIELD.into(), records.iter().map(|r| r.district_name.as_str()).collect::<Vec<_>>()),
        ];

        for field in self.schema.fields() {
            let name = field.name.as_str();
            columns.push(match field.kind {
                FieldKind::Numeric => Column::new(
                    name.into(),
                    records.iter().map(|r| r.number(name)).collect::<Vec<Option<f64>>>(),
                ),
                FieldKind::Text => Column::new(
                    name.into(),
                    records.iter().map(|r| r.text(name)).collect::<Vec<Option<&str>>>(),
                ),
            });
        }

        let points: Vec<_> = records.iter()
            .map(|r| r.geometry.as_ref().and_then(|g| PlanarOps.centroid(g)))
            .collect();
        columns.push(Column::new("centroid_x".into(), points.iter().map(|p| p.map(|p| p.x())).collect::<Vec<_>>()));
        columns.push(Column::new("centroid_y".into(), points.iter().map(|p| p.map(|p| p.y())).collect::<Vec<_>>()));

        Ok(DataFrame::new(columns)?)
    }
}
