//! Shapefile reading (district records) and writing (optimized copies).

use std::{collections::{BTreeMap, BTreeSet}, path::Path};

use anyhow::{anyhow, bail, Context, Result};
use geo::Geometry;
use shapefile::{
    dbase::{FieldName, FieldValue, Record as DbfRecord, TableWriterBuilder},
    Reader, Shape, Writer,
};
use tracing::debug;

use crate::{
    catalog::{DISTRICT_FIELD, STATE_FIELD},
    common,
    data::{Dataset, FieldKind, RawValue, Record, Schema, SchemaOptions, Value},
    error::DataError,
};

/// Width of numeric dBASE fields written by the optimizer.
const NUMERIC_WIDTH: u8 = 19;
const NUMERIC_DECIMALS: u8 = 8;
/// Maximum width of a dBASE character field.
const CHARACTER_WIDTH: u8 = 254;

/// Shapes and attribute columns of a shapefile, before field kinds are decided.
#[derive(Debug, Default)]
pub(crate) struct RawTable {
    pub(crate) geometries: Vec<Option<Geometry<f64>>>,
    pub(crate) columns: BTreeMap<String, Vec<RawValue>>,
    pub(crate) crs: Option<String>,
}

impl RawTable {
    /// Reads all shapes + attribute records from a given `.shp` file path.
    pub(crate) fn read(path: &Path) -> Result<Self> {
        let mut reader = Reader::from_path(path)
            .map_err(DataError::from)
            .with_context(|| format!("Failed to open shapefile: {}", path.display()))?;

        let mut shapes = Vec::new();
        let mut records = Vec::new();
        for result in reader.iter_shapes_and_records() {
            let (shape, record) = result.context("Error reading shape+record")?;
            shapes.push(shape);
            records.push(record);
        }

        // Field order from a dBASE record is not stable; collect every name and sort.
        let names: BTreeSet<String> = records.iter()
            .flat_map(|record| record.clone().into_iter().map(|(name, _)| name))
            .collect();

        let columns = names.into_iter()
            .map(|name| {
                let values = records.iter()
                    .map(|record| record.get(&name).map_or(RawValue::Text(None), raw_value))
                    .collect();
                (name, values)
            })
            .collect();

        let geometries = shapes.into_iter()
            .map(shape_geometry)
            .collect::<Result<Vec<_>>>()
            .with_context(|| format!("Error converting shapes in shapefile: {}", path.display()))?;

        debug!(path = %path.display(), rows = geometries.len(), "read shapefile");

        Ok(Self { geometries, columns, crs: common::read_prj(path)? })
    }

    #[inline] pub(crate) fn len(&self) -> usize { self.geometries.len() }

    /// Names of a required text column, trimmed; missing values become empty strings.
    pub(crate) fn names(&self, column: &str) -> Result<Vec<String>> {
        let raw = self.columns.get(column)
            .ok_or_else(|| anyhow!("shapefile has no {column} column"))?;
        Ok(raw.iter()
            .map(|v| match v {
                RawValue::Text(s) => s.as_deref().unwrap_or("").trim().to_string(),
                RawValue::Number(x) => x.map(|x| x.to_string()).unwrap_or_default(),
            })
            .collect())
    }

    /// Decide every attribute column's kind, returning the schema and typed rows.
    /// State and district names are not part of the schema.
    pub(crate) fn typed(&self, options: &SchemaOptions) -> Result<(Schema, Vec<BTreeMap<String, Value>>)> {
        let mut fields = Vec::new();
        let mut rows = vec![BTreeMap::new(); self.len()];

        for (name, raw) in &self.columns {
            if name == STATE_FIELD || name == DISTRICT_FIELD { continue }
            let (field, values) = Schema::infer_column(name, raw, options)?;
            for (row, value) in rows.iter_mut().zip(values) {
                row.insert(name.clone(), value);
            }
            fields.push(field);
        }

        Ok((Schema::new(fields), rows))
    }
}

fn raw_value(value: &FieldValue) -> RawValue {
    match value {
        FieldValue::Character(s) => RawValue::Text(s.clone()),
        FieldValue::Memo(s) => RawValue::Text(Some(s.clone())),
        FieldValue::Numeric(n) => RawValue::Number(*n),
        FieldValue::Float(f) => RawValue::Number(f.map(f64::from)),
        FieldValue::Double(d) => RawValue::Number(Some(*d)),
        FieldValue::Currency(c) => RawValue::Number(Some(*c)),
        FieldValue::Integer(i) => RawValue::Number(Some(f64::from(*i))),
        FieldValue::Logical(b) => RawValue::Text(b.map(|b| b.to_string())),
        // Dates carry no indicator values.
        _ => RawValue::Text(None),
    }
}

fn shape_geometry(shape: Shape) -> Result<Option<Geometry<f64>>> {
    common::shape_to_geometry(shape)
        .map_err(|e| DataError::Geometry(e.to_string()).into())
}

impl Dataset {
    /// Read district records from a shapefile. Every row becomes a `Level::District` record.
    pub fn read_shapefile(path: &Path, options: &SchemaOptions) -> Result<Self> {
        let table = RawTable::read(path)?;
        let states = table.names(STATE_FIELD)?;
        let districts = table.names(DISTRICT_FIELD)?;
        let (schema, rows) = table.typed(options)?;

        let records = states.into_iter()
            .zip(districts)
            .zip(rows)
            .zip(table.geometries)
            .map(|(((state, district), attributes), geometry)| Record {
                attributes,
                geometry,
                ..Record::district(state, district)
            })
            .collect();

        Ok(Dataset::new(schema, records, table.crs))
    }

    /// Write the district records (not the rollups) to a shapefile, with `.prj` when a CRS is known.
    pub fn write_shapefile(&self, path: &Path) -> Result<()> {
        let districts: Vec<&Record> = self.districts().collect();
        let names: Vec<(String, String)> = districts.iter()
            .map(|r| (r.state_name.clone(), r.district_name.clone()))
            .collect();
        let rows: Vec<BTreeMap<String, Value>> = districts.iter().map(|r| r.attributes.clone()).collect();
        let geometries: Vec<Option<Geometry<f64>>> = districts.iter().map(|r| r.geometry.clone()).collect();
        write_shapefile(path, &self.schema, &names, &rows, &geometries, self.crs.as_deref())
    }
}

/// Write polygon geometries with their typed attributes to a new shapefile.
/// `names` holds the (state, district) pair of each row; `.prj` is written when `crs` is set.
pub(crate) fn write_shapefile(
    path: &Path,
    schema: &Schema,
    names: &[(String, String)],
    rows: &[BTreeMap<String, Value>],
    geometries: &[Option<Geometry<f64>>],
    crs: Option<&str>,
) -> Result<()> {
    fn field_name(name: &str) -> Result<FieldName> {
        FieldName::try_from(name).map_err(|e| anyhow!("invalid dBASE field name {name}: {e:?}"))
    }

    let mut builder = TableWriterBuilder::new()
        .add_character_field(field_name(STATE_FIELD)?, CHARACTER_WIDTH)
        .add_character_field(field_name(DISTRICT_FIELD)?, CHARACTER_WIDTH);
    for field in schema.fields() {
        builder = match field.kind {
            FieldKind::Numeric => builder.add_numeric_field(field_name(&field.name)?, NUMERIC_WIDTH, NUMERIC_DECIMALS),
            FieldKind::Text => builder.add_character_field(field_name(&field.name)?, CHARACTER_WIDTH),
        };
    }

    common::ensure_parent_exists(path)?;
    let mut writer = Writer::from_path(path, builder)
        .map_err(DataError::from)
        .with_context(|| format!("Failed to create shapefile: {}", path.display()))?;

    for (((state, district), row), geometry) in names.iter().zip(rows).zip(geometries) {
        let shape = match geometry {
            Some(Geometry::MultiPolygon(mp)) => common::multipolygon_to_shape(mp),
            Some(Geometry::Polygon(p)) => common::multipolygon_to_shape(&geo::MultiPolygon(vec![p.clone()])),
            Some(_) => bail!("only polygon geometries can be written ({state} / {district})"),
            None => bail!("missing geometry cannot be written ({state} / {district})"),
        };

        let mut record = DbfRecord::default();
        record.insert(STATE_FIELD.to_string(), FieldValue::Character(Some(state.clone())));
        record.insert(DISTRICT_FIELD.to_string(), FieldValue::Character(Some(district.clone())));
        for field in schema.fields() {
            let value = row.get(&field.name);
            record.insert(field.name.clone(), match field.kind {
                FieldKind::Numeric => FieldValue::Numeric(value.and_then(Value::as_number)),
                FieldKind::Text => FieldValue::Character(value.and_then(Value::as_text).map(str::to_string)),
            });
        }

        writer.write_shape_and_record(&shape, &record)
            .map_err(DataError::from)
            .with_context(|| format!("Failed to write feature {state} / {district}"))?;
    }

    if let Some(wkt) = crs {
        common::write_prj(path, wkt)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Field;
    use geo::{polygon, Point};

    fn square() -> Geometry<f64> {
        Geometry::Polygon(polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 1.0), (x: 0.0, y: 0.0)])
    }

    #[test]
    fn districts_survive_a_write_and_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("districts.shp");
        let schema = Schema::new(vec![
            Field { name: "Aridity".into(), kind: FieldKind::Numeric },
            Field { name: "Mitigation".into(), kind: FieldKind::Text },
        ]);
        let dataset = Dataset::new(schema, vec![
            Record::district(" Goa ", "North Goa")
                .with("Aridity", Value::number(0.25))
                .with("Mitigation", Value::text("Less Suitable"))
                .with_geometry(square()),
            Record::district("Goa", "South Goa")
                .with("Aridity", Value::Number(None))
                .with_geometry(square()),
        ], Some("GEOGCS[\"WGS 84\"]".into()));
        dataset.write_shapefile(&path).unwrap();

        let read = Dataset::read_shapefile(&path, &SchemaOptions::default()).unwrap();
        assert_eq!(read.len(), 2);
        assert_eq!(read.crs.as_deref(), Some("GEOGCS[\"WGS 84\"]"));
        assert_eq!(read.records[0].state_name, "Goa");
        assert_eq!(read.records[0].number("Aridity"), Some(0.25));
        assert_eq!(read.records[0].text("Mitigation"), Some("Less Suitable"));
        assert_eq!(read.records[1].number("Aridity"), None);
        assert_eq!(read.records[1].text("Mitigation"), None);
        assert!(matches!(read.records[1].geometry, Some(Geometry::MultiPolygon(_))));
    }

    #[test]
    fn point_geometry_cannot_be_written() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = Dataset::new(Schema::default(), vec![
            Record::district("A", "a").with_geometry(Point::new(1.0, 1.0)),
        ], None);
        assert!(dataset.write_shapefile(&dir.path().join("bad.shp")).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Dataset::read_shapefile(&dir.path().join("none.shp"), &SchemaOptions::default()).is_err());
    }
}
