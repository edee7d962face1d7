//! State and national rollups of district records.

use std::collections::{BTreeMap, HashMap};

use anyhow::Result;
use geo::Geometry;
use tracing::{debug, warn};

use crate::{
    catalog::{Category, MIXED, NATIONAL_AVERAGE, STATE_AVERAGE},
    data::{Dataset, Record, Schema, Value},
    error::DataError,
    geom::{GeometryOps, PlanarOps},
};

/// Augment `input` with one national rollup and one rollup per state, using planar geometry.
pub fn aggregate(input: &Dataset) -> Result<Dataset> {
    aggregate_with(&PlanarOps, input)
}

/// Augment `input` with rollups, using `ops` for geometry unions and centroids.
///
/// The result holds the national record, then one record per state in the order the
/// states first appear, then every input record unchanged. Numeric fields are means
/// over the contributing districts, category fields are their mode, and geometry is
/// the centroid of their union. A field that cannot be computed degrades to `None`
/// (or `"Mixed"` for categories); only an empty input is an error.
pub fn aggregate_with<G: GeometryOps>(ops: &G, input: &Dataset) -> Result<Dataset> {
    if input.is_empty() {
        return Err(DataError::EmptyInput.into());
    }

    let districts: Vec<&Record> = input.districts().collect();
    let national = rollup(ops, &input.schema, Record::national(), NATIONAL_AVERAGE, &districts);

    let mut states: Vec<Record> = partition_by_state(&districts).into_iter()
        .map(|(state, members)| rollup(ops, &input.schema, Record::state(state), STATE_AVERAGE, &members))
        .collect();

    debug!(districts = districts.len(), states = states.len(), "aggregated rollups");

    let mut records = Vec::with_capacity(1 + states.len() + input.len());
    records.push(national);
    records.append(&mut states);
    records.extend(input.records.iter().cloned());

    Ok(Dataset::new(input.schema.clone(), records, input.crs.clone()))
}

/// Group district rows by state name, in order of first appearance.
/// Rows claiming to be the national average are never a state.
fn partition_by_state<'a>(districts: &[&'a Record]) -> Vec<(&'a str, Vec<&'a Record>)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut parts: Vec<(&str, Vec<&Record>)> = Vec::new();

    for &record in districts {
        let state = record.state_name.as_str();
        if state == NATIONAL_AVERAGE {
            warn!(district = %record.district_name, "district row named {NATIONAL_AVERAGE} is not grouped into any state");
            continue
        }
        let i = *index.entry(state).or_insert_with(|| {
            parts.push((state, Vec::new()));
            parts.len() - 1
        });
        parts[i].1.push(record);
    }

    parts
}

/// Fill `base` with the rollup of `members`. Generic text fields get `placeholder`.
fn rollup<G: GeometryOps>(ops: &G, schema: &Schema, mut base: Record, placeholder: &str, members: &[&Record]) -> Record {
    for field in schema.numeric() {
        base.attributes.insert(field.name.clone(), Value::Number(mean(members, &field.name)));
    }

    for field in schema.text() {
        let value = match Category::from_column(&field.name) {
            Some(_) => mode(members, &field.name).unwrap_or_else(|| MIXED.to_string()),
            None => placeholder.to_string(),
        };
        base.attributes.insert(field.name.clone(), Value::Text(Some(value)));
    }

    base.geometry = rollup_geometry(ops, members);
    if base.geometry.is_none() {
        let err = DataError::FieldComputation {
            field: "geometry".into(),
            reason: format!("no usable geometry among {} districts", members.len()),
        };
        warn!(state = %base.state_name, "{err}");
    }

    base
}

/// Arithmetic mean of the finite values of `key`, ignoring missing ones.
pub(crate) fn mean(members: &[&Record], key: &str) -> Option<f64> {
    let (sum, n) = members.iter()
        .filter_map(|r| r.number(key))
        .fold((0.0, 0usize), |(sum, n), x| (sum + x, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Most frequent non-blank value of `key`; ties go to the lexicographically smallest value.
pub(crate) fn mode(members: &[&Record], key: &str) -> Option<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in members.iter().filter_map(|r| r.text(key)) {
        *counts.entry(value).or_default() += 1;
    }

    // BTreeMap iterates in ascending key order; keep the first of the largest counts.
    counts.into_iter()
        .fold(None, |best: Option<(&str, usize)>, (value, n)| match best {
            Some((_, m)) if m >= n => best,
            _ => Some((value, n)),
        })
        .map(|(value, _)| value.to_string())
}

/// Centroid of the union of the members' geometries, else the first member's geometry.
fn rollup_geometry<G: GeometryOps>(ops: &G, members: &[&Record]) -> Option<Geometry<f64>> {
    let geoms: Vec<&Geometry<f64>> = members.iter()
        .filter_map(|r| r.geometry.as_ref())
        .collect();

    ops.union(&geoms)
        .and_then(|union| ops.centroid(&union))
        .map(Geometry::Point)
        .or_else(|| {
            let first = geoms.first().map(|g| (*g).clone());
            if first.is_some() {
                debug!(members = members.len(), "union centroid failed; using first geometry");
            }
            first
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, Point};

    use crate::data::{Field, FieldKind, Level};

    fn schema() -> Schema {
        Schema::new(vec![
            Field { name: "GW_dev_sta".into(), kind: FieldKind::Numeric },
            Field { name: "Mitigation".into(), kind: FieldKind::Text },
            Field { name: "Aquifer_ty".into(), kind: FieldKind::Text },
        ])
    }

    fn square(x0: f64, y0: f64) -> Geometry<f64> {
        Geometry::Polygon(polygon![
            (x: x0, y: y0), (x: x0 + 1.0, y: y0), (x: x0 + 1.0, y: y0 + 1.0), (x: x0, y: y0 + 1.0), (x: x0, y: y0),
        ])
    }

    fn district(state: &str, name: &str, gw: Option<f64>, mitigation: Option<&str>, x: f64) -> Record {
        Record::district(state, name)
            .with("GW_dev_sta", Value::Number(gw))
            .with("Mitigation", Value::Text(mitigation.map(str::to_string)))
            .with("Aquifer_ty", Value::text("Alluvial"))
            .with_geometry(square(x, 0.0))
    }

    fn dataset(records: Vec<Record>) -> Dataset {
        Dataset::new(schema(), records, Some("GEOGCS[\"WGS 84\"]".into()))
    }

    #[test]
    fn collection_layout() {
        let input = dataset(vec![
            district("A", "a1", Some(40.0), Some("Less Suitable"), 0.0),
            district("B", "b1", Some(90.0), Some("Highly Suitable"), 5.0),
            district("A", "a2", Some(60.0), Some("Less Suitable"), 1.0),
        ]);
        let out = aggregate(&input).unwrap();

        assert_eq!(out.len(), 1 + 2 + 3);
        assert_eq!(out.records[0].level, Level::National);
        assert_eq!(out.records[1].state_name, "A");
        assert_eq!(out.records[2].state_name, "B");
        assert!(out.records[1..3].iter().all(|r| r.level == Level::State && r.district_name == "All Districts"));
        assert_eq!(&out.records[3..], &input.records[..]);
        assert_eq!(out.crs, input.crs);
    }

    #[test]
    fn means_and_placeholders() {
        let input = dataset(vec![
            district("A", "a1", Some(40.0), Some("Less Suitable"), 0.0),
            district("A", "a2", Some(60.0), Some("Highly Suitable"), 1.0),
            district("B", "b1", Some(120.0), None, 5.0),
        ]);
        let out = aggregate(&input).unwrap();
        let national = &out.records[0];
        let state_a = &out.records[1];

        assert_eq!(national.number("GW_dev_sta"), Some(220.0 / 3.0));
        assert_eq!(state_a.number("GW_dev_sta"), Some(50.0));
        assert_eq!(national.text("Aquifer_ty"), Some("National Average"));
        assert_eq!(state_a.text("Aquifer_ty"), Some("State Average"));
        assert_eq!(national.state_name, "National Average");
        assert_eq!(national.district_name, "All Districts");
    }

    #[test]
    fn all_missing_numbers_give_none() {
        let input = dataset(vec![
            district("A", "a1", None, Some("Less Suitable"), 0.0),
            district("A", "a2", None, Some("Less Suitable"), 1.0),
        ]);
        let out = aggregate(&input).unwrap();
        assert_eq!(out.records[0].get("GW_dev_sta"), Some(&Value::Number(None)));
        assert_eq!(out.records[1].get("GW_dev_sta"), Some(&Value::Number(None)));
    }

    #[test]
    fn category_mode_with_ties_and_gaps() {
        let input = dataset(vec![
            district("A", "a1", Some(1.0), Some("Less Suitable"), 0.0),
            district("A", "a2", Some(1.0), Some("Highly Suitable"), 1.0),
            district("B", "b1", Some(1.0), None, 5.0),
            district("C", "c1", Some(1.0), Some("Moderately Suitable"), 9.0),
            district("C", "c2", Some(1.0), Some("Moderately Suitable"), 10.0),
            district("C", "c3", Some(1.0), Some("Less Suitable"), 11.0),
        ]);
        let out = aggregate(&input).unwrap();
        assert_eq!(out.records[1].text("Mitigation"), Some("Highly Suitable"));
        assert_eq!(out.records[2].text("Mitigation"), Some("Mixed"));
        assert_eq!(out.records[3].text("Mitigation"), Some("Moderately Suitable"));
        // Less: 2, Moderately: 2, Highly: 1
        assert_eq!(out.records[0].text("Mitigation"), Some("Less Suitable"));
    }

    #[test]
    fn geometry_is_union_centroid() {
        let input = dataset(vec![
            district("A", "a1", Some(1.0), None, 0.0),
            district("A", "a2", Some(1.0), None, 1.0),
        ]);
        let out = aggregate(&input).unwrap();
        let Some(Geometry::Point(p)) = &out.records[1].geometry else { panic!("expected point") };
        assert!((p.x() - 1.0).abs() < 1e-9 && (p.y() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn geometry_falls_back_to_first_member() {
        let point = Point::new(78.5, 20.5);
        let input = dataset(vec![Record::district("A", "a1").with_geometry(point)]);
        let out = aggregate(&input).unwrap();
        assert_eq!(out.records[1].geometry, Some(Geometry::Point(point)));

        let bare = dataset(vec![Record::district("A", "a1")]);
        assert_eq!(aggregate(&bare).unwrap().records[0].geometry, None);
    }

    #[test]
    fn national_rows_are_not_states() {
        let input = dataset(vec![
            district("A", "a1", Some(10.0), None, 0.0),
            district(NATIONAL_AVERAGE, "stray", Some(30.0), None, 3.0),
        ]);
        let out = aggregate(&input).unwrap();
        let states: Vec<_> = out.state_rollups().map(|r| r.state_name.as_str()).collect();
        assert_eq!(states, vec!["A"]);
    }

    #[test]
    fn non_finite_geometry_degrades_instead_of_failing() {
        let broken = Geometry::Polygon(polygon![
            (x: f64::NAN, y: 0.0), (x: 1.0, y: f64::NAN), (x: 1.0, y: 1.0), (x: f64::NAN, y: 0.0),
        ]);
        let input = dataset(vec![
            Record::district("A", "a1").with("GW_dev_sta", Value::number(10.0)).with_geometry(broken.clone()),
            district("A", "a2", Some(30.0), None, 4.0),
        ]);
        let out = aggregate(&input).unwrap();
        let state_a = &out.records[1];
        assert_eq!(state_a.number("GW_dev_sta"), Some(20.0));
        let Some(Geometry::Point(p)) = &state_a.geometry else { panic!("expected point") };
        assert!((p.x() - 4.5).abs() < 1e-9 && (p.y() - 0.5).abs() < 1e-9);

        // Nothing usable: the first member geometry is kept as is.
        let only_broken = dataset(vec![Record::district("B", "b1").with_geometry(broken)]);
        let out = aggregate(&only_broken).unwrap();
        assert!(matches!(out.records[1].geometry, Some(Geometry::Polygon(_))));
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(aggregate(&dataset(vec![])).is_err());
    }

    #[test]
    fn mode_prefers_smallest_on_tie() {
        let a = Record::district("A", "1").with("k", Value::text("b"));
        let b = Record::district("A", "2").with("k", Value::text("a"));
        assert_eq!(mode(&[&a, &b], "k").as_deref(), Some("a"));
        assert_eq!(mode(&[], "k"), None);
        assert_eq!(mean(&[], "k"), None);
    }
}
