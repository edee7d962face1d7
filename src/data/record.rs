use std::collections::BTreeMap;

use geo::Geometry;
use serde::{ser::SerializeStruct, Serialize, Serializer};

use crate::{
    catalog::{Category, Layer, ALL_DISTRICTS, DISTRICT_FIELD, NATIONAL_AVERAGE, STATE_FIELD},
    data::Value,
    geom::{GeometryOps, PlanarOps},
};

/// Administrative level a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Level {
    National, // Synthetic rollup over every district
    State,    // Synthetic rollup over one state's districts
    District, // Genuine row from the source file
}

impl Level {
    pub fn to_str(&self) -> &'static str {
        match self {
            Level::National => "national",
            Level::State => "state",
            Level::District => "district",
        }
    }
}

/// One row of the dataset: a district, or a state/national rollup of districts.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub level: Level,
    pub state_name: String,    // NAME_1
    pub district_name: String, // NAME_2
    pub attributes: BTreeMap<String, Value>,
    pub geometry: Option<Geometry<f64>>,
}

impl Record {
    pub fn district(state: impl Into<String>, district: impl Into<String>) -> Self {
        Self {
            level: Level::District,
            state_name: state.into(),
            district_name: district.into(),
            attributes: BTreeMap::new(),
            geometry: None,
        }
    }

    pub fn national() -> Self {
        Self { level: Level::National, ..Self::district(NATIONAL_AVERAGE, ALL_DISTRICTS) }
    }

    pub fn state(state: impl Into<String>) -> Self {
        Self { level: Level::State, ..Self::district(state, ALL_DISTRICTS) }
    }

    /// Builder-style attribute setter.
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    pub fn with_geometry(mut self, geometry: impl Into<Geometry<f64>>) -> Self {
        self.geometry = Some(geometry.into());
        self
    }

    #[inline] pub fn get(&self, key: &str) -> Option<&Value> { self.attributes.get(key) }

    #[inline] pub fn number(&self, key: &str) -> Option<f64> { self.get(key).and_then(Value::as_number) }

    #[inline] pub fn text(&self, key: &str) -> Option<&str> { self.get(key).and_then(Value::as_text) }

    /// Value of a continuous indicator layer.
    #[inline] pub fn layer_value(&self, layer: Layer) -> Option<f64> { self.number(layer.column()) }

    /// Stored suitability label for a category.
    #[inline] pub fn category_label(&self, category: Category) -> Option<&str> { self.text(category.column()) }

    #[inline] pub fn is_rollup(&self) -> bool { self.level != Level::District }
}

/// Serialized with the geometry reduced to its centroid.
impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let centroid = self.geometry.as_ref()
            .and_then(|g| PlanarOps.centroid(g))
            .map(|p| (p.x(), p.y()));

        let mut state = serializer.serialize_struct("Record", 5)?;
        state.serialize_field("level", &self.level)?;
        state.serialize_field(STATE_FIELD, &self.state_name)?;
        state.serialize_field(DISTRICT_FIELD, &self.district_name)?;
        state.serialize_field("attributes", &self.attributes)?;
        state.serialize_field("centroid", &centroid)?;
        state.end()
    }
}
