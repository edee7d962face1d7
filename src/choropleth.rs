//! Per-feature classification for choropleth rendering.

use geo::Point;
use serde::Serialize;

use crate::{
    classify::{classify, label_legend, legend, LegendEntry, Rgb, Tier},
    data::{FieldKind, Record, Schema},
    geom::{GeometryOps, PlanarOps},
    select::{map_subset, Scope, Selection},
};

/// Which column colors the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ColorSource {
    /// A continuous layer column, bucketed with the category's scale.
    Layer(String),
    /// The stored category labels, used when the layer column is absent.
    Category(String),
}

/// One colored feature, ready for a renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapFeature {
    pub state: String,
    pub district: String,
    pub value: Option<f64>,
    pub tier: Tier,
    pub color: Rgb,
    /// Where to draw the district name; only set for state views.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_point: Option<(f64, f64)>,
}

/// The classified map for a selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Choropleth {
    pub title: String,
    pub source: ColorSource,
    pub features: Vec<MapFeature>,
    pub legend: Vec<LegendEntry>,
}

impl Choropleth {
    /// Classify the districts visible for `selection` by its layer, falling back to the
    /// category labels when the dataset has no such layer column.
    pub fn build(schema: &Schema, records: &[Record], selection: &Selection) -> Self {
        let layer_column = selection.layer.column();
        let category = selection.category;
        let by_layer = schema.get(layer_column).is_some_and(|f| f.kind == FieldKind::Numeric);
        let label_districts = selection.scope() == Scope::State;

        let features = map_subset(records, selection).into_iter()
            .map(|record| {
                let (value, tier) = if by_layer {
                    let value = record.number(layer_column);
                    (value, classify(value, category))
                } else {
                    (None, record.category_label(category).map_or(Tier::Unknown, Tier::from_label))
                };
                MapFeature {
                    state: record.state_name.clone(),
                    district: record.district_name.clone(),
                    value,
                    tier,
                    color: tier.color(),
                    label_point: label_districts
                        .then(|| label_point(record))
                        .flatten()
                        .map(|p| (p.x(), p.y())),
                }
            })
            .collect();

        let (source, legend) = if by_layer {
            (ColorSource::Layer(layer_column.to_string()), legend(category))
        } else {
            (ColorSource::Category(category.column().to_string()), label_legend())
        };
        let column = match &source {
            ColorSource::Layer(c) | ColorSource::Category(c) => c.as_str(),
        };

        let title = match selection.scope() {
            Scope::District => format!("{} - {} - {}", selection.state, selection.district, column),
            _ => format!("{} - {}", selection.state, column),
        };

        Self { title, source, features, legend }
    }
}

fn label_point(record: &Record) -> Option<Point<f64>> {
    record.geometry.as_ref().and_then(|g| PlanarOps.centroid(g))
}
