#![doc = "Solar suitability rollups: aggregation, selection and classification of district indicators"]
mod aggregate;
mod catalog;
mod choropleth;
mod classify;
mod common;
mod config;
mod dashboard;
mod data;
mod error;
mod geom;
mod io;
mod load;
mod optimize;
mod select;
mod stats;

#[doc(inline)]
pub use aggregate::{aggregate, aggregate_with};

#[doc(inline)]
pub use catalog::{Category, Layer, ALL_DISTRICTS, DISTRICT_FIELD, MIXED, NATIONAL_AVERAGE, STATE_AVERAGE, STATE_FIELD};

#[doc(inline)]
pub use choropleth::{Choropleth, ColorSource, MapFeature};

#[doc(inline)]
pub use classify::{classify, label_color, label_legend, label_rank, legend, numeric_color, LegendEntry, Rgb, Tier};

#[doc(inline)]
pub use config::Config;

#[doc(inline)]
pub use dashboard::{Dashboard, Options, View};

#[doc(inline)]
pub use data::{Dataset, Field, FieldKind, Level, Record, Schema, SchemaOptions, Value};

#[doc(inline)]
pub use error::DataError;

#[doc(inline)]
pub use geom::{GeometryOps, PlanarOps};

#[doc(inline)]
pub use load::{load_dataset, placeholder_dataset, resolve_path, try_load_dataset, DatasetCache};

#[doc(inline)]
pub use optimize::{optimize, OptimizeReport};

#[doc(inline)]
pub use select::{district_options, map_subset, select, state_options, Scope, Selection};

#[doc(inline)]
pub use stats::{Distribution, Slice, Summary};
