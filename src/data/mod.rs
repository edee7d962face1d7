mod dataset;
mod record;
mod schema;
mod value;

pub use dataset::Dataset;
pub use record::{Level, Record};
pub use schema::{Field, FieldKind, Schema, SchemaOptions};
pub(crate) use schema::RawValue;
pub use value::Value;
