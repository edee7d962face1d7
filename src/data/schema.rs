use anyhow::Result;
use serde::Serialize;

use crate::{catalog::Category, data::Value, io};

/// How a field is stored once the dataset has been loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldKind {
    Numeric,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub name: String,
    pub kind: FieldKind,
}

/// Knobs for deciding field kinds at load time.
#[derive(Debug, Clone)]
pub struct SchemaOptions {
    /// Columns always coerced to numbers, whatever their declared type.
    pub numeric_columns: Vec<String>,
    /// Fraction of non-blank text values that must parse for a text column to count as numeric.
    pub numeric_majority: f64,
}

impl Default for SchemaOptions {
    fn default() -> Self {
        Self { numeric_columns: vec!["GW_dev_sta".into()], numeric_majority: 0.9 }
    }
}

/// A value as read from the source file, before the schema is fixed.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RawValue {
    Number(Option<f64>),
    Text(Option<String>),
}

/// Attribute fields of a dataset, excluding the state/district names and the geometry.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Self { Self { fields } }

    #[inline] pub fn fields(&self) -> &[Field] { &self.fields }

    #[inline] pub fn len(&self) -> usize { self.fields.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.fields.is_empty() }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    #[inline] pub fn contains(&self, name: &str) -> bool { self.get(name).is_some() }

    pub fn numeric(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.kind == FieldKind::Numeric)
    }

    pub fn text(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.kind == FieldKind::Text)
    }

    /// Decide the kind of one column and convert its raw values accordingly.
    ///
    /// Category columns are always text. Forced columns are always numeric. Otherwise a
    /// column is numeric when every value was stored as a number, or when at least
    /// `numeric_majority` of its non-blank text values parse as numbers; values that
    /// do not parse become missing rather than failing the column.
    pub(crate) fn infer_column(name: &str, raw: &[RawValue], options: &SchemaOptions) -> Result<(Field, Vec<Value>)> {
        if Category::from_column(name).is_some() {
            return Ok((Field { name: name.into(), kind: FieldKind::Text }, to_text(raw)));
        }

        let forced = options.numeric_columns.iter().any(|c| c == name);
        let has_text = raw.iter().any(|v| matches!(v, RawValue::Text(Some(s)) if !s.trim().is_empty()));

        if !has_text {
            let declared_numeric = raw.iter().any(|v| matches!(v, RawValue::Number(_)));
            if forced || declared_numeric {
                let values = raw.iter()
                    .map(|v| match v {
                        RawValue::Number(x) => Value::Number(x.filter(|x| x.is_finite())),
                        RawValue::Text(_) => Value::Number(None),
                    })
                    .collect();
                return Ok((Field { name: name.into(), kind: FieldKind::Numeric }, values));
            }
            return Ok((Field { name: name.into(), kind: FieldKind::Text }, to_text(raw)));
        }

        let texts: Vec<Option<&str>> = raw.iter()
            .map(|v| match v {
                RawValue::Text(s) => s.as_deref(),
                RawValue::Number(_) => None,
            })
            .collect();
        let coerced = io::frame::coerce_numeric(name, &texts)?;

        let non_blank = texts.iter().flatten().filter(|s| !s.trim().is_empty()).count();
        let parsed = coerced.iter().flatten().count();
        let numeric = forced || (non_blank > 0 && parsed as f64 / non_blank as f64 >= options.numeric_majority);

        if !numeric {
            return Ok((Field { name: name.into(), kind: FieldKind::Text }, to_text(raw)));
        }

        let values = raw.iter().zip(coerced)
            .map(|(v, c)| match v {
                RawValue::Number(x) => Value::Number(x.filter(|x| x.is_finite())),
                RawValue::Text(_) => Value::Number(c),
            })
            .collect();
        Ok((Field { name: name.into(), kind: FieldKind::Numeric }, values))
    }
}

fn to_text(raw: &[RawValue]) -> Vec<Value> {
    raw.iter()
        .map(|v| match v {
            RawValue::Text(s) => Value::Text(s.as_ref().map(|s| s.trim().to_string()).filter(|s| !s.is_empty())),
            RawValue::Number(x) => Value::Text(x.map(|x| x.to_string())),
        })
        .collect()
}
