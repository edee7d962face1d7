use crate::data::{Level, Record, Schema};

/// A record collection with its schema and coordinate reference metadata.
///
/// Once aggregated, a dataset is treated as immutable: queries read from it and
/// copy out the records they need.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub schema: Schema,
    pub records: Vec<Record>,
    pub crs: Option<String>, // WKT from the .prj sidecar, if any
}

impl Dataset {
    pub fn new(schema: Schema, records: Vec<Record>, crs: Option<String>) -> Self {
        Self { schema, records, crs }
    }

    #[inline] pub fn records(&self) -> &[Record] { &self.records }

    #[inline] pub fn len(&self) -> usize { self.records.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.records.is_empty() }

    /// Genuine district rows, skipping rollups.
    pub fn districts(&self) -> impl Iterator<Item = &Record> {
        self.records.iter().filter(|r| !r.is_rollup())
    }

    /// State rollup rows, in the order they were created.
    pub fn state_rollups(&self) -> impl Iterator<Item = &Record> {
        self.records.iter().filter(|r| r.level == Level::State)
    }

    /// The national rollup, once aggregated.
    pub fn national(&self) -> Option<&Record> {
        self.records.iter().find(|r| r.level == Level::National)
    }
}
