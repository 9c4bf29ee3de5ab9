//! One extracted row: a fixed-size value array addressed by field ordinal.

use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::{Error, Result};
use crate::schema::{Field, FieldSchema, RecordSchema};
use crate::value::{FieldValue, Value};

#[derive(Debug, Clone)]
pub struct Record {
    schema: Arc<RecordSchema>,
    values: Box<[Option<Value>]>,
}

impl Record {
    /// Copies `values`; it must hold at least `schema.max_ordinal() + 1` slots.
    pub fn new(schema: Arc<RecordSchema>, values: &[Option<Value>]) -> Result<Self> {
        if values.len() <= schema.max_ordinal() {
            return Err(Error::Argument(format!(
                "Record must contain at least {} values",
                schema.slot_count()
            )));
        }
        Ok(Self {
            schema,
            values: values.into(),
        })
    }

    pub fn schema(&self) -> &Arc<RecordSchema> {
        &self.schema
    }

    /// Untyped access. Fails if `field` is not part of this record's schema.
    pub fn get(&self, field: &FieldSchema) -> Result<Option<&Value>> {
        if !self.schema.contains(field) {
            return Err(Error::Argument(format!(
                "Field is not included in record: {}",
                field.name()
            )));
        }
        Ok(self.values[field.ordinal()].as_ref())
    }

    /// Typed access through a `Field<T>` handle.
    pub fn value<T: FieldValue>(&self, field: &Field<T>) -> Result<Option<&T>> {
        let raw = self.get(field.schema())?;
        field.cast(raw)
    }

    /// Schema fields paired with their values, in ordinal order.
    pub fn iter(&self) -> impl Iterator<Item = (&FieldSchema, Option<&Value>)> {
        self.schema
            .fields()
            .iter()
            .map(move |f| (f, self.values[f.ordinal()].as_ref()))
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.schema.field_count()))?;
        for (field, value) in self.iter() {
            map.serialize_entry(field.name(), &value)?;
        }
        map.end()
    }
}
