//! Field and record schemas. Pure data plus the converter each field carries.
//!
//! A `FieldSchema` describes one column: its name, its ordinal (the column
//! position in the source row), its value type, whether it may be empty, and
//! an optional converter. `Field<T>` is the typed handle callers keep around
//! to read values back out of a `Record`.

use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ops::Deref;
use std::sync::Arc;

use crate::convert::Converter;
use crate::error::{Error, Result};
use crate::value::{FieldValue, Value, ValueType};

#[derive(Clone)]
pub struct FieldSchema {
    name: String,
    ordinal: usize,
    value_type: ValueType,
    nullable: bool,
    converter: Option<Arc<dyn Converter>>,
}

impl FieldSchema {
    /// A nullable field without converter.
    pub fn new(name: impl Into<String>, ordinal: usize, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            ordinal,
            value_type,
            nullable: true,
            converter: None,
        }
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn with_converter(mut self, converter: impl Converter + 'static) -> Self {
        self.converter = Some(Arc::new(converter));
        self
    }

    pub fn with_shared_converter(mut self, converter: Arc<dyn Converter>) -> Self {
        self.converter = Some(converter);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn converter(&self) -> Option<&dyn Converter> {
        self.converter.as_deref()
    }

    /// Turn raw column text into this field's value.
    ///
    /// Without a converter the text is taken as is (no trimming), which is
    /// only valid for text fields. Nullability is *not* checked here.
    pub fn convert(&self, raw: &str) -> Result<Option<Value>> {
        let value = match &self.converter {
            Some(converter) => converter.convert(raw)?,
            None => Some(Value::Text(raw.to_string())),
        };
        match value {
            Some(v) if v.value_type() != self.value_type => Err(Error::TypeMismatch {
                expected: self.value_type,
                actual: v.value_type(),
            }),
            other => Ok(other),
        }
    }

    fn validate(&self) -> Result<()> {
        let produced = self
            .converter
            .as_ref()
            .map_or(ValueType::Text, |c| c.target_type());
        if produced != self.value_type {
            return Err(Error::Config(format!(
                "field '{}' is declared as {} but its converter produces {}",
                self.name, self.value_type, produced
            )));
        }
        Ok(())
    }
}

// Identity excludes the converter.
impl PartialEq for FieldSchema {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.ordinal == other.ordinal
            && self.value_type == other.value_type
            && self.nullable == other.nullable
    }
}

impl Eq for FieldSchema {}

impl Hash for FieldSchema {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.ordinal.hash(state);
        self.value_type.hash(state);
        self.nullable.hash(state);
    }
}

impl fmt::Debug for FieldSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSchema")
            .field("name", &self.name)
            .field("ordinal", &self.ordinal)
            .field("value_type", &self.value_type)
            .field("nullable", &self.nullable)
            .field("converter", &self.converter)
            .finish()
    }
}

impl fmt::Display for FieldSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Typed handle to a field; the type parameter fixes the field's `ValueType`.
pub struct Field<T> {
    schema: FieldSchema,
    _type: PhantomData<fn() -> T>,
}

impl<T: FieldValue> Field<T> {
    pub fn new(name: impl Into<String>, ordinal: usize) -> Self {
        Self {
            schema: FieldSchema::new(name, ordinal, T::VALUE_TYPE),
            _type: PhantomData,
        }
    }

    pub fn with_nullable(self, nullable: bool) -> Self {
        Self {
            schema: self.schema.with_nullable(nullable),
            _type: PhantomData,
        }
    }

    pub fn with_converter(self, converter: impl Converter + 'static) -> Self {
        Self {
            schema: self.schema.with_converter(converter),
            _type: PhantomData,
        }
    }

    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    /// Borrow a stored value as `T`, failing loudly on a type mismatch.
    pub fn cast<'a>(&self, value: Option<&'a Value>) -> Result<Option<&'a T>> {
        match value {
            None => Ok(None),
            Some(v) => T::cast(v).map(Some).ok_or(Error::TypeMismatch {
                expected: T::VALUE_TYPE,
                actual: v.value_type(),
            }),
        }
    }
}

impl<T> Deref for Field<T> {
    type Target = FieldSchema;

    fn deref(&self) -> &FieldSchema {
        &self.schema
    }
}

impl<T> Clone for Field<T> {
    fn clone(&self) -> Self {
        Self {
            schema: self.schema.clone(),
            _type: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.schema, f)
    }
}

impl<T> From<Field<T>> for FieldSchema {
    fn from(field: Field<T>) -> Self {
        field.schema
    }
}

impl<T> From<&Field<T>> for FieldSchema {
    fn from(field: &Field<T>) -> Self {
        field.schema.clone()
    }
}

/// Upper bound on `max_ordinal + 1`; every extracted row allocates this many slots.
pub const MAX_SLOTS: usize = 1 << 16;

/// Immutable, deduplicated set of fields describing one row shape.
#[derive(Debug, Clone)]
pub struct RecordSchema {
    /// Sorted by ascending ordinal.
    fields: Vec<FieldSchema>,
    members: HashSet<FieldSchema>,
    /// ordinal -> index into `fields`
    slots: Vec<Option<usize>>,
}

impl RecordSchema {
    /// Build a schema from a non-empty set of fields.
    ///
    /// Exact duplicates collapse into one field. Two different fields at the
    /// same ordinal, or a field whose converter does not produce the field's
    /// declared type, are rejected.
    pub fn new<I, F>(fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = F>,
        F: Into<FieldSchema>,
    {
        let mut members = HashSet::new();
        let mut list = Vec::new();
        for field in fields {
            let field = field.into();
            if members.insert(field.clone()) {
                list.push(field);
            }
        }
        if list.is_empty() {
            return Err(Error::Config("At least one field must be specified".into()));
        }
        list.sort_by(|a, b| a.ordinal.cmp(&b.ordinal).then_with(|| a.name.cmp(&b.name)));

        for pair in list.windows(2) {
            if pair[0].ordinal == pair[1].ordinal {
                return Err(Error::Config(format!(
                    "fields '{}' and '{}' share ordinal {}",
                    pair[0].name, pair[1].name, pair[0].ordinal
                )));
            }
        }
        for field in &list {
            field.validate()?;
        }

        let max_ordinal = list.last().map_or(0, |f| f.ordinal);
        let slot_count = max_ordinal
            .checked_add(1)
            .filter(|&n| n <= MAX_SLOTS)
            .ok_or_else(|| {
                Error::Config(format!(
                    "field ordinal {max_ordinal} exceeds the maximum of {}",
                    MAX_SLOTS - 1
                ))
            })?;
        let mut slots = vec![None; slot_count];
        for (idx, field) in list.iter().enumerate() {
            slots[field.ordinal] = Some(idx);
        }

        Ok(Self {
            fields: list,
            members,
            slots,
        })
    }

    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    pub fn contains(&self, field: &FieldSchema) -> bool {
        self.members.contains(field)
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn max_ordinal(&self) -> usize {
        self.slots.len() - 1
    }

    /// Number of value slots a row of this schema occupies (`max_ordinal + 1`).
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Positional lookup into the ordinal-sorted field list.
    pub fn field(&self, index: usize) -> Result<&FieldSchema> {
        self.fields.get(index).ok_or_else(|| {
            Error::Argument(format!(
                "field index {index} out of range for {} fields",
                self.fields.len()
            ))
        })
    }

    pub fn field_at_ordinal(&self, ordinal: usize) -> Option<&FieldSchema> {
        self.slots
            .get(ordinal)
            .copied()
            .flatten()
            .map(|idx| &self.fields[idx])
    }

    pub fn field_by_name(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }
}
