//! Per-type record shapes and the process-wide shape cache.

use std::any::{TypeId, type_name};
use std::collections::HashMap;
use std::sync::{OnceLock, RwLock};

use crate::error::CsvError;

use super::{CsvRecord, FieldSpec, Record, coerce};

/// Validated view of a type's field order and kinds.
///
/// Computed lazily, interned for the lifetime of the process, never mutated.
pub struct RecordShape {
    type_name: &'static str,
    fields: &'static [FieldSpec],
}

impl RecordShape {
    /// Declared field names, in declaration order.
    pub fn field_order(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|spec| spec.name)
    }

    /// Folds a record into an instance of `T`.
    ///
    /// All-or-nothing: a column missing from the record, a cell that doesn't
    /// coerce to its declared kind, or a rejected construction aborts the
    /// whole decode.
    pub(crate) fn decode<T: CsvRecord>(&self, record: &Record) -> Result<T, CsvError> {
        let mut values = Vec::with_capacity(self.fields.len());
        for spec in self.fields {
            let cell = record
                .get(spec.name)
                .ok_or_else(|| CsvError::RecordMismatch {
                    field: spec.name.to_owned(),
                    reason: "missing from the parsed row".to_owned(),
                })?;
            let value =
                coerce(cell.unwrap_or(""), spec.kind).map_err(|reason| CsvError::RecordMismatch {
                    field: spec.name.to_owned(),
                    reason,
                })?;
            values.push(value);
        }
        T::from_values(values).ok_or_else(|| CsvError::RecordMismatch {
            field: self.type_name.to_owned(),
            reason: "the coerced values were rejected by the constructor".to_owned(),
        })
    }

    /// Renders an instance's cells in field order, omitting fields without a
    /// readable accessor. Never fails.
    pub(crate) fn encode<T: CsvRecord>(&self, item: &T) -> Vec<String> {
        self.fields
            .iter()
            .filter_map(|spec| item.value_of(spec.name))
            .collect()
    }
}

static SHAPES: OnceLock<RwLock<HashMap<TypeId, &'static RecordShape>>> = OnceLock::new();

/// Returns the interned shape of `T`, computing and validating it on first
/// access.
///
/// The cache is append-only and keyed by `TypeId`; concurrent first accesses
/// may both compute the shape but only one result is retained.
pub(crate) fn shape_of<T: CsvRecord + 'static>() -> Result<&'static RecordShape, CsvError> {
    let cache = SHAPES.get_or_init(|| RwLock::new(HashMap::new()));
    let key = TypeId::of::<T>();
    if let Ok(shapes) = cache.read()
        && let Some(shape) = shapes.get(&key)
    {
        return Ok(shape);
    }
    let shape: &'static RecordShape = Box::leak(Box::new(build::<T>()?));
    if let Ok(mut shapes) = cache.write() {
        return Ok(*shapes.entry(key).or_insert(shape));
    }
    Ok(shape)
}

fn build<T: CsvRecord>() -> Result<RecordShape, CsvError> {
    let type_name = type_name::<T>();
    let fields = T::fields();
    let ineligible = |reason: String| CsvError::IneligibleType { type_name, reason };
    if fields.is_empty() {
        return Err(ineligible("it declares no field".to_owned()));
    }
    for (index, spec) in fields.iter().enumerate() {
        if spec.name.trim().is_empty() {
            return Err(ineligible("it declares a blank field name".to_owned()));
        }
        if fields[..index].iter().any(|seen| seen.name == spec.name) {
            return Err(ineligible(format!(
                "field `{}` is declared more than once",
                spec.name
            )));
        }
    }
    Ok(RecordShape { type_name, fields })
}
