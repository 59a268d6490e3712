//! Record model: decoded rows, field shapes and the [`CsvRecord`] capability.
//!
//! A CSV data row is first materialized as a [`Record`], an ordered mapping
//! from column name to nullable cell text. A [`Record`] is then folded into a
//! concrete type through that type's [`CsvRecord`] implementation, which
//! declares the field order and kinds and provides the constructor and the
//! per-field accessors. The [`csv_record!`](crate::csv_record) macro derives
//! the whole implementation from a plain struct declaration.

mod shape;

pub(crate) use shape::shape_of;
pub use shape::RecordShape;

use thiserror::Error;

/// Runtime kind of a declared field, driving cell coercion.
///
/// The coercion set is intentionally narrow: booleans, decimal integers, and
/// everything else as raw text. Nested structures are not recursed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Parsed with a strict grammar: exactly `"true"` or `"false"`.
    Boolean,
    /// Parsed with the standard decimal integer grammar.
    Integer,
    /// Passed through as the raw cell text.
    Other,
}

/// Name and kind of one declared field, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }
}

/// A cell value coerced to its declared kind.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Boolean(bool),
    Integer(i64),
    Text(String),
}

/// Capability of a single field type: its kind, how to build it from a
/// coerced value, and how to render it back to cell text.
pub trait CsvField: Sized {
    const KIND: FieldKind;

    /// Builds the field from a coerced value, or `None` on a kind mismatch.
    fn from_value(value: FieldValue) -> Option<Self>;

    /// Renders the field through its natural textual form.
    fn to_cell(&self) -> String;
}

impl CsvField for String {
    const KIND: FieldKind = FieldKind::Other;

    fn from_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    fn to_cell(&self) -> String {
        self.clone()
    }
}

impl CsvField for bool {
    const KIND: FieldKind = FieldKind::Boolean;

    fn from_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Boolean(value) => Some(value),
            _ => None,
        }
    }

    fn to_cell(&self) -> String {
        self.to_string()
    }
}

macro_rules! integer_field {
    ($($ty:ty),+) => {
        $(impl CsvField for $ty {
            const KIND: FieldKind = FieldKind::Integer;

            fn from_value(value: FieldValue) -> Option<Self> {
                match value {
                    FieldValue::Integer(value) => Self::try_from(value).ok(),
                    _ => None,
                }
            }

            fn to_cell(&self) -> String {
                self.to_string()
            }
        })+
    };
}

integer_field!(i64, i32, i16, u64, u32, u16);

/// Capability of a record type: field order, construction and accessors.
///
/// Implement it by hand for full control, or declare the type through
/// [`csv_record!`](crate::csv_record):
///
/// ```
/// use typed_csv_rs::csv_record;
///
/// csv_record! {
///     #[derive(Debug, PartialEq)]
///     pub struct Account {
///         name: String,
///         balance: i64,
///         active: bool,
///     }
/// }
/// ```
pub trait CsvRecord: Sized {
    /// Declared fields, in declaration order. This is the column order used
    /// both to interpret rows and to lay out written cells.
    fn fields() -> &'static [FieldSpec];

    /// Builds an instance from coerced values, one per entry of
    /// [`fields()`](CsvRecord::fields), in order. All-or-nothing: `None`
    /// rejects the whole row.
    fn from_values(values: Vec<FieldValue>) -> Option<Self>;

    /// Textual value of the named field, or `None` when the field has no
    /// readable accessor; such a column is omitted on write.
    fn value_of(&self, field: &str) -> Option<String>;
}

/// Declares a plain struct and derives its [`CsvRecord`] implementation from
/// the field list.
///
/// Field types must implement [`CsvField`]; attributes and visibility are
/// passed through to the generated struct.
#[macro_export]
macro_rules! csv_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $( $(#[$field_meta:meta])* $field_vis:vis $field:ident : $ty:ty ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $( $(#[$field_meta])* $field_vis $field: $ty, )+
        }

        impl $crate::CsvRecord for $name {
            fn fields() -> &'static [$crate::FieldSpec] {
                const FIELDS: &[$crate::FieldSpec] = &[
                    $( $crate::FieldSpec::new(
                        stringify!($field),
                        <$ty as $crate::CsvField>::KIND,
                    ), )+
                ];
                FIELDS
            }

            fn from_values(
                values: ::std::vec::Vec<$crate::FieldValue>,
            ) -> ::core::option::Option<Self> {
                let mut values = values.into_iter();
                ::core::option::Option::Some(Self {
                    $( $field: <$ty as $crate::CsvField>::from_value(values.next()?)?, )+
                })
            }

            fn value_of(
                &self,
                field: &str,
            ) -> ::core::option::Option<::std::string::String> {
                match field {
                    $( stringify!($field) => ::core::option::Option::Some(
                        $crate::CsvField::to_cell(&self.$field),
                    ), )+
                    _ => ::core::option::Option::None,
                }
            }
        }
    };
}

/// Violation of the [`Record`] invariants by a raw parsed row.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidRecord {
    #[error("a record should have at least one field")]
    NoFields,
    #[error("a record's column names shouldn't be blank")]
    BlankColumnName,
}

/// One decoded data row: a non-empty ordered mapping from non-blank column
/// name to nullable cell text.
///
/// An empty cell is represented as `None`. Rows violating the invariants
/// never become `Record`s; see [`Record::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, Option<String>)>,
}

impl Record {
    /// Builds a record, rejecting an empty field set or a blank column name.
    pub fn new(fields: Vec<(String, Option<String>)>) -> Result<Self, InvalidRecord> {
        if fields.is_empty() {
            return Err(InvalidRecord::NoFields);
        }
        if fields.iter().any(|(name, _)| name.trim().is_empty()) {
            return Err(InvalidRecord::BlankColumnName);
        }
        Ok(Self { fields })
    }

    /// Cell text under the given column: `None` when the column is absent,
    /// `Some(None)` when the cell is empty.
    pub fn get(&self, column: &str) -> Option<Option<&str>> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_deref())
    }

    /// Column/cell pairs in row order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Coerces one textual cell into the declared field kind.
pub(crate) fn coerce(text: &str, kind: FieldKind) -> Result<FieldValue, String> {
    match kind {
        FieldKind::Boolean => match text {
            "true" => Ok(FieldValue::Boolean(true)),
            "false" => Ok(FieldValue::Boolean(false)),
            other => Err(format!("`{other}` is not a strict boolean")),
        },
        FieldKind::Integer => text
            .parse::<i64>()
            .map(FieldValue::Integer)
            .map_err(|_| format!("`{text}` is not an integer")),
        FieldKind::Other => Ok(FieldValue::Text(text.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    csv_record! {
        #[derive(Debug, PartialEq)]
        struct Example {
            first: String,
            second: i64,
            third: bool,
        }
    }

    #[test]
    fn fields_should_keep_declaration_order() {
        let names: Vec<&str> = Example::fields().iter().map(|f| f.name).collect();
        assert_eq!(names, ["first", "second", "third"]);
        assert_eq!(Example::fields()[1].kind, FieldKind::Integer);
        assert_eq!(Example::fields()[2].kind, FieldKind::Boolean);
    }

    #[test]
    fn from_values_should_build_in_order() {
        let example = Example::from_values(vec![
            FieldValue::Text("a".into()),
            FieldValue::Integer(1),
            FieldValue::Boolean(true),
        ])
        .unwrap();
        assert_eq!(
            example,
            Example {
                first: "a".into(),
                second: 1,
                third: true,
            }
        );
    }

    #[test]
    fn from_values_should_reject_kind_mismatch() {
        let example = Example::from_values(vec![
            FieldValue::Text("a".into()),
            FieldValue::Boolean(true),
            FieldValue::Boolean(true),
        ]);
        assert!(example.is_none());
    }

    #[test]
    fn value_of_should_render_cells() {
        let example = Example {
            first: "a".into(),
            second: 1,
            third: true,
        };
        assert_eq!(example.value_of("first").as_deref(), Some("a"));
        assert_eq!(example.value_of("second").as_deref(), Some("1"));
        assert_eq!(example.value_of("third").as_deref(), Some("true"));
        assert_eq!(example.value_of("unknown"), None);
    }

    #[test]
    fn record_should_require_a_field() {
        assert_eq!(Record::new(vec![]), Err(InvalidRecord::NoFields));
    }

    #[test]
    fn record_should_reject_blank_column_name() {
        let fields = vec![("  ".to_owned(), Some("a".to_owned()))];
        assert_eq!(Record::new(fields), Err(InvalidRecord::BlankColumnName));
    }

    #[test]
    fn record_should_expose_cells() {
        let record = Record::new(vec![
            ("h1".to_owned(), Some("a".to_owned())),
            ("h2".to_owned(), None),
        ])
        .unwrap();
        assert_eq!(record.get("h1"), Some(Some("a")));
        assert_eq!(record.get("h2"), Some(None));
        assert_eq!(record.get("h3"), None);
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn boolean_coercion_should_be_strict() {
        assert_eq!(
            coerce("true", FieldKind::Boolean),
            Ok(FieldValue::Boolean(true))
        );
        assert_eq!(
            coerce("false", FieldKind::Boolean),
            Ok(FieldValue::Boolean(false))
        );
        assert!(coerce("True", FieldKind::Boolean).is_err());
        assert!(coerce("TRUE", FieldKind::Boolean).is_err());
        assert!(coerce("1", FieldKind::Boolean).is_err());
        assert!(coerce("", FieldKind::Boolean).is_err());
    }

    #[test]
    fn integer_coercion_should_use_decimal_grammar() {
        assert_eq!(coerce("42", FieldKind::Integer), Ok(FieldValue::Integer(42)));
        assert_eq!(
            coerce("-7", FieldKind::Integer),
            Ok(FieldValue::Integer(-7))
        );
        assert!(coerce("true", FieldKind::Integer).is_err());
        assert!(coerce("4.2", FieldKind::Integer).is_err());
    }

    #[test]
    fn other_coercion_should_pass_text_through() {
        assert_eq!(
            coerce("anything", FieldKind::Other),
            Ok(FieldValue::Text("anything".into()))
        );
    }
}
