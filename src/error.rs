use thiserror::Error;

/// Error raised while reading or writing CSV records.
///
/// Every variant is recoverable by the caller. The strict entry points return
/// this enum directly so callers can branch on the failure kind; the throwing
/// entry points wrap it into a generic [`anyhow::Error`]; the nullable entry
/// points collapse every variant to `None`.
#[derive(Error, Debug)]
pub enum CsvError {
    /// A required configuration property is missing or blank.
    #[error("invalid property `{0}`: it should be set and not blank")]
    InvalidProperty(&'static str),

    /// The configuration as a whole is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The target type cannot provide a usable record shape.
    #[error("type `{type_name}` is not eligible for CSV mapping: {reason}")]
    IneligibleType {
        type_name: &'static str,
        reason: String,
    },

    /// A parsed row doesn't match the target type's shape.
    #[error("record doesn't match on field `{field}`: {reason}")]
    RecordMismatch { field: String, reason: String },

    /// Neither an embedded asset nor a file exists at the resolved path.
    #[error("the file at `{0}` doesn't exist")]
    FileNotFound(String),

    /// The parsed header contains a blank column name.
    #[error("the file at `{0}` has a header with a blank field")]
    MalformedHeader(String),

    /// The resource exists but holds no data row.
    #[error("the file at `{0}` doesn't contain a record")]
    EmptyFile(String),

    /// Underlying filesystem failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Underlying row-level codec failure.
    #[error("CSV codec failed: {0}")]
    Codec(#[from] csv::Error),
}
