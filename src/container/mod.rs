//! Container access layer.
//!
//! Everything that knows how to open and navigate a container lives behind
//! the two traits in this module: [`ContainerDirectory`] for nested
//! directories and [`ContainerObject`] for leaf objects carrying named field
//! arrays. The conversion pipeline only ever talks to these traits, so it
//! works identically against a real [`bundle::Bundle`] on disk and the
//! synthetic [`memory`] containers used in tests.
//!
//! The actual binary decoding (ZIP central directories, Parquet pages,
//! compression codecs, schema metadata) is delegated entirely to the `zip`,
//! `parquet`, and `arrow` crates; nothing in this crate parses bytes itself.

use std::fmt;

pub mod bundle;
pub mod memory;

/// Errors raised while opening or reading a container.
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Parquet error
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// JSON parsing error (bundle metadata)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The file is not a recognizable container
    #[error("invalid container: {0}")]
    InvalidFormat(String),

    /// A slash-delimited object path did not resolve
    #[error("object '{path}' not found in the container")]
    NotFound {
        /// The full path as originally requested.
        path: String,
    },

    /// A field uses a column type this tool cannot flatten to scalars
    #[error("field '{field}' has unsupported type {datatype}")]
    UnsupportedType {
        /// Field name.
        field: String,
        /// Source type description.
        datatype: String,
    },
}

/// A scalar cell value read from a field array.
///
/// Tabular extraction keeps each field's native type; the coordinate-series
/// shapes coerce everything to [`Value::Float`] before serialization.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Signed integer (all integer widths widen to `i64`).
    Int(i64),
    /// Floating-point number (`f32` widens to `f64`).
    Float(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Text(String),
    /// Missing value (a null slot in the source column).
    Null,
}

impl Value {
    /// Numeric view of the value, if it has one.
    ///
    /// Booleans coerce to `1.0`/`0.0`; text and nulls do not coerce.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            Value::Bool(true) => Some(1.0),
            Value::Bool(false) => Some(0.0),
            Value::Text(_) | Value::Null => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Text(v) => f.write_str(v),
            Value::Null => Ok(()),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

/// A named field together with its materialized values.
#[derive(Debug, Clone)]
pub struct FieldArray {
    /// Field name as reported by the source schema.
    pub name: String,
    /// Cell values in row order.
    pub values: Vec<Value>,
}

impl FieldArray {
    /// Create a field array from anything convertible to [`Value`].
    pub fn new<V: Into<Value>>(name: &str, values: Vec<V>) -> Self {
        Self {
            name: name.to_string(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// A node handed out by a [`ContainerDirectory`]: either a nested directory
/// or a leaf object. Borrowed from the container handle and never outlives
/// it.
#[derive(Clone, Copy)]
pub enum ContainerEntry<'a> {
    /// A nested directory holding further entries.
    Directory(&'a dyn ContainerDirectory),
    /// A leaf object with named field arrays.
    Object(&'a dyn ContainerObject),
}

impl std::fmt::Debug for ContainerEntry<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContainerEntry::Directory(_) => f.write_str("Directory"),
            ContainerEntry::Object(_) => f.write_str("Object"),
        }
    }
}

/// Directory-level navigation of a container.
pub trait ContainerDirectory {
    /// Look up an immediate child by name.
    fn get(&self, name: &str) -> Option<ContainerEntry<'_>>;

    /// All immediate children, in the order the container layer reports
    /// them. The order is stable but container-defined.
    fn entries(&self) -> Vec<(String, ContainerEntry<'_>)>;
}

/// Field-level access to a leaf object.
pub trait ContainerObject {
    /// Names of the object's fields in declaration order.
    fn keys(&self) -> Result<Vec<String>, ContainerError>;

    /// Materialize every field as a scalar array, in declaration order.
    fn arrays(&self) -> Result<Vec<FieldArray>, ContainerError>;
}

/// Walk a slash-delimited object path from `root`.
///
/// Leading, trailing, and repeated slashes are ignored. The walk fails with
/// [`ContainerError::NotFound`] naming the full original path as soon as any
/// segment does not resolve; no partial result is returned. An all-empty
/// path resolves to the root directory itself.
pub fn locate<'a>(
    root: &'a dyn ContainerDirectory,
    path: &str,
) -> Result<ContainerEntry<'a>, ContainerError> {
    let not_found = || ContainerError::NotFound {
        path: path.to_string(),
    };

    let mut current = ContainerEntry::Directory(root);
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        current = match current {
            ContainerEntry::Directory(dir) => dir.get(segment).ok_or_else(not_found)?,
            // Cannot descend through a leaf object.
            ContainerEntry::Object(_) => return Err(not_found()),
        };
    }
    Ok(current)
}
