//! Row extraction: flattening a classified object into headers plus rows.

use log::debug;

use crate::classify::ObjectKind;
use crate::container::{ContainerError, ContainerObject, FieldArray, Value};

/// Errors raised while flattening an object into rows.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// A read failure in the container layer, propagated unmodified.
    #[error(transparent)]
    Container(#[from] ContainerError),

    /// A coordinate field promised by classification is absent on read.
    #[error("field '{0}' missing from object")]
    MissingField(String),

    /// Paired coordinate arrays differ in length.
    #[error("field '{field}' has {actual} values, expected {expected}")]
    InconsistentLength {
        /// The offending field.
        field: String,
        /// Length of the first coordinate array.
        expected: usize,
        /// Length actually read.
        actual: usize,
    },

    /// A tabular object carries zero fields.
    #[error("object has no fields")]
    NoFields,

    /// A field array ended before the row count derived from the first
    /// field was reached.
    #[error("row {row} is out of range for field '{field}'")]
    RowOutOfRange {
        /// The short field.
        field: String,
        /// First missing row index.
        row: usize,
    },

    /// A coordinate value could not be coerced to floating point.
    #[error("field '{field}' has a non-numeric value at row {row}")]
    NonNumeric {
        /// The offending field.
        field: String,
        /// Row index of the offending value.
        row: usize,
    },
}

/// The flattened tabular form of an object, ready for serialization.
///
/// Every row holds exactly `headers.len()` values, positionally aligned to
/// the headers.
#[derive(Debug, Clone)]
pub struct RowSet {
    /// Column headers.
    pub headers: Vec<String>,
    /// Data rows in source order.
    pub rows: Vec<Vec<Value>>,
}

/// Flatten `object` according to its classified shape.
///
/// Coordinate shapes read the ROOT-style member arrays (`fX`, `fY`, and for
/// the errors shape `fEX`, `fEY`), coerce every value to `f64`, and emit the
/// normalized headers `x`, `y` (`ex`, `ey`). The tree shape keeps every
/// field's native scalar type and emits field names as headers.
pub fn extract(object: &dyn ContainerObject, kind: ObjectKind) -> Result<RowSet, ExtractError> {
    match kind {
        ObjectKind::Graph => coordinate_rows(object, &["fX", "fY"], &["x", "y"]),
        ObjectKind::GraphErrors => {
            coordinate_rows(object, &["fX", "fY", "fEX", "fEY"], &["x", "y", "ex", "ey"])
        }
        ObjectKind::Tree => tree_rows(object),
    }
}

fn coordinate_rows(
    object: &dyn ContainerObject,
    source_fields: &[&str],
    headers: &[&str],
) -> Result<RowSet, ExtractError> {
    let arrays = object.arrays()?;

    let mut columns = Vec::with_capacity(source_fields.len());
    for name in source_fields {
        let column = arrays
            .iter()
            .find(|field| field.name == *name)
            .ok_or_else(|| ExtractError::MissingField(name.to_string()))?;
        columns.push(column);
    }

    let expected = columns[0].values.len();
    for column in &columns {
        if column.values.len() != expected {
            return Err(ExtractError::InconsistentLength {
                field: column.name.clone(),
                expected,
                actual: column.values.len(),
            });
        }
    }

    let mut rows = Vec::with_capacity(expected);
    for row in 0..expected {
        let mut cells = Vec::with_capacity(columns.len());
        for column in &columns {
            let coerced = column.values[row]
                .as_f64()
                .ok_or_else(|| ExtractError::NonNumeric {
                    field: column.name.clone(),
                    row,
                })?;
            cells.push(Value::Float(coerced));
        }
        rows.push(cells);
    }

    Ok(RowSet {
        headers: headers.iter().map(|h| h.to_string()).collect(),
        rows,
    })
}

fn tree_rows(object: &dyn ContainerObject) -> Result<RowSet, ExtractError> {
    let arrays: Vec<FieldArray> = object.arrays()?;
    if arrays.is_empty() {
        return Err(ExtractError::NoFields);
    }

    let headers: Vec<String> = arrays.iter().map(|field| field.name.clone()).collect();
    debug!("tree branches: {headers:?}");

    // Row count comes from the first field; a shorter field fails late, at
    // the first index past its end.
    let count = arrays[0].values.len();
    let mut rows = Vec::with_capacity(count);
    for row in 0..count {
        let mut cells = Vec::with_capacity(arrays.len());
        for field in &arrays {
            let value = field
                .values
                .get(row)
                .cloned()
                .ok_or_else(|| ExtractError::RowOutOfRange {
                    field: field.name.clone(),
                    row,
                })?;
            cells.push(value);
        }
        rows.push(cells);
    }

    Ok(RowSet { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::memory::MemoryObject;

    fn graph(x: Vec<f64>, y: Vec<f64>) -> MemoryObject {
        MemoryObject::new()
            .with_field(FieldArray::new("fX", x))
            .with_field(FieldArray::new("fY", y))
    }

    #[test]
    fn graph_rows_are_floats_in_order() {
        let object = graph(vec![1.0, 2.0, 3.0], vec![10.0, 20.0, 30.0]);
        let rows = extract(&object, ObjectKind::Graph).unwrap();

        assert_eq!(rows.headers, vec!["x", "y"]);
        assert_eq!(rows.rows.len(), 3);
        assert_eq!(rows.rows[1], vec![Value::Float(2.0), Value::Float(20.0)]);
    }

    #[test]
    fn graph_coerces_integers_and_bools() {
        let object = MemoryObject::new()
            .with_field(FieldArray::new("fX", vec![1i64, 2]))
            .with_field(FieldArray::new("fY", vec![true, false]));
        let rows = extract(&object, ObjectKind::Graph).unwrap();

        assert_eq!(rows.rows[0], vec![Value::Float(1.0), Value::Float(1.0)]);
        assert_eq!(rows.rows[1], vec![Value::Float(2.0), Value::Float(0.0)]);
    }

    #[test]
    fn graph_length_mismatch_is_rejected() {
        let object = graph(vec![1.0, 2.0, 3.0], vec![1.0, 2.0, 3.0, 4.0]);
        let err = extract(&object, ObjectKind::Graph).unwrap_err();
        assert!(matches!(err, ExtractError::InconsistentLength { .. }));
    }

    #[test]
    fn graph_errors_requires_four_equal_arrays() {
        let object = MemoryObject::new()
            .with_field(FieldArray::new("fX", vec![1.0, 2.0]))
            .with_field(FieldArray::new("fY", vec![3.0, 4.0]))
            .with_field(FieldArray::new("fEX", vec![0.1, 0.2]))
            .with_field(FieldArray::new("fEY", vec![0.3]));
        let err = extract(&object, ObjectKind::GraphErrors).unwrap_err();
        match err {
            ExtractError::InconsistentLength { field, expected, actual } => {
                assert_eq!(field, "fEY");
                assert_eq!(expected, 2);
                assert_eq!(actual, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn graph_errors_emits_four_float_columns() {
        let object = MemoryObject::new()
            .with_field(FieldArray::new("fX", vec![1.0]))
            .with_field(FieldArray::new("fY", vec![2.0]))
            .with_field(FieldArray::new("fEX", vec![0.1]))
            .with_field(FieldArray::new("fEY", vec![0.2]));
        let rows = extract(&object, ObjectKind::GraphErrors).unwrap();

        assert_eq!(rows.headers, vec!["x", "y", "ex", "ey"]);
        assert_eq!(
            rows.rows[0],
            vec![
                Value::Float(1.0),
                Value::Float(2.0),
                Value::Float(0.1),
                Value::Float(0.2)
            ]
        );
    }

    #[test]
    fn missing_coordinate_field_is_reported() {
        let object = MemoryObject::new().with_field(FieldArray::new("fX", vec![1.0]));
        let err = extract(&object, ObjectKind::Graph).unwrap_err();
        assert!(matches!(err, ExtractError::MissingField(field) if field == "fY"));
    }

    #[test]
    fn non_numeric_coordinate_is_rejected() {
        let object = MemoryObject::new()
            .with_field(FieldArray::new("fX", vec!["a", "b"]))
            .with_field(FieldArray::new("fY", vec![1.0, 2.0]));
        let err = extract(&object, ObjectKind::Graph).unwrap_err();
        assert!(matches!(err, ExtractError::NonNumeric { row: 0, .. }));
    }

    #[test]
    fn tree_keeps_native_types() {
        let object = MemoryObject::new()
            .with_field(FieldArray::new("run", vec![1i64, 2]))
            .with_field(FieldArray::new("label", vec!["a", "b"]))
            .with_field(FieldArray::new("good", vec![true, false]));
        let rows = extract(&object, ObjectKind::Tree).unwrap();

        assert_eq!(rows.headers, vec!["run", "label", "good"]);
        assert_eq!(
            rows.rows[0],
            vec![Value::Int(1), Value::Text("a".into()), Value::Bool(true)]
        );
    }

    #[test]
    fn tree_without_fields_is_an_error() {
        let object = MemoryObject::new();
        assert!(matches!(
            extract(&object, ObjectKind::Tree).unwrap_err(),
            ExtractError::NoFields
        ));
    }

    #[test]
    fn ragged_tree_fails_at_first_missing_index() {
        let object = MemoryObject::new()
            .with_field(FieldArray::new("a", vec![1i64, 2, 3]))
            .with_field(FieldArray::new("b", vec![10i64, 20]));
        let err = extract(&object, ObjectKind::Tree).unwrap_err();
        match err {
            ExtractError::RowOutOfRange { field, row } => {
                assert_eq!(field, "b");
                assert_eq!(row, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn tree_ignores_surplus_values_in_later_fields() {
        let object = MemoryObject::new()
            .with_field(FieldArray::new("a", vec![1i64]))
            .with_field(FieldArray::new("b", vec![10i64, 20]));
        let rows = extract(&object, ObjectKind::Tree).unwrap();
        assert_eq!(rows.rows.len(), 1);
    }

    #[test]
    fn container_failures_propagate() {
        let object = MemoryObject::poisoned("bad page");
        let err = extract(&object, ObjectKind::Tree).unwrap_err();
        assert!(matches!(err, ExtractError::Container(_)));
    }
}
