//! The conversion pipeline: locate, classify, extract, serialize.

use std::path::Path;

use log::info;

use crate::classify::{classify, ObjectKind};
use crate::container::{locate, ContainerDirectory, ContainerEntry, ContainerError};
use crate::extract::{extract, ExtractError};
use crate::writer::{write_csv, WriteError};

/// Errors raised by the conversion pipeline.
///
/// Every stage error propagates to the command surface unmodified; nothing
/// is retried.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// Container open/navigation failure (including object-not-found).
    #[error(transparent)]
    Container(#[from] ContainerError),

    /// Extraction failure.
    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// Output serialization failure.
    #[error("failed to write output: {0}")]
    Write(#[from] WriteError),

    /// The requested path resolves to a directory rather than a leaf
    /// object.
    #[error("'{0}' is a directory, not a convertible object")]
    NotAnObject(String),
}

/// Convert the object at `object_path` inside an opened container to a CSV
/// file at `output`.
///
/// `source_label` is the input container name embedded in the output's
/// comment line. Returns the classified kind of the converted object.
pub fn convert(
    root: &dyn ContainerDirectory,
    source_label: &str,
    object_path: &str,
    output: &Path,
) -> Result<ObjectKind, ConvertError> {
    let object = match locate(root, object_path)? {
        ContainerEntry::Object(object) => object,
        ContainerEntry::Directory(_) => {
            return Err(ConvertError::NotAnObject(object_path.to_string()))
        }
    };

    let kind = classify(&object.keys()?);
    info!("processing '{object_path}' as {kind}");

    let rows = extract(object, kind)?;
    info!(
        "extracted {} rows with {} columns",
        rows.rows.len(),
        rows.headers.len()
    );

    write_csv(output, &rows, source_label)?;
    Ok(kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::memory::{MemoryDirectory, MemoryObject};
    use crate::container::FieldArray;
    use tempfile::tempdir;

    fn container() -> MemoryDirectory {
        MemoryDirectory::new()
            .with_object(
                "g1",
                MemoryObject::new()
                    .with_field(FieldArray::new("fX", vec![1.0, 2.0]))
                    .with_field(FieldArray::new("fY", vec![10.0, 20.0])),
            )
            .with_directory(
                "data",
                MemoryDirectory::new().with_object(
                    "evt",
                    MemoryObject::new()
                        .with_field(FieldArray::new("px", vec![1i64]))
                        .with_field(FieldArray::new("py", vec![2i64])),
                ),
            )
    }

    #[test]
    fn converts_a_graph_end_to_end() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.csv");

        let kind = convert(&container(), "run.rootpack", "g1", &output).unwrap();
        assert_eq!(kind, ObjectKind::Graph);

        let text = std::fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "## Automatically generated from 'run.rootpack'");
        assert_eq!(lines[1], "x;y");
        assert_eq!(lines[2], "1;10");
    }

    #[test]
    fn converts_a_nested_tree() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.csv");

        let kind = convert(&container(), "run.rootpack", "data/evt", &output).unwrap();
        assert_eq!(kind, ObjectKind::Tree);

        let text = std::fs::read_to_string(&output).unwrap();
        assert!(text.contains("px;py"));
    }

    #[test]
    fn missing_object_fails_without_output() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.csv");

        let err = convert(&container(), "run.rootpack", "missing/obj", &output).unwrap_err();
        assert!(err.to_string().contains("missing/obj"));
        assert!(!output.exists());
    }

    #[test]
    fn directory_paths_are_rejected() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.csv");

        let err = convert(&container(), "run.rootpack", "data", &output).unwrap_err();
        assert!(matches!(err, ConvertError::NotAnObject(_)));
        assert!(!output.exists());
    }

    #[test]
    fn extraction_failure_produces_no_output() {
        let root = MemoryDirectory::new().with_object(
            "g1",
            MemoryObject::new()
                .with_field(FieldArray::new("fX", vec![1.0, 2.0, 3.0]))
                .with_field(FieldArray::new("fY", vec![1.0, 2.0, 3.0, 4.0])),
        );
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.csv");

        let err = convert(&root, "run.rootpack", "g1", &output).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Extract(ExtractError::InconsistentLength { .. })
        ));
        assert!(!output.exists());
    }
}
