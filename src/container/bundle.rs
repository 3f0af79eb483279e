//! The on-disk container backend.
//!
//! A bundle is a ZIP archive in which every leaf object is a Parquet file;
//! the ZIP entry paths form the directory tree and the Parquet schema of
//! each entry carries the object's field names and types. Two sibling forms
//! are accepted for convenience: an unpacked directory tree of `.parquet`
//! files, and a bare `.parquet` file acting as a single-object container.
//!
//! All binary decoding is done by the `zip` and `parquet`/`arrow` crates;
//! this module only maps their surfaces onto the [`ContainerDirectory`] /
//! [`ContainerObject`] traits.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use arrow::array::{
    Array, BooleanArray, Float32Array, Float64Array, Int16Array, Int32Array, Int64Array,
    Int8Array, LargeStringArray, StringArray, UInt16Array, UInt32Array, UInt64Array, UInt8Array,
};
use arrow::datatypes::DataType;
use bytes::Bytes;
use log::debug;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use zip::ZipArchive;

use super::{
    ContainerDirectory, ContainerEntry, ContainerError, ContainerObject, FieldArray, Value,
};

/// Reserved bundle entry holding provenance metadata.
const METADATA_ENTRY: &str = "metadata.json";

/// Reserved bundle entry identifying the archive type; not an object.
const MIMETYPE_ENTRY: &str = "mimetype";

/// Provenance metadata carried in a bundle's `metadata.json` entry.
///
/// Every field is optional; absent metadata never prevents reading the
/// payload objects.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BundleMetadata {
    /// Bundle format version string.
    #[serde(default)]
    pub format_version: Option<String>,
    /// Name of the file the bundle was produced from.
    #[serde(default)]
    pub source_file: Option<String>,
    /// Tool that produced the bundle.
    #[serde(default)]
    pub writer: Option<String>,
    /// Creation timestamp, as written by the producer.
    #[serde(default)]
    pub created: Option<String>,
}

/// An opened container.
///
/// The handle owns the decoded entry tree (object payloads are held in
/// memory as raw Parquet bytes and decoded on demand) and is released when
/// it goes out of scope.
pub struct Bundle {
    root: BundleDirectory,
    metadata: Option<BundleMetadata>,
}

impl Bundle {
    /// Open a container, auto-detecting its form:
    ///
    /// - a directory is treated as an unpacked bundle tree,
    /// - a `.parquet` file as a single-object container named by file stem,
    /// - anything else as a ZIP bundle.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ContainerError> {
        let path = path.as_ref();

        if path.is_dir() {
            Self::open_directory(path)
        } else if path.extension().map(|e| e == "parquet").unwrap_or(false) {
            Self::open_bare_parquet(path)
        } else {
            Self::open_zip(path)
        }
    }

    /// The container's root directory.
    pub fn root(&self) -> &dyn ContainerDirectory {
        &self.root
    }

    /// Provenance metadata, when the bundle carries any.
    pub fn metadata(&self) -> Option<&BundleMetadata> {
        self.metadata.as_ref()
    }

    fn open_zip(path: &Path) -> Result<Self, ContainerError> {
        let file = File::open(path)?;
        let mut archive = ZipArchive::new(BufReader::new(file))?;

        let mut root = BundleDirectory::default();
        let mut metadata = None;

        // Central-directory order is the container-defined entry order.
        for index in 0..archive.len() {
            let mut entry = archive.by_index(index)?;
            if entry.is_dir() {
                continue;
            }
            let name = entry.name().to_string();

            if name == METADATA_ENTRY {
                let mut text = String::new();
                entry.read_to_string(&mut text)?;
                metadata = Some(serde_json::from_str(&text)?);
            } else if let Some(object_path) = name.strip_suffix(".parquet") {
                let mut payload = Vec::new();
                entry.read_to_end(&mut payload)?;
                root.insert(object_path, ParquetObject::new(payload));
            } else if name != MIMETYPE_ENTRY {
                debug!("ignoring non-object bundle entry '{name}'");
            }
        }

        Ok(Self { root, metadata })
    }

    fn open_directory(path: &Path) -> Result<Self, ContainerError> {
        let metadata_path = path.join(METADATA_ENTRY);
        let metadata = if metadata_path.is_file() {
            let text = std::fs::read_to_string(&metadata_path)?;
            Some(serde_json::from_str(&text)?)
        } else {
            None
        };

        Ok(Self {
            root: read_directory_tree(path)?,
            metadata,
        })
    }

    fn open_bare_parquet(path: &Path) -> Result<Self, ContainerError> {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .ok_or_else(|| {
                ContainerError::InvalidFormat(format!("no object name in '{}'", path.display()))
            })?;

        let payload = std::fs::read(path)?;
        let mut root = BundleDirectory::default();
        root.insert(&name, ParquetObject::new(payload));

        Ok(Self {
            root,
            metadata: None,
        })
    }
}

/// Unpacked bundle form: subdirectories recurse, `.parquet` files become
/// objects. Children are reported in lexical name order so that listings are
/// stable across platforms.
fn read_directory_tree(path: &Path) -> Result<BundleDirectory, ContainerError> {
    let mut children: Vec<_> = std::fs::read_dir(path)?.collect::<Result<_, _>>()?;
    children.sort_by_key(|entry| entry.file_name());

    let mut directory = BundleDirectory::default();
    for child in children {
        let child_path = child.path();
        let name = child.file_name().to_string_lossy().into_owned();

        if child_path.is_dir() {
            directory.push_directory(&name, read_directory_tree(&child_path)?);
        } else if child_path.extension().map(|e| e == "parquet").unwrap_or(false) {
            let stem = name.trim_end_matches(".parquet");
            directory.push_object(stem, ParquetObject::new(std::fs::read(&child_path)?));
        } else {
            debug!("ignoring non-object file '{}'", child_path.display());
        }
    }
    Ok(directory)
}

#[derive(Default)]
struct BundleDirectory {
    entries: Vec<(String, BundleNode)>,
}

enum BundleNode {
    Directory(BundleDirectory),
    Object(ParquetObject),
}

impl BundleDirectory {
    fn push_directory(&mut self, name: &str, directory: BundleDirectory) {
        self.entries
            .push((name.to_string(), BundleNode::Directory(directory)));
    }

    fn push_object(&mut self, name: &str, object: ParquetObject) {
        self.entries
            .push((name.to_string(), BundleNode::Object(object)));
    }

    /// Insert an object at a slash-delimited path, creating intermediate
    /// directories in first-seen order.
    fn insert(&mut self, path: &str, object: ParquetObject) {
        match path.split_once('/') {
            Some((head, rest)) if !head.is_empty() && !rest.is_empty() => {
                self.child_directory(head).insert(rest, object);
            }
            Some((head, _)) if !head.is_empty() => self.push_object(head, object),
            Some((_, rest)) => self.insert(rest, object),
            None => self.push_object(path, object),
        }
    }

    fn child_directory(&mut self, name: &str) -> &mut BundleDirectory {
        let position = self
            .entries
            .iter()
            .position(|(n, node)| n == name && matches!(node, BundleNode::Directory(_)));
        let position = match position {
            Some(position) => position,
            None => {
                self.push_directory(name, BundleDirectory::default());
                self.entries.len() - 1
            }
        };
        match &mut self.entries[position].1 {
            BundleNode::Directory(directory) => directory,
            // The position above only matches directory nodes.
            BundleNode::Object(_) => unreachable!(),
        }
    }
}

impl ContainerDirectory for BundleDirectory {
    fn get(&self, name: &str) -> Option<ContainerEntry<'_>> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, node)| match node {
            BundleNode::Directory(directory) => ContainerEntry::Directory(directory),
            BundleNode::Object(object) => ContainerEntry::Object(object),
        })
    }

    fn entries(&self) -> Vec<(String, ContainerEntry<'_>)> {
        self.entries
            .iter()
            .map(|(name, node)| {
                let entry = match node {
                    BundleNode::Directory(directory) => ContainerEntry::Directory(directory),
                    BundleNode::Object(object) => ContainerEntry::Object(object),
                };
                (name.clone(), entry)
            })
            .collect()
    }
}

/// A leaf object backed by an in-memory Parquet payload.
///
/// `Bytes` implements the Parquet `ChunkReader` trait, so schema and column
/// decoding run directly against the buffer without temp files.
struct ParquetObject {
    payload: Bytes,
}

impl ParquetObject {
    fn new(payload: Vec<u8>) -> Self {
        Self {
            payload: Bytes::from(payload),
        }
    }
}

impl ContainerObject for ParquetObject {
    fn keys(&self) -> Result<Vec<String>, ContainerError> {
        let builder = ParquetRecordBatchReaderBuilder::try_new(self.payload.clone())?;
        Ok(builder
            .schema()
            .fields()
            .iter()
            .map(|field| field.name().clone())
            .collect())
    }

    fn arrays(&self) -> Result<Vec<FieldArray>, ContainerError> {
        let builder = ParquetRecordBatchReaderBuilder::try_new(self.payload.clone())?;
        let schema = builder.schema().clone();
        let reader = builder.build()?;

        let mut fields: Vec<FieldArray> = schema
            .fields()
            .iter()
            .map(|field| FieldArray {
                name: field.name().clone(),
                values: Vec::new(),
            })
            .collect();

        for batch in reader {
            let batch = batch?;
            for (index, column) in batch.columns().iter().enumerate() {
                let mut values = column_values(&fields[index].name, column.as_ref())?;
                fields[index].values.append(&mut values);
            }
        }

        Ok(fields)
    }
}

fn downcast<'a, T: 'static>(name: &str, column: &'a dyn Array) -> Result<&'a T, ContainerError> {
    column.as_any().downcast_ref::<T>().ok_or_else(|| {
        ContainerError::InvalidFormat(format!("field '{name}' could not be decoded"))
    })
}

/// Flatten one Arrow column into scalar [`Value`]s, null slots included.
fn column_values(name: &str, column: &dyn Array) -> Result<Vec<Value>, ContainerError> {
    fn collect<A: Array, F: Fn(&A, usize) -> Value>(array: &A, value_at: F) -> Vec<Value> {
        (0..array.len())
            .map(|i| {
                if array.is_null(i) {
                    Value::Null
                } else {
                    value_at(array, i)
                }
            })
            .collect()
    }

    let values = match column.data_type() {
        DataType::Float64 => collect(downcast::<Float64Array>(name, column)?, |a, i| {
            Value::Float(a.value(i))
        }),
        DataType::Float32 => collect(downcast::<Float32Array>(name, column)?, |a, i| {
            Value::Float(a.value(i) as f64)
        }),
        DataType::Int64 => collect(downcast::<Int64Array>(name, column)?, |a, i| {
            Value::Int(a.value(i))
        }),
        DataType::Int32 => collect(downcast::<Int32Array>(name, column)?, |a, i| {
            Value::Int(a.value(i) as i64)
        }),
        DataType::Int16 => collect(downcast::<Int16Array>(name, column)?, |a, i| {
            Value::Int(a.value(i) as i64)
        }),
        DataType::Int8 => collect(downcast::<Int8Array>(name, column)?, |a, i| {
            Value::Int(a.value(i) as i64)
        }),
        DataType::UInt64 => collect(downcast::<UInt64Array>(name, column)?, |a, i| {
            Value::Int(a.value(i) as i64)
        }),
        DataType::UInt32 => collect(downcast::<UInt32Array>(name, column)?, |a, i| {
            Value::Int(a.value(i) as i64)
        }),
        DataType::UInt16 => collect(downcast::<UInt16Array>(name, column)?, |a, i| {
            Value::Int(a.value(i) as i64)
        }),
        DataType::UInt8 => collect(downcast::<UInt8Array>(name, column)?, |a, i| {
            Value::Int(a.value(i) as i64)
        }),
        DataType::Boolean => collect(downcast::<BooleanArray>(name, column)?, |a, i| {
            Value::Bool(a.value(i))
        }),
        DataType::Utf8 => collect(downcast::<StringArray>(name, column)?, |a, i| {
            Value::Text(a.value(i).to_string())
        }),
        DataType::LargeUtf8 => collect(downcast::<LargeStringArray>(name, column)?, |a, i| {
            Value::Text(a.value(i).to_string())
        }),
        other => {
            return Err(ContainerError::UnsupportedType {
                field: name.to_string(),
                datatype: other.to_string(),
            })
        }
    };

    Ok(values)
}
