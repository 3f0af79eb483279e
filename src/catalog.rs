//! Container inventory: a flat catalog of every discoverable object.

use log::warn;

use crate::classify::{classify, ObjectKind};
use crate::container::{ContainerDirectory, ContainerEntry};

/// One catalog line: a full slash-joined object path and its classified
/// kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Slash-joined path from the container root.
    pub path: String,
    /// Classified shape label.
    pub kind: ObjectKind,
}

/// Inventory the whole container in pre-order, depth-first traversal.
///
/// Children are visited in the order the container layer reports them. An
/// entry whose inspection fails is skipped with a warning rather than
/// aborting the traversal; this is the only place in the pipeline where
/// errors are tolerated.
pub fn list(root: &dyn ContainerDirectory) -> Vec<CatalogEntry> {
    let mut entries = Vec::new();
    walk(root, "", &mut entries);
    entries
}

fn walk(directory: &dyn ContainerDirectory, prefix: &str, out: &mut Vec<CatalogEntry>) {
    for (name, entry) in directory.entries() {
        let path = if prefix.is_empty() {
            name
        } else {
            format!("{prefix}/{name}")
        };

        match entry {
            ContainerEntry::Object(object) => match object.keys() {
                Ok(keys) => out.push(CatalogEntry {
                    path,
                    kind: classify(&keys),
                }),
                Err(err) => warn!("skipping object '{path}': {err}"),
            },
            ContainerEntry::Directory(subdirectory) => walk(subdirectory, &path, out),
        }
    }
}
