//! In-memory containers with synthetic field arrays.
//!
//! This is the test double for the container capability: it implements the
//! same traits as the real bundle backend, so every pipeline stage can be
//! exercised without a binary file on disk. Objects can also be poisoned to
//! simulate a malformed sub-object whose inspection fails.

use super::{ContainerDirectory, ContainerEntry, ContainerError, ContainerObject, FieldArray};

/// An in-memory directory node.
#[derive(Default)]
pub struct MemoryDirectory {
    entries: Vec<(String, MemoryNode)>,
}

enum MemoryNode {
    Directory(MemoryDirectory),
    Object(MemoryObject),
}

impl MemoryDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a leaf object. Entry order is insertion order.
    pub fn with_object(mut self, name: &str, object: MemoryObject) -> Self {
        self.entries
            .push((name.to_string(), MemoryNode::Object(object)));
        self
    }

    /// Append a nested directory. Entry order is insertion order.
    pub fn with_directory(mut self, name: &str, directory: MemoryDirectory) -> Self {
        self.entries
            .push((name.to_string(), MemoryNode::Directory(directory)));
        self
    }
}

impl ContainerDirectory for MemoryDirectory {
    fn get(&self, name: &str) -> Option<ContainerEntry<'_>> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, node)| match node {
            MemoryNode::Directory(dir) => ContainerEntry::Directory(dir),
            MemoryNode::Object(obj) => ContainerEntry::Object(obj),
        })
    }

    fn entries(&self) -> Vec<(String, ContainerEntry<'_>)> {
        self.entries
            .iter()
            .map(|(name, node)| {
                let entry = match node {
                    MemoryNode::Directory(dir) => ContainerEntry::Directory(dir),
                    MemoryNode::Object(obj) => ContainerEntry::Object(obj),
                };
                (name.clone(), entry)
            })
            .collect()
    }
}

/// An in-memory leaf object.
#[derive(Default)]
pub struct MemoryObject {
    fields: Vec<FieldArray>,
    poison: Option<String>,
}

impl MemoryObject {
    /// Create an object with no fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an object whose `keys()`/`arrays()` calls fail with the given
    /// message, simulating a malformed sub-object.
    pub fn poisoned(message: &str) -> Self {
        Self {
            fields: Vec::new(),
            poison: Some(message.to_string()),
        }
    }

    /// Append a field. Field order is insertion order.
    pub fn with_field(mut self, field: FieldArray) -> Self {
        self.fields.push(field);
        self
    }

    fn check_poison(&self) -> Result<(), ContainerError> {
        match &self.poison {
            Some(message) => Err(ContainerError::InvalidFormat(message.clone())),
            None => Ok(()),
        }
    }
}

impl ContainerObject for MemoryObject {
    fn keys(&self) -> Result<Vec<String>, ContainerError> {
        self.check_poison()?;
        Ok(self.fields.iter().map(|f| f.name.clone()).collect())
    }

    fn arrays(&self) -> Result<Vec<FieldArray>, ContainerError> {
        self.check_poison()?;
        Ok(self.fields.clone())
    }
}
