//! # rootpack - Parquet bundle containers to CSV
//!
//! `rootpack` converts structured objects stored in Parquet bundle
//! containers into `;`-delimited CSV. A bundle is a ZIP archive (or an
//! unpacked directory tree) in which every leaf object is a Parquet file;
//! entry paths form the container's directory tree and each object's
//! Parquet schema carries its field names. Bundle producers preserve the
//! member-naming convention of the originating analysis framework (ROOT),
//! which is what makes shape classification possible: a graph stores
//! coordinates as `fX`/`fY`, a graph with uncertainties adds `fEX`/`fEY`,
//! and everything else is a tree of arbitrary named branches.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rootpack::container::bundle::Bundle;
//! use rootpack::convert::convert;
//!
//! let bundle = Bundle::open("run42.rootpack")?;
//! convert(
//!     bundle.root(),
//!     "run42.rootpack",
//!     "data/evt",
//!     std::path::Path::new("evt.csv"),
//! )?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Listing a container's inventory:
//!
//! ```rust,no_run
//! use rootpack::catalog::list;
//! use rootpack::container::bundle::Bundle;
//!
//! let bundle = Bundle::open("run42.rootpack")?;
//! for entry in list(bundle.root()) {
//!     println!("{} ({})", entry.path, entry.kind);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - [`container`]: the container capability: directory/object traits, the
//!   on-disk [`container::bundle`] backend over `zip` + `parquet`, and the
//!   in-memory [`container::memory`] double for tests
//! - [`classify`]: field-name shape classification (graph, graph with
//!   errors, tree)
//! - [`extract`]: flattening a classified object into headers plus rows
//! - [`writer`]: three-section `;`-delimited CSV output
//! - [`catalog`]: recursive container inventory
//! - [`convert`]: the locate → classify → extract → write pipeline
//! - [`config`]: TOML defaults for the command-line tool
//!
//! All binary decoding (ZIP directories, Parquet pages, compression,
//! schemas) is delegated to the `zip`/`parquet`/`arrow` crates; this crate
//! is deliberately thin glue over them.

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod catalog;
pub mod classify;
pub mod config;
pub mod container;
pub mod convert;
pub mod extract;
pub mod writer;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::catalog::{list, CatalogEntry};
    pub use crate::classify::{classify, ObjectKind};
    pub use crate::config::{Config, ConfigError};
    pub use crate::container::bundle::{Bundle, BundleMetadata};
    pub use crate::container::memory::{MemoryDirectory, MemoryObject};
    pub use crate::container::{
        locate, ContainerDirectory, ContainerEntry, ContainerError, ContainerObject, FieldArray,
        Value,
    };
    pub use crate::convert::{convert, ConvertError};
    pub use crate::extract::{extract, ExtractError, RowSet};
    pub use crate::writer::{write_csv, WriteError};
}
