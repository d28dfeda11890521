//! Supplier catalog: entries, the directory loader and the fuzzy resolver.
//!
//! Everything here is deterministic; the only IO is [`load_directory`], which
//! runs only when a caller asks for a (re)load.

pub mod columns;
pub mod delimited;
pub mod entry;
pub mod loader;
pub mod resolver;
pub mod weight;

pub use entry::{Catalog, CatalogEntry, EntrySource};
pub use loader::{
    CatalogLoad, FileLayout, FileReport, FileSummary, LoadError, LoadReport, LoaderOptions, MalformedRow, RowDefect,
    load_directory, load_text,
};
pub use resolver::{Resolution, ResolverOptions, resolve, resolve_for_entry, resolve_with_weight};
