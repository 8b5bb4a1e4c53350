//! Infrastructure layer: I/O implementations and DI container
//!
//! This layer implements the listing and loading traits and wires up services.

pub mod di;
pub mod loader;
pub mod traits;

pub use loader::{CachedLoader, FileLoader};
pub use traits::{DirEntry, EntryLoader, Lister, RealLister};
