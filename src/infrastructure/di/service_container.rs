//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::TreeService;
use crate::config::Settings;
use crate::infrastructure::loader::{CachedLoader, FileLoader};
use crate::infrastructure::traits::{EntryLoader, Lister, RealLister};

/// Container holding settings and the collaborators services are built from.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Directory listing abstraction
    pub lister: Arc<dyn Lister>,

    /// Unit loading abstraction
    pub loader: Arc<dyn EntryLoader>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    ///
    /// Loaded units are cached by path for the lifetime of the container.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(
            settings,
            Arc::new(RealLister),
            Arc::new(CachedLoader::new(FileLoader)),
        )
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        lister: Arc<dyn Lister>,
        loader: Arc<dyn EntryLoader>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            lister,
            loader,
        }
    }

    /// Tree service over this container's collaborators.
    pub fn tree_service(&self) -> TreeService {
        TreeService::new(self.lister.clone(), self.loader.clone())
    }
}
