//! Entry loaders: parse data files into [`Value`]s.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, trace};

use crate::domain::{TreeError, TreeResult, Value};
use crate::infrastructure::traits::EntryLoader;

/// Loads a file by extension: JSON, TOML and YAML are parsed, anything else
/// becomes a string value holding the file's text.
#[derive(Debug, Default)]
pub struct FileLoader;

impl EntryLoader for FileLoader {
    fn load(&self, path: &Path) -> TreeResult<Value> {
        let content = std::fs::read_to_string(path).map_err(|e| TreeError::load(path, e))?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        trace!("load: {} ({:?})", path.display(), extension);

        let parsed: serde_json::Value = match extension.as_deref() {
            Some("json") => serde_json::from_str(&content).map_err(|e| TreeError::load(path, e))?,
            Some("toml") => toml::from_str(&content).map_err(|e| TreeError::load(path, e))?,
            Some("yaml") | Some("yml") => {
                serde_yaml::from_str(&content).map_err(|e| TreeError::load(path, e))?
            }
            _ => return Ok(Value::String(content)),
        };
        Ok(Value::from(parsed))
    }
}

/// Memoizes another loader by path and hands out clones.
///
/// Values are owned, so attribute injection on a returned value never
/// leaks into the cache.
#[derive(Debug, Default)]
pub struct CachedLoader<L> {
    inner: L,
    cache: Mutex<HashMap<PathBuf, Value>>,
}

impl<L: EntryLoader> CachedLoader<L> {
    pub fn new(inner: L) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Forget every cached value.
    pub fn clear(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.cache.lock().map(|cache| cache.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<L: EntryLoader> EntryLoader for CachedLoader<L> {
    fn load(&self, path: &Path) -> TreeResult<Value> {
        if let Ok(cache) = self.cache.lock() {
            if let Some(value) = cache.get(path) {
                trace!("load: cache hit {}", path.display());
                return Ok(value.clone());
            }
        }

        let value = self.inner.load(path)?;
        if let Ok(mut cache) = self.cache.lock() {
            debug!("load: caching {}", path.display());
            cache.insert(path.to_path_buf(), value.clone());
        }
        Ok(value)
    }
}
