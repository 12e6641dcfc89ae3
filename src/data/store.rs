use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use super::loader::load_file;
use super::model::Dataset;
use crate::error::DataError;

// ---------------------------------------------------------------------------
// Process-wide dataset cache
// ---------------------------------------------------------------------------

/// Loaded datasets keyed by the path they were requested with.
type Cache = Mutex<HashMap<PathBuf, Arc<Dataset>>>;

static CACHE: OnceLock<Cache> = OnceLock::new();

fn cache() -> &'static Cache {
    CACHE.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Load a dataset, reading the file only on the first request for `path`.
///
/// Later calls with the same path hand back the same `Arc` even if the file
/// changed on disk in the meantime. Failed loads are not remembered.
pub fn load(path: &Path) -> Result<Arc<Dataset>, DataError> {
    let mut cache = cache().lock().unwrap_or_else(|poisoned| poisoned.into_inner());

    if let Some(ds) = cache.get(path) {
        log::debug!("Dataset cache hit for {}", path.display());
        return Ok(Arc::clone(ds));
    }

    let dataset = Arc::new(load_file(path)?);
    log::info!(
        "Loaded {} events with columns {:?} from {}",
        dataset.len(),
        dataset.columns,
        path.display()
    );
    cache.insert(path.to_path_buf(), Arc::clone(&dataset));
    Ok(dataset)
}
