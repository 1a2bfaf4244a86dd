//! Pass-through actions the shell exposes: loading a volume from a typed path
//! and switching between host modules.

use std::path::PathBuf;

use shared::{
    domain::ModuleName,
    error::{ErrorCategory, ErrorReport},
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::host::{LoadedVolume, ModuleCatalog, VolumeLoader};

#[derive(Debug, Error)]
pub enum LoadVolumeError {
    #[error("enter a file path to a volume (for example /data/scan.nii)")]
    EmptyPath,
    #[error("file not found: {0}")]
    NotFound(PathBuf),
    #[error("load failed: {path}: {source}")]
    LoadFailed {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
    #[error("load returned no volume for: {0}")]
    NothingLoaded(PathBuf),
}

impl LoadVolumeError {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::UserInput
    }
}

impl From<LoadVolumeError> for ErrorReport {
    fn from(value: LoadVolumeError) -> Self {
        Self::new(value.category(), value.to_string())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NavigationError {
    #[error("module {0} is not available")]
    Unavailable(String),
    #[error("module {name} failed to load: {reason}")]
    LoadFailed { name: String, reason: String },
}

impl NavigationError {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Integration
    }
}

/// Trims the input, turns backslashes into slashes, and collapses a duplicated
/// trailing segment such as `scans/head.nii/head.nii`.
pub fn normalize_volume_path(raw: &str) -> String {
    let path = raw.trim().replace('\\', "/");
    if path.is_empty() {
        return path;
    }
    let trimmed = path.trim_end_matches('/');
    let parts: Vec<&str> = trimmed.split('/').collect();
    if parts.len() >= 2 && parts[parts.len() - 1] == parts[parts.len() - 2] {
        return parts[..parts.len() - 1].join("/");
    }
    path
}

pub fn load_volume_by_path<L: VolumeLoader + ?Sized>(
    loader: &mut L,
    raw_path: &str,
) -> Result<LoadedVolume, LoadVolumeError> {
    let normalized = normalize_volume_path(raw_path);
    if normalized.is_empty() {
        return Err(LoadVolumeError::EmptyPath);
    }
    let path = PathBuf::from(normalized);
    if !path.is_file() {
        return Err(LoadVolumeError::NotFound(path));
    }

    match loader.load_volume(&path) {
        Ok(Some(volume)) => {
            info!(path = %path.display(), volume = %volume.id, name = %volume.name, "volume loaded");
            Ok(volume)
        }
        Ok(None) => Err(LoadVolumeError::NothingLoaded(path)),
        Err(source) => Err(LoadVolumeError::LoadFailed { path, source }),
    }
}

/// Finds how the catalog spells `name`: as given, lower-case, or lower-camel.
pub fn resolve_module<C: ModuleCatalog + ?Sized>(catalog: &C, name: &str) -> Option<ModuleName> {
    let mut lower_camel = String::with_capacity(name.len());
    let mut chars = name.chars();
    if let Some(first) = chars.next() {
        lower_camel.extend(first.to_lowercase());
        lower_camel.extend(chars);
    }
    [name.to_string(), name.to_lowercase(), lower_camel]
        .into_iter()
        .find(|candidate| !candidate.is_empty() && catalog.contains(candidate))
        .map(ModuleName)
}

pub fn select_module<C: ModuleCatalog + ?Sized>(
    catalog: &mut C,
    name: &str,
) -> Result<ModuleName, NavigationError> {
    let module = resolve_module(catalog, name)
        .ok_or_else(|| NavigationError::Unavailable(name.to_string()))?;
    catalog
        .select(module.as_str())
        .map_err(|err| NavigationError::LoadFailed {
            name: module.0.clone(),
            reason: err.to_string(),
        })?;
    debug!(module = %module, "module selected");
    Ok(module)
}

/// Loads each named module without switching to it. Missing modules are
/// logged and left out of the result.
pub fn preload_modules<C: ModuleCatalog + ?Sized>(catalog: &mut C, names: &[String]) -> Vec<ModuleName> {
    let mut loaded = Vec::new();
    for name in names {
        let Some(module) = resolve_module(catalog, name) else {
            warn!(module = %name, "module unavailable; skipping preload");
            continue;
        };
        match catalog.load(module.as_str()) {
            Ok(()) => loaded.push(module),
            Err(err) => warn!(module = %module, error = %err, "module preload failed"),
        }
    }
    loaded
}

#[cfg(test)]
#[path = "tests/services_tests.rs"]
mod tests;
