use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use shared::domain::{SliceViewName, ViewLayout};
use thiserror::Error;
use tracing::warn;

use crate::{auto_contour::DEFAULT_NAME_SUFFIX, registry::DEFAULT_FOREGROUND_OPACITY};

pub const DEFAULT_SETTINGS_FILE: &str = "viewer.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub slice_views: Vec<SliceViewName>,
    pub foreground_opacity: f64,
    pub startup_layout: ViewLayout,
    pub required_modules: Vec<String>,
    pub auto_contour_suffix: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            slice_views: SliceViewName::defaults(),
            foreground_opacity: DEFAULT_FOREGROUND_OPACITY,
            startup_layout: ViewLayout::FourUp,
            required_modules: ["DICOM", "DICOMPatcher", "SegmentEditor", "SegmentStatistics"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            auto_contour_suffix: DEFAULT_NAME_SUFFIX.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    slice_views: Option<Vec<String>>,
    foreground_opacity: Option<f64>,
    startup_layout: Option<String>,
    required_modules: Option<Vec<String>>,
    auto_contour_suffix: Option<String>,
}

/// Defaults, then the settings file, then `VIEWER__*` environment variables.
///
/// An explicit `path` must exist and parse; without one, `viewer.toml` in the
/// working directory is used when present.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, SettingsError> {
    let mut settings = Settings::default();

    let file = match path {
        Some(path) => Some(read_settings_file(path)?),
        None => {
            let default_path = Path::new(DEFAULT_SETTINGS_FILE);
            if default_path.is_file() {
                Some(read_settings_file(default_path)?)
            } else {
                None
            }
        }
    };
    if let Some(file) = file {
        apply_file(&mut settings, file);
    }

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn read_settings_file(path: &Path) -> Result<SettingsFile, SettingsError> {
    let raw = fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&raw).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn apply_file(settings: &mut Settings, file: SettingsFile) {
    if let Some(views) = file.slice_views {
        set_slice_views(settings, views);
    }
    if let Some(opacity) = file.foreground_opacity {
        set_opacity(settings, opacity);
    }
    if let Some(layout) = file.startup_layout {
        set_layout(settings, &layout);
    }
    if let Some(modules) = file.required_modules {
        settings.required_modules = modules;
    }
    if let Some(suffix) = file.auto_contour_suffix {
        settings.auto_contour_suffix = suffix;
    }
}

pub(crate) fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("VIEWER__SLICE_VIEWS") {
        set_slice_views(settings, split_list(&v));
    }
    if let Some(v) = lookup("VIEWER__FOREGROUND_OPACITY") {
        match v.trim().parse::<f64>() {
            Ok(parsed) => set_opacity(settings, parsed),
            Err(_) => warn!(value = %v, "ignoring unparsable VIEWER__FOREGROUND_OPACITY"),
        }
    }
    if let Some(v) = lookup("VIEWER__LAYOUT") {
        set_layout(settings, &v);
    }
    if let Some(v) = lookup("VIEWER__REQUIRED_MODULES") {
        settings.required_modules = split_list(&v);
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn set_slice_views(settings: &mut Settings, views: Vec<String>) {
    let views: Vec<SliceViewName> = views
        .into_iter()
        .map(|view| view.trim().to_string())
        .filter(|view| !view.is_empty())
        .map(SliceViewName)
        .collect();
    if views.is_empty() {
        warn!("ignoring empty slice view list");
        return;
    }
    settings.slice_views = views;
}

fn set_opacity(settings: &mut Settings, opacity: f64) {
    if !opacity.is_finite() {
        warn!(opacity, "ignoring non-finite foreground opacity");
        return;
    }
    settings.foreground_opacity = opacity.clamp(0.0, 1.0);
}

fn set_layout(settings: &mut Settings, raw: &str) {
    match ViewLayout::parse(raw) {
        Some(layout) => settings.startup_layout = layout,
        None => warn!(layout = %raw, "ignoring unknown startup layout"),
    }
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
