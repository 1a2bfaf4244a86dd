use std::collections::HashSet;

use anyhow::bail;
use tracing::debug;
use view_sync::ModuleCatalog;

/// Modules the host can switch to. Broken modules are listed but fail to load.
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    available: HashSet<String>,
    broken: HashSet<String>,
    loaded: HashSet<String>,
    current: Option<String>,
}

impl ModuleRegistry {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            available: names.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// The modules a stock viewer installation ships with.
    pub fn standard() -> Self {
        Self::new([
            "Home",
            "Data",
            "DICOM",
            "DICOMPatcher",
            "SampleData",
            "SegmentEditor",
            "SegmentStatistics",
            "AutoContour",
            "ApplicationSettings",
        ])
    }

    pub fn with_broken(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.available.insert(name.clone());
        self.broken.insert(name);
        self
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.loaded.contains(name)
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }
}

impl ModuleCatalog for ModuleRegistry {
    fn contains(&self, name: &str) -> bool {
        self.available.contains(name)
    }

    fn load(&mut self, name: &str) -> anyhow::Result<()> {
        if !self.available.contains(name) {
            bail!("module {name} is not installed");
        }
        if self.broken.contains(name) {
            bail!("module {name} failed to initialize");
        }
        if self.loaded.insert(name.to_string()) {
            debug!(module = name, "module loaded");
        }
        Ok(())
    }

    fn select(&mut self, name: &str) -> anyhow::Result<()> {
        self.load(name)?;
        self.current = Some(name.to_string());
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/modules_tests.rs"]
mod tests;
