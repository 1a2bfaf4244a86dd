use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

id_newtype!(EntityId);
id_newtype!(SliceViewName);
id_newtype!(ModuleName);

impl SliceViewName {
    /// The three orthogonal slice views of a conventional layout.
    pub fn defaults() -> Vec<SliceViewName> {
        ["Red", "Yellow", "Green"]
            .into_iter()
            .map(SliceViewName::from)
            .collect()
    }
}

/// Type identities an entity can report. Scalar volumes also report `Volume`
/// in most hosts, but classification does not rely on that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    ScalarVolume,
    Volume,
    Segmentation,
    Markups,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Volume,
    Segmentation,
    Markup,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayRole {
    #[default]
    Unassigned,
    Background,
    Foreground,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "name", rename_all = "snake_case")]
pub enum ViewSurface {
    Slice(SliceViewName),
    ThreeD,
}

impl fmt::Display for ViewSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewSurface::Slice(name) => write!(f, "slice:{name}"),
            ViewSurface::ThreeD => f.write_str("3d"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewLayout {
    #[default]
    Initial,
    Conventional,
    /// Three slice views plus one 3-D view.
    FourUp,
}

impl ViewLayout {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
            "initial" => Some(Self::Initial),
            "conventional" => Some(Self::Conventional),
            "fourup" => Some(Self::FourUp),
            _ => None,
        }
    }
}

/// Visibility flags carried by a segmentation or markup display representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DisplayProperties {
    pub visible: bool,
    pub visible_2d: bool,
    pub fill_2d: bool,
    pub outline_2d: bool,
    pub visible_3d: bool,
}

impl DisplayProperties {
    /// Turns on every slice and 3-D flag. Never turns anything off.
    pub fn show_everywhere(&mut self) {
        self.visible = true;
        self.visible_2d = true;
        self.fill_2d = true;
        self.outline_2d = true;
        self.visible_3d = true;
    }

    pub fn all_visible(&self) -> bool {
        self.visible && self.visible_2d && self.fill_2d && self.outline_2d && self.visible_3d
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    pub dimensions: [usize; 3],
}

impl ImageInfo {
    pub fn voxel_count(&self) -> usize {
        self.dimensions.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.voxel_count() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub name: String,
    pub label: u16,
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
