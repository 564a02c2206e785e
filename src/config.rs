//! Strand configuration as read from `config.yaml`.

use std::{fs, path::Path};

use indexmap::IndexMap;
use serde::Deserialize;

pub const DEFAULT_MODE_NAME: &str = "default";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Whole-device configuration: every strand in declaration order.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceConfig {
    #[serde(default = "default_mode_name")]
    pub default_mode: String,
    #[serde(default)]
    pub strands: IndexMap<String, StrandConfig>,
}

fn default_mode_name() -> String {
    DEFAULT_MODE_NAME.to_owned()
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            default_mode: default_mode_name(),
            strands: IndexMap::new(),
        }
    }
}

impl DeviceConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Every mode named by any range or pixel, first seen first.
    pub fn mode_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for strand in self.strands.values() {
            let ranges = strand.id_ranges.values().map(|range| &range.animations);
            let pixels = strand.ids.values().map(|pixel| &pixel.animations);
            for name in ranges.chain(pixels).flat_map(IndexMap::keys) {
                if !names.contains(name) {
                    names.push(name.clone());
                }
            }
        }
        names
    }
}

/// One physical strip.
#[derive(Debug, Clone, Deserialize)]
pub struct StrandConfig {
    /// Pixel count
    pub size: usize,
    /// Hardware pin or channel
    #[serde(default)]
    pub pin: u8,
    /// Named pixel ranges
    #[serde(default)]
    pub id_ranges: IndexMap<String, RangeConfig>,
    /// Individually configured pixels keyed by index
    #[serde(default)]
    pub ids: IndexMap<usize, PixelConfig>,
}

/// Pixel list written as `"1,2,3"`, `[1, 2, 3]` or `7`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum IdList {
    Single(usize),
    List(Vec<usize>),
    Text(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RangeConfig {
    #[serde(default)]
    pub ids: Option<IdList>,
    #[serde(default)]
    pub id_start: Option<usize>,
    /// Exclusive
    #[serde(default)]
    pub id_end: Option<usize>,
    /// Mode name -> animation spec text
    #[serde(default)]
    pub animations: IndexMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PixelConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub animations: IndexMap<String, String>,
}
