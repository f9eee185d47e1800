use serde::{Deserialize, Serialize};

use crate::compile::CommandTemplate;
use crate::resample::Timebase;
use crate::transform::Transform;
use crate::Result;

use std::fs;
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Behavior pack the script is written into.
    pub pack_root: PathBuf,
    pub timebase: Timebase,
    pub transform: Transform,
    pub template: CommandTemplate,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pack_root: PathBuf::from("./packs/BP"),
            timebase: Timebase::default(),
            transform: Transform::default(),
            template: CommandTemplate::default(),
        }
    }
}

impl Config {
    pub fn from_toml_str(data: &str) -> Result<Self> {
        Ok(toml::from_str(data)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Self::from_toml_str(&data)
    }
}
