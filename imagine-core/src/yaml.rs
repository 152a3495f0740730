//! YAML files of configurations.
use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::{fs, path::Path};

/// A configuration stored as a YAML file.
///
/// The binary writes the configuration of a run next to its logs, so that the
/// run can be rebuilt from that file.
pub trait YamlConfig: Serialize + DeserializeOwned {
    /// Reads the configuration from `path`.
    fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let s = fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        Ok(serde_yaml::from_str(&s)?)
    }

    /// Writes the configuration to `path`.
    fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, serde_yaml::to_string(self)?)?;
        Ok(())
    }
}
