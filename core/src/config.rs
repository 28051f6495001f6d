use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::delegate::DelegateTarget;
use crate::error::{Error, Result};
use crate::samples::DEFAULT_SAMPLES_FILE;

/// Front-end configuration.
///
/// Every field is optional in the TOML file; missing ones take the defaults
/// below. Command-line flags are applied on top by the front end.
///
/// # Example
///
/// ```rust
/// use kanjipad_core::Config;
///
/// let config = Config::from_toml_str("data_file = \"jdata.dat\"").unwrap();
/// assert_eq!(config.data_file.as_deref(), Some(std::path::Path::new("jdata.dat")));
/// assert_eq!(config.samples_path, std::path::PathBuf::from("samples.dat"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Engine executable; `None` means the install location
    pub engine_path: Option<PathBuf>,

    /// Recognition data handed to the engine as `--data-file`
    pub data_file: Option<PathBuf>,

    /// Where saved samples are appended
    pub samples_path: PathBuf,

    /// Command that receives delegated characters
    pub delegate_command: Option<String>,

    /// File that delegated characters are appended to
    pub delegate_file: Option<PathBuf>,

    /// Initial state of the annotate display hint
    pub annotate: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine_path: None,
            data_file: None,
            samples_path: PathBuf::from(DEFAULT_SAMPLES_FILE),
            delegate_command: None,
            delegate_file: None,
            annotate: false,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_toml_str(&content)?)
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Delegate target for the "to command" action, if configured.
    pub fn command_target(&self) -> Option<DelegateTarget> {
        self.delegate_command
            .as_ref()
            .filter(|cmd| !cmd.trim().is_empty())
            .map(|cmd| DelegateTarget::Command(cmd.clone()))
    }

    /// Delegate target for the "to file" action, if configured.
    pub fn file_target(&self) -> Option<DelegateTarget> {
        self.delegate_file.clone().map(DelegateTarget::File)
    }
}
