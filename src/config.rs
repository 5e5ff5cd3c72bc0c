//!
//! This module defines the configuration structures and loading logic for jumplink.
//! Configuration is TOML; a user-level file forms the base layer and a project file
//! discovered from the working directory is merged over it.

use crate::alphabet::{AlphabetSpec, DEFAULT_LETTERS};
use crate::extract::{DEFAULT_ANYWHERE_PATTERN, ExtractError, HintPattern};
use crate::utils::offsets::OffsetEncoding;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Project configuration file names, in order of precedence
pub const CONFIG_FILES: &[&str] = &[".jumplink.toml", "jumplink.toml", ".config/jumplink.toml"];

/// Global options shared by every hint mode
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, schemars::JsonSchema)]
#[serde(default, rename_all = "kebab-case")]
pub struct GlobalConfig {
    /// Characters used to build hint labels, most convenient first
    #[serde(alias = "letters_for_hints")]
    pub letters: String,

    /// Jump straight to the target when only one is hinted
    #[serde(alias = "jump_to_link_if_one_link_only")]
    pub jump_to_link_if_one_link_only: bool,

    /// Unit in which document positions are reported (char, utf16, utf8)
    #[serde(alias = "offset_encoding")]
    pub offset_encoding: OffsetEncoding,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            letters: DEFAULT_LETTERS.to_string(),
            jump_to_link_if_one_link_only: true,
            offset_encoding: OffsetEncoding::default(),
        }
    }
}

/// Options for the jump-to-anywhere mode
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, schemars::JsonSchema)]
#[serde(default, rename_all = "kebab-case")]
pub struct JumpToAnywhereConfig {
    /// Pattern whose matches become hint targets; group 1, when present, is the payload
    pub regex: String,
}

impl Default for JumpToAnywhereConfig {
    fn default() -> Self {
        Self {
            regex: DEFAULT_ANYWHERE_PATTERN.to_string(),
        }
    }
}

/// Options for the two-character lightspeed jump
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, schemars::JsonSchema)]
#[serde(default, rename_all = "kebab-case")]
pub struct LightspeedConfig {
    /// Match the typed characters case-sensitively
    #[serde(alias = "case_sensitive")]
    pub case_sensitive: bool,

    /// Only match at the start of a word
    #[serde(alias = "jump_to_start_of_word")]
    pub jump_to_start_of_word: bool,
}

impl Default for LightspeedConfig {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            jump_to_start_of_word: true,
        }
    }
}

/// jumplink configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, schemars::JsonSchema)]
#[serde(default)]
pub struct Config {
    /// Global configuration options
    pub global: GlobalConfig,

    /// Jump-to-anywhere mode
    #[serde(rename = "jump-to-anywhere", alias = "jump_to_anywhere")]
    pub jump_to_anywhere: JumpToAnywhereConfig,

    /// Lightspeed mode
    pub lightspeed: LightspeedConfig,
}

impl Config {
    /// Normalized label alphabet
    pub fn alphabet(&self) -> AlphabetSpec {
        AlphabetSpec::new(&self.global.letters)
    }

    /// Parse a configuration document; missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Check values that deserialize fine but cannot be used.
    ///
    /// An unusable jump-to-anywhere pattern is an error. An empty alphabet is
    /// allowed (no hint gets a label) and only logged.
    pub fn validate(&self) -> Result<(), ConfigError> {
        HintPattern::new(&self.jump_to_anywhere.regex, true)?;
        if self.alphabet().is_empty() {
            log::warn!(
                "[jumplink-config] letters '{}' contain no usable characters; hints will have no labels",
                self.global.letters
            );
        }
        Ok(())
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

/// Where a loaded layer came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    /// Built-in defaults
    Default,
    /// User configuration directory
    UserConfig,
    /// Project file, discovered or passed with --config
    ProjectConfig,
}

/// A loaded configuration together with the files it was assembled from
#[derive(Debug, Clone, Default)]
pub struct SourcedConfig {
    pub config: Config,
    pub loaded_files: Vec<(ConfigSource, PathBuf)>,
    /// Keys present in the files that jumplink does not know
    pub unknown_keys: Vec<String>,
}

impl SourcedConfig {
    /// Layer with the highest precedence that contributed
    pub fn source(&self) -> ConfigSource {
        self.loaded_files
            .iter()
            .map(|(source, _)| *source)
            .next_back()
            .unwrap_or(ConfigSource::Default)
    }

    /// Walk up from `start_dir` looking for a project configuration file.
    /// The search stops after the directory holding `.git`.
    pub fn discover_config_upward(start_dir: &Path) -> Option<PathBuf> {
        const MAX_DEPTH: usize = 100;

        let mut current_dir = start_dir.to_path_buf();
        for _ in 0..MAX_DEPTH {
            log::debug!("[jumplink-config] Searching for config in: {}", current_dir.display());

            for config_name in CONFIG_FILES {
                let config_path = current_dir.join(config_name);
                if config_path.is_file() {
                    log::debug!("[jumplink-config] Found config file: {}", config_path.display());
                    return Some(config_path);
                }
            }

            if current_dir.join(".git").exists() {
                log::debug!("[jumplink-config] Stopping at .git directory");
                return None;
            }

            if !current_dir.pop() {
                log::debug!("[jumplink-config] Reached filesystem root");
                return None;
            }
        }

        log::debug!("[jumplink-config] Maximum traversal depth reached");
        None
    }

    /// Internal implementation that accepts the config directory for testing
    fn user_configuration_path_impl(config_dir: &Path) -> Option<PathBuf> {
        let config_path = config_dir.join("jumplink").join("jumplink.toml");
        if config_path.is_file() {
            log::debug!("[jumplink-config] Found user configuration at: {}", config_path.display());
            Some(config_path)
        } else {
            log::debug!(
                "[jumplink-config] No user configuration at: {}",
                config_path.display()
            );
            None
        }
    }

    fn user_configuration_path() -> Option<PathBuf> {
        use etcetera::{BaseStrategy, choose_base_strategy};

        match choose_base_strategy() {
            Ok(strategy) => Self::user_configuration_path_impl(&strategy.config_dir()),
            Err(e) => {
                log::debug!("[jumplink-config] Failed to determine user config directory: {e}");
                None
            }
        }
    }

    /// Internal implementation that accepts the discovery start and user config
    /// directory for testing
    #[doc(hidden)]
    pub fn load_with_discovery_impl(
        config_path: Option<&str>,
        skip_auto_discovery: bool,
        start_dir: Option<&Path>,
        user_config_dir: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let mut merged = toml::Table::new();
        let mut loaded_files = Vec::new();

        if !skip_auto_discovery {
            let user_path = match user_config_dir {
                Some(dir) => Self::user_configuration_path_impl(dir),
                None => Self::user_configuration_path(),
            };
            if let Some(path) = user_path {
                merge_tables(&mut merged, read_table(&path)?);
                loaded_files.push((ConfigSource::UserConfig, path));
            }
        } else {
            log::debug!("[jumplink-config] Skipping auto-discovery due to --no-config flag");
        }

        let project_path = match config_path {
            Some(path) => {
                log::debug!("[jumplink-config] Explicit config_path provided: {path}");
                Some(PathBuf::from(path))
            }
            None if skip_auto_discovery => None,
            None => {
                let start = match start_dir {
                    Some(dir) => Some(dir.to_path_buf()),
                    None => std::env::current_dir()
                        .map_err(|e| log::debug!("[jumplink-config] Failed to get current directory: {e}"))
                        .ok(),
                };
                start.and_then(|dir| Self::discover_config_upward(&dir))
            }
        };
        if let Some(path) = project_path {
            merge_tables(&mut merged, read_table(&path)?);
            loaded_files.push((ConfigSource::ProjectConfig, path));
        }

        let unknown_keys = unknown_keys(&merged);
        for key in &unknown_keys {
            log::warn!("[jumplink-config] Unknown configuration key: {key}");
        }

        let config: Config = merged
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::ParseError(e.to_string()))?;

        Ok(Self {
            config,
            loaded_files,
            unknown_keys,
        })
    }

    /// Load the user and project configuration files.
    /// If skip_auto_discovery is true, only an explicit config path is loaded.
    pub fn load_with_discovery(config_path: Option<&str>, skip_auto_discovery: bool) -> Result<Self, ConfigError> {
        Self::load_with_discovery_impl(config_path, skip_auto_discovery, None, None)
    }
}

impl From<SourcedConfig> for Config {
    fn from(sourced: SourcedConfig) -> Self {
        sourced.config
    }
}

fn read_table(path: &Path) -> Result<toml::Table, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::IoError {
        source,
        path: path.display().to_string(),
    })?;
    let table = content
        .parse::<toml::Table>()
        .map_err(|e| ConfigError::ParseError(format!("{}: {e}", path.display())))?;
    Ok(normalize_table(table))
}

/// Canonical spelling of a key: kebab-case, with field aliases resolved.
fn normalize_key(section: Option<&str>, key: &str) -> String {
    let key = key.replace('_', "-");
    if section == Some("global") && key == "letters-for-hints" {
        return "letters".to_string();
    }
    key
}

/// Rewrite every section and key of a loaded file to its canonical spelling,
/// so layers written with different spellings merge onto the same key.
fn normalize_table(table: toml::Table) -> toml::Table {
    table
        .into_iter()
        .map(|(section, value)| {
            let section = normalize_key(None, &section);
            let value = match value {
                toml::Value::Table(keys) => toml::Value::Table(
                    keys.into_iter()
                        .map(|(key, value)| (normalize_key(Some(section.as_str()), &key), value))
                        .collect(),
                ),
                other => other,
            };
            (section, value)
        })
        .collect()
}

/// Merge `overlay` into `base`; tables merge key by key, other values replace.
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => merge_tables(existing, incoming),
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

/// Dotted paths of keys that do not exist in [`Config`]. Expects a
/// normalized table.
fn unknown_keys(table: &toml::Table) -> Vec<String> {
    let Ok(known) = toml::Table::try_from(Config::default()) else {
        return Vec::new();
    };
    let mut unknown = Vec::new();
    for (section, value) in table {
        let Some(known_section) = known.get(section).and_then(toml::Value::as_table) else {
            unknown.push(section.clone());
            continue;
        };
        if let Some(keys) = value.as_table() {
            unknown.extend(
                keys.keys()
                    .filter(|key| !known_section.contains_key(key.as_str()))
                    .map(|key| format!("{section}.{key}")),
            );
        }
    }
    unknown
}

/// Create a default configuration file at the specified path
pub fn create_default_config(path: &str) -> Result<(), ConfigError> {
    if Path::new(path).exists() {
        return Err(ConfigError::FileExists { path: path.to_string() });
    }

    let default_config = r#"# jumplink configuration file

[global]
# Characters used for hint labels, most convenient first.
# Duplicates are dropped and letters are shown uppercase.
letters = "sadfjklewcmpgh"

# Jump immediately when only one target is hinted
jump-to-link-if-one-link-only = true

# Unit for reported positions: "char", "utf16" or "utf8"
offset-encoding = "char"

[jump-to-anywhere]
# Every match becomes a target; capture group 1, if any, is the payload
regex = '\b\w{3,}\b'

[lightspeed]
case-sensitive = false
jump-to-start-of-word = true
"#;

    fs::write(path, default_config).map_err(|source| ConfigError::IoError {
        source,
        path: path.to_string(),
    })
}

/// Errors that can occur when loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read config file at {path}: {source}")]
    IoError { source: io::Error, path: String },

    /// Failed to parse the configuration content
    #[error("Failed to parse config: {0}")]
    ParseError(String),

    /// Configuration file already exists
    #[error("Configuration file already exists at {path}")]
    FileExists { path: String },

    /// The jump-to-anywhere pattern does not compile
    #[error(transparent)]
    InvalidPattern(#[from] ExtractError),
}
