// this_file: pathmin/src/config.rs

//! Configuration handling.
//!
//! Configuration files are JSON or TOML. The plugin list accepts both bare
//! names and `{ name, params }` objects.

use crate::plugin::PluginConfig;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration result type
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Path of the file being processed, for context.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Plugin configurations.
    #[serde(default, deserialize_with = "deserialize_plugins")]
    pub plugins: Vec<PluginConfig>,

    /// Repeat the plugin passes until the output settles.
    #[serde(default)]
    pub multipass: bool,

    /// Output formatting options.
    #[serde(default)]
    pub js2svg: Js2SvgOptions,

    /// Data URI output format.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datauri: Option<DataUriFormat>,

    /// Parser options.
    #[serde(default)]
    pub parser: ParserOptions,
}

/// Output formatting options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Js2SvgOptions {
    #[serde(default)]
    pub pretty: bool,

    #[serde(default = "default_indent")]
    pub indent: usize,

    /// Use self-closing tags for empty elements.
    #[serde(default = "default_true")]
    pub self_closing: bool,

    #[serde(default)]
    pub eol: LineEnding,

    #[serde(default)]
    pub final_newline: bool,
}

/// Data URI output formats
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataUriFormat {
    /// Base64 encoded
    Base64,
    /// URL encoded
    Enc,
    /// Unencoded
    Unenc,
}

/// Line ending style
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    Lf,
    Crlf,
}

impl Default for LineEnding {
    fn default() -> Self {
        #[cfg(windows)]
        return LineEnding::Crlf;
        #[cfg(not(windows))]
        return LineEnding::Lf;
    }
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Crlf => "\r\n",
        }
    }
}

/// Parser configuration options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserOptions {
    /// Keep comment nodes in the tree.
    #[serde(default = "default_true")]
    pub preserve_comments: bool,

    /// Expand custom DOCTYPE entities.
    #[serde(default = "default_true")]
    pub expand_entities: bool,
}

fn default_indent() -> usize {
    2
}

fn default_true() -> bool {
    true
}

impl Default for Js2SvgOptions {
    fn default() -> Self {
        Self {
            pretty: false,
            indent: 2,
            self_closing: true,
            eol: LineEnding::default(),
            final_newline: false,
        }
    }
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            preserve_comments: true,
            expand_entities: true,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a JSON or TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|s| s.to_str()) {
            Some("json") => Self::from_json(&content),
            Some("toml") => Self::from_toml(&content),
            Some(other) => Err(ConfigError::Invalid(format!(
                "unsupported config format {other:?}, use .json or .toml"
            ))),
            None => Self::from_json(&content).or_else(|_| Self::from_toml(&content)),
        }
    }

    pub fn from_json(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_toml(toml: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(toml)?)
    }

    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn add_plugin(&mut self, plugin: PluginConfig) {
        self.plugins.push(plugin);
    }

    pub fn get_plugin(&self, name: &str) -> Option<&PluginConfig> {
        self.plugins.iter().find(|p| p.name == name)
    }

    pub fn get_plugin_mut(&mut self, name: &str) -> Option<&mut PluginConfig> {
        self.plugins.iter_mut().find(|p| p.name == name)
    }

    /// The default preset: the path data pass with its default parameters.
    pub fn with_default_preset() -> Self {
        let mut config = Self::new();
        config.add_plugin(PluginConfig::new("convertPathData".to_string()));
        config
    }
}

/// Looks for a config file with a well-known name in the given directory.
pub fn load_config_from_directory<P: AsRef<Path>>(dir: P) -> ConfigResult<Option<Config>> {
    let dir = dir.as_ref();
    for name in ["pathmin.config.toml", "pathmin.config.json"] {
        let path = dir.join(name);
        if path.exists() {
            return Ok(Some(Config::from_file(path)?));
        }
    }
    Ok(None)
}

/// Accepts plugin entries as either `"name"` or `{ "name": ..., "params": ... }`.
fn deserialize_plugins<'de, D>(deserializer: D) -> Result<Vec<PluginConfig>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use serde_json::Value;

    struct PluginsVisitor;

    impl<'de> Visitor<'de> for PluginsVisitor {
        type Value = Vec<PluginConfig>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("an array of plugin names or plugin config objects")
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let mut plugins = Vec::new();
            while let Some(value) = seq.next_element::<Value>()? {
                let plugin = match value {
                    Value::String(name) => PluginConfig::new(name),
                    Value::Object(_) => serde_json::from_value(value).map_err(de::Error::custom)?,
                    _ => return Err(de::Error::custom("invalid plugin entry")),
                };
                plugins.push(plugin);
            }
            Ok(plugins)
        }
    }

    deserializer.deserialize_seq(PluginsVisitor)
}
