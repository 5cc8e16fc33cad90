// this_file: pathmin/src/plugin.rs

//! Plugin infrastructure: the trait every document pass implements and the
//! registry that resolves configured passes by name.

use crate::ast::Document;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fmt;

/// Result type for plugin operations
pub type PluginResult<T> = Result<T, PluginError>;

/// Error type for plugin operations
#[derive(Debug)]
pub enum PluginError {
    /// Invalid configuration parameter
    InvalidConfig(String),
    /// Processing error
    Processing(String),
}

impl fmt::Display for PluginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluginError::InvalidConfig(message) => write!(f, "invalid configuration: {message}"),
            PluginError::Processing(message) => write!(f, "processing error: {message}"),
        }
    }
}

impl Error for PluginError {}

/// Information passed to plugins during optimization
#[derive(Default)]
pub struct PluginInfo {
    /// Path to the current SVG file, if any.
    pub path: Option<String>,
    /// Current multipass count, zero-based.
    pub multipass_count: usize,
}

/// A document optimization pass.
pub trait Plugin: Send + Sync {
    /// Plugin name; must be unique within a registry.
    fn name(&self) -> &'static str;

    /// One-line description.
    fn description(&self) -> &'static str;

    /// Applies the transformation to the document.
    fn apply(
        &mut self,
        document: &mut Document,
        plugin_info: &PluginInfo,
        params: Option<&Value>,
    ) -> PluginResult<()>;
}

/// Plugin configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginConfig {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

impl PluginConfig {
    pub fn new(name: String) -> Self {
        Self {
            name,
            params: None,
            enabled: true,
        }
    }

    pub fn with_params(name: String, params: Value) -> Self {
        Self {
            name,
            params: Some(params),
            enabled: true,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Plugin registry for managing available plugins
pub struct PluginRegistry {
    plugins: Vec<Box<dyn Plugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self {
            plugins: Vec::new(),
        }
    }

    pub fn register<P: Plugin + 'static>(&mut self, plugin: P) {
        self.plugins.push(Box::new(plugin));
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut dyn Plugin> {
        for plugin in &mut self.plugins {
            if plugin.name() == name {
                return Some(plugin.as_mut());
            }
        }
        None
    }

    pub fn plugin_names(&self) -> Vec<&'static str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    /// Applies the enabled plugin configurations to a document in order.
    pub fn apply_plugins(
        &mut self,
        document: &mut Document,
        configs: &[PluginConfig],
        plugin_info: &PluginInfo,
    ) -> PluginResult<()> {
        for config in configs {
            if !config.enabled {
                continue;
            }
            let plugin = self.get_mut(&config.name).ok_or_else(|| {
                PluginError::InvalidConfig(format!("unknown plugin: {}", config.name))
            })?;
            plugin.apply(document, plugin_info, config.params.as_ref())?;
        }
        Ok(())
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// The registry with all built-in plugins.
pub fn create_default_registry() -> PluginRegistry {
    let mut registry = PluginRegistry::new();
    registry.register(crate::plugins::ConvertPathDataPlugin::new());
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestPlugin;

    impl Plugin for TestPlugin {
        fn name(&self) -> &'static str {
            "test"
        }

        fn description(&self) -> &'static str {
            "test plugin"
        }

        fn apply(
            &mut self,
            document: &mut Document,
            _plugin_info: &PluginInfo,
            _params: Option<&Value>,
        ) -> PluginResult<()> {
            document
                .root
                .set_attr("data-test".to_string(), "1".to_string());
            Ok(())
        }
    }

    #[test]
    fn test_registry_lookup() {
        let mut registry = PluginRegistry::new();
        registry.register(TestPlugin);
        assert!(registry.get_mut("test").is_some());
        assert!(registry.get_mut("missing").is_none());
        assert_eq!(registry.plugin_names(), vec!["test"]);
    }

    #[test]
    fn test_apply_plugins_respects_enabled() {
        let mut registry = PluginRegistry::new();
        registry.register(TestPlugin);
        let mut document = Document::new();
        let configs = vec![PluginConfig::new("test".to_string()).disabled()];
        registry
            .apply_plugins(&mut document, &configs, &PluginInfo::default())
            .unwrap();
        assert!(!document.root.has_attr("data-test"));

        let configs = vec![PluginConfig::new("test".to_string())];
        registry
            .apply_plugins(&mut document, &configs, &PluginInfo::default())
            .unwrap();
        assert!(document.root.has_attr("data-test"));
    }

    #[test]
    fn test_apply_unknown_plugin_fails() {
        let mut registry = PluginRegistry::new();
        let mut document = Document::new();
        let configs = vec![PluginConfig::new("missing".to_string())];
        let result = registry.apply_plugins(&mut document, &configs, &PluginInfo::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_default_registry_has_the_path_pass() {
        let registry = create_default_registry();
        assert_eq!(registry.plugin_names(), vec!["convertPathData"]);
    }
}
