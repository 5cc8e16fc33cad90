// this_file: pathmin/src/optimizer.rs

//! The optimization entry point: parse, run the configured plugin passes,
//! stringify, optionally wrap the result in a data URI.

use crate::config::{Config, DataUriFormat};
use crate::parser::{ParseError, Parser};
use crate::plugin::{PluginError, PluginInfo, PluginRegistry};
use crate::stringifier::{Stringifier, StringifyError};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Passes after which a multipass run stops even if still shrinking.
const MAX_PASSES: usize = 10;

/// Optimization error types
#[derive(Error, Debug)]
pub enum OptimizeError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("plugin error: {0}")]
    Plugin(#[from] PluginError),
    #[error("stringify error: {0}")]
    Stringify(#[from] StringifyError),
}

/// Optimization result type
pub type OptimizeResult<T> = Result<T, OptimizeError>;

/// Options for the optimize function
pub struct OptimizeOptions {
    pub config: Config,
    /// Plugin registry; the default registry when `None`.
    pub registry: Option<PluginRegistry>,
}

impl OptimizeOptions {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            registry: None,
        }
    }

    pub fn with_registry(mut self, registry: PluginRegistry) -> Self {
        self.registry = Some(registry);
        self
    }
}

impl Default for OptimizeOptions {
    fn default() -> Self {
        Self::new(Config::with_default_preset())
    }
}

/// Result of an optimization run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Optimized SVG data
    pub data: String,
    /// Size accounting
    pub info: OptimizationInfo,
}

/// Size accounting for an optimization run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationInfo {
    pub original_size: usize,
    pub optimized_size: usize,
    pub compression_ratio: f64,
    pub passes: usize,
}

impl OptimizationInfo {
    fn new(original_size: usize, optimized_size: usize, passes: usize) -> Self {
        let compression_ratio = if original_size > 0 {
            1.0 - (optimized_size as f64 / original_size as f64)
        } else {
            0.0
        };
        Self {
            original_size,
            optimized_size,
            compression_ratio,
            passes,
        }
    }

    pub fn size_reduction(&self) -> i64 {
        self.original_size as i64 - self.optimized_size as i64
    }

    pub fn compression_percentage(&self) -> f64 {
        self.compression_ratio * 100.0
    }
}

/// Optimizes an SVG string under the given options.
pub fn optimize(input: &str, options: OptimizeOptions) -> OptimizeResult<OptimizationResult> {
    let original_size = input.len();
    let config = options.config;

    let parser = Parser::new()
        .preserve_comments(config.parser.preserve_comments)
        .expand_entities(config.parser.expand_entities);
    let mut document = parser.parse(input)?;

    let mut registry = options
        .registry
        .unwrap_or_else(crate::plugin::create_default_registry);
    let stringifier = Stringifier::from_options(&config.js2svg);

    let mut passes = 0;
    let mut previous_output: Option<String> = None;
    let output = loop {
        passes += 1;
        let plugin_info = PluginInfo {
            path: config.path.clone(),
            multipass_count: passes - 1,
        };
        registry.apply_plugins(&mut document, &config.plugins, &plugin_info)?;
        let current = stringifier.stringify(&document)?;
        let settled = previous_output.as_deref() == Some(current.as_str());
        if !config.multipass || settled || passes >= MAX_PASSES {
            break current;
        }
        previous_output = Some(current);
    };

    let data = match &config.datauri {
        Some(format) => encode_datauri(&output, format),
        None => output,
    };
    let info = OptimizationInfo::new(original_size, data.len(), passes);
    Ok(OptimizationResult { data, info })
}

/// Optimizes with the default preset.
pub fn optimize_default(input: &str) -> OptimizeResult<OptimizationResult> {
    optimize(input, OptimizeOptions::default())
}

/// Optimizes with a custom configuration.
pub fn optimize_with_config(input: &str, config: Config) -> OptimizeResult<OptimizationResult> {
    optimize(input, OptimizeOptions::new(config))
}

fn encode_datauri(svg: &str, format: &DataUriFormat) -> String {
    match format {
        DataUriFormat::Base64 => {
            format!("data:image/svg+xml;base64,{}", BASE64.encode(svg))
        }
        DataUriFormat::Enc => {
            format!("data:image/svg+xml,{}", urlencoding::encode(svg))
        }
        DataUriFormat::Unenc => format!("data:image/svg+xml,{svg}"),
    }
}
