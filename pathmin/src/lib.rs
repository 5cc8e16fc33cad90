// this_file: pathmin/src/lib.rs

//! pathmin - an SVG path data optimizer
//!
//! The core is a filter pipeline over parsed path commands that rewrites
//! the `d` attribute of path-bearing elements into an equivalent, shorter
//! textual form while keeping the rendered geometry within a configured
//! tolerance. The crate hosts the pipeline itself: a document tree,
//! a streaming parser and stringifier, and a plugin registry with the
//! path data pass as its built-in plugin.
//!
//! ```
//! use pathmin::optimize_default;
//!
//! let result = optimize_default(r#"<svg><path d="M 10,10 L 20,20"/></svg>"#).unwrap();
//! assert_eq!(result.data, r#"<svg><path d="M10 10l10 10"/></svg>"#);
//! ```
//!
//! Path data can also be optimized without a document:
//!
//! ```
//! use pathmin::path::convert::{run, Options};
//! use pathmin::path::Path;
//! use pathmin::style::StyleInfo;
//!
//! let path = Path::parse("M0 0 L10 0 L10 10").unwrap();
//! let optimized = run(path, &Options::default(), &StyleInfo::unstyled());
//! assert_eq!(optimized, "M0 0h10v10");
//! ```

pub mod ast;
pub mod config;
pub mod optimizer;
pub mod parser;
pub mod path;
pub mod plugin;
pub mod plugins;
pub mod stringifier;
pub mod style;

// Re-export main types
pub use ast::{Document, Element, Node};
pub use config::Config;
pub use optimizer::{
    optimize, optimize_default, optimize_with_config, OptimizationResult, OptimizeOptions,
};
pub use plugin::{Plugin, PluginConfig, PluginRegistry};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
