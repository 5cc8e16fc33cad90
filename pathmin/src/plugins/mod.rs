// this_file: pathmin/src/plugins/mod.rs

//! Built-in optimization plugins.

pub mod convert_path_data;

pub use convert_path_data::{ConvertPathDataParams, ConvertPathDataPlugin, TransformOptions};
