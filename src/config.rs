//! Run configuration, independent of how it was collected.

use std::path::PathBuf;

/// Synthetic event wording used when no usable version hint is given.
pub const LATEST_MAJOR_VERSION: u32 = 3;

#[derive(Debug, Clone)]
pub struct Config {
    /// Source tree roots, parsed in order.
    pub inputs: Vec<PathBuf>,
    pub output_dir: PathBuf,
    /// Model file name inside `output_dir`.
    pub output_file: String,
    pub extension: String,
    pub version: String,
    pub major_version: u32,
    pub show_private: bool,
    pub class_map: bool,
    pub pages: bool,
    pub highlight: bool,
    pub highlight_extension: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            output_dir: PathBuf::from("out"),
            output_file: "parsed.json".to_string(),
            extension: ".js".to_string(),
            version: String::new(),
            major_version: LATEST_MAJOR_VERSION,
            show_private: false,
            class_map: false,
            pages: false,
            highlight: false,
            highlight_extension: ".highlighted".to_string(),
        }
    }
}

/// Derive the documentation target's major version.
///
/// Only the first character of the hint counts (`"2.8.1"` → 2). The
/// project version is the fallback hint; anything unparsable means latest.
pub fn major_version(yui_version: Option<&str>, version: &str) -> u32 {
    let hint = yui_version.filter(|v| !v.is_empty()).unwrap_or(version);
    hint.chars()
        .next()
        .and_then(|c| c.to_digit(10))
        .unwrap_or(LATEST_MAJOR_VERSION)
}
