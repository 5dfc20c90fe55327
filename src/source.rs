//! Input discovery and decoding.

use crate::parser::kind::FILE_MARKER;
use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// One input file, decoded.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Base name; the key in the model's file map.
    pub name: String,
    pub path: PathBuf,
    pub text: String,
}

impl SourceFile {
    pub fn read(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            name,
            path: path.to_path_buf(),
            text: decode_permissive(&bytes),
        })
    }

    /// The text prefixed with the block that tells the parser which file it is in.
    pub fn with_file_marker(&self) -> String {
        format!("\n/** @{FILE_MARKER} {} \n*/{}", self.name, self.text)
    }
}

/// Decode UTF-8, writing each invalid byte as a numeric character reference.
pub fn decode_permissive(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
        for byte in chunk.invalid() {
            let _ = write!(text, "&#{byte};");
        }
    }
    text
}

/// Every file under `root` whose name ends in `extension`.
///
/// Files of a directory come before its subdirectories, each group sorted
/// by name, so the parse order is stable across platforms. A root that is
/// itself a file is taken as is.
pub fn collect_sources(root: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }
    let mut files = Vec::new();
    visit(root, &extension.to_lowercase(), &mut files)?;
    Ok(files)
}

fn visit(dir: &Path, extension: &str, files: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect();
    entries.sort();

    let (dirs, plain): (Vec<_>, Vec<_>) = entries.into_iter().partition(|p| p.is_dir());
    files.extend(plain.into_iter().filter(|p| has_extension(p, extension)));
    for sub in dirs {
        visit(&sub, extension, files)?;
    }
    Ok(())
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().to_lowercase().ends_with(extension))
        .unwrap_or(false)
}
