//! Source highlighting for the "view source" pages.
//!
//! A highlighter failure never stops the run: the page gets a fixed
//! placeholder text instead.

use crate::source::SourceFile;
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

pub const HIGHLIGHT_FAILED: &str = "File could not be highlighted";

pub trait Highlighter {
    fn highlight(&self, path: &Path, source: &str) -> Result<String>;
}

/// Escaped source in a `<pre>` block with one anchor per line.
pub struct PreHighlighter;

impl Highlighter for PreHighlighter {
    fn highlight(&self, path: &Path, source: &str) -> Result<String> {
        if source.contains('\0') {
            bail!("{} looks like a binary file", path.display());
        }
        let mut out = String::from("<div class=\"highlight\"><pre>");
        for (i, line) in source.lines().enumerate() {
            out.push_str(&format!(
                "<span class=\"line\" id=\"l{}\">{}</span>\n",
                i + 1,
                html_escape(line)
            ));
        }
        out.push_str("</pre></div>\n");
        Ok(out)
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub fn highlight_or_placeholder(highlighter: &dyn Highlighter, path: &Path, source: &str) -> String {
    match highlighter.highlight(path, source) {
        Ok(markup) => markup,
        Err(e) => {
            tracing::warn!("{e:#}");
            HIGHLIGHT_FAILED.to_string()
        }
    }
}

/// Write `<name><extension>` into `output_dir` for every source.
pub fn write_highlighted(
    highlighter: &dyn Highlighter,
    sources: &[SourceFile],
    output_dir: &Path,
    extension: &str,
) -> Result<()> {
    for source in sources {
        let markup = highlight_or_placeholder(highlighter, &source.path, &source.text);
        let out_path = output_dir.join(format!("{}{}", source.name, extension));
        fs::write(&out_path, markup)
            .with_context(|| format!("failed to write {}", out_path.display()))?;
    }
    Ok(())
}
