//! State carried from one doc block to the next.

use crate::error::Warning;
use std::collections::BTreeMap;
use std::fmt;

/// Tag name → every description given for it, in block order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TagMap {
    tags: BTreeMap<String, Vec<String>>,
}

impl TagMap {
    pub fn push(&mut self, tag: &str, value: &str) {
        self.tags
            .entry(tag.to_string())
            .or_default()
            .push(value.to_string());
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains_key(tag)
    }

    pub fn first(&self, tag: &str) -> Option<&str> {
        self.tags
            .get(tag)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn all(&self, tag: &str) -> &[String] {
        self.tags.get(tag).map(Vec::as_slice).unwrap_or_default()
    }

    /// Remove a tag once its branch has consumed it.
    pub fn take(&mut self, tag: &str) -> Option<Vec<String>> {
        self.tags.remove(tag)
    }

    /// Leftover tags with their first value.
    pub fn leftovers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tags.iter().filter_map(|(tag, values)| {
            values.first().map(|value| (tag.as_str(), value.as_str()))
        })
    }
}

impl fmt::Display for TagMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (tag, values) in &self.tags {
            writeln!(f, "  @{tag}: {values:?}")?;
        }
        Ok(())
    }
}

/// An entity waiting for its owning `@module`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pending {
    Class(String),
    File(String),
}

/// Deferred module linkage. Filled while no module is current and drained
/// exactly once when the next `@module` block is parsed.
#[derive(Debug, Default)]
pub struct PendingLinks {
    items: Vec<Pending>,
}

impl PendingLinks {
    pub fn defer(&mut self, item: Pending) {
        if !self.items.contains(&item) {
            self.items.push(item);
        }
    }

    pub fn drain(&mut self) -> Vec<Pending> {
        std::mem::take(&mut self.items)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Pending] {
        &self.items
    }
}

/// Parser state threaded through every `parse_block` call.
#[derive(Debug, Default)]
pub struct ParseContext {
    pub current_module: Option<String>,
    pub current_namespace: Option<String>,
    pub current_class: Option<String>,
    pub current_file: Option<String>,
    /// Most recent class flagged `@global`; fallback for stray `@method` blocks.
    pub current_global: Option<String>,
    /// Submodule declared by the last `@module` block, claimed by the next class.
    pub sub_module: Option<String>,
    pub pending: PendingLinks,
    pub warnings: Vec<Warning>,
}

impl ParseContext {
    /// Reset the per-root state. The global class, the pending links and the
    /// submodule marker survive across roots.
    pub fn begin_root(&mut self) {
        self.current_module = None;
        self.current_namespace = None;
        self.current_class = None;
        self.current_file = None;
    }

    /// Record a warning and log it with enough context to find the block.
    pub fn warn(&mut self, warning: Warning, tokens: &[String]) {
        tracing::warn!(
            file = self.current_file.as_deref().unwrap_or(""),
            tokens = ?tokens,
            "{warning}"
        );
        self.warnings.push(warning);
    }

    pub fn file_name(&self) -> String {
        self.current_file.clone().unwrap_or_default()
    }
}
