//! Structural block kinds and the next-line fallback sniffer.

use super::context::TagMap;
use regex::Regex;
use std::sync::LazyLock;

/// Pseudo-tag injected before every input file.
pub const FILE_MARKER: &str = "filemarker";

/// Tags that decide what a block documents.
pub const STRUCTURAL_TAGS: &[&str] = &[
    FILE_MARKER,
    "class",
    "method",
    "property",
    "constructor",
    "event",
    "config",
    "attribute",
    "module",
];

/// The one primary branch a block is dispatched to.
///
/// Variant order is the dispatch priority: the first kind whose tag is
/// present wins. `@constructor` is not a primary kind; it is handled after
/// dispatch so a block can declare a class and its constructor together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    FileMarker,
    Class,
    Method,
    Event,
    Property,
    /// `@config`, or `@attribute` when `attribute` is set.
    Config { attribute: bool },
    Module,
    None,
}

impl BlockKind {
    pub fn select(tags: &TagMap) -> BlockKind {
        if tags.contains(FILE_MARKER) {
            BlockKind::FileMarker
        } else if tags.contains("class") {
            BlockKind::Class
        } else if tags.contains("method") {
            BlockKind::Method
        } else if tags.contains("event") {
            BlockKind::Event
        } else if tags.contains("property") {
            BlockKind::Property
        } else if tags.contains("attribute") {
            BlockKind::Config { attribute: true }
        } else if tags.contains("config") {
            BlockKind::Config { attribute: false }
        } else if tags.contains("module") {
            BlockKind::Module
        } else {
            BlockKind::None
        }
    }
}

/// What the line after a block looks like it declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessedKind {
    Property,
    Method,
}

// `[var|function] name (=|:) [function]`, anywhere in the line.
static RE_GUESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\b(var|function)\s+)?(\w+)\s*[=:]\s*(function)?").unwrap());

/// Best-effort guess of the member declared by `line`.
///
/// `foo: function (...)`, `this.foo = function`, `var foo = function` are
/// methods; any other `name =` / `name:` is a property. Declarations such
/// as `function foo() {}` carry no assignment and are not guessed.
pub fn sniff(line: &str) -> Option<(GuessedKind, String)> {
    let caps = RE_GUESS.captures(line)?;
    let name = caps.get(2)?;
    let is_function = caps.get(3).is_some() || line[name.end()..].contains("function");
    let kind = if is_function {
        GuessedKind::Method
    } else {
        GuessedKind::Property
    };
    Some((kind, name.as_str().to_string()))
}
