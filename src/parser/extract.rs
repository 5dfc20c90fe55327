//! Block extractor: pulls `/** ... */` doc blocks out of raw source text.
//!
//! Pattern and string literals are masked with `~~~N~~~` placeholders first
//! so that comment punctuation inside a literal (`"/**"`, `/\*+/`) is never
//! mistaken for a block boundary. Placeholders are restored inside each
//! extracted block.

use regex::{Captures, Regex};
use std::sync::LazyLock;

// Single-line pattern literal: a slash not followed by whitespace, `/` or `*`,
// running greedily to the last slash on the line that does not cross a `*/`.
static RE_PATTERN_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/[^\s/*](?:[^\n*]|\*[^/\n])*/").unwrap());

static RE_STRING_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"'(?:[^'\\\n]|\\.)*'|"(?:[^"\\\n]|\\.)*""#).unwrap()
});

static RE_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"~~~(\d+)~~~").unwrap());

// Group 2: block body, group 4: the code that follows the block.
// Group 5 swallows a bare quoted string so its contents are skipped.
static RE_DOC_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)(/\*\*)(.*?)(\*/)(\s*[^/\n]*)?|(".*?")"#).unwrap()
});

// Leading decoration on every line: whitespace, stars, pipes.
static RE_BLOCK_DECORATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^[\s|*]*").unwrap());

/// One documentation comment with the line of code that follows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocBlock {
    pub body: String,
    pub next_line: Option<String>,
}

/// Source text with its literals masked out.
#[derive(Debug)]
pub struct Extractor {
    masked: String,
    literals: Vec<String>,
}

impl Extractor {
    pub fn new(source: &str) -> Self {
        let mut literals = Vec::new();
        let masked = mask(&RE_PATTERN_LITERAL, source, &mut literals);
        let masked = mask(&RE_STRING_LITERAL, &masked, &mut literals);
        Self { masked, literals }
    }

    /// Lazily yields every non-empty doc block in source order.
    pub fn blocks(&self) -> impl Iterator<Item = DocBlock> + '_ {
        RE_DOC_BLOCK
            .captures_iter(&self.masked)
            .filter_map(move |caps| self.block_from(&caps))
    }

    fn block_from(&self, caps: &Captures<'_>) -> Option<DocBlock> {
        if caps.get(5).is_some() {
            return None;
        }
        let raw = caps.get(2)?.as_str();
        let body = RE_BLOCK_DECORATION.replace_all(raw, "");
        // Twice: a restored string literal may itself contain a pattern placeholder.
        let body = self.restore(&self.restore(&body));
        if body.trim().is_empty() {
            return None;
        }

        let next_line = caps
            .get(4)
            .map(|m| self.restore(&self.restore(m.as_str().trim())))
            .filter(|line| !line.is_empty());

        Some(DocBlock { body, next_line })
    }

    fn restore(&self, text: &str) -> String {
        RE_PLACEHOLDER
            .replace_all(text, |caps: &Captures<'_>| {
                caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|i| self.literals.get(i))
                    .cloned()
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}

fn mask(re: &Regex, text: &str, literals: &mut Vec<String>) -> String {
    re.replace_all(text, |caps: &Captures<'_>| {
        literals.push(caps[0].to_string());
        format!("~~~{}~~~", literals.len() - 1)
    })
    .into_owned()
}

/// Convenience wrapper collecting all blocks of `source`.
pub fn extract(source: &str) -> Vec<DocBlock> {
    Extractor::new(source).blocks().collect()
}
