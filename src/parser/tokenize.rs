//! Splits one doc block into alternating text and `@tag` tokens.

use regex::Regex;
use std::sync::LazyLock;

// A tag only counts at the start of a line (one leading blank tolerated).
static RE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^\s?(@\w+)").unwrap());

/// Tokenize a block body.
///
/// The result always starts with the (possibly empty) text before the first
/// tag and then alternates `@tag`, text, `@tag`, text ... No interpretation
/// happens here: an `@` in the middle of a line stays part of the text.
pub fn tokenize(block: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut last = 0;
    for caps in RE_TAG.captures_iter(block) {
        let (Some(whole), Some(tag)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        tokens.push(block[last..whole.start()].to_string());
        tokens.push(tag.as_str().to_string());
        last = whole.end();
    }
    tokens.push(block[last..].to_string());
    tokens
}

/// True if the token is a tag rather than free text.
pub fn is_tag(token: &str) -> bool {
    token.trim_start().starts_with('@')
}
