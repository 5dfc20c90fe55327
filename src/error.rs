//! Fatal and non-fatal parse diagnostics.

use crate::model::MemberKind;
use thiserror::Error;

/// Aborts the whole run. No partial model is written.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{file}: a @{tag} entry could not be parsed: `{body}`\n{tokens}")]
    MalformedParam {
        file: String,
        tag: String,
        body: String,
        tokens: String,
    },

    #[error("{file}: @{tag} tag found before any @class was declared\n{tokens}")]
    NoCurrentClass {
        file: String,
        tag: String,
        tokens: String,
    },
}

impl ParseError {
    /// Attach the dump of the block's tag map.
    pub fn with_tokens(mut self, dump: String) -> Self {
        match &mut self {
            ParseError::MalformedParam { tokens, .. } | ParseError::NoCurrentClass { tokens, .. } => {
                *tokens = dump;
            }
        }
        self
    }
}

/// Logged and recorded; the run continues with a degraded model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Warning {
    #[error("class {0} was redefined")]
    ClassRedefined(String),

    #[error("{kind} {name} was redefined in class {class}")]
    MemberRedefined {
        kind: MemberKind,
        name: String,
        class: String,
    },

    #[error("@{tag} {name} found before any @class, making global {fallback} the current class")]
    OutOfPosition {
        tag: String,
        name: String,
        fallback: String,
    },

    #[error("expected a description for tag @{tag} but found another tag @{found}")]
    DescriptionIsTag { tag: String, found: String },

    #[error("expected a description for tag @{0} but it was empty")]
    EmptyDescription(String),

    #[error("no name for module")]
    UnnamedModule,

    #[error("module {0} has no description")]
    MissingModuleDescription(String),

    #[error(
        "doc block type ambiguous, no @class, @module, @method, @event, @property, or @config tag found; this block may be skipped"
    )]
    AmbiguousBlock,
}
