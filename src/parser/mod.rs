//! Parser module: extraction, tokenizing and the block state machine.
//!
//! [`DocParser`] owns the model and the carry-over context for a whole run.
//! Roots are parsed one after another; blocks inside a root are parsed in
//! source order.

pub mod block;
pub mod context;
pub mod extract;
pub mod kind;
pub mod params;
pub mod tokenize;

use crate::error::ParseError;
use crate::model::DocumentationModel;
use crate::source::SourceFile;
use context::ParseContext;
use extract::Extractor;

pub struct DocParser {
    model: DocumentationModel,
    ctx: ParseContext,
}

impl DocParser {
    pub fn new(version: &str, major_version: u32) -> Self {
        Self {
            model: DocumentationModel::new(version, major_version),
            ctx: ParseContext::default(),
        }
    }

    /// Parse every file of one input root as a single block stream.
    pub fn parse_root(&mut self, sources: &[SourceFile]) -> Result<(), ParseError> {
        self.ctx.begin_root();
        let mut script = String::new();
        for source in sources {
            tracing::info!("parsing {}", source.path.display());
            script.push_str(&source.with_file_marker());
        }
        self.parse_script(&script)
    }

    /// Parse raw source text, continuing from the current context.
    pub fn parse_script(&mut self, script: &str) -> Result<(), ParseError> {
        let extractor = Extractor::new(script);
        for doc_block in extractor.blocks() {
            let tokens = tokenize::tokenize(&doc_block.body);
            tracing::trace!(?tokens, "block");
            block::parse_block(
                &mut self.model,
                &mut self.ctx,
                &tokens,
                doc_block.next_line.as_deref(),
            )?;
        }
        Ok(())
    }

    pub fn model(&self) -> &DocumentationModel {
        &self.model
    }

    pub fn context(&self) -> &ParseContext {
        &self.ctx
    }

    /// Hand over the finished model.
    pub fn finish(self) -> (DocumentationModel, ParseContext) {
        (self.model, self.ctx)
    }
}

/// Parse one piece of source text into a fresh model.
pub fn parse_source(script: &str, version: &str, major_version: u32) -> Result<DocumentationModel, ParseError> {
    let mut parser = DocParser::new(version, major_version);
    parser.parse_script(script)?;
    Ok(parser.finish().0)
}
