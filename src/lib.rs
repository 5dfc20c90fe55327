//! tagdoc: extract `/** @tag */` API documentation from JavaScript sources
//! into a structured documentation model.

pub mod config;
pub mod error;
pub mod highlight;
pub mod logging;
pub mod model;
pub mod parser;
pub mod render;
pub mod resolve;
pub mod source;

pub use error::{ParseError, Warning};
pub use model::DocumentationModel;
pub use parser::{parse_source, DocParser};
