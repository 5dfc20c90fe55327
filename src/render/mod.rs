//! Renderer module: trait-based output dispatch.
//!
//! Renderers only read the finished model. Each one produces pages with
//! paths relative to the output directory; writing them is the caller's job.

pub mod classmap;
pub mod json;
pub mod view;

use crate::model::DocumentationModel;
use anyhow::{anyhow, Result};
use std::path::PathBuf;

/// One output document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Relative to the output directory.
    pub path: PathBuf,
    pub content: String,
}

/// Trait for turning a finished model into output pages.
pub trait Renderer {
    fn render(&self, model: &DocumentationModel) -> Result<Vec<Page>>;
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// File name of the serialized model.
    pub model_file: String,
    pub show_private: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            model_file: "parsed.json".to_string(),
            show_private: false,
        }
    }
}

/// Create a renderer for the given output name.
pub fn create_renderer(output: &str, options: &RenderOptions) -> Result<Box<dyn Renderer>> {
    match output {
        "model" | "json" => Ok(Box::new(json::ModelRenderer {
            file_name: options.model_file.clone(),
        })),
        "classmap" => Ok(Box::new(classmap::ClassMapRenderer)),
        "pages" => Ok(Box::new(view::ClassPageRenderer {
            show_private: options.show_private,
        })),
        _ => Err(anyhow!(
            "unknown output: {}. Use model, classmap, or pages",
            output
        )),
    }
}
