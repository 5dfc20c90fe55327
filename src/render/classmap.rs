//! Class → module lookup table.

use crate::model::DocumentationModel;
use crate::render::{Page, Renderer};
use anyhow::{Context, Result};
use std::collections::BTreeMap;

pub const CLASS_MAP_FILE: &str = "classmap.json";

pub struct ClassMapRenderer;

/// Every class that belongs to a module. Classes without one are logged
/// and left out.
pub fn class_map(model: &DocumentationModel) -> BTreeMap<&str, &str> {
    let mut map = BTreeMap::new();
    for (name, class) in &model.class_map {
        match class.module.as_deref() {
            Some(module) => {
                map.insert(name.as_str(), module);
            }
            None => tracing::warn!("class {name} has no module, left out of the class map"),
        }
    }
    map
}

impl Renderer for ClassMapRenderer {
    fn render(&self, model: &DocumentationModel) -> Result<Vec<Page>> {
        let content = serde_json::to_string_pretty(&class_map(model))
            .context("failed to serialize the class map")?;
        Ok(vec![Page {
            path: CLASS_MAP_FILE.into(),
            content,
        }])
    }
}
