//! Model renderer: the whole documentation model as one JSON document.
//!
//! This is the contract consumed by downstream page generators, so it is
//! the model's own serde shape with no reshaping.

use crate::model::DocumentationModel;
use crate::render::{Page, Renderer};
use anyhow::{Context, Result};

pub struct ModelRenderer {
    pub file_name: String,
}

impl Renderer for ModelRenderer {
    fn render(&self, model: &DocumentationModel) -> Result<Vec<Page>> {
        let mut content =
            serde_json::to_string_pretty(model).context("failed to serialize the model")?;
        content.push('\n');
        Ok(vec![Page {
            path: self.file_name.clone().into(),
            content,
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source;
    use serde_json::Value;

    #[test]
    fn writes_one_page_named_after_the_model_file() {
        let model = parse_source("/** Core.\n@module core */\n/** @class A */\n", "2.1", 2).unwrap();
        let renderer = ModelRenderer {
            file_name: "parsed.json".into(),
        };
        let pages = renderer.render(&model).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].path.to_str(), Some("parsed.json"));

        let json: Value = serde_json::from_str(&pages[0].content).unwrap();
        assert_eq!(json["version"], "2.1");
        assert_eq!(json["majorVersion"], 2);
        assert_eq!(json["modules"]["core"]["classList"][0], "A");
        assert_eq!(json["classMap"]["A"]["module"], "core");
    }

    #[test]
    fn output_reads_back_into_a_model() {
        let model = parse_source(
            "/** @class A */\n/** Go.\n@method go\n@param {Number} n steps\n@chainable */\n",
            "",
            3,
        )
        .unwrap();
        let pages = ModelRenderer {
            file_name: "m.json".into(),
        }
        .render(&model)
        .unwrap();
        let back: DocumentationModel = serde_json::from_str(&pages[0].content).unwrap();
        let go = &back.class_map["A"].methods["go"];
        assert_eq!(go.params[0].type_name, "Number");
        assert_eq!(go.attributes.get("chainable").map(String::as_str), Some(""));
    }
}
