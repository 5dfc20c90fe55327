//! Per-class views: what a class page shows.
//!
//! Display defaults live here and never leak back into the model: a member
//! without `@type` shows as `Object`, an unnamed param as `unknown`, a
//! method without `@return` returns `void`.

use crate::model::{Access, ClassEntry, Constructor, DocumentationModel, MemberEntry, MemberKind, Param, ReturnInfo};
use crate::render::{Page, Renderer};
use crate::resolve::{resolve_inherited, sort_by_name, Inherited};
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

pub const DEFAULT_TYPE: &str = "Object";
pub const DEFAULT_PARAM_NAME: &str = "unknown";
pub const DEFAULT_RETURN_TYPE: &str = "void";

/// Directory holding one JSON view per class.
pub const CLASS_PAGE_DIR: &str = "classes";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassView {
    pub name: String,
    pub short_name: String,
    pub namespace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub description: String,
    #[serde(skip_serializing_if = "Access::is_public")]
    pub access: Access,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
    pub uses: Vec<String>,
    pub inner_classes: Vec<String>,
    /// Classes whose superclass is this one.
    pub subclasses: Vec<String>,
    pub constructors: Vec<ConstructorView>,
    pub properties: Vec<MemberView>,
    pub methods: Vec<MemberView>,
    pub events: Vec<MemberView>,
    pub configs: Vec<MemberView>,
    pub inherited: Inherited,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MemberView {
    pub name: String,
    /// The class the member is declared on.
    pub host: String,
    pub url: String,
    pub description: String,
    #[serde(skip_serializing_if = "Access::is_public")]
    pub access: Access,
    #[serde(rename = "static", skip_serializing_if = "std::ops::Not::not")]
    pub is_static: bool,
    #[serde(rename = "final", skip_serializing_if = "std::ops::Not::not")]
    pub is_final: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub see: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub writeonce: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<Param>,
    #[serde(rename = "return", skip_serializing_if = "Option::is_none")]
    pub returns: Option<ReturnInfo>,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConstructorView {
    pub description: String,
    pub params: Vec<Param>,
    #[serde(rename = "return", skip_serializing_if = "Option::is_none")]
    pub returns: Option<ReturnInfo>,
}

/// A private class is only shown when private members are requested.
pub fn is_class_visible(class: &ClassEntry, show_private: bool) -> bool {
    show_private || class.access != Access::Private
}

impl ClassView {
    pub fn build(class: &ClassEntry, model: &DocumentationModel, show_private: bool) -> Self {
        let members = |kind| member_views(class, kind, show_private);
        let subclasses = model
            .class_map
            .values()
            .filter(|other| other.superclass.as_deref() == Some(class.name.as_str()))
            .map(|other| other.name.clone())
            .collect();

        ClassView {
            name: class.name.clone(),
            short_name: class.short_name.clone(),
            namespace: class.namespace.clone(),
            module: class.module.clone(),
            file: class.file.clone(),
            description: class.description.clone(),
            access: class.access,
            deprecated: class.deprecated.clone(),
            extends: class.superclass.clone(),
            uses: class.uses.clone(),
            inner_classes: class.inner_classes.clone(),
            subclasses,
            constructors: class.constructors.iter().map(constructor_view).collect(),
            properties: members(MemberKind::Property),
            methods: members(MemberKind::Method),
            events: members(MemberKind::Event),
            configs: members(MemberKind::Config),
            inherited: resolve_inherited(class, &model.class_map, show_private),
            attributes: class.attributes.clone(),
        }
    }
}

fn member_views(class: &ClassEntry, kind: MemberKind, show_private: bool) -> Vec<MemberView> {
    let mut views: Vec<MemberView> = class
        .members(kind)
        .values()
        .filter(|m| show_private || m.access != Access::Private)
        .map(|m| member_view(&class.name, kind, m))
        .collect();
    sort_by_name(&mut views, |v| v.name.as_str());
    views
}

fn member_view(host: &str, kind: MemberKind, member: &MemberEntry) -> MemberView {
    let type_name = match kind {
        MemberKind::Property | MemberKind::Config => Some(
            member
                .type_name
                .clone()
                .unwrap_or_else(|| DEFAULT_TYPE.to_string()),
        ),
        MemberKind::Method | MemberKind::Event => None,
    };
    let returns = match kind {
        MemberKind::Method => Some(return_view(member.returns.as_ref())),
        _ => None,
    };

    MemberView {
        name: member.name.clone(),
        host: host.to_string(),
        url: format!("{host}.html#{kind}_{}", member.name),
        description: member.description.clone(),
        access: member.access,
        is_static: member.is_static,
        is_final: member.is_final,
        deprecated: member.deprecated.clone(),
        see: member.see.clone(),
        type_name,
        default: member.default.clone(),
        writeonce: member.writeonce,
        params: member.params.iter().map(param_view).collect(),
        returns,
        attributes: member.attributes.clone(),
    }
}

fn param_view(param: &Param) -> Param {
    Param {
        name: non_empty_or(&param.name, DEFAULT_PARAM_NAME),
        type_name: non_empty_or(&param.type_name, DEFAULT_TYPE),
        description: param.description.clone(),
    }
}

fn return_view(returns: Option<&ReturnInfo>) -> ReturnInfo {
    match returns {
        Some(r) => ReturnInfo {
            type_name: non_empty_or(&r.type_name, DEFAULT_RETURN_TYPE),
            description: r.description.clone(),
        },
        None => ReturnInfo {
            type_name: DEFAULT_RETURN_TYPE.to_string(),
            description: String::new(),
        },
    }
}

fn constructor_view(constructor: &Constructor) -> ConstructorView {
    ConstructorView {
        description: constructor.description.clone(),
        params: constructor.params.iter().map(param_view).collect(),
        returns: constructor.returns.as_ref().map(|r| return_view(Some(r))),
    }
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

/// Writes `classes/<name>.json` for every visible class.
pub struct ClassPageRenderer {
    pub show_private: bool,
}

impl Renderer for ClassPageRenderer {
    fn render(&self, model: &DocumentationModel) -> Result<Vec<Page>> {
        let mut pages = Vec::new();
        for class in model.class_map.values() {
            if !is_class_visible(class, self.show_private) {
                continue;
            }
            tracing::debug!("building view for {}", class.name);
            let view = ClassView::build(class, model, self.show_private);
            let content = serde_json::to_string_pretty(&view)
                .with_context(|| format!("failed to serialize view of {}", class.name))?;
            pages.push(Page {
                path: PathBuf::from(CLASS_PAGE_DIR).join(format!("{}.json", class.name)),
                content,
            });
        }
        Ok(pages)
    }
}
