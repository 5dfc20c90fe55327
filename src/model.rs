//! Documentation model built from parsed comment blocks: format-agnostic.
//!
//! Field names are serialized exactly as the rendering side expects them
//! (`classMap`, `classList`, `shortName`, ...). Renaming one is a breaking
//! change for every consumer of the JSON output.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root aggregate, built once per run and serialized whole at the end.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentationModel {
    pub version: String,
    /// Selects the synthetic change-event wording (see `parser::block`).
    pub major_version: u32,
    pub class_map: BTreeMap<String, ClassEntry>,
    pub modules: BTreeMap<String, ModuleEntry>,
    pub file_map: BTreeMap<String, FileEntry>,
    /// Declared namespaces, in declaration order, without duplicates.
    pub namespaces: Vec<String>,
}

impl DocumentationModel {
    pub fn new(version: impl Into<String>, major_version: u32) -> Self {
        Self {
            version: version.into(),
            major_version,
            ..Default::default()
        }
    }

    /// Fetch a module, creating an empty entry on first sight.
    pub fn module_mut(&mut self, name: &str) -> &mut ModuleEntry {
        self.modules
            .entry(name.to_string())
            .or_insert_with(|| ModuleEntry::new(name))
    }

    pub fn add_namespace(&mut self, namespace: &str) {
        if !self.namespaces.iter().any(|ns| ns == namespace) {
            self.namespaces.push(namespace.to_string());
        }
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModuleEntry {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub description: String,
    /// Class names in discovery order.
    pub class_list: Vec<String>,
    pub file_list: Vec<String>,
    pub submodules: Vec<String>,
    pub sub_data: BTreeMap<String, SubModule>,
    /// Leftover tags such as @requires.
    #[serde(flatten)]
    pub attributes: BTreeMap<String, String>,
}

impl ModuleEntry {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SubModule {
    /// The class that documents the submodule.
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClassEntry {
    pub short_name: String,
    /// Fully qualified name, the key in `classMap`.
    pub name: String,
    pub namespace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub superclass: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub uses: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub inner_classes: Vec<String>,
    pub description: String,
    #[serde(skip_serializing_if = "Access::is_public")]
    pub access: Access,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,
    pub methods: BTreeMap<String, MemberEntry>,
    pub events: BTreeMap<String, MemberEntry>,
    pub properties: BTreeMap<String, MemberEntry>,
    pub configs: BTreeMap<String, MemberEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub constructors: Vec<Constructor>,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, String>,
}

impl ClassEntry {
    pub fn new(short_name: &str, name: &str, namespace: &str) -> Self {
        Self {
            short_name: short_name.to_string(),
            name: name.to_string(),
            namespace: namespace.to_string(),
            ..Default::default()
        }
    }

    pub fn members(&self, kind: MemberKind) -> &BTreeMap<String, MemberEntry> {
        match kind {
            MemberKind::Method => &self.methods,
            MemberKind::Event => &self.events,
            MemberKind::Property => &self.properties,
            MemberKind::Config => &self.configs,
        }
    }

    pub fn members_mut(&mut self, kind: MemberKind) -> &mut BTreeMap<String, MemberEntry> {
        match kind {
            MemberKind::Method => &mut self.methods,
            MemberKind::Event => &mut self.events,
            MemberKind::Property => &mut self.properties,
            MemberKind::Config => &mut self.configs,
        }
    }
}

/// The four keyed member maps of a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MemberKind {
    Method,
    Event,
    Property,
    Config,
}

impl MemberKind {
    pub const ALL: [MemberKind; 4] = [
        MemberKind::Property,
        MemberKind::Method,
        MemberKind::Event,
        MemberKind::Config,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MemberKind::Method => "method",
            MemberKind::Event => "event",
            MemberKind::Property => "property",
            MemberKind::Config => "config",
        }
    }
}

impl std::fmt::Display for MemberKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    #[default]
    Public,
    Private,
    Protected,
}

impl Access {
    pub fn is_public(&self) -> bool {
        *self == Access::Public
    }

    pub fn from_tag(tag: &str) -> Option<Access> {
        match tag {
            "public" => Some(Access::Public),
            "private" => Some(Access::Private),
            "protected" => Some(Access::Protected),
            _ => None,
        }
    }
}

/// A method, event, property or config of a class.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberEntry {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Access::is_public")]
    pub access: Access,
    #[serde(rename = "static", skip_serializing_if = "is_false")]
    pub is_static: bool,
    #[serde(rename = "final", skip_serializing_if = "is_false")]
    pub is_final: bool,
    /// @deprecated, with its (possibly empty) explanation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub see: Option<String>,
    /// @type for properties and configs.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<Param>,
    #[serde(rename = "return", skip_serializing_if = "Option::is_none")]
    pub returns: Option<ReturnInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub writeonce: bool,
    /// Generated from a config attribute rather than authored.
    #[serde(skip_serializing_if = "is_false")]
    pub synthetic: bool,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, String>,
}

impl MemberEntry {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Param {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub description: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReturnInfo {
    #[serde(rename = "type")]
    pub type_name: String,
    pub description: String,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Constructor {
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<Param>,
    #[serde(rename = "return", skip_serializing_if = "Option::is_none")]
    pub returns: Option<ReturnInfo>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileEntry {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    pub class_list: Vec<String>,
}

impl FileEntry {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }
}

/// Append `value` unless the list already holds it.
pub fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|item| item == value) {
        list.push(value.to_string());
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Copies one leftover tag onto a documented entity. The first value wins:
/// a field that is already set is never overwritten.
pub trait TagTarget {
    fn apply_tag(&mut self, tag: &str, value: &str);
}

fn set_once(slot: &mut Option<String>, value: &str) {
    if slot.is_none() {
        *slot = Some(value.to_string());
    }
}

fn set_text_once(slot: &mut String, value: &str) {
    if slot.is_empty() {
        *slot = value.to_string();
    }
}

fn set_attribute(attributes: &mut BTreeMap<String, String>, tag: &str, value: &str) {
    attributes
        .entry(tag.to_string())
        .or_insert_with(|| value.to_string());
}

impl TagTarget for MemberEntry {
    fn apply_tag(&mut self, tag: &str, value: &str) {
        if let Some(access) = Access::from_tag(tag) {
            if self.access.is_public() {
                self.access = access;
            }
            return;
        }
        match tag {
            "description" => set_text_once(&mut self.description, value),
            "static" => self.is_static = true,
            "final" => self.is_final = true,
            "writeonce" => self.writeonce = true,
            "deprecated" => set_once(&mut self.deprecated, value),
            "see" => set_once(&mut self.see, value),
            "type" => set_once(&mut self.type_name, value),
            "default" => set_once(&mut self.default, value),
            _ => set_attribute(&mut self.attributes, tag, value),
        }
    }
}

impl TagTarget for ClassEntry {
    fn apply_tag(&mut self, tag: &str, value: &str) {
        if let Some(access) = Access::from_tag(tag) {
            if self.access.is_public() {
                self.access = access;
            }
            return;
        }
        match tag {
            "description" => set_text_once(&mut self.description, value),
            "deprecated" => set_once(&mut self.deprecated, value),
            _ => set_attribute(&mut self.attributes, tag, value),
        }
    }
}

impl TagTarget for ModuleEntry {
    fn apply_tag(&mut self, tag: &str, value: &str) {
        match tag {
            "description" => set_text_once(&mut self.description, value),
            "title" => set_once(&mut self.title, value),
            _ => set_attribute(&mut self.attributes, tag, value),
        }
    }
}
