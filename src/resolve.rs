//! Model resolver: module linkage and inherited member listings.

use crate::model::{push_unique, Access, ClassEntry, DocumentationModel, MemberEntry, MemberKind};
use crate::parser::context::Pending;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Attach `class` to `module` on both sides.
pub fn link_class(model: &mut DocumentationModel, class: &str, module: &str) {
    if let Some(entry) = model.class_map.get_mut(class) {
        entry.module = Some(module.to_string());
    }
    push_unique(&mut model.module_mut(module).class_list, class);
}

/// Attach `file` to `module` on both sides.
pub fn link_file(model: &mut DocumentationModel, file: &str, module: &str) {
    if let Some(entry) = model.file_map.get_mut(file) {
        entry.module = Some(module.to_string());
    }
    push_unique(&mut model.module_mut(module).file_list, file);
}

/// Link everything that was waiting for a module to `module`.
pub fn link_deferred(model: &mut DocumentationModel, module: &str, pending: Vec<Pending>) {
    for item in pending {
        match item {
            Pending::Class(class) => {
                tracing::debug!("linking deferred class {class} to module {module}");
                link_class(model, &class, module);
            }
            Pending::File(file) => {
                tracing::debug!("linking deferred file {file} to module {module}");
                link_file(model, &file, module);
            }
        }
    }
}

/// Summary of one inherited member, enough for an "inherited from" list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InheritedMember {
    pub name: String,
    pub access: Access,
    pub deprecated: bool,
}

/// Ancestor name → visible members it contributes.
pub type InheritedByAncestor = BTreeMap<String, Vec<InheritedMember>>;

#[derive(Debug, Default, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Inherited {
    pub properties: InheritedByAncestor,
    pub methods: InheritedByAncestor,
    pub events: InheritedByAncestor,
    pub configs: InheritedByAncestor,
    /// Every ancestor walked, superclasses and mixins, in visit order.
    pub superclass_chain: Vec<String>,
}

impl Inherited {
    pub fn members(&self, kind: MemberKind) -> &InheritedByAncestor {
        match kind {
            MemberKind::Method => &self.methods,
            MemberKind::Event => &self.events,
            MemberKind::Property => &self.properties,
            MemberKind::Config => &self.configs,
        }
    }

    fn members_mut(&mut self, kind: MemberKind) -> &mut InheritedByAncestor {
        match kind {
            MemberKind::Method => &mut self.methods,
            MemberKind::Event => &mut self.events,
            MemberKind::Property => &mut self.properties,
            MemberKind::Config => &mut self.configs,
        }
    }
}

/// Collect what `class` inherits from its superclass chain and its mixins.
///
/// The superclass is walked first (recursively), then each `@uses` class.
/// Unknown ancestors contribute nothing. Private ancestors are skipped
/// whole unless `show_private` is set; static members never inherit.
pub fn resolve_inherited(
    class: &ClassEntry,
    class_map: &BTreeMap<String, ClassEntry>,
    show_private: bool,
) -> Inherited {
    let mut walker = Walker {
        class_map,
        show_private,
        visited: BTreeSet::from([class.name.clone()]),
        inherited: Inherited::default(),
    };
    walker.ancestors_of(class);
    walker.inherited
}

struct Walker<'a> {
    class_map: &'a BTreeMap<String, ClassEntry>,
    show_private: bool,
    visited: BTreeSet<String>,
    inherited: Inherited,
}

impl Walker<'_> {
    fn ancestors_of(&mut self, class: &ClassEntry) {
        let names = class.superclass.iter().chain(class.uses.iter());
        for name in names {
            self.visit(name);
        }
    }

    fn visit(&mut self, name: &str) {
        if !self.visited.insert(name.to_string()) {
            return;
        }
        let Some(ancestor) = self.class_map.get(name) else {
            tracing::debug!("unknown ancestor {name}, nothing inherited from it");
            return;
        };
        if !self.show_private && ancestor.access == Access::Private {
            return;
        }

        self.inherited.superclass_chain.push(ancestor.name.clone());
        for kind in MemberKind::ALL {
            let summaries = self.summarize(ancestor.members(kind));
            if summaries.is_empty() {
                continue;
            }
            self.inherited
                .members_mut(kind)
                .insert(ancestor.name.clone(), summaries);
        }
        self.ancestors_of(ancestor);
    }

    fn summarize(&self, members: &BTreeMap<String, MemberEntry>) -> Vec<InheritedMember> {
        let mut summaries: Vec<InheritedMember> = members
            .values()
            .filter(|m| !m.is_static && (self.show_private || m.access != Access::Private))
            .map(|m| InheritedMember {
                name: m.name.clone(),
                access: m.access,
                deprecated: m.deprecated.is_some(),
            })
            .collect();
        sort_by_name(&mut summaries, |m| m.name.as_str());
        summaries
    }
}

/// Case-insensitive name order, ties broken by the exact name.
pub fn sort_by_name<T>(items: &mut [T], name: impl Fn(&T) -> &str) {
    items.sort_by(|a, b| {
        let (a, b) = (name(a), name(b));
        a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
    });
}
