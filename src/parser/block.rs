//! Block parser: applies one tokenized doc block to the model.
//!
//! Each call consumes a token stream completely. Everything that must
//! survive to the next block (current module, namespace, class, file,
//! pending module links) lives in the [`ParseContext`] passed in, so a
//! test can feed any sequence of blocks and inspect the result.

use super::context::{ParseContext, Pending, TagMap};
use super::kind::{sniff, BlockKind, GuessedKind, FILE_MARKER, STRUCTURAL_TAGS};
use super::params::{self, Malformed};
use super::tokenize::is_tag;
use crate::error::{ParseError, Warning};
use crate::model::*;
use crate::resolve;

/// Tags that never take a description, so they may precede the block text.
const SINGLE_TAGS: &[&str] = &[
    "constructor",
    "public",
    "private",
    "protected",
    "static",
    "final",
    "beta",
    "experimental",
    "writeonce",
    "global",
    "chainable",
];

/// Suffix of the synthetic event generated for every config attribute.
pub const CHANGE_EVENT: &str = "ChangeEvent";

/// Where a block's leftover tags land.
#[derive(Debug)]
enum Target {
    Class(String),
    Member {
        class: String,
        kind: MemberKind,
        name: String,
    },
    Module(String),
    File,
}

/// Parse one block's tokens into `model`, updating `ctx` for the next block.
///
/// `next_line` is the source line after the block; it is only consulted
/// when the block carries no structural tag.
pub fn parse_block(
    model: &mut DocumentationModel,
    ctx: &mut ParseContext,
    tokens: &[String],
    next_line: Option<&str>,
) -> Result<(), ParseError> {
    let mut tags = collect_tags(ctx, tokens);

    let namespace = tags.take("namespace").and_then(first_owned);
    if let Some(namespace) = namespace.clone() {
        if !namespace.is_empty() {
            model.add_namespace(&namespace);
            ctx.current_namespace = Some(namespace);
        }
    }

    let current_for = tags.first("for").map(str::to_string);
    if let Some(name) = current_for.as_deref() {
        if !tags.contains("class") {
            redirect_for(model, ctx, name, tokens);
            tags.take("for");
        }
    }

    if !STRUCTURAL_TAGS.iter().any(|tag| tags.contains(tag)) {
        if let Some((kind, name)) = next_line.and_then(sniff) {
            tracing::debug!(name = %name, ?kind, "guessed block kind from following line");
            match kind {
                GuessedKind::Method => tags.push("method", &name),
                GuessedKind::Property => tags.push("property", &name),
            }
        }
    }

    let snapshot = tags.clone();
    dispatch(model, ctx, &mut tags, current_for.as_deref(), tokens)
        .map_err(|err| err.with_tokens(snapshot.to_string()))
}

/// Run the one structural branch, the constructor step and the leftover copy.
fn dispatch(
    model: &mut DocumentationModel,
    ctx: &mut ParseContext,
    tags: &mut TagMap,
    current_for: Option<&str>,
    tokens: &[String],
) -> Result<(), ParseError> {
    let target = match BlockKind::select(tags) {
        BlockKind::FileMarker => parse_file_marker(model, ctx, tags),
        BlockKind::Class => parse_class(model, ctx, tags, current_for, tokens),
        BlockKind::Method => parse_method(model, ctx, tags, tokens)?,
        BlockKind::Event => parse_event(model, ctx, tags, tokens)?,
        BlockKind::Property => parse_property(model, ctx, tags, tokens)?,
        BlockKind::Config { attribute } => parse_config(model, ctx, tags, attribute, tokens)?,
        BlockKind::Module => parse_module(model, ctx, tags, true, tokens),
        BlockKind::None if tags.contains("constructor") => None,
        BlockKind::None => {
            ctx.warn(Warning::AmbiguousBlock, tokens);
            None
        }
    };

    if tags.take("constructor").is_some() {
        parse_constructor(model, ctx, tags, tokens)?;
    }

    if let Some(target) = target {
        apply_leftovers(model, &target, tags);
    }
    Ok(())
}

/// Walk the tokens pairwise, building the tag map.
fn collect_tags(ctx: &mut ParseContext, tokens: &[String]) -> TagMap {
    let mut tags = TagMap::default();
    let mut iter = tokens.iter().map(|t| t.trim()).peekable();

    while let Some(token) = iter.next() {
        if !is_tag(token) {
            // The first free text is the block description.
            if !token.is_empty() && !tags.contains("description") {
                tags.push("description", token);
            }
            continue;
        }

        let (name, inline) = split_tag(token);
        let mut description = inline.to_string();
        if description.is_empty() && !SINGLE_TAGS.contains(&name.as_str()) {
            match iter.peek().copied() {
                Some(next) if !is_tag(next) => {
                    description = iter.next().unwrap_or_default().to_string();
                    if description.is_empty() {
                        ctx.warn(Warning::EmptyDescription(name.clone()), tokens);
                    }
                }
                Some(next) => {
                    let found = split_tag(next).0;
                    ctx.warn(
                        Warning::DescriptionIsTag {
                            tag: name.clone(),
                            found,
                        },
                        tokens,
                    );
                }
                None => ctx.warn(Warning::EmptyDescription(name.clone()), tokens),
            }
        }

        if name == "module" {
            if description.is_empty() {
                ctx.warn(Warning::UnnamedModule, tokens);
            } else {
                ctx.current_module = Some(description.clone());
            }
        }
        tags.push(&name, &description);
    }
    tags
}

/// `@Tag rest` → (`tag`, `rest`).
fn split_tag(token: &str) -> (String, &str) {
    let body = token.trim_start().trim_start_matches('@');
    let (name, rest) = body
        .split_once(char::is_whitespace)
        .unwrap_or((body, ""));
    (name.to_lowercase(), rest.trim())
}

fn first_owned(values: Vec<String>) -> Option<String> {
    values.into_iter().next()
}

/// The first non-empty value of a naming tag, consuming the tag.
fn take_name(tags: &mut TagMap, tag: &str) -> Option<String> {
    tags.take(tag)
        .and_then(first_owned)
        .filter(|name| !name.is_empty())
}

/// Qualify `name` with the current namespace and make it the current class.
fn define_class(
    model: &mut DocumentationModel,
    ctx: &mut ParseContext,
    name: &str,
    tokens: &[String],
) -> String {
    let namespace = ctx.current_namespace.clone().unwrap_or_default();
    let (short_name, long_name) = qualify(&namespace, name);

    ctx.current_class = Some(long_name.clone());
    if model.class_map.contains_key(&long_name) {
        ctx.warn(Warning::ClassRedefined(long_name.clone()), tokens);
    } else {
        model.class_map.insert(
            long_name.clone(),
            ClassEntry::new(&short_name, &long_name, &namespace),
        );
    }
    long_name
}

/// (`shortName`, `name`) of a class declared under `namespace`.
fn qualify(namespace: &str, name: &str) -> (String, String) {
    if namespace.is_empty() {
        return (name.to_string(), name.to_string());
    }
    let short = name.replace(&format!("{namespace}."), "");
    let long = format!("{namespace}.{short}");
    (short, long)
}

/// `@for` without `@class`: switch to a known class, or open an inner class
/// of the current one.
fn redirect_for(model: &mut DocumentationModel, ctx: &mut ParseContext, name: &str, tokens: &[String]) {
    let namespace = ctx.current_namespace.clone().unwrap_or_default();
    let (_, long_name) = qualify(&namespace, name);
    let known = [name.to_string(), long_name]
        .into_iter()
        .find(|candidate| model.class_map.contains_key(candidate));
    if let Some(known) = known {
        ctx.current_class = Some(known);
        return;
    }
    let outer = ctx.current_class.clone();
    let inner = define_class(model, ctx, name, tokens);
    if let Some(outer) = outer.filter(|outer| *outer != inner) {
        if let Some(class) = model.class_map.get_mut(&outer) {
            push_unique(&mut class.inner_classes, &inner);
        }
    }
}

fn parse_file_marker(model: &mut DocumentationModel, ctx: &mut ParseContext, tags: &mut TagMap) -> Option<Target> {
    let name = take_name(tags, FILE_MARKER)?;
    ctx.current_file = Some(name.clone());
    model
        .file_map
        .entry(name.clone())
        .or_insert_with(|| FileEntry::new(&name));

    match ctx.current_module.clone() {
        Some(module) => resolve::link_file(model, &name, &module),
        None => {
            tracing::info!("deferred module file: {name}");
            ctx.pending.defer(Pending::File(name));
        }
    }
    Some(Target::File)
}

fn parse_class(
    model: &mut DocumentationModel,
    ctx: &mut ParseContext,
    tags: &mut TagMap,
    current_for: Option<&str>,
    tokens: &[String],
) -> Option<Target> {
    let name = take_name(tags, "class")?;
    let long_name = define_class(model, ctx, &name, tokens);

    if tags.contains("module") {
        parse_module(model, ctx, tags, false, tokens);
    }

    if let (Some(sub), Some(module)) = (ctx.sub_module.take(), ctx.current_module.clone()) {
        let entry = model.module_mut(&module).sub_data.entry(sub).or_default();
        entry.name = long_name.clone();
        if let Some(description) = tags.first("description") {
            entry.description = Some(description.to_string());
        }
    }

    if tags.contains("global") {
        ctx.current_global = Some(long_name.clone());
    }

    let class = model.class_map.get_mut(&long_name)?;
    if let Some(inner) = current_for.filter(|inner| *inner != long_name) {
        push_unique(&mut class.inner_classes, inner);
    }
    if let Some(superclass) = tags.take("extends").and_then(first_owned) {
        class.superclass.get_or_insert(superclass);
    }
    for used in tags.take("uses").unwrap_or_default() {
        push_unique(&mut class.uses, &used);
    }

    match ctx.current_module.clone() {
        Some(module) => resolve::link_class(model, &long_name, &module),
        None => {
            tracing::info!("deferred module class: {long_name}");
            ctx.pending.defer(Pending::Class(long_name.clone()));
        }
    }

    if let Some(file) = ctx.current_file.clone() {
        if let Some(class) = model.class_map.get_mut(&long_name) {
            class.file = Some(file.clone());
        }
        let entry = model
            .file_map
            .entry(file.clone())
            .or_insert_with(|| FileEntry::new(&file));
        push_unique(&mut entry.class_list, &long_name);
    }

    Some(Target::Class(long_name))
}

/// Handle the `@module` tags of a block and drain the pending links.
///
/// `standalone` is false when the tags ride along on a class block; the
/// block description then belongs to the class, not the module.
fn parse_module(
    model: &mut DocumentationModel,
    ctx: &mut ParseContext,
    tags: &mut TagMap,
    standalone: bool,
    tokens: &[String],
) -> Option<Target> {
    ctx.sub_module = None;
    let names = tags.take("module").unwrap_or_default();
    let mut target = None;
    for name in names.into_iter().filter(|name| !name.is_empty()) {
        model.module_mut(&name);
        target = Some(name);
    }
    let module = target?;

    if let Some(sub) = tags.take("submodule").and_then(first_owned) {
        let description = tags.first("description").map(str::to_string);
        let current_class = ctx.current_class.clone().unwrap_or_default();
        let entry = model.module_mut(&module);
        push_unique(&mut entry.submodules, &sub);
        entry.sub_data.insert(
            sub.clone(),
            SubModule {
                name: current_class,
                description,
            },
        );
        if standalone {
            tags.take("description");
        }
        ctx.sub_module = Some(sub);
    } else {
        let entry = model.module_mut(&module);
        // On a class block the description belongs to the class.
        let description = tags.first("description").filter(|_| standalone);
        match description {
            Some(description) if entry.description.is_empty() => {
                entry.description = description.to_string();
            }
            Some(_) => {}
            None if entry.description.is_empty() => {
                ctx.warn(Warning::MissingModuleDescription(module.clone()), tokens);
            }
            None => {}
        }
    }

    let owner = ctx.current_module.clone().unwrap_or_else(|| module.clone());
    resolve::link_deferred(model, &owner, ctx.pending.drain());

    Some(Target::Module(module))
}

fn parse_method(
    model: &mut DocumentationModel,
    ctx: &mut ParseContext,
    tags: &mut TagMap,
    tokens: &[String],
) -> Result<Option<Target>, ParseError> {
    let Some(name) = take_name(tags, "method") else {
        return Ok(None);
    };

    let class = current_class(model, ctx, "method", &name, tokens)?;

    let mut entry = MemberEntry::named(&name);
    entry.params = take_params(ctx, tags)?;
    entry.returns = take_return(ctx, tags)?;
    Ok(Some(insert_member(model, ctx, &class, MemberKind::Method, entry, tokens)))
}

fn parse_event(
    model: &mut DocumentationModel,
    ctx: &mut ParseContext,
    tags: &mut TagMap,
    tokens: &[String],
) -> Result<Option<Target>, ParseError> {
    let Some(name) = take_name(tags, "event") else {
        return Ok(None);
    };
    let class = current_class(model, ctx, "event", &name, tokens)?;

    let mut entry = MemberEntry::named(&name);
    entry.params = take_params(ctx, tags)?;
    Ok(Some(insert_member(model, ctx, &class, MemberKind::Event, entry, tokens)))
}

fn parse_property(
    model: &mut DocumentationModel,
    ctx: &mut ParseContext,
    tags: &mut TagMap,
    tokens: &[String],
) -> Result<Option<Target>, ParseError> {
    let Some(name) = take_name(tags, "property") else {
        return Ok(None);
    };
    let class = current_class(model, ctx, "property", &name, tokens)?;
    let entry = MemberEntry::named(&name);
    Ok(Some(insert_member(model, ctx, &class, MemberKind::Property, entry, tokens)))
}

fn parse_config(
    model: &mut DocumentationModel,
    ctx: &mut ParseContext,
    tags: &mut TagMap,
    attribute: bool,
    tokens: &[String],
) -> Result<Option<Target>, ParseError> {
    let (tag, other) = if attribute {
        ("attribute", "config")
    } else {
        ("config", "attribute")
    };
    let name = take_name(tags, tag);
    tags.take(other);
    let Some(name) = name else {
        return Ok(None);
    };
    let class = current_class(model, ctx, tag, &name, tokens)?;

    let target = insert_member(model, ctx, &class, MemberKind::Config, MemberEntry::named(&name), tokens);

    let major_version = model.major_version;
    if let Some(entry) = model.class_map.get_mut(&class) {
        for event in change_events(&name, major_version) {
            match entry.events.get(&event.name) {
                Some(_) => tracing::debug!("event {} already declared, not generating it", event.name),
                None => {
                    entry.events.insert(event.name.clone(), event);
                }
            }
        }
    }
    Ok(Some(target))
}

fn parse_constructor(
    model: &mut DocumentationModel,
    ctx: &mut ParseContext,
    tags: &mut TagMap,
    tokens: &[String],
) -> Result<(), ParseError> {
    let class = current_class(model, ctx, "constructor", "", tokens)?;

    let constructor = Constructor {
        description: tags.first("description").unwrap_or_default().to_string(),
        params: take_params(ctx, tags)?,
        returns: take_return(ctx, tags)?,
    };
    if let Some(entry) = model.class_map.get_mut(&class) {
        entry.constructors.push(constructor);
    }
    Ok(())
}

/// The synthetic change events for config `name`.
///
/// Version 3 and later fire a single `<name>ChangeEvent` carrying an event
/// facade. Earlier versions fire `<name>ChangeEvent` plus a cancelable
/// `before<Name>ChangeEvent`, both carrying old and new values.
pub fn change_events(name: &str, major_version: u32) -> Vec<MemberEntry> {
    let event_name = format!("{name}{CHANGE_EVENT}");
    if major_version > 2 {
        let description = format!(
            "Fires when the value for the configuration attribute '{name}' is changed. \
             You can listen for the event using the <a href=\"Attribute.html#method_on\">on</a> \
             method if you wish to be notified before the attribute's value has changed, or \
             using the <a href=\"Event.Target.html#method_after\">after</a> method if you wish \
             to be notified after the attribute's value has changed."
        );
        let param = Param {
            name: "event".to_string(),
            type_name: "Event.Facade".to_string(),
            description: "An Event Facade object with the following attribute specific \
                          properties added: <dl>\
                          <dt>prevVal</dt><dd>The value of the attribute, prior to it being set</dd>\
                          <dt>newVal</dt><dd>The value the attribute is to be set to</dd>\
                          <dt>attrName</dt><dd>The name of the attribute being set</dd>\
                          <dt>subAttrName</dt><dd>If setting a property within the attribute's \
                          value, the name of the sub-attribute property being set</dd></dl>"
                .to_string(),
        };
        return vec![synthetic_event(event_name, description, param)];
    }

    let value_param = || Param {
        name: "event".to_string(),
        type_name: "{oldValue: any, newValue: any}".to_string(),
        description: "An object containing the previous attribute value and the new value."
            .to_string(),
    };
    let before_name = format!("before{}{CHANGE_EVENT}", capitalize(name));
    vec![
        synthetic_event(
            event_name,
            format!("Fires when the value for the configuration attribute '{name}' changes."),
            value_param(),
        ),
        synthetic_event(
            before_name,
            format!(
                "Fires before the value for the configuration attribute '{name}' changes. \
                 Return false to cancel the attribute change."
            ),
            value_param(),
        ),
    ]
}

fn synthetic_event(name: String, description: String, param: Param) -> MemberEntry {
    MemberEntry {
        name,
        description,
        params: vec![param],
        synthetic: true,
        ..Default::default()
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Insert a member unless the name is taken. A user-declared event replaces
/// a synthetic one; every other collision keeps the first definition.
fn insert_member(
    model: &mut DocumentationModel,
    ctx: &mut ParseContext,
    class: &str,
    kind: MemberKind,
    entry: MemberEntry,
    tokens: &[String],
) -> Target {
    let name = entry.name.clone();
    if let Some(class_entry) = model.class_map.get_mut(class) {
        let members = class_entry.members_mut(kind);
        match members.get(&name) {
            Some(existing) if existing.synthetic => {
                tracing::debug!("{kind} {name} replaces a generated event in {class}");
                members.insert(name.clone(), entry);
            }
            Some(_) => ctx.warn(
                Warning::MemberRedefined {
                    kind,
                    name: name.clone(),
                    class: class.to_string(),
                },
                tokens,
            ),
            None => {
                members.insert(name.clone(), entry);
            }
        }
    }
    Target::Member {
        class: class.to_string(),
        kind,
        name,
    }
}

/// The class a member tag belongs to.
///
/// Without a current class the most recent `@global` class takes over (and
/// stays current); with neither the block cannot be placed and parsing stops.
fn current_class(
    model: &DocumentationModel,
    ctx: &mut ParseContext,
    tag: &str,
    name: &str,
    tokens: &[String],
) -> Result<String, ParseError> {
    let class = match ctx.current_class.clone() {
        Some(class) => class,
        None => {
            let Some(global) = ctx.current_global.clone() else {
                return Err(no_current_class(ctx, tag));
            };
            ctx.warn(
                Warning::OutOfPosition {
                    tag: tag.to_string(),
                    name: name.to_string(),
                    fallback: global.clone(),
                },
                tokens,
            );
            ctx.current_class = Some(global.clone());
            global
        }
    };
    if model.class_map.contains_key(&class) {
        Ok(class)
    } else {
        Err(no_current_class(ctx, tag))
    }
}

fn no_current_class(ctx: &ParseContext, tag: &str) -> ParseError {
    ParseError::NoCurrentClass {
        file: ctx.file_name(),
        tag: tag.to_string(),
        tokens: String::new(),
    }
}

fn take_params(ctx: &ParseContext, tags: &mut TagMap) -> Result<Vec<Param>, ParseError> {
    let bodies = tags.take("param").unwrap_or_default();
    params::parse_params(&bodies).map_err(|err| malformed(ctx, "param", err))
}

fn take_return(ctx: &ParseContext, tags: &mut TagMap) -> Result<Option<ReturnInfo>, ParseError> {
    let Some(body) = tags.take("return").and_then(first_owned) else {
        return Ok(None);
    };
    params::parse_return(&body)
        .map(Some)
        .map_err(|err| malformed(ctx, "return", err))
}

fn malformed(ctx: &ParseContext, tag: &str, err: Malformed) -> ParseError {
    ParseError::MalformedParam {
        file: ctx.file_name(),
        tag: tag.to_string(),
        body: err.0,
        tokens: String::new(),
    }
}

fn apply_leftovers(model: &mut DocumentationModel, target: &Target, tags: &TagMap) {
    let entity: &mut dyn TagTarget = match target {
        Target::Class(name) => match model.class_map.get_mut(name) {
            Some(class) => class,
            None => return,
        },
        Target::Member { class, kind, name } => {
            match model
                .class_map
                .get_mut(class)
                .and_then(|c| c.members_mut(*kind).get_mut(name))
            {
                Some(member) => member,
                None => return,
            }
        }
        Target::Module(name) => model.module_mut(name),
        Target::File => return,
    };
    for (tag, value) in tags.leftovers() {
        entity.apply_tag(tag, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::tokenize::tokenize;

    struct Harness {
        model: DocumentationModel,
        ctx: ParseContext,
    }

    impl Harness {
        fn new(major_version: u32) -> Self {
            Self {
                model: DocumentationModel::new("1.0.0", major_version),
                ctx: ParseContext::default(),
            }
        }

        fn block(&mut self, body: &str) -> Result<(), ParseError> {
            self.block_before(body, None)
        }

        fn block_before(&mut self, body: &str, next_line: Option<&str>) -> Result<(), ParseError> {
            parse_block(&mut self.model, &mut self.ctx, &tokenize(body), next_line)
        }

        fn class(&self, name: &str) -> &ClassEntry {
            &self.model.class_map[name]
        }
    }

    #[test]
    fn class_then_module_links_class() {
        let mut h = Harness::new(3);
        h.block("@module foo").unwrap();
        h.block("@class Bar\n@module foo").unwrap();
        assert_eq!(h.model.modules["foo"].class_list, ["Bar"]);
        assert_eq!(h.class("Bar").module.as_deref(), Some("foo"));
    }

    #[test]
    fn class_before_module_is_deferred_then_linked() {
        let mut h = Harness::new(3);
        h.block("@class Early").unwrap();
        assert!(h.class("Early").module.is_none());
        assert_eq!(h.ctx.pending.items(), [Pending::Class("Early".into())]);

        h.block("The foo module.\n@module foo").unwrap();
        assert_eq!(h.class("Early").module.as_deref(), Some("foo"));
        assert_eq!(h.model.modules["foo"].class_list, ["Early"]);
        assert_eq!(h.model.modules["foo"].description, "The foo module.");
        assert!(h.ctx.pending.is_empty());
    }

    #[test]
    fn deferred_class_without_module_stays_unlinked() {
        let mut h = Harness::new(3);
        h.block("@class Orphan").unwrap();
        h.block("@method run").unwrap();
        assert!(h.class("Orphan").module.is_none());
        assert_eq!(h.ctx.pending.items().len(), 1);
        assert!(h.model.modules.is_empty());
    }

    #[test]
    fn method_before_class_falls_back_to_global() {
        let mut h = Harness::new(3);
        h.block("@class X\n@global").unwrap();
        h.ctx.begin_root();
        h.block("Runs.\n@method run").unwrap();
        assert!(h.class("X").methods.contains_key("run"));
        assert_eq!(h.ctx.current_class.as_deref(), Some("X"));
        assert!(matches!(h.ctx.warnings[0], Warning::OutOfPosition { .. }));
    }

    #[test]
    fn property_before_class_falls_back_to_global() {
        let mut h = Harness::new(3);
        h.block("@class G\n@global").unwrap();
        h.ctx.begin_root();
        h.block("@property level").unwrap();
        assert!(h.class("G").properties.contains_key("level"));
    }

    #[test]
    fn method_without_any_class_is_fatal() {
        let mut h = Harness::new(3);
        let err = h.block("@method run").unwrap_err();
        assert!(matches!(err, ParseError::NoCurrentClass { ref tag, .. } if tag == "method"));
    }

    #[test]
    fn member_tags_without_class_are_fatal() {
        for body in [
            "@event fire",
            "@property size",
            "@config size",
            "@attribute size",
            "Builds.\n@constructor",
        ] {
            let mut h = Harness::new(3);
            assert!(
                matches!(h.block(body), Err(ParseError::NoCurrentClass { .. })),
                "{body}"
            );
        }
    }

    #[test]
    fn method_redefinition_keeps_first_and_warns_once() {
        let mut h = Harness::new(3);
        h.block("@class A").unwrap();
        h.block("First.\n@method go\n@param {Number} n steps").unwrap();
        h.block("Second.\n@method go\n@param {String} s other").unwrap();

        let method = &h.class("A").methods["go"];
        assert_eq!(method.description, "First.");
        assert_eq!(method.params[0].name, "n");
        let redefinitions = h
            .ctx
            .warnings
            .iter()
            .filter(|w| matches!(w, Warning::MemberRedefined { .. }))
            .count();
        assert_eq!(redefinitions, 1);
        assert_eq!(h.ctx.warnings.len(), 1);
    }

    #[test]
    fn class_redefinition_warns_without_overwrite() {
        let mut h = Harness::new(3);
        h.block("Original.\n@class A").unwrap();
        h.block("Again.\n@class A").unwrap();
        assert_eq!(h.class("A").description, "Original.");
        assert_eq!(h.ctx.warnings, [Warning::ClassRedefined("A".into())]);
    }

    #[test]
    fn method_params_and_return() {
        let mut h = Harness::new(3);
        h.block("@class Calc").unwrap();
        h.block("Adds.\n@method add\n@param {Number} a first\n@param b {Number} second\n@return {Number} the sum\n@chainable")
            .unwrap();
        let add = &h.class("Calc").methods["add"];
        assert_eq!(add.params.len(), 2);
        assert_eq!(add.params[1].name, "b");
        let ret = add.returns.as_ref().unwrap();
        assert_eq!(ret.type_name, "Number");
        assert_eq!(ret.description, "the sum");
        assert_eq!(add.attributes.get("chainable").map(String::as_str), Some(""));
        assert!(!add.attributes.contains_key("param"));
    }

    #[test]
    fn malformed_param_is_fatal() {
        let mut h = Harness::new(3);
        h.block("@class Calc").unwrap();
        let err = h.block("@method add\n@param $x nope").unwrap_err();
        assert!(matches!(err, ParseError::MalformedParam { ref body, .. } if body == "$x nope"));
    }

    #[test]
    fn config_under_version_3_generates_one_event() {
        let mut h = Harness::new(3);
        h.block("@class Widget").unwrap();
        h.block("@attribute size\n@type Number").unwrap();
        let widget = h.class("Widget");
        assert_eq!(widget.configs["size"].type_name.as_deref(), Some("Number"));
        assert_eq!(widget.events.len(), 1);
        let event = &widget.events["sizeChangeEvent"];
        assert!(event.synthetic);
        assert_eq!(event.params[0].type_name, "Event.Facade");
    }

    #[test]
    fn config_under_version_2_generates_event_pair() {
        let mut h = Harness::new(2);
        h.block("@class Widget").unwrap();
        h.block("@config size").unwrap();
        let events = &h.class("Widget").events;
        assert_eq!(events.len(), 2);
        let change = &events["sizeChangeEvent"];
        let before = &events["beforeSizeChangeEvent"];
        assert_ne!(change.description, before.description);
        assert!(before.description.contains("Return false to cancel"));
        assert_eq!(change.params[0].type_name, "{oldValue: any, newValue: any}");
        assert!(h.class("Widget").configs["size"].type_name.is_none());
    }

    #[test]
    fn declared_event_wins_over_generated_one() {
        let mut h = Harness::new(3);
        h.block("@class Widget").unwrap();
        h.block("Mine first.\n@event sizeChangeEvent").unwrap();
        h.block("@attribute size").unwrap();
        h.block("@attribute width").unwrap();
        h.block("Mine later.\n@event widthChangeEvent").unwrap();

        let events = &h.class("Widget").events;
        assert_eq!(events["sizeChangeEvent"].description, "Mine first.");
        assert!(!events["sizeChangeEvent"].synthetic);
        assert_eq!(events["widthChangeEvent"].description, "Mine later.");
        assert!(!events["widthChangeEvent"].synthetic);
        assert!(h.ctx.warnings.is_empty());
    }

    #[test]
    fn for_without_class_opens_inner_class() {
        let mut h = Harness::new(3);
        h.block("@class Outer").unwrap();
        h.block("@for Inner\n@method poke").unwrap();
        assert_eq!(h.class("Outer").inner_classes, ["Inner"]);
        assert!(h.class("Inner").methods.contains_key("poke"));

        // Resuming the outer class does not nest it.
        h.block("@for Outer\n@method resume").unwrap();
        assert!(h.class("Outer").methods.contains_key("resume"));
        assert!(h.class("Inner").inner_classes.is_empty());
    }

    #[test]
    fn for_resumes_outer_class_under_namespace() {
        let mut h = Harness::new(3);
        h.block("@namespace Y").unwrap();
        h.block("@class Outer").unwrap();
        h.block("@for Inner\n@method poke").unwrap();
        assert_eq!(h.class("Y.Outer").inner_classes, ["Y.Inner"]);

        h.block("@for Outer\n@method resume").unwrap();
        assert_eq!(h.ctx.current_class.as_deref(), Some("Y.Outer"));
        assert!(h.class("Y.Outer").methods.contains_key("resume"));
        assert!(h.class("Y.Inner").inner_classes.is_empty());
        assert!(!h
            .ctx
            .warnings
            .iter()
            .any(|w| matches!(w, Warning::ClassRedefined(_))));
    }

    #[test]
    fn class_with_for_records_inner_class() {
        let mut h = Harness::new(3);
        h.block("@class Menu\n@for Item").unwrap();
        assert_eq!(h.class("Menu").inner_classes, ["Item"]);
    }

    #[test]
    fn namespace_qualifies_classes() {
        let mut h = Harness::new(3);
        h.block("@namespace YAHOO.widget").unwrap();
        h.block("@class YAHOO.widget.Button\n@extends YAHOO.widget.Base\n@uses YAHOO.util.A\n@uses YAHOO.util.B")
            .unwrap();
        let button = h.class("YAHOO.widget.Button");
        assert_eq!(button.short_name, "Button");
        assert_eq!(button.namespace, "YAHOO.widget");
        assert_eq!(button.superclass.as_deref(), Some("YAHOO.widget.Base"));
        assert_eq!(button.uses, ["YAHOO.util.A", "YAHOO.util.B"]);
        assert_eq!(h.model.namespaces, ["YAHOO.widget"]);
        assert!(!button.attributes.contains_key("namespace"));
    }

    #[test]
    fn file_marker_tracks_file_and_defers_module() {
        let mut h = Harness::new(3);
        h.block(&format!("@{FILE_MARKER} widget.js")).unwrap();
        h.block("@class Widget").unwrap();
        assert_eq!(h.model.file_map["widget.js"].class_list, ["Widget"]);
        assert_eq!(h.class("Widget").file.as_deref(), Some("widget.js"));

        h.block("Widgets.\n@module widget").unwrap();
        assert_eq!(h.model.file_map["widget.js"].module.as_deref(), Some("widget"));
        assert_eq!(h.model.modules["widget"].file_list, ["widget.js"]);
        assert_eq!(h.model.modules["widget"].class_list, ["Widget"]);
    }

    #[test]
    fn constructor_rides_along_with_class() {
        let mut h = Harness::new(3);
        h.block("Makes widgets.\n@class Widget\n@constructor\n@param {Object} config settings").unwrap();
        let widget = h.class("Widget");
        assert_eq!(widget.constructors.len(), 1);
        assert_eq!(widget.constructors[0].description, "Makes widgets.");
        assert_eq!(widget.constructors[0].params[0].name, "config");
        assert_eq!(widget.description, "Makes widgets.");
    }

    #[test]
    fn constructor_in_its_own_block() {
        let mut h = Harness::new(3);
        h.block("@class Widget").unwrap();
        h.block("Builds one.\n@constructor\n@param {Object} config settings\n@return {Widget} it").unwrap();
        let ctor = &h.class("Widget").constructors[0];
        assert_eq!(ctor.description, "Builds one.");
        assert_eq!(ctor.returns.as_ref().unwrap().type_name, "Widget");
        assert!(h.ctx.warnings.is_empty());
    }

    #[test]
    fn error_carries_tag_dump() {
        let mut h = Harness::new(3);
        let err = h.block("Lost.\n@event fire").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("@event tag found before any @class"), "{message}");
        assert!(message.contains("@event: [\"fire\"]"), "{message}");
    }

    #[test]
    fn single_tags_never_take_a_description() {
        let mut h = Harness::new(3);
        h.block("@class A").unwrap();
        h.block("@private\nHidden helper.\n@method helper\n@static").unwrap();
        let helper = &h.class("A").methods["helper"];
        assert_eq!(helper.access, Access::Private);
        assert!(helper.is_static);
        assert_eq!(helper.description, "Hidden helper.");
        assert!(h.ctx.warnings.is_empty());
    }

    #[test]
    fn missing_description_warns() {
        let mut h = Harness::new(3);
        h.block("@class A").unwrap();
        h.block("@property size\n@deprecated\n@type Number").unwrap();
        let size = &h.class("A").properties["size"];
        assert_eq!(size.deprecated.as_deref(), Some(""));
        assert_eq!(size.type_name.as_deref(), Some("Number"));
        assert_eq!(h.ctx.warnings, [Warning::EmptyDescription("deprecated".into())]);
    }

    #[test]
    fn tag_where_description_belongs_warns() {
        let mut h = Harness::new(3);
        h.block("@class A").unwrap();
        h.block("@event @private").unwrap();
        assert_eq!(
            h.ctx.warnings,
            [Warning::DescriptionIsTag {
                tag: "event".into(),
                found: "private".into()
            }]
        );
        assert!(h.class("A").events.is_empty());
    }


    #[test]
    fn sniffed_method_from_next_line() {
        let mut h = Harness::new(3);
        h.block("@class A").unwrap();
        h.block_before("Renders it.", Some("render: function () {")).unwrap();
        h.block_before("How many.", Some("count: 0,")).unwrap();
        assert_eq!(h.class("A").methods["render"].description, "Renders it.");
        assert_eq!(h.class("A").properties["count"].description, "How many.");
    }

    #[test]
    fn explicit_tag_beats_sniffed_guess() {
        let mut h = Harness::new(3);
        h.block("@class A").unwrap();
        h.block_before("Size.\n@property size", Some("render: function () {")).unwrap();
        assert!(h.class("A").properties.contains_key("size"));
        assert!(h.class("A").methods.is_empty());
    }

    #[test]
    fn ambiguous_block_is_skipped_with_warning() {
        let mut h = Harness::new(3);
        h.block("Just some words.\n@author me").unwrap();
        assert_eq!(h.ctx.warnings, [Warning::AmbiguousBlock]);
        assert!(h.model.class_map.is_empty());
    }

    #[test]
    fn submodule_is_claimed_by_next_class() {
        let mut h = Harness::new(3);
        h.block("Base bits.\n@module widget\n@submodule widget-base").unwrap();
        h.block("The base.\n@class WidgetBase").unwrap();
        let module = &h.model.modules["widget"];
        assert_eq!(module.submodules, ["widget-base"]);
        assert_eq!(module.sub_data["widget-base"].name, "WidgetBase");
        assert_eq!(module.sub_data["widget-base"].description.as_deref(), Some("The base."));
        assert!(module.description.is_empty());
        assert!(h.ctx.warnings.is_empty());
    }

    #[test]
    fn module_leftovers_land_on_module() {
        let mut h = Harness::new(3);
        h.block("Core.\n@module core\n@title Core Utilities\n@requires yahoo").unwrap();
        let core = &h.model.modules["core"];
        assert_eq!(core.title.as_deref(), Some("Core Utilities"));
        assert_eq!(core.attributes.get("requires").map(String::as_str), Some("yahoo"));
    }

    #[test]
    fn module_without_description_warns() {
        let mut h = Harness::new(3);
        h.block("@module bare").unwrap();
        assert_eq!(h.model.modules["bare"].description, "");
        assert_eq!(h.ctx.warnings, [Warning::MissingModuleDescription("bare".into())]);
    }

    #[test]
    fn module_first_named_on_class_block_warns() {
        let mut h = Harness::new(3);
        h.block("The bar.\n@class Bar\n@module foo").unwrap();
        assert_eq!(h.model.modules["foo"].description, "");
        assert_eq!(h.class("Bar").description, "The bar.");
        assert_eq!(h.ctx.warnings, [Warning::MissingModuleDescription("foo".into())]);
    }

    #[test]
    fn class_block_keeps_earlier_module_description() {
        let mut h = Harness::new(3);
        h.block("The foo module.\n@module foo").unwrap();
        h.block("The bar.\n@class Bar\n@module foo").unwrap();
        assert_eq!(h.model.modules["foo"].description, "The foo module.");
        assert!(h.ctx.warnings.is_empty());
    }

    #[test]
    fn module_tag_without_name_warns() {
        let mut h = Harness::new(3);
        h.block("Nameless.\n@module").unwrap();
        assert!(h.ctx.warnings.contains(&Warning::UnnamedModule));
        assert!(h.model.modules.is_empty());
        assert!(h.ctx.current_module.is_none());
    }

    #[test]
    fn namespace_only_block_is_ambiguous() {
        let mut h = Harness::new(3);
        h.block("@namespace YAHOO.util").unwrap();
        assert_eq!(h.model.namespaces, ["YAHOO.util"]);
        assert_eq!(h.ctx.warnings, [Warning::AmbiguousBlock]);
    }
}
