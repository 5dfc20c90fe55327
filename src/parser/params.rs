//! @param / @return body parsing.
//!
//! Accepted shapes:
//!
//! - `{Type} name description`
//! - `name {Type} description`
//! - `name description` (no type)

use crate::model::{Param, ReturnInfo};
use regex::Regex;
use std::sync::LazyLock;

// Either "(desc) {type} (desc)" or a plain word followed by text.
static RE_COMPOUND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^\s*?(.*?)\{(.*)\}(.*)|^\s*?(\w+)(.*)").unwrap());

static RE_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)^\s*(\S+)(.*)").unwrap());

/// A body the compound pattern could not split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Malformed(pub String);

/// Split a body into (type, remaining description).
fn split_compound(body: &str) -> Result<(String, String), Malformed> {
    let caps = RE_COMPOUND
        .captures(body)
        .ok_or_else(|| Malformed(body.to_string()))?;

    if let Some(word) = caps.get(4) {
        let rest = caps.get(5).map_or("", |m| m.as_str());
        return Ok((String::new(), format!("{}{}", word.as_str(), rest)));
    }

    let type_name = caps.get(2).map_or("", |m| m.as_str()).trim().to_string();
    let before = caps.get(1).map_or("", |m| m.as_str());
    let after = caps.get(3).map_or("", |m| m.as_str());
    Ok((type_name, format!("{before}{after}").trim().to_string()))
}

/// Parse every @param body, in order.
///
/// A body that yields a type but no name is skipped with an error log; a
/// body the compound pattern rejects is fatal for the caller.
pub fn parse_params(bodies: &[String]) -> Result<Vec<Param>, Malformed> {
    let mut params = Vec::with_capacity(bodies.len());
    for body in bodies {
        let (type_name, description) = split_compound(body)?;
        match RE_NAME.captures(&description) {
            Some(caps) => params.push(Param {
                name: caps[1].to_string(),
                type_name,
                description: caps[2].trim().to_string(),
            }),
            None => {
                tracing::error!("could not parse param -- {type_name}, {description} --");
            }
        }
    }
    Ok(params)
}

/// Parse the first @return body.
pub fn parse_return(body: &str) -> Result<ReturnInfo, Malformed> {
    let (type_name, description) = split_compound(body)?;
    Ok(ReturnInfo {
        type_name,
        description: description.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bodies(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn type_first() {
        let params = parse_params(&bodies(&["{String} name the name"])).unwrap();
        assert_eq!(
            params,
            vec![Param {
                name: "name".into(),
                type_name: "String".into(),
                description: "the name".into(),
            }]
        );
    }

    #[test]
    fn name_first() {
        let params = parse_params(&bodies(&["count {Number} how many"])).unwrap();
        assert_eq!(params[0].name, "count");
        assert_eq!(params[0].type_name, "Number");
        assert_eq!(params[0].description, "how many");
    }

    #[test]
    fn untyped() {
        let params = parse_params(&bodies(&["cb called when done"])).unwrap();
        assert_eq!(params[0].name, "cb");
        assert_eq!(params[0].type_name, "");
        assert_eq!(params[0].description, "called when done");
    }

    #[test]
    fn order_is_preserved() {
        let params = parse_params(&bodies(&["{A} a", "{B} b", "{C} c"])).unwrap();
        let names: Vec<_> = params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn object_literal_type_keeps_inner_braces() {
        let params = parse_params(&bodies(&["{{x: Number}} point the point"])).unwrap();
        assert_eq!(params[0].type_name, "{x: Number}");
        assert_eq!(params[0].name, "point");
    }

    #[test]
    fn type_without_name_is_skipped() {
        let params = parse_params(&bodies(&["{String}"])).unwrap();
        assert!(params.is_empty());
    }

    #[test]
    fn malformed_body_is_rejected() {
        assert_eq!(
            parse_params(&bodies(&["", "{A} a"])),
            Err(Malformed(String::new()))
        );
        assert!(parse_params(&bodies(&["$el the element"])).is_err());
    }

    #[test]
    fn return_with_type() {
        let ret = parse_return("{Boolean} true when found").unwrap();
        assert_eq!(ret.type_name, "Boolean");
        assert_eq!(ret.description, "true when found");
    }

    #[test]
    fn return_without_type() {
        let ret = parse_return("the widget").unwrap();
        assert_eq!(ret.type_name, "");
        assert_eq!(ret.description, "the widget");
    }
}
