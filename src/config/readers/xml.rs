//! XML config reader.
//!
//! ```xml
//! <environaut xmlns="http://mivesto.de/environaut/config/1.0">
//!     <name>my-app</name>
//!     <keywords><keyword>php</keyword></keywords>
//!     <cache>
//!         <parameters>
//!             <parameter name="location">.environaut.cache</parameter>
//!         </parameters>
//!     </cache>
//!     <checks>
//!         <check name="php" class="executable" group="tools">
//!             <parameter name="command">php</parameter>
//!         </check>
//!     </checks>
//!     <export>
//!         <formatters>
//!             <formatter type="shell">
//!                 <parameter name="location">env.sh</parameter>
//!             </formatter>
//!         </formatters>
//!     </export>
//! </environaut>
//! ```
//!
//! Element names are matched without their namespace. A `<parameter>` with
//! nested parameters becomes a mapping when its children are named and a
//! list when they are not.

use roxmltree::{Document, Node};
use serde_json::{Map, Value};
use std::path::Path;

use super::{parse_error, read_source, ConfigReader};
use crate::error::Result;

/// Reads `.xml` config files.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlReader;

impl ConfigReader for XmlReader {
    fn read(&self, path: &Path) -> Result<Value> {
        let content = read_source(path)?;
        let doc = Document::parse(&content).map_err(|e| parse_error(path, e))?;
        Ok(Value::Object(read_root(doc.root_element())))
    }
}

fn read_root(root: Node<'_, '_>) -> Map<String, Value> {
    let mut map = Map::new();
    for child in elements(root) {
        let name = child.tag_name().name();
        let value = match name {
            "name" | "description" | "introduction" => Value::String(text_of(child).trim().to_string()),
            "keywords" => Value::Array(
                elements(child)
                    .filter(|k| k.tag_name().name() == "keyword")
                    .map(|k| Value::String(text_of(k).trim().to_string()))
                    .collect(),
            ),
            "checks" => Value::Array(
                elements(child)
                    .filter(|c| c.tag_name().name() == "check")
                    .map(|c| Value::Object(section(c)))
                    .collect(),
            ),
            "export" => Value::Object(export(child)),
            "cache" | "report" | "runner" => Value::Object(section(child)),
            _ => parameter_value(child),
        };
        map.insert(name.to_string(), value);
    }
    map
}

fn export(node: Node<'_, '_>) -> Map<String, Value> {
    let mut map = section(node);
    let formatters: Vec<Value> = elements(node)
        .filter(|c| c.tag_name().name() == "formatters")
        .flat_map(|f| elements(f))
        .filter(|f| f.tag_name().name() == "formatter")
        .map(|f| Value::Object(section(f)))
        .collect();
    if !formatters.is_empty() {
        map.insert("formatters".to_string(), Value::Array(formatters));
    }
    map
}

/// Attributes plus parameters of a structural element.
fn section(node: Node<'_, '_>) -> Map<String, Value> {
    let mut map: Map<String, Value> = node
        .attributes()
        .map(|a| (a.name().to_string(), Value::String(a.value().to_string())))
        .collect();
    if let Value::Object(params) = collapse(parameter_entries(node)) {
        map.extend(params);
    }
    map
}

fn elements<'a, 'i>(node: Node<'a, 'i>) -> impl Iterator<Item = Node<'a, 'i>> {
    node.children().filter(Node::is_element)
}

fn is_parameter_node(node: &Node<'_, '_>) -> bool {
    matches!(node.tag_name().name(), "parameter" | "parameters")
}

/// `(name, value)` pairs of the `<parameter>` children of `node`, looking
/// through `<parameters>` wrappers.
fn parameter_entries(node: Node<'_, '_>) -> Vec<(Option<String>, Value)> {
    let mut entries = Vec::new();
    for child in elements(node) {
        match child.tag_name().name() {
            "parameters" => entries.extend(parameter_entries(child)),
            "parameter" => entries.push((
                child.attribute("name").map(str::to_string),
                parameter_value(child),
            )),
            _ => {}
        }
    }
    entries
}

/// Unnamed entries only: a list. Otherwise a mapping where unnamed entries
/// take the next free numeric key.
fn collapse(entries: Vec<(Option<String>, Value)>) -> Value {
    if entries.iter().all(|(name, _)| name.is_none()) && !entries.is_empty() {
        return Value::Array(entries.into_iter().map(|(_, v)| v).collect());
    }

    let mut map = Map::new();
    let mut next_index: u128 = 0;
    for (name, value) in entries {
        let key = match name {
            Some(name) => {
                if let Ok(n) = name.parse::<u64>() {
                    next_index = next_index.max(u128::from(n) + 1);
                }
                name
            }
            None => {
                next_index += 1;
                (next_index - 1).to_string()
            }
        };
        map.insert(key, value);
    }
    Value::Object(map)
}

fn parameter_value(node: Node<'_, '_>) -> Value {
    if elements(node).any(|c| is_parameter_node(&c)) {
        return collapse(parameter_entries(node));
    }

    let raw = text_of(node);
    let preserve = node
        .attributes()
        .any(|a| a.name() == "space" && a.value() == "preserve");
    let text = if preserve { raw.as_str() } else { raw.trim() };

    let literalize = node
        .attribute("literalize")
        .is_none_or(|v| !matches!(v.trim().to_lowercase().as_str(), "false" | "off" | "no" | "0"));
    if literalize {
        literal(text)
    } else {
        Value::String(text.to_string())
    }
}

fn literal(text: &str) -> Value {
    match text.to_lowercase().as_str() {
        "on" | "yes" | "true" => Value::Bool(true),
        "off" | "no" | "false" => Value::Bool(false),
        "" => Value::Null,
        _ => Value::String(text.to_string()),
    }
}

fn text_of(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(Node::is_text)
        .filter_map(|n| n.text())
        .collect()
}
