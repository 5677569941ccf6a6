//! Conversion between XML documents and the generic value tree the model is
//! mapped from.
//!
//! Reading rules:
//! - an element with neither attributes nor child elements becomes the string of
//!   its trimmed text content;
//! - any other element becomes an object holding its attributes (local name,
//!   first letter upper-cased), its child elements grouped by local name (a name
//!   seen more than once becomes an array, in document order) and any text under
//!   [`TEXT_FIELD`].
//!
//! Writing is the inverse, with [`LANG_FIELD`] emitted as `xml:lang`.

use serde_json::map::Entry;
use serde_json::{Map, Value};
use xmltree::{Element, EmitterConfig, XMLNode};

use crate::error::{DecodeError, EncodeError};

/// Pseudo-field holding the text content of an element that also has
/// attributes or children.
pub const TEXT_FIELD: &str = "Value";

/// Field written back as the `xml:lang` attribute.
pub const LANG_FIELD: &str = "Lang";

/// Parses `bytes` and returns the contents of the root element, which must be
/// named `root_name` (namespace prefixes are ignored).
pub fn read_document(bytes: &[u8], root_name: &str) -> Result<Value, DecodeError> {
    let root = Element::parse(bytes).map_err(|e| DecodeError::Xml(e.to_string()))?;
    if root.name != root_name {
        return Err(DecodeError::MissingRoot(root_name.to_string()));
    }
    Ok(element_to_value(&root))
}

fn element_to_value(element: &Element) -> Value {
    let text = text_content(element);
    let has_children = element
        .children
        .iter()
        .any(|node| matches!(node, XMLNode::Element(_)));

    if element.attributes.is_empty() && !has_children {
        return Value::String(text);
    }

    let mut object = Map::new();
    for (name, value) in &element.attributes {
        object.insert(pascal_case(name), Value::String(value.clone()));
    }

    let children = element.children.iter().filter_map(|node| match node {
        XMLNode::Element(child) => Some(child),
        _ => None,
    });
    for child in children {
        let value = element_to_value(child);
        match object.entry(child.name.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
            Entry::Occupied(mut slot) => match slot.get_mut() {
                Value::Array(items) => items.push(value),
                first => {
                    let first_value = first.take();
                    *first = Value::Array(vec![first_value, value]);
                }
            },
        }
    }

    if !text.is_empty() {
        object.insert(TEXT_FIELD.to_string(), Value::String(text));
    }

    Value::Object(object)
}

fn text_content(element: &Element) -> String {
    let mut text = String::new();
    for node in &element.children {
        match node {
            XMLNode::Text(t) | XMLNode::CData(t) => text.push_str(t),
            _ => {}
        }
    }
    text.trim().to_string()
}

fn pascal_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Writes `value` as the contents of a `root_name` element.
pub fn write_document(value: &Value, root_name: &str, indent: bool) -> Result<Vec<u8>, EncodeError> {
    let mut root = Element::new(root_name);
    fill_element(&mut root, value);

    let mut out = Vec::new();
    root.write_with_config(&mut out, EmitterConfig::new().perform_indent(indent))
        .map_err(|e| EncodeError::Xml(e.to_string()))?;
    Ok(out)
}

fn fill_element(element: &mut Element, value: &Value) {
    match value {
        Value::Null => {}
        Value::Object(map) => {
            for (key, child) in map {
                match (key.as_str(), child) {
                    (_, Value::Null) => {}
                    (LANG_FIELD, lang) => {
                        element
                            .attributes
                            .insert("xml:lang".to_string(), scalar_text(lang));
                    }
                    (TEXT_FIELD, text) => element.children.push(XMLNode::Text(scalar_text(text))),
                    (_, Value::Array(items)) => {
                        for item in items {
                            push_child(element, key, item);
                        }
                    }
                    _ => push_child(element, key, child),
                }
            }
        }
        scalar => element.children.push(XMLNode::Text(scalar_text(scalar))),
    }
}

fn push_child(parent: &mut Element, name: &str, value: &Value) {
    let mut child = Element::new(name);
    fill_element(&mut child, value);
    parent.children.push(XMLNode::Element(child));
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
