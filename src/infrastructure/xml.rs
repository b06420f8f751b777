//! XML decoding for provider responses
//!
//! Two shapes are needed: the refund channel's flat `<TAG>value</TAG>`
//! documents, and SOAP bodies decoded into a JSON-like tree.

use std::collections::HashMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum XmlError {
    #[error("XML syntax error: {0}")]
    Syntax(#[from] quick_xml::Error),

    #[error("unbalanced closing element </{0}>")]
    Unbalanced(String),

    #[error("document has no root element")]
    Empty,
}

/// Tag → text of every element that carries text.
///
/// Tag names are upper-cased; when a tag repeats the last value wins.
pub fn parse_flat(xml: &str) -> Result<HashMap<String, String>, XmlError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut values = HashMap::new();
    let mut open: Vec<String> = Vec::new();
    let mut seen_root = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                seen_root = true;
                open.push(String::from_utf8_lossy(e.name().as_ref()).to_uppercase());
            }
            Event::Empty(_) => seen_root = true,
            Event::End(e) => {
                if open.pop().is_none() {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    return Err(XmlError::Unbalanced(name));
                }
            }
            Event::Text(t) => {
                if let Some(tag) = open.last() {
                    values.insert(tag.clone(), t.unescape()?.into_owned());
                }
            }
            Event::CData(c) => {
                if let Some(tag) = open.last() {
                    let text = String::from_utf8_lossy(&c.into_inner()).into_owned();
                    values.insert(tag.clone(), text);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err(XmlError::Empty);
    }

    Ok(values)
}

struct Frame {
    name: String,
    children: Map<String, Value>,
    text: String,
    nil: bool,
}

impl Frame {
    fn open(start: &BytesStart<'_>) -> Self {
        Self {
            name: local_name(start),
            children: Map::new(),
            text: String::new(),
            nil: is_nil(start),
        }
    }

    fn into_value(self) -> Value {
        if self.nil {
            Value::Null
        } else if !self.children.is_empty() {
            Value::Object(self.children)
        } else {
            Value::String(self.text)
        }
    }
}

/// Decode a document into `(root local name, value)`.
///
/// Namespace prefixes are dropped. Leaf elements become strings, elements
/// with children become objects, repeated siblings become arrays and
/// `xsi:nil="true"` becomes `null`.
pub fn parse_tree(xml: &str) -> Result<(String, Value), XmlError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<(String, Value)> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => stack.push(Frame::open(&e)),
            Event::Empty(e) => {
                let value = if is_nil(&e) { Value::Null } else { Value::String(String::new()) };
                place(&mut stack, &mut root, local_name(&e), value);
            }
            Event::End(e) => {
                let frame = stack.pop().ok_or_else(|| {
                    XmlError::Unbalanced(String::from_utf8_lossy(e.name().as_ref()).into_owned())
                })?;
                let name = frame.name.clone();
                place(&mut stack, &mut root, name, frame.into_value());
            }
            Event::Text(t) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&t.unescape()?);
                }
            }
            Event::CData(c) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    root.ok_or(XmlError::Empty)
}

fn place(stack: &mut [Frame], root: &mut Option<(String, Value)>, name: String, value: Value) {
    match stack.last_mut() {
        Some(parent) => insert_repeated(&mut parent.children, name, value),
        None => *root = Some((name, value)),
    }
}

fn insert_repeated(children: &mut Map<String, Value>, name: String, value: Value) {
    match children.get_mut(&name) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            children.insert(name, value);
        }
    }
}

fn local_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.local_name().as_ref()).into_owned()
}

fn is_nil(start: &BytesStart<'_>) -> bool {
    start.attributes().flatten().any(|attr| {
        attr.key.local_name().as_ref() == b"nil" && attr.value.as_ref() == b"true"
    })
}
