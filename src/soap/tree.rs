//! Minimal owned XML tree for reading SOAP responses.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde::Serialize;

use crate::core::{CrossBorderError, FieldValue, Fields};

/// One parsed element. Text is trimmed at its ends only, so content on both
/// sides of a comment keeps its spacing; whitespace-only text is dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct XmlElement {
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<(String, String)>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Name without namespace prefix.
    pub fn local_name(&self) -> &str {
        local(&self.name)
    }

    /// First child with the given local name.
    pub fn child(&self, local_name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.local_name() == local_name)
    }

    pub fn children_named<'a>(
        &'a self,
        local_name: &'a str,
    ) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children
            .iter()
            .filter(move |c| c.local_name() == local_name)
    }

    /// Attribute by local name.
    pub fn attribute(&self, local_name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| local(k) == local_name)
            .map(|(_, v)| v.as_str())
    }

    /// Text of a child element, falling back to an attribute of the same
    /// name. Attributes and children are one namespace to callers.
    pub fn get(&self, local_name: &str) -> Option<&str> {
        self.child(local_name)
            .map(|c| c.text.as_str())
            .or_else(|| self.attribute(local_name))
    }

    /// `xsi:nil="true"` marks an explicitly absent value.
    pub fn is_nil(&self) -> bool {
        self.attribute("nil") == Some("true")
    }

    /// Flatten into a field map.
    ///
    /// Leaf children become text, nested ones maps, repeated names lists.
    /// Attributes other than type and namespace declarations are merged in.
    /// Empty and nil leaves are skipped.
    pub fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        for (key, value) in &self.attributes {
            if key.starts_with("xmlns") || local(key) == "type" || local(key) == "nil" {
                continue;
            }
            fields.insert(local(key), value.as_str());
        }
        for child in &self.children {
            let Some(value) = child.to_value() else {
                continue;
            };
            let key = child.local_name();
            match fields.remove(key) {
                None => fields.insert(key, value),
                Some(FieldValue::List(mut items)) => {
                    items.push(value);
                    fields.insert(key, FieldValue::List(items));
                }
                Some(first) => fields.insert(key, FieldValue::List(vec![first, value])),
            }
        }
        fields
    }

    fn to_value(&self) -> Option<FieldValue> {
        if self.is_nil() {
            return None;
        }
        if self.children.is_empty() {
            return (!self.text.is_empty()).then(|| FieldValue::Text(self.text.clone()));
        }
        Some(FieldValue::Map(self.to_fields()))
    }
}

fn local(name: &str) -> &str {
    name.rsplit(':').next().unwrap_or(name)
}

fn parse_err(e: impl std::fmt::Display) -> CrossBorderError {
    CrossBorderError::Parse(e.to_string())
}

fn element_from(start: &BytesStart<'_>) -> Result<XmlElement, CrossBorderError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(parse_err)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(parse_err)?.into_owned();
        attributes.push((key, value));
    }
    Ok(XmlElement {
        name,
        attributes,
        ..XmlElement::default()
    })
}

/// Parse a document into its root element.
pub fn parse_xml(xml: &str) -> Result<XmlElement, CrossBorderError> {
    let mut reader = Reader::from_str(xml);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event().map_err(parse_err)? {
            Event::Start(e) => {
                if root.is_some() {
                    return Err(parse_err("content after the root element"));
                }
                stack.push(element_from(&e)?);
            }
            Event::Empty(e) => {
                let element = element_from(&e)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None if root.is_none() => root = Some(element),
                    None => return Err(parse_err("content after the root element")),
                }
            }
            Event::Text(t) => {
                let text = t.unescape().map_err(parse_err)?;
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&text);
                } else if root.is_none() && !text.trim().is_empty() {
                    return Err(parse_err("text before the root element"));
                }
            }
            Event::CData(c) => {
                if let Some(current) = stack.last_mut() {
                    current
                        .text
                        .push_str(&String::from_utf8_lossy(c.into_inner().as_ref()));
                }
            }
            Event::End(_) => {
                let Some(mut done) = stack.pop() else {
                    return Err(parse_err("unbalanced end tag"));
                };
                let trimmed = done.text.trim();
                if trimmed.len() != done.text.len() {
                    done.text = trimmed.to_string();
                }
                match stack.last_mut() {
                    Some(parent) => parent.children.push(done),
                    None => root = Some(done),
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(parse_err("unexpected end of document"));
    }
    root.ok_or_else(|| parse_err("document has no root element"))
}
