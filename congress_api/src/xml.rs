//! A small owned XML element tree built from `quick-xml` events.
//!
//! Element and attribute names are stored by local name only, so lookups
//! work the same whether or not a document declares the namespace its schema
//! promises. House roll-call files routinely omit it.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Errors produced while building an [`XmlElement`] tree.
#[derive(thiserror::Error, Debug)]
pub enum XmlError {
    #[error("XML syntax error at byte {position}: {message}")]
    Syntax { position: u64, message: String },
    #[error("document has no root element")]
    Empty,
    #[error("document ended with unclosed <{0}>")]
    Unclosed(String),
}

#[derive(Debug, Clone)]
enum Node {
    Element(XmlElement),
    Text(String),
}

/// An element with its attributes and children in document order.
#[derive(Debug, Clone, Default)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl XmlElement {
    /// Parses a complete document and returns its root element.
    pub fn parse(bytes: &[u8]) -> Result<XmlElement, XmlError> {
        let mut reader = Reader::from_reader(bytes);
        let mut buf = Vec::new();
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            let event = reader.read_event_into(&mut buf).map_err(|e| XmlError::Syntax {
                position: reader.buffer_position() as u64,
                message: e.to_string(),
            })?;
            match event {
                Event::Start(e) => stack.push(open_element(&e)?),
                Event::Empty(e) => {
                    let element = open_element(&e)?;
                    attach(&mut stack, &mut root, element);
                }
                Event::End(_) => {
                    if let Some(element) = stack.pop() {
                        attach(&mut stack, &mut root, element);
                    }
                }
                Event::Text(e) => {
                    let text = e.unescape().map_err(|err| XmlError::Syntax {
                        position: reader.buffer_position() as u64,
                        message: err.to_string(),
                    })?;
                    push_text(&mut stack, &text);
                }
                Event::CData(e) => {
                    let raw = e.into_inner();
                    push_text(&mut stack, &String::from_utf8_lossy(&raw));
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if let Some(open) = stack.pop() {
            return Err(XmlError::Unclosed(open.name));
        }
        root.ok_or(XmlError::Empty)
    }

    /// Local name of this element.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attribute value by local name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Direct child elements.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// First direct child with the given name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.elements().find(|e| e.name == name)
    }

    /// All direct children with the given name.
    pub fn children<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.elements().filter(move |e| e.name == name)
    }

    /// First descendant (not including `self`) with the given name, depth-first
    /// in document order.
    pub fn descendant(&self, name: &str) -> Option<&XmlElement> {
        for child in self.elements() {
            if child.name == name {
                return Some(child);
            }
            if let Some(found) = child.descendant(name) {
                return Some(found);
            }
        }
        None
    }

    /// Concatenated text of this element and all its descendants.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(t) => out.push_str(t),
                Node::Element(e) => e.collect_text(out),
            }
        }
    }

    /// Text of the first direct child named `name`, or `None` when there is
    /// no such child. An empty child yields `Some("")`.
    pub fn child_text(&self, name: &str) -> Option<String> {
        self.child(name).map(XmlElement::text)
    }
}

fn open_element(start: &BytesStart<'_>) -> Result<XmlElement, XmlError> {
    let name = String::from_utf8_lossy(start.local_name().as_ref()).to_string();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| XmlError::Syntax {
            position: 0,
            message: format!("bad attribute on <{}>: {}", name, e),
        })?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| XmlError::Syntax {
                position: 0,
                message: format!("bad attribute value on <{}>: {}", name, e),
            })?
            .to_string();
        attributes.push((key, value));
    }
    Ok(XmlElement {
        name,
        attributes,
        children: Vec::new(),
    })
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(Node::Element(element)),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

fn push_text(stack: &mut [XmlElement], text: &str) {
    if text.trim().is_empty() {
        return;
    }
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Node::Text(text.to_string()));
    }
}
