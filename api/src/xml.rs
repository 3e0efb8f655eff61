/// Schema-agnostic XML normalization.
///
/// The BGG feed does not declare cardinality anywhere: a tag that holds one
/// child in most responses may hold zero or many in others, and the same
/// logical value shows up as an attribute, as element text, or as a nested
/// element depending on context. This module makes no attempt to know the
/// vocabulary — it turns any well-formed document into a predictable tree
/// and leaves defensive access to the mapping layer in `client`.
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;

/// A parsed document: the root element's tag name plus its normalized value.
/// Callers use the name to tell an `<errors>` report from an `<items>` payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub name: String,
    pub root: XmlValue,
}

/// A normalized element. An element with no attributes and no child elements
/// collapses to its trimmed text (`Text`), so scalar fields read as bare
/// strings without a facet lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlValue {
    Text(String),
    Node(XmlNode),
}

impl XmlValue {
    pub fn as_node(&self) -> Option<&XmlNode> {
        match self {
            XmlValue::Node(node) => Some(node),
            XmlValue::Text(_) => None,
        }
    }

    /// Direct text content, whether the element was simplified or not.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            XmlValue::Text(text) => Some(text),
            XmlValue::Node(node) => node.text.as_deref(),
        }
    }
}

/// Children keyed by tag name, with arity discovered per response: a tag seen
/// once stays `One`, a repeated tag becomes `Many` in document order.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlSlot {
    One(XmlValue),
    Many(Vec<XmlValue>),
}

impl XmlSlot {
    /// Coerce to a sequence. Every consumer of a nominally-repeatable tag
    /// goes through this instead of re-deriving the one-vs-many branch.
    pub fn as_sequence(&self) -> &[XmlValue] {
        match self {
            XmlSlot::One(value) => std::slice::from_ref(value),
            XmlSlot::Many(values) => values.as_slice(),
        }
    }

    fn push(&mut self, value: XmlValue) {
        match self {
            XmlSlot::One(first) => {
                let first = std::mem::replace(first, XmlValue::Text(String::new()));
                *self = XmlSlot::Many(vec![first, value]);
            }
            XmlSlot::Many(values) => values.push(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlNode {
    pub attributes: HashMap<String, String>,
    /// Direct text content, trimmed; `None` when the element carries only
    /// child elements (whitespace-only runs between children are dropped).
    pub text: Option<String>,
    pub children: HashMap<String, XmlSlot>,
}

impl XmlNode {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn child(&self, name: &str) -> Option<&XmlSlot> {
        self.children.get(name)
    }

    pub fn first_child(&self, name: &str) -> Option<&XmlValue> {
        self.child(name).and_then(|slot| slot.as_sequence().first())
    }

    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.first_child(name).and_then(XmlValue::as_text)
    }
}

#[derive(Debug)]
pub enum XmlError {
    /// The underlying parser rejected the document.
    Syntax(quick_xml::Error),
    /// The document ended while an element was still open.
    UnexpectedEof,
    /// The document contains no root element.
    NoRoot,
}

impl fmt::Display for XmlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XmlError::Syntax(e) => write!(f, "malformed XML: {e}"),
            XmlError::UnexpectedEof => write!(f, "malformed XML: unexpected end of document"),
            XmlError::NoRoot => write!(f, "malformed XML: no root element"),
        }
    }
}

impl std::error::Error for XmlError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            XmlError::Syntax(e) => Some(e),
            _ => None,
        }
    }
}

impl From<quick_xml::Error> for XmlError {
    fn from(e: quick_xml::Error) -> Self {
        XmlError::Syntax(e)
    }
}

/// Normalize a document, rooted at its first element. Fails on malformed
/// input rather than producing an empty tree.
pub fn parse_document(xml: &str) -> Result<Document, XmlError> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                let name = tag_name(&start);
                let attributes = collect_attributes(&start)?;
                let root = read_element(&mut reader, attributes)?;
                return Ok(Document { name, root });
            }
            Event::Empty(start) => {
                let name = tag_name(&start);
                let attributes = collect_attributes(&start)?;
                let root = finish_element(attributes, String::new(), HashMap::new());
                return Ok(Document { name, root });
            }
            Event::Eof => return Err(XmlError::NoRoot),
            // Prolog, comments and whitespace before the root element.
            _ => {}
        }
    }
}

/// Consume events up to the matching end tag, recursing into child elements.
/// Documents are small and short-lived, so plain recursion over the event
/// stream is all this needs.
fn read_element(
    reader: &mut Reader<&[u8]>,
    attributes: HashMap<String, String>,
) -> Result<XmlValue, XmlError> {
    let mut text = String::new();
    let mut children: HashMap<String, XmlSlot> = HashMap::new();

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                let name = tag_name(&start);
                let child_attributes = collect_attributes(&start)?;
                let child = read_element(reader, child_attributes)?;
                insert_child(&mut children, name, child);
            }
            Event::Empty(start) => {
                let name = tag_name(&start);
                let child_attributes = collect_attributes(&start)?;
                let child = finish_element(child_attributes, String::new(), HashMap::new());
                insert_child(&mut children, name, child);
            }
            Event::Text(t) => append_text(&mut text, &t.unescape()?),
            Event::CData(c) => append_text(&mut text, &String::from_utf8_lossy(c.as_ref())),
            Event::End(_) => break,
            Event::Eof => return Err(XmlError::UnexpectedEof),
            _ => {}
        }
    }

    Ok(finish_element(attributes, text, children))
}

fn finish_element(
    attributes: HashMap<String, String>,
    text: String,
    children: HashMap<String, XmlSlot>,
) -> XmlValue {
    // Leaf simplification: nothing but text collapses to a bare string.
    if attributes.is_empty() && children.is_empty() {
        return XmlValue::Text(text);
    }
    XmlValue::Node(XmlNode {
        attributes,
        text: if text.is_empty() { None } else { Some(text) },
        children,
    })
}

fn insert_child(children: &mut HashMap<String, XmlSlot>, name: String, value: XmlValue) {
    match children.entry(name) {
        Entry::Occupied(mut slot) => slot.get_mut().push(value),
        Entry::Vacant(slot) => {
            slot.insert(XmlSlot::One(value));
        }
    }
}

fn append_text(text: &mut String, piece: &str) {
    let piece = piece.trim();
    if piece.is_empty() {
        return;
    }
    if !text.is_empty() {
        text.push(' ');
    }
    text.push_str(piece);
}

fn tag_name(start: &BytesStart) -> String {
    String::from_utf8_lossy(start.name().as_ref()).into_owned()
}

fn collect_attributes(start: &BytesStart) -> Result<HashMap<String, String>, XmlError> {
    let mut attributes = HashMap::new();
    for attr in start.attributes() {
        let attr = attr.map_err(quick_xml::Error::InvalidAttr)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        attributes.insert(key, value);
    }
    Ok(attributes)
}
