//! Minimal element tree over quick-xml
//!
//! Source files are small enough to hold in memory, and every consumer needs
//! random access to a record's children, so files are read into a plain tree
//! of named elements with concatenated text.

use quick_xml::events::Event;
use quick_xml::Reader;

/// One XML element
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlNode {
    /// Tag name
    pub name: String,

    /// Trimmed text content, `None` when empty
    pub text: Option<String>,

    /// Child elements in document order
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    fn named(name: String) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    /// First child with the given tag
    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All children with the given tag
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Text of the first child with the given tag
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).and_then(|c| c.text.as_deref())
    }

    /// Whether the element has neither text nor children
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.children.is_empty()
    }
}

/// Parse a document and return its root element
pub fn parse_document(bytes: &[u8]) -> Result<XmlNode, String> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let mut reader = Reader::from_reader(bytes);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;
    let mut buf = Vec::new();

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| format!("at byte {}: {}", reader.buffer_position(), e))?;

        match event {
            Event::Start(start) => {
                let name = tag_name(start.name().as_ref())?;
                stack.push(XmlNode::named(name));
            }
            Event::Empty(start) => {
                let node = XmlNode::named(tag_name(start.name().as_ref())?);
                attach(&mut stack, &mut root, node)?;
            }
            Event::End(_) => {
                let mut node = stack
                    .pop()
                    .ok_or_else(|| "unexpected closing tag".to_string())?;
                if let Some(text) = node.text.take() {
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        node.text = Some(trimmed.to_string());
                    }
                }
                attach(&mut stack, &mut root, node)?;
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(|e| e.to_string())?;
                append_text(&mut stack, &text);
            }
            Event::CData(data) => {
                let text = String::from_utf8_lossy(&data).into_owned();
                append_text(&mut stack, &text);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(format!("unclosed element <{}>", open.name));
    }
    root.ok_or_else(|| "document has no root element".to_string())
}

fn tag_name(raw: &[u8]) -> Result<String, String> {
    std::str::from_utf8(raw)
        .map(str::to_string)
        .map_err(|e| format!("invalid tag name: {}", e))
}

fn append_text(stack: &mut [XmlNode], text: &str) {
    if let Some(current) = stack.last_mut() {
        current.text.get_or_insert_with(String::new).push_str(text);
    }
}

fn attach(stack: &mut [XmlNode], root: &mut Option<XmlNode>, node: XmlNode) -> Result<(), String> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(node);
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(node);
            Ok(())
        }
        None => Err(format!("multiple root elements (second is <{}>)", node.name)),
    }
}
