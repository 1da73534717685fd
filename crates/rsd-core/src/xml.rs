//! # XML Element Tree
//!
//! A deliberately small DOM shared by `.rsd` schema files and asset
//! documents: element name, attributes in document order, child elements,
//! and the concatenated character data of the element. Comments,
//! processing instructions, and the declaration are dropped on read.
//!
//! Reading and writing go through `quick-xml`. Documents are written with
//! an XML declaration and two-space indentation; elements with neither
//! children nor text are written self-closing.

use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::XmlError;

/// One element of a parsed document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlElement {
    /// Tag name.
    pub name: String,
    /// Attributes in document order.
    pub attributes: Vec<(String, String)>,
    /// Child elements in document order.
    pub children: Vec<XmlElement>,
    /// Character data directly inside this element, unescaped.
    pub text: String,
}

impl XmlElement {
    /// An element with no attributes, children, or text.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder form of [`XmlElement::set_attribute`].
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(key, value);
        self
    }

    /// Builder form of setting the text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Builder form of [`XmlElement::push_child`].
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    /// Set an attribute, replacing an existing one of the same name.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    /// Append a child element.
    pub fn push_child(&mut self, child: XmlElement) {
        self.children.push(child);
    }

    /// Attribute value by exact name.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Attribute value, treating an empty or whitespace-only value as absent.
    pub fn non_empty_attribute(&self, key: &str) -> Option<&str> {
        self.attribute(key).map(str::trim).filter(|v| !v.is_empty())
    }

    /// First child element with the given name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All child elements with the given name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Parse a complete document and return its root element.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError::Syntax`] for reader errors (including mismatched
    /// end tags), [`XmlError::Malformed`] for unclosed elements or several
    /// roots, and [`XmlError::NoRoot`] for a document without elements.
    pub fn parse(source: &str) -> Result<Self, XmlError> {
        let mut reader = Reader::from_str(source);
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            let position = reader.buffer_position() as u64;
            let syntax = |message: String| XmlError::Syntax { position, message };

            let event = reader.read_event().map_err(|e| syntax(e.to_string()))?;
            match event {
                Event::Start(start) => stack.push(open_element(&start, position)?),
                Event::Empty(start) => {
                    let el = open_element(&start, position)?;
                    close_element(el, &mut stack, &mut root)?;
                }
                Event::End(_) => {
                    let el = stack
                        .pop()
                        .ok_or_else(|| XmlError::Malformed("unbalanced end tag".to_string()))?;
                    close_element(el, &mut stack, &mut root)?;
                }
                Event::Text(text) => {
                    if let Some(current) = stack.last_mut() {
                        let unescaped = text.unescape().map_err(|e| syntax(e.to_string()))?;
                        current.text.push_str(&unescaped);
                    }
                }
                Event::CData(data) => {
                    if let Some(current) = stack.last_mut() {
                        let raw = data.into_inner();
                        let s = std::str::from_utf8(&raw).map_err(|e| syntax(e.to_string()))?;
                        current.text.push_str(s);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(XmlError::Malformed(format!("unclosed element <{}>", open.name)));
        }
        root.ok_or(XmlError::NoRoot)
    }

    /// Read and parse a document file.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError::Io`] if the file cannot be read, otherwise the
    /// errors of [`XmlElement::parse`].
    pub fn read_file(path: &Path) -> Result<Self, XmlError> {
        let content = std::fs::read_to_string(path).map_err(|source| XmlError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Serialize this element as a complete document.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError::Write`] if the writer fails.
    pub fn to_document_string(&self) -> Result<String, XmlError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        emit(
            &mut writer,
            Event::Decl(BytesDecl::new("1.0", Some("utf-8"), Some("yes"))),
        )?;
        self.write_into(&mut writer)?;
        let mut out =
            String::from_utf8(writer.into_inner()).map_err(|e| XmlError::Write(e.to_string()))?;
        out.push('\n');
        Ok(out)
    }

    /// Serialize this element as a complete document and write it to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError::Io`] if the file cannot be written.
    pub fn write_file(&self, path: &Path) -> Result<(), XmlError> {
        let text = self.to_document_string()?;
        std::fs::write(path, text).map_err(|source| XmlError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    fn write_into(&self, writer: &mut Writer<Vec<u8>>) -> Result<(), XmlError> {
        let mut start = BytesStart::new(self.name.as_str());
        for (k, v) in &self.attributes {
            start.push_attribute((k.as_str(), v.as_str()));
        }

        if self.children.is_empty() && self.text.is_empty() {
            return emit(writer, Event::Empty(start));
        }

        emit(writer, Event::Start(start))?;
        if self.children.is_empty() {
            emit(writer, Event::Text(BytesText::new(&self.text)))?;
        }
        for child in &self.children {
            child.write_into(writer)?;
        }
        emit(writer, Event::End(BytesEnd::new(self.name.as_str())))
    }
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), XmlError> {
    writer
        .write_event(event)
        .map_err(|e| XmlError::Write(e.to_string()))
}

fn open_element(start: &BytesStart<'_>, position: u64) -> Result<XmlElement, XmlError> {
    let syntax = |message: String| XmlError::Syntax { position, message };

    let name = std::str::from_utf8(start.name().as_ref())
        .map_err(|e| syntax(e.to_string()))?
        .to_string();
    let mut el = XmlElement::new(name);
    for attr in start.attributes() {
        let attr = attr.map_err(|e| syntax(e.to_string()))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| syntax(e.to_string()))?
            .to_string();
        let value = attr.unescape_value().map_err(|e| syntax(e.to_string()))?;
        el.attributes.push((key, value.into_owned()));
    }
    Ok(el)
}

fn close_element(
    el: XmlElement,
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
) -> Result<(), XmlError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(el);
        return Ok(());
    }
    if root.is_some() {
        return Err(XmlError::Malformed("more than one root element".to_string()));
    }
    *root = Some(el);
    Ok(())
}
