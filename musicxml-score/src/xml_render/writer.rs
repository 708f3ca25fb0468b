//! Serialization of the element tree with quick-xml.

use std::io::{Cursor, Write};

use quick_xml::{
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
    Writer,
};

use super::element::XmlElement;
use crate::error::ScoreResult;

pub static DOCTYPE: &str = "score-partwise PUBLIC \
    \"-//Recordare//DTD MusicXML 3.0 Partwise//EN\" \
    \"http://www.musicxml.org/dtds/partwise.dtd\"";

/// Write a whole document: declaration, doctype and the root element.
///
/// # Example
/// ```
/// # use musicxml_score::xml_render::{XmlElement, write_document};
/// let root = XmlElement::new("score-partwise")
///     .with_child(XmlElement::text_node("work-title", "A & B"));
/// let xml = write_document(&root, false, 0).unwrap();
/// assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\""));
/// assert!(xml.contains("<!DOCTYPE score-partwise PUBLIC"));
/// assert!(xml.ends_with("<work-title>A &amp; B</work-title></score-partwise>"));
/// ```
pub fn write_document(
    root: &XmlElement,
    pretty: bool,
    indent: usize,
) -> ScoreResult<String> {
    let buffer = Cursor::new(Vec::new());
    let mut writer = match pretty {
        true => Writer::new_with_indent(buffer, b' ', indent),
        false => Writer::new(buffer),
    };
    writer.write_event(Event::Decl(BytesDecl::new(
        "1.0",
        Some("UTF-8"),
        Some("no"),
    )))?;
    writer.write_event(Event::DocType(BytesText::from_escaped(DOCTYPE)))?;
    write_element(&mut writer, root)?;
    let bytes = writer.into_inner().into_inner();
    Ok(String::from_utf8(bytes)?)
}

/// Write a single element with its subtree.
pub fn write_element<W: Write>(
    writer: &mut Writer<W>,
    element: &XmlElement,
) -> ScoreResult<()> {
    let mut start = BytesStart::new(element.name());
    for (key, value) in element.attributes() {
        start.push_attribute((key.as_str(), value.as_str()));
    }
    if element.text().is_none() && element.children().is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }
    writer.write_event(Event::Start(start))?;
    if let Some(text) = element.text() {
        writer.write_event(Event::Text(BytesText::new(text)))?;
    }
    for child in element.children() {
        write_element(writer, child)?;
    }
    writer.write_event(Event::End(BytesEnd::new(element.name())))?;
    Ok(())
}
