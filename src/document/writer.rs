//! Serialization of the current document state

use std::borrow::Cow;
use std::collections::HashMap;

use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Writer;

use super::error::DocumentError;
use super::tree::Document;

impl Document {
    /// Write the document back to SVG text
    ///
    /// Every event is replayed as read, except that layer elements carry
    /// their live `style` attribute (added if the source had none).
    pub fn to_svg(&self) -> Result<String, DocumentError> {
        let layer_styles: HashMap<usize, &str> = self
            .elements()
            .filter(|(_, e)| e.is_layer)
            .map(|(_, e)| (e.event, e.style.as_str()))
            .collect();

        let mut writer = Writer::new(Vec::new());
        for (index, event) in self.events.iter().enumerate() {
            match (event, layer_styles.get(&index)) {
                (Event::Start(start), Some(style)) => {
                    writer.write_event(Event::Start(with_style(start, style)?))?
                }
                (Event::Empty(start), Some(style)) => {
                    writer.write_event(Event::Empty(with_style(start, style)?))?
                }
                (Event::Eof, _) => {}
                _ => writer.write_event(event.clone())?,
            }
        }

        Ok(String::from_utf8(writer.into_inner())?)
    }
}

/// Copy a start tag, replacing or appending its `style` attribute
fn with_style(start: &BytesStart<'_>, style: &str) -> Result<BytesStart<'static>, DocumentError> {
    let name = String::from_utf8(start.name().as_ref().to_vec())?;
    let mut rebuilt = BytesStart::new(name.clone());
    let mut replaced = false;

    for attr in start.attributes() {
        let attr = attr.map_err(|e| DocumentError::Attribute {
            element: name.clone(),
            message: e.to_string(),
        })?;
        if attr.key.as_ref() == b"style" {
            rebuilt.push_attribute(("style", style));
            replaced = true;
        } else {
            rebuilt.push_attribute(double_quoted(attr));
        }
    }
    if !replaced {
        rebuilt.push_attribute(("style", style));
    }
    Ok(rebuilt)
}

/// Make a raw attribute value safe to write between double quotes
///
/// A value read from a single-quoted attribute may hold a bare `"`. Other
/// escapes, including unknown entities, are kept as written.
fn double_quoted(attr: Attribute<'_>) -> Attribute<'_> {
    if !attr.value.contains(&b'"') {
        return attr;
    }
    let mut value = Vec::with_capacity(attr.value.len() + 8);
    for &byte in attr.value.iter() {
        match byte {
            b'"' => value.extend_from_slice(b"&quot;"),
            _ => value.push(byte),
        }
    }
    Attribute {
        key: attr.key,
        value: Cow::Owned(value),
    }
}
