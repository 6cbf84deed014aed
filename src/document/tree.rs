//! Arena of SVG elements built from quick-xml events

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::error::DocumentError;

const INKSCAPE_LABEL: &[u8] = b"inkscape:label";
const INKSCAPE_GROUPMODE: &[u8] = b"inkscape:groupmode";

/// Stable handle to an element of a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// An element of the drawing
#[derive(Debug, Clone)]
pub struct Element {
    /// Qualified tag name as written, e.g. `g` or `svg:g`
    pub name: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// `inkscape:label`
    pub label: Option<String>,
    /// `<g inkscape:groupmode="layer">`
    pub is_layer: bool,
    /// Live `style` attribute; an absent attribute reads as empty
    pub style: String,
    /// Concatenated character data directly inside this element
    pub text: String,
    /// Index of the start (or empty) event in the document's event list
    pub(crate) event: usize,
}

impl Element {
    fn from_start(
        start: &BytesStart<'_>,
        parent: Option<NodeId>,
        event: usize,
    ) -> Result<Self, DocumentError> {
        let name = String::from_utf8(start.name().as_ref().to_vec())?;
        let mut label = None;
        let mut style_attr = None;
        let mut groupmode = None;

        for attr in start.attributes() {
            let attr = attr.map_err(|e| DocumentError::Attribute {
                element: name.clone(),
                message: e.to_string(),
            })?;
            // Only the attributes read here are unescaped; others may use
            // entities declared in a DTD
            let slot = match attr.key.as_ref() {
                INKSCAPE_LABEL => &mut label,
                INKSCAPE_GROUPMODE => &mut groupmode,
                b"style" => &mut style_attr,
                _ => continue,
            };
            let value = attr
                .unescape_value()
                .map_err(|e| DocumentError::Attribute {
                    element: name.clone(),
                    message: e.to_string(),
                })?
                .into_owned();
            *slot = Some(value);
        }

        let style = style_attr.unwrap_or_default();
        let is_layer = local_name(&name) == "g" && groupmode.as_deref() == Some("layer");
        Ok(Self {
            name,
            parent,
            children: Vec::new(),
            label,
            is_layer,
            style,
            text: String::new(),
            event,
        })
    }

    /// Tag name without namespace prefix
    pub fn local_name(&self) -> &str {
        local_name(&self.name)
    }
}

fn local_name(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}

/// A parsed SVG drawing
///
/// The original event stream is kept so the document can be written back
/// out unchanged apart from layer styles.
#[derive(Debug, Clone)]
pub struct Document {
    pub(crate) events: Vec<Event<'static>>,
    elements: Vec<Element>,
    root: NodeId,
}

impl Document {
    /// Parse SVG source text
    pub fn parse(source: &str) -> Result<Self, DocumentError> {
        let mut reader = Reader::from_str(source);
        let mut events: Vec<Event<'static>> = Vec::new();
        let mut elements: Vec<Element> = Vec::new();
        let mut stack: Vec<NodeId> = Vec::new();

        loop {
            let event = reader.read_event().map_err(|e| DocumentError::Xml {
                position: reader.buffer_position() as u64,
                message: e.to_string(),
            })?;

            match &event {
                Event::Start(start) | Event::Empty(start) => {
                    let id = NodeId(elements.len());
                    let parent = stack.last().copied();
                    let element = Element::from_start(start, parent, events.len())?;
                    if let Some(parent) = parent {
                        elements[parent.0].children.push(id);
                    }
                    elements.push(element);
                    if matches!(event, Event::Start(_)) {
                        stack.push(id);
                    }
                }
                Event::End(end) => {
                    if stack.pop().is_none() {
                        return Err(DocumentError::UnexpectedEnd {
                            name: String::from_utf8_lossy(end.name().as_ref()).into_owned(),
                        });
                    }
                }
                Event::Text(text) => {
                    if let Some(current) = stack.last() {
                        elements[current.0]
                            .text
                            .push_str(&String::from_utf8(text.to_vec())?);
                    }
                }
                Event::CData(data) => {
                    if let Some(current) = stack.last() {
                        elements[current.0]
                            .text
                            .push_str(&String::from_utf8(data.to_vec())?);
                    }
                }
                Event::GeneralRef(reference) => {
                    if let Some(current) = stack.last() {
                        let resolved = resolve_reference(reference)?;
                        elements[current.0].text.push_str(&resolved);
                    }
                }
                Event::Eof => break,
                _ => {}
            }

            events.push(event.into_owned());
        }

        if let Some(open) = stack.last() {
            return Err(DocumentError::Unclosed {
                name: elements[open.0].name.clone(),
            });
        }
        if elements.is_empty() {
            return Err(DocumentError::NoRoot);
        }

        log::debug!(
            "parsed {} elements, {} layers",
            elements.len(),
            elements.iter().filter(|e| e.is_layer).count()
        );
        Ok(Self {
            events,
            elements,
            root: NodeId(0),
        })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn element(&self, id: NodeId) -> &Element {
        &self.elements[id.0]
    }

    pub fn elements(&self) -> impl Iterator<Item = (NodeId, &Element)> {
        self.elements
            .iter()
            .enumerate()
            .map(|(i, e)| (NodeId(i), e))
    }

    /// All layer nodes in document order
    pub fn layers(&self) -> Vec<NodeId> {
        self.elements()
            .filter(|(_, e)| e.is_layer)
            .map(|(id, _)| id)
            .collect()
    }

    pub fn label(&self, id: NodeId) -> Option<&str> {
        self.element(id).label.as_deref()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.element(id).parent
    }

    /// Ancestors of `id`, nearest first, not including `id` itself
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            doc: self,
            next: self.parent(id),
        }
    }

    pub fn style(&self, id: NodeId) -> &str {
        &self.element(id).style
    }

    pub fn set_style(&mut self, id: NodeId, style: impl Into<String>) {
        self.elements[id.0].style = style.into();
    }

    /// First layer whose label equals `label`, ignoring case
    pub fn find_layer(&self, label: &str) -> Option<NodeId> {
        self.elements()
            .find(|(_, e)| {
                e.is_layer
                    && e.label
                        .as_deref()
                        .is_some_and(|l| l.to_lowercase() == label.to_lowercase())
            })
            .map(|(id, _)| id)
    }

    /// Text lines of a layer: every non-empty `tspan` of every `text` child
    pub fn text_lines(&self, layer: NodeId) -> Vec<String> {
        self.children_named(layer, "text")
            .flat_map(|text| self.children_named(text, "tspan"))
            .map(|tspan| self.element(tspan).text.clone())
            .filter(|line| !line.is_empty())
            .collect()
    }

    fn children_named<'a>(
        &'a self,
        id: NodeId,
        local: &'a str,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.element(id)
            .children
            .iter()
            .copied()
            .filter(move |child| self.element(*child).local_name() == local)
    }
}

/// Upward walk toward the root, see [`Document::ancestors`]
pub struct Ancestors<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.doc.parent(current);
        Some(current)
    }
}

fn resolve_reference(reference: &quick_xml::events::BytesRef<'_>) -> Result<String, DocumentError> {
    let name = String::from_utf8(reference.to_vec())?;
    if let Some(ch) = reference
        .resolve_char_ref()
        .map_err(|e| DocumentError::Reference {
            name: name.clone(),
            message: e.to_string(),
        })?
    {
        return Ok(ch.to_string());
    }
    match quick_xml::escape::resolve_predefined_entity(&name) {
        Some(text) => Ok(text.to_string()),
        None => Err(DocumentError::Reference {
            message: "unknown entity".to_string(),
            name,
        }),
    }
}
