//! inkslide - slides from the layers of an Inkscape drawing
//!
//! A drawing carries a layer labelled `content` holding a text box. Each
//! line of that text box names the layers shown on one slide:
//!
//! ```text
//! background, layer1
//! background, layer2
//! background, layer2 * 0.5, layer3
//! +layer4 * 0.5
//! ```
//!
//! A `* opacity` suffix forces the opacity of a layer, and a line starting
//! with `+` adds to the layers of the line before it.
//!
//! # Example
//!
//! ```rust
//! use inkslide::render;
//!
//! let svg = r#"<svg xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape">
//!   <g inkscape:groupmode="layer" inkscape:label="content">
//!     <text><tspan>title</tspan><tspan>+body</tspan></text>
//!   </g>
//!   <g inkscape:groupmode="layer" inkscape:label="title"/>
//!   <g inkscape:groupmode="layer" inkscape:label="body"/>
//! </svg>"#;
//!
//! let slides = render(svg).unwrap().expect("has a content layer");
//! assert_eq!(slides.len(), 2);
//! ```

pub mod config;
pub mod directive;
pub mod document;
pub mod error;
pub mod export;
pub mod resolve;
pub mod style;

pub use config::DeckConfig;
pub use directive::{parse_directives, DirectiveConfig, SlideSpec};
pub use document::{Document, DocumentError, NodeId};
pub use error::DirectiveError;
pub use resolve::{LayerResolver, ResolveError, SlidePlan};

use thiserror::Error;

/// Errors that can occur while building slides
#[derive(Debug, Error)]
pub enum SlideError {
    /// The drawing could not be read or written
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// The content layer holds invalid directives
    #[error("directive error: {error}")]
    Directive {
        error: DirectiveError,
        /// Directive lines joined with `\n`, the text spans refer to
        directives: String,
    },

    /// A slide could not be resolved against the layers
    #[error("slide {slide}: {error}")]
    Resolve { slide: usize, error: ResolveError },
}

impl SlideError {
    /// Human-readable report, with source context for directive errors
    pub fn report(&self, filename: &str) -> String {
        match self {
            SlideError::Directive { error, directives } => error.format(directives, filename),
            other => other.to_string(),
        }
    }
}

/// A drawing together with its parsed slides
///
/// Layer styles are snapshotted when the presentation is created, so every
/// slide is resolved from the drawing as it was loaded.
#[derive(Debug, Clone)]
pub struct Presentation {
    document: Document,
    resolver: LayerResolver,
    slides: Vec<SlideSpec>,
}

impl Presentation {
    /// Read the slide directives of `document`
    ///
    /// Returns `Ok(None)` when the drawing has no content layer; the caller
    /// then exports the drawing as a whole.
    pub fn from_document(
        document: Document,
        config: &DirectiveConfig,
    ) -> Result<Option<Self>, SlideError> {
        let Some(content) = document.find_layer(&config.content_label) else {
            log::info!("no '{}' layer found", config.content_label);
            return Ok(None);
        };

        let lines = document.text_lines(content);
        let slides = parse_directives(&lines, config).map_err(|error| SlideError::Directive {
            error,
            directives: directive::directive_source(&lines),
        })?;
        log::info!("{} slides", slides.len());

        let resolver = LayerResolver::new(&document);
        Ok(Some(Self {
            document,
            resolver,
            slides,
        }))
    }

    pub fn slides(&self) -> &[SlideSpec] {
        &self.slides
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Resolve slide `index` and serialize the drawing as it now looks
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn render_slide(&mut self, index: usize) -> Result<String, SlideError> {
        let spec = &self.slides[index];
        self.resolver
            .resolve(&mut self.document, spec)
            .map_err(|error| SlideError::Resolve {
                slide: index + 1,
                error,
            })?;
        Ok(self.document.to_svg()?)
    }

    /// Render every slide in order
    pub fn render_all(&mut self) -> Result<Vec<String>, SlideError> {
        (0..self.slides.len())
            .map(|index| self.render_slide(index))
            .collect()
    }

    /// Labels named by some slide that match no label in the drawing
    pub fn unknown_labels(&self) -> Vec<&str> {
        let mut unknown: Vec<&str> = Vec::new();
        for label in self.slides.iter().flat_map(|s| s.labels()) {
            let known = self
                .document
                .elements()
                .any(|(_, e)| e.label.as_deref() == Some(label));
            if !known && !unknown.contains(&label) {
                unknown.push(label);
            }
        }
        unknown
    }

    /// One line per slide, in directive syntax
    pub fn describe(&self) -> String {
        describe_slides(&self.slides)
    }
}

/// Format slides as `slide N: label, label*opacity` lines
pub fn describe_slides(slides: &[SlideSpec]) -> String {
    slides
        .iter()
        .enumerate()
        .map(|(i, spec)| format!("slide {}: {}", i + 1, spec))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render SVG source to one SVG document per slide with default configuration
///
/// Returns `Ok(None)` when the drawing has no content layer.
pub fn render(source: &str) -> Result<Option<Vec<String>>, SlideError> {
    render_with_config(source, &DirectiveConfig::default())
}

/// Render SVG source to one SVG document per slide
pub fn render_with_config(
    source: &str,
    config: &DirectiveConfig,
) -> Result<Option<Vec<String>>, SlideError> {
    let document = Document::parse(source)?;
    match Presentation::from_document(document, config)? {
        Some(mut presentation) => Ok(Some(presentation.render_all()?)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DRAWING: &str = r#"<svg xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape">
  <g inkscape:groupmode="layer" inkscape:label="Content" style="display:inline">
    <text><tspan>background, layer1</tspan><tspan>+layer2*0.5</tspan></text>
  </g>
  <g inkscape:groupmode="layer" inkscape:label="background"/>
  <g inkscape:groupmode="layer" inkscape:label="layer1"/>
  <g inkscape:groupmode="layer" inkscape:label="layer2" style="opacity:1"/>
</svg>"#;

    #[test]
    fn test_render_slides() {
        let slides = render(DRAWING).unwrap().expect("has content layer");
        assert_eq!(slides.len(), 2);
        assert!(slides[0].contains(r#"inkscape:label="layer2" style="display:none;opacity:1""#));
        assert!(slides[1].contains(r#"inkscape:label="layer2" style="display:inline;opacity:0.5""#));
        assert!(slides[1].contains(r#"inkscape:label="layer1" style="display:inline;""#));
    }

    #[test]
    fn test_content_layer_hidden() {
        let slides = render(DRAWING).unwrap().unwrap();
        for svg in &slides {
            assert!(svg.contains(r#"inkscape:label="Content" style="display:none""#));
        }
    }

    #[test]
    fn test_no_content_layer() {
        let result = render(r#"<svg><g inkscape:groupmode="layer" inkscape:label="a"/></svg>"#);
        assert!(matches!(result, Ok(None)));
    }

    #[test]
    fn test_custom_content_label() {
        let config = DirectiveConfig::new().with_content_label("slides");
        let result = render_with_config(DRAWING, &config).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_empty_content_layer() {
        let err = render(
            r#"<svg><g inkscape:groupmode="layer" inkscape:label="content"><text/></g></svg>"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SlideError::Directive {
                error: DirectiveError::EmptyDirectives,
                ..
            }
        ));
    }

    #[test]
    fn test_ambiguous_slide_reports_number() {
        let svg = r#"<svg>
  <g inkscape:groupmode="layer" inkscape:label="content"><text><tspan>a</tspan><tspan>a, b</tspan></text></g>
  <g inkscape:groupmode="layer" inkscape:label="a"><g inkscape:groupmode="layer" inkscape:label="b"/></g>
</svg>"#;
        let err = render(svg).unwrap_err();
        assert!(matches!(err, SlideError::Resolve { slide: 2, .. }));
    }

    #[test]
    fn test_unknown_labels() {
        let svg = DRAWING.replace("+layer2*0.5", "+layer9, layer1");
        let doc = Document::parse(&svg).unwrap();
        let presentation = Presentation::from_document(doc, &DirectiveConfig::default())
            .unwrap()
            .unwrap();
        assert_eq!(presentation.unknown_labels(), vec!["layer9"]);
    }

    #[test]
    fn test_directive_error_report() {
        let svg = DRAWING.replace("+layer2*0.5", "layer2 * half");
        let err = render(&svg).unwrap_err();
        let report = err.report("content");
        assert!(report.contains("invalid opacity 'half'"));
    }
}
