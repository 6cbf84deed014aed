//! Page export with a stand-in renderer

use std::cell::{Cell, RefCell};
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::tempdir;

use inkslide::export::{render_pages, ExportError, ExportFormat, PageRenderer, SlideFiles};
use inkslide::{DirectiveConfig, Document, Presentation};

const TALK: &str = include_str!("fixtures/talk.svg");

/// Copies each slide SVG to its page path and records the calls
#[derive(Default)]
struct CopyRenderer {
    calls: RefCell<Vec<(PathBuf, PathBuf)>>,
}

impl PageRenderer for CopyRenderer {
    fn render(&self, svg: &Path, page: &Path, _format: ExportFormat) -> Result<(), ExportError> {
        fs::copy(svg, page).map_err(|source| ExportError::Io {
            path: svg.to_path_buf(),
            source,
        })?;
        self.calls
            .borrow_mut()
            .push((svg.to_path_buf(), page.to_path_buf()));
        Ok(())
    }
}

struct FailingRenderer;

/// Renders the first `pages` slides, then fails
struct FailAfter {
    pages: usize,
    rendered: Cell<usize>,
}

impl PageRenderer for FailAfter {
    fn render(&self, svg: &Path, page: &Path, _format: ExportFormat) -> Result<(), ExportError> {
        if self.rendered.get() == self.pages {
            return Err(ExportError::Spawn {
                program: "inkscape".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "crashed"),
            });
        }
        self.rendered.set(self.rendered.get() + 1);
        fs::copy(svg, page).map_err(|source| ExportError::Io {
            path: svg.to_path_buf(),
            source,
        })?;
        Ok(())
    }
}

impl PageRenderer for FailingRenderer {
    fn render(&self, _svg: &Path, _page: &Path, _format: ExportFormat) -> Result<(), ExportError> {
        Err(ExportError::Spawn {
            program: "inkscape".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not installed"),
        })
    }
}

fn presentation() -> Presentation {
    let doc = Document::parse(TALK).unwrap();
    Presentation::from_document(doc, &DirectiveConfig::default())
        .unwrap()
        .unwrap()
}

#[test]
fn test_pages_written_in_slide_order() {
    let dir = tempdir().unwrap();
    let files = SlideFiles::for_output(&dir.path().join("talk.pdf"));
    let renderer = CopyRenderer::default();
    let mut presentation = presentation();

    let pages = render_pages(&mut presentation, &files, &renderer, ExportFormat::Pdf)
        .expect("Should export");

    assert_eq!(
        pages,
        (0..4)
            .map(|i| dir.path().join(format!("talk.p{}.pdf", i)))
            .collect::<Vec<_>>()
    );
    for (i, page) in pages.iter().enumerate() {
        let content = fs::read_to_string(page).unwrap();
        let expected = presentation.render_slide(i).unwrap();
        assert_eq!(content, expected);
    }

    // Intermediate SVGs are removed
    for (svg, _) in renderer.calls.borrow().iter() {
        assert!(!svg.exists(), "{} should be removed", svg.display());
    }
}

#[test]
fn test_png_pages_are_padded() {
    let dir = tempdir().unwrap();
    let files = SlideFiles::for_output(&dir.path().join("talk.pdf"));
    let renderer = CopyRenderer::default();
    let mut presentation = presentation();

    let pages = render_pages(&mut presentation, &files, &renderer, ExportFormat::Png)
        .expect("Should export");
    assert_eq!(pages[3], dir.path().join(".inkslide_talk.p00003.png"));
}

#[test]
fn test_renderer_failure_stops_export() {
    let dir = tempdir().unwrap();
    let files = SlideFiles::for_output(&dir.path().join("talk.pdf"));
    let mut presentation = presentation();

    let err = render_pages(&mut presentation, &files, &FailingRenderer, ExportFormat::Pdf)
        .unwrap_err();
    assert!(matches!(err, ExportError::Spawn { .. }));
    // The slide SVG is cleaned up even when rendering fails
    assert!(!files.svg(0).exists());
}

#[test]
fn test_failed_export_removes_written_pages() {
    let dir = tempdir().unwrap();
    let files = SlideFiles::for_output(&dir.path().join("talk.pdf"));
    let renderer = FailAfter {
        pages: 2,
        rendered: Cell::new(0),
    };
    let mut presentation = presentation();

    let err = render_pages(&mut presentation, &files, &renderer, ExportFormat::Pdf).unwrap_err();
    assert!(matches!(err, ExportError::Spawn { .. }));
    assert_eq!(renderer.rendered.get(), 2);
    let left: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert!(left.is_empty(), "{:?} left behind", left);
}
