//! Page export
//!
//! Every slide is written to a temporary SVG file next to the output,
//! rendered to a page (PDF or PNG) by Inkscape, and the pages are then
//! joined into a single PDF with whichever joining tool is installed.

pub mod inkscape;
pub mod join;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use serde::Deserialize;
use thiserror::Error;

use crate::{Presentation, SlideError};

pub use inkscape::Inkscape;
pub use join::Joiner;

/// Errors that can occur while exporting pages
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("'{program}' failed ({status}): {stderr}")]
    Failed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("cannot access '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Slide(#[from] SlideError),
}

impl ExportError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Page file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Pdf,
    Png,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Png => "png",
        }
    }
}

/// Configuration options for page export
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Format of the per-slide pages
    pub format: ExportFormat,

    /// Resolution for PNG pages and for joining them
    pub dpi: u32,

    /// Inkscape executable
    pub inkscape: PathBuf,

    /// Keep the per-slide pages after joining
    pub keep_pages: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::Pdf,
            dpi: 180,
            inkscape: PathBuf::from("inkscape"),
            keep_pages: false,
        }
    }
}

impl ExportConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page format
    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the PNG resolution
    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    /// Set the Inkscape executable
    pub fn with_inkscape(mut self, program: impl Into<PathBuf>) -> Self {
        self.inkscape = program.into();
        self
    }

    /// Set whether pages survive joining
    pub fn with_keep_pages(mut self, keep: bool) -> Self {
        self.keep_pages = keep;
        self
    }
}

/// Turns one SVG file into one page file
pub trait PageRenderer {
    fn render(&self, svg: &Path, page: &Path, format: ExportFormat) -> Result<(), ExportError>;
}

/// Names of the intermediate files of one run
#[derive(Debug, Clone)]
pub struct SlideFiles {
    dir: PathBuf,
    stem: String,
}

impl SlideFiles {
    /// Intermediate files live next to `output` and share its stem
    pub fn for_output(output: &Path) -> Self {
        let dir = match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let stem = output
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "slides".to_string());
        Self { dir, stem }
    }

    pub fn svg(&self, index: usize) -> PathBuf {
        self.dir.join(format!("{}.p{}.svg", self.stem, index))
    }

    /// PNG pages are hidden and zero-padded so they sort in slide order
    pub fn page(&self, index: usize, format: ExportFormat) -> PathBuf {
        match format {
            ExportFormat::Pdf => self.dir.join(format!("{}.p{}.pdf", self.stem, index)),
            ExportFormat::Png => self
                .dir
                .join(format!(".inkslide_{}.p{:05}.png", self.stem, index)),
        }
    }
}

/// Outcome of an export
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    /// Pages that are left on disk
    pub pages: Vec<PathBuf>,
    /// Joined document, if a joining tool was available
    pub joined: Option<PathBuf>,
}

/// Render every slide of `presentation` to a page, in slide order
///
/// Each slide's SVG is written, rendered and removed before the next slide
/// is resolved. If a slide fails, the pages already written are removed.
pub fn render_pages(
    presentation: &mut Presentation,
    files: &SlideFiles,
    renderer: &dyn PageRenderer,
    format: ExportFormat,
) -> Result<Vec<PathBuf>, ExportError> {
    let mut pages = Vec::with_capacity(presentation.slides().len());

    for index in 0..presentation.slides().len() {
        match render_page(presentation, files, renderer, format, index) {
            Ok(page) => {
                log::info!("Generated page {}.", index + 1);
                pages.push(page);
            }
            Err(err) => {
                discard_pages(&pages);
                return Err(err);
            }
        }
    }

    Ok(pages)
}

fn render_page(
    presentation: &mut Presentation,
    files: &SlideFiles,
    renderer: &dyn PageRenderer,
    format: ExportFormat,
    index: usize,
) -> Result<PathBuf, ExportError> {
    let svg = presentation.render_slide(index)?;
    let svg_path = files.svg(index);
    let page_path = files.page(index, format);

    fs::write(&svg_path, svg).map_err(|e| ExportError::io(&svg_path, e))?;
    let rendered = renderer.render(&svg_path, &page_path, format);
    fs::remove_file(&svg_path).map_err(|e| ExportError::io(&svg_path, e))?;
    rendered?;
    Ok(page_path)
}

/// Best-effort removal of pages from an export that did not finish
fn discard_pages(pages: &[PathBuf]) {
    for page in pages {
        if let Err(e) = fs::remove_file(page) {
            log::warn!("could not remove {}: {}", page.display(), e);
        }
    }
}

/// Render all slides with Inkscape and join them into `output`
pub fn export_presentation(
    presentation: &mut Presentation,
    output: &Path,
    config: &ExportConfig,
) -> Result<ExportSummary, ExportError> {
    let files = SlideFiles::for_output(output);
    let inkscape = Inkscape::new(&config.inkscape, config.dpi);
    let pages = render_pages(presentation, &files, &inkscape, config.format)?;

    let Some(joiner) = Joiner::detect(config.format, config.dpi) else {
        log::warn!(
            "no tool found to join pages; install {}",
            Joiner::candidates(config.format, config.dpi)
                .iter()
                .map(|j| j.program())
                .collect::<Vec<_>>()
                .join(", ")
        );
        return Ok(ExportSummary {
            pages,
            joined: None,
        });
    };

    log::info!("Using '{}' to join pages", joiner.program());
    joiner.join(&pages, output)?;

    if config.keep_pages {
        return Ok(ExportSummary {
            pages,
            joined: Some(output.to_path_buf()),
        });
    }
    for page in &pages {
        fs::remove_file(page).map_err(|e| ExportError::io(page, e))?;
    }
    Ok(ExportSummary {
        pages: Vec::new(),
        joined: Some(output.to_path_buf()),
    })
}

/// Render the whole drawing as a single page
///
/// Used when the drawing has no content layer.
pub fn export_whole(input: &Path, output: &Path, config: &ExportConfig) -> Result<PathBuf, ExportError> {
    let page = output.with_extension(config.format.extension());
    Inkscape::new(&config.inkscape, config.dpi).render(input, &page, config.format)?;
    Ok(page)
}

/// Run a command to completion, hiding its output
pub(crate) fn run(mut command: Command) -> Result<(), ExportError> {
    let program = command.get_program().to_string_lossy().into_owned();
    log::debug!(
        "running {} {}",
        program,
        command
            .get_args()
            .map(|a| a.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    );

    let output = command.output().map_err(|source| ExportError::Spawn {
        program: program.clone(),
        source,
    })?;
    if !output.status.success() {
        return Err(ExportError::Failed {
            program,
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slide_file_names() {
        let files = SlideFiles::for_output(Path::new("out/talk.pdf"));
        assert_eq!(files.svg(0), PathBuf::from("out/talk.p0.svg"));
        assert_eq!(
            files.page(3, ExportFormat::Pdf),
            PathBuf::from("out/talk.p3.pdf")
        );
        assert_eq!(
            files.page(3, ExportFormat::Png),
            PathBuf::from("out/.inkslide_talk.p00003.png")
        );
    }

    #[test]
    fn test_bare_output_uses_current_dir() {
        let files = SlideFiles::for_output(Path::new("talk.pdf"));
        assert_eq!(files.svg(1), PathBuf::from("./talk.p1.svg"));
    }

    #[test]
    fn test_default_config() {
        let config = ExportConfig::default();
        assert_eq!(config.format, ExportFormat::Pdf);
        assert_eq!(config.dpi, 180);
        assert_eq!(config.inkscape, PathBuf::from("inkscape"));
        assert!(!config.keep_pages);
    }

    #[test]
    fn test_builder_pattern() {
        let config = ExportConfig::new()
            .with_format(ExportFormat::Png)
            .with_dpi(90)
            .with_inkscape("/usr/local/bin/inkscape")
            .with_keep_pages(true);
        assert_eq!(config.format, ExportFormat::Png);
        assert_eq!(config.dpi, 90);
        assert_eq!(config.inkscape, PathBuf::from("/usr/local/bin/inkscape"));
        assert!(config.keep_pages);
    }

    #[test]
    fn test_run_reports_spawn_failure() {
        let err = run(Command::new("inkslide-no-such-program")).unwrap_err();
        assert!(matches!(err, ExportError::Spawn { .. }));
    }
}
