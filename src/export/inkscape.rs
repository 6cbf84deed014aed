//! Page rendering through the Inkscape command line

use std::path::{Path, PathBuf};
use std::process::Command;

use super::{run, ExportError, ExportFormat, PageRenderer};

/// An Inkscape executable (1.x command line)
#[derive(Debug, Clone)]
pub struct Inkscape {
    program: PathBuf,
    dpi: u32,
}

impl Inkscape {
    pub fn new(program: impl Into<PathBuf>, dpi: u32) -> Self {
        Self {
            program: program.into(),
            dpi,
        }
    }

    /// Command that exports `svg` to `page`
    pub fn command(&self, svg: &Path, page: &Path, format: ExportFormat) -> Command {
        let mut command = Command::new(&self.program);
        if format == ExportFormat::Png {
            command.arg("-d").arg(self.dpi.to_string());
        }
        command
            .arg(format!("--export-type={}", format.extension()))
            .arg("-o")
            .arg(page)
            .arg(svg);
        command
    }
}

impl PageRenderer for Inkscape {
    fn render(&self, svg: &Path, page: &Path, format: ExportFormat) -> Result<(), ExportError> {
        run(self.command(svg, page, format))
    }
}
