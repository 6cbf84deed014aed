//! Joining pages into one PDF with external tools

use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

use super::{run, ExportError, ExportFormat};

/// A tool able to combine page files into one PDF
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Joiner {
    /// poppler-utils
    Pdfunite,
    /// pdfjam
    Pdfjoin,
    Pdftk,
    /// ImageMagick, for PNG pages
    Convert { dpi: u32 },
}

impl Joiner {
    pub fn program(&self) -> &'static str {
        match self {
            Joiner::Pdfunite => "pdfunite",
            Joiner::Pdfjoin => "pdfjoin",
            Joiner::Pdftk => "pdftk",
            Joiner::Convert { .. } => "convert",
        }
    }

    /// Tools that can join pages of `format`, in order of preference
    pub fn candidates(format: ExportFormat, dpi: u32) -> Vec<Joiner> {
        match format {
            ExportFormat::Pdf => vec![Joiner::Pdfunite, Joiner::Pdfjoin, Joiner::Pdftk],
            ExportFormat::Png => vec![Joiner::Convert { dpi }],
        }
    }

    /// First installed tool for `format`
    pub fn detect(format: ExportFormat, dpi: u32) -> Option<Joiner> {
        Self::candidates(format, dpi)
            .into_iter()
            .find(|j| find_program(j.program()).is_some())
    }

    /// Command that joins `pages`, in order, into `output`
    pub fn command(&self, pages: &[PathBuf], output: &Path) -> Command {
        let mut command = Command::new(self.program());
        match self {
            Joiner::Pdfunite => {
                command.args(pages).arg(output);
            }
            Joiner::Pdfjoin => {
                command.arg("--outfile").arg(output).args(pages);
            }
            Joiner::Pdftk => {
                command.args(pages).arg("cat").arg("output").arg(output);
            }
            Joiner::Convert { dpi } => {
                command
                    .args(pages)
                    .arg("-resample")
                    .arg(dpi.to_string())
                    .arg(output);
            }
        }
        command
    }

    pub fn join(&self, pages: &[PathBuf], output: &Path) -> Result<(), ExportError> {
        run(self.command(pages, output))
    }
}

/// Locate an executable on `PATH`
pub fn find_program(name: &str) -> Option<PathBuf> {
    let path = env::var_os("PATH")?;
    env::split_paths(&path)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}
