//! Conversion of resolved score nodes into a MusicXML element tree, and
//! everything done with that tree afterwards: serialization, file export
//! and preview in an external program.

pub mod direction;
pub mod element;
pub mod note;
pub mod score;
pub mod writer;

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    process::Command,
};

use log::{debug, info};

pub use element::XmlElement;
pub use writer::{write_document, write_element, DOCTYPE};

use crate::{diagnostics::Diagnostics, error::ScoreResult};

pub trait RendersToXml {
    fn render_xml(&self) -> XmlElement;
}

/// Number without trailing zeros: `120`, `72.5`.
pub(crate) fn format_number(value: f64) -> String {
    match value.fract() == 0.0 {
        true => format!("{}", value as i64),
        false => format!("{value}"),
    }
}

/// Outcome of a score render: the document tree and non-fatal problems
/// found on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub document: XmlElement,
    pub diagnostics: Diagnostics,
    pub pretty_print: bool,
    pub indent: usize,
}
impl Rendered {
    /// Serialize with explicit formatting, ignoring the settings of the
    /// render.
    pub fn to_xml_string(&self, pretty: bool, indent: usize) -> ScoreResult<String> {
        write_document(&self.document, pretty, indent)
    }

    /// Serialize formatted as the export settings asked for.
    pub fn to_formatted_string(&self) -> ScoreResult<String> {
        self.to_xml_string(self.pretty_print, self.indent)
    }

    pub fn export_to_file(&self, path: impl AsRef<Path>) -> ScoreResult<()> {
        let path = path.as_ref();
        fs::write(path, self.to_formatted_string()?)?;
        info!("exported score to {}", path.display());
        Ok(())
    }

    /// Write the score to a kept temporary `.musicxml` file and open it
    /// with the given command line, path appended as the last argument.
    ///
    /// Spaces in the command split arguments unless escaped with `\`.
    /// The program is not waited for.
    ///
    /// # Returns
    /// Path of the temporary file.
    pub fn view_in_software(&self, command: &str) -> ScoreResult<PathBuf> {
        let mut args = split_command(command).into_iter();
        let program = args.next().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "empty viewer command",
            )
        })?;
        let mut file = tempfile::Builder::new()
            .prefix("score-")
            .suffix(".musicxml")
            .tempfile()?;
        file.write_all(self.to_xml_string(true, self.indent.max(1))?.as_bytes())?;
        let (_, path) = file.keep().map_err(std::io::Error::from)?;
        debug!("opening {} with `{program}`", path.display());
        Command::new(program).args(args).arg(&path).spawn()?;
        Ok(path)
    }
}

/// Split on unescaped spaces, `\ ` keeps a literal space.
fn split_command(command: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = command.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&' ') => {
                current.push(' ');
                chars.next();
            }
            ' ' => {
                if !current.is_empty() {
                    parts.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}
