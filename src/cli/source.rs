//! Content source backed by command-line input.

use std::fs::File;
use std::io::{self, ErrorKind, Read};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::SaveArgs;
use crate::content::{PayloadDescriptor, SnippetSource, TextSubKind};
use crate::error::{Result, SnipError};
use crate::image_ops;

/// What the user asked to capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureInput {
    Text(String),
    Stdin,
    Files(Vec<PathBuf>),
    Image(PathBuf),
    Audio(PathBuf),
}

/// Supplies content from command-line arguments, files or standard input.
pub struct CliSource {
    input: CaptureInput,
    text_kind: Option<TextSubKind>,
    label: Option<String>,
    stdin: Box<dyn Read>,
}

impl CliSource {
    pub fn new(input: CaptureInput) -> Self {
        Self {
            input,
            text_kind: None,
            label: None,
            stdin: Box::new(io::stdin()),
        }
    }

    pub fn from_args(args: &SaveArgs) -> Result<Self> {
        let input = if let Some(text) = &args.text {
            CaptureInput::Text(text.clone())
        } else if args.stdin {
            CaptureInput::Stdin
        } else if !args.files.is_empty() {
            CaptureInput::Files(args.files.clone())
        } else if let Some(path) = &args.image {
            CaptureInput::Image(path.clone())
        } else if let Some(path) = &args.audio {
            CaptureInput::Audio(path.clone())
        } else {
            return Err(SnipError::NoContentAvailable);
        };

        let mut source = Self::new(input);
        source.text_kind = args.text_kind;
        source.label.clone_from(&args.label);
        Ok(source)
    }

    #[must_use]
    pub const fn with_text_kind(mut self, kind: TextSubKind) -> Self {
        self.text_kind = Some(kind);
        self
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Read standard input from `reader` instead of the process stdin.
    #[must_use]
    pub fn with_stdin<R: Read + 'static>(mut self, reader: R) -> Self {
        self.stdin = Box::new(reader);
        self
    }

    fn descriptor(&self) -> PayloadDescriptor {
        let mut descriptor = PayloadDescriptor::new(self.label.clone().unwrap_or_default());
        if let Some(kind) = self.text_kind {
            descriptor = descriptor.with_text_sub_kind(kind);
        }
        descriptor
    }
}

fn open_input(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            SnipError::InputNotFound {
                path: path.display().to_string(),
            }
        } else {
            SnipError::Io(e)
        }
    })
}

impl SnippetSource for CliSource {
    fn fetch(&mut self) -> Result<Option<PayloadDescriptor>> {
        let descriptor = self.descriptor();
        let descriptor = match &self.input {
            CaptureInput::Text(text) => descriptor.with_text(text.clone()),
            CaptureInput::Stdin => {
                let mut text = String::new();
                self.stdin.read_to_string(&mut text)?;
                if text.is_empty() {
                    debug!("Standard input was empty");
                    return Ok(None);
                }
                descriptor.with_text(text)
            }
            CaptureInput::Files(paths) => {
                let mut absolute = Vec::with_capacity(paths.len());
                for path in paths {
                    if !path.exists() {
                        warn!(path = %path.display(), "Saving path that does not exist");
                    }
                    absolute.push(std::path::absolute(path)?.to_string_lossy().into_owned());
                }
                descriptor.with_files(absolute)
            }
            CaptureInput::Image(path) => descriptor.with_bitmap(image_ops::load_bitmap(path)?),
            CaptureInput::Audio(path) => {
                let file = open_input(path)?;
                let nominal = file.metadata().ok().map(|m| m.len());
                descriptor.with_audio(file, nominal)
            }
        };
        Ok(Some(descriptor))
    }
}
