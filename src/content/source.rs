//! Boundary with content sources.
//!
//! A source hands over a [`PayloadDescriptor`]: data it has already
//! classified, plus the format identifier it was offered under. The core only
//! checks that the descriptor is unambiguous and turns it into a
//! [`ContentVariant`].

use std::fmt;
use std::io::Read;

use image::RgbaImage;
use tracing::{debug, instrument};

use super::kind::TextSubKind;
use super::variant::{AudioClip, ContentVariant, ImageData, Payload};
use crate::error::{Result, SnipError};

/// Something that can supply the content to capture.
pub trait SnippetSource {
    /// Fetch the current content; `None` when nothing is available.
    fn fetch(&mut self) -> Result<Option<PayloadDescriptor>>;
}

struct RawImage {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

struct AudioSource {
    reader: Box<dyn Read>,
    nominal_len: Option<u64>,
}

/// Classified content offered by a source.
#[derive(Default)]
pub struct PayloadDescriptor {
    format: String,
    text: Option<String>,
    text_sub_kind: Option<TextSubKind>,
    files: Option<Vec<String>>,
    image: Option<RawImage>,
    audio: Option<AudioSource>,
}

impl PayloadDescriptor {
    /// Start a descriptor for data offered under `format`.
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_text_sub_kind(mut self, sub_kind: TextSubKind) -> Self {
        self.text_sub_kind = Some(sub_kind);
        self
    }

    #[must_use]
    pub fn with_files<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files = Some(paths.into_iter().map(Into::into).collect());
        self
    }

    /// Raw RGBA8 pixels, row-major.
    #[must_use]
    pub fn with_image(mut self, width: u32, height: u32, rgba: Vec<u8>) -> Self {
        self.image = Some(RawImage {
            width,
            height,
            rgba,
        });
        self
    }

    #[must_use]
    pub fn with_bitmap(self, bitmap: RgbaImage) -> Self {
        let (width, height) = bitmap.dimensions();
        self.with_image(width, height, bitmap.into_raw())
    }

    /// Audio as a readable stream; `nominal_len` is what the source claims.
    #[must_use]
    pub fn with_audio<R: Read + 'static>(mut self, reader: R, nominal_len: Option<u64>) -> Self {
        self.audio = Some(AudioSource {
            reader: Box::new(reader),
            nominal_len,
        });
        self
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    fn populated_kinds(&self) -> Vec<&'static str> {
        let mut kinds = Vec::new();
        if self.text.is_some() {
            kinds.push("text");
        }
        if self.files.is_some() {
            kinds.push("files");
        }
        if self.image.is_some() {
            kinds.push("image");
        }
        if self.audio.is_some() {
            kinds.push("audio");
        }
        kinds
    }

    /// Build the variant. The result does not own its payload yet.
    #[instrument(skip_all, fields(format = %self.format))]
    pub fn into_variant(self) -> Result<ContentVariant> {
        let kinds = self.populated_kinds();
        match kinds.len() {
            0 => return Err(SnipError::unsupported("descriptor carries no data")),
            1 => {}
            _ => {
                return Err(SnipError::unsupported(format!(
                    "descriptor is ambiguous: {}",
                    kinds.join(", ")
                )));
            }
        }
        if self.text_sub_kind.is_some() && self.text.is_none() {
            return Err(SnipError::unsupported(
                "text sub-kind given for non-text data",
            ));
        }

        let Self {
            format,
            text,
            text_sub_kind,
            files,
            image,
            audio,
        } = self;

        let payload = if let Some(text) = text {
            Payload::Text {
                sub_kind: text_sub_kind.unwrap_or_default(),
                text,
            }
        } else if let Some(files) = files {
            if files.is_empty() {
                return Err(SnipError::unsupported("file list is empty"));
            }
            Payload::FileList(files)
        } else if let Some(raw) = image {
            if raw.width == 0 || raw.height == 0 {
                return Err(SnipError::unsupported(format!(
                    "{}x{} image has no pixels",
                    raw.width, raw.height
                )));
            }
            let expected = u64::from(raw.width) * u64::from(raw.height) * 4;
            let actual = raw.rgba.len() as u64;
            let data = ImageData::from_raw(raw.width, raw.height, raw.rgba).ok_or_else(|| {
                SnipError::unsupported(format!(
                    "{}x{} image needs {expected} pixel bytes, got {actual}",
                    raw.width, raw.height
                ))
            })?;
            Payload::Image(data)
        } else if let Some(mut source) = audio {
            Payload::Audio(AudioClip::read_from(
                source.reader.as_mut(),
                source.nominal_len,
            ))
        } else {
            return Err(SnipError::unsupported("descriptor carries no data"));
        };

        let variant = ContentVariant::new(format, payload);
        debug!(kind = %variant.kind(), "Captured content");
        Ok(variant)
    }
}

impl fmt::Debug for PayloadDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PayloadDescriptor")
            .field("format", &self.format)
            .field("kinds", &self.populated_kinds())
            .field("text_sub_kind", &self.text_sub_kind)
            .finish_non_exhaustive()
    }
}

impl ContentVariant {
    /// Build a variant from a source descriptor.
    pub fn from_descriptor(descriptor: PayloadDescriptor) -> Result<Self> {
        descriptor.into_variant()
    }
}
