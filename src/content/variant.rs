//! The captured-content entity and its payload cases.

use std::fmt;
use std::io::{ErrorKind, Read};

use image::RgbaImage;
use serde::Serialize;
use tracing::{debug, trace, warn};

use super::kind::{FormatKind, TextSubKind};
use super::preview::normalize_preview;
use crate::error::{Result, SnipError};

/// Upper bound on buffer preallocation from a declared stream length.
const MAX_PREALLOC: u64 = 1 << 20;

/// A decoded RGBA8 bitmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    bitmap: RgbaImage,
}

impl ImageData {
    pub const fn new(bitmap: RgbaImage) -> Self {
        Self { bitmap }
    }

    /// Build from raw RGBA8 pixels; `None` if the buffer size does not match.
    pub fn from_raw(width: u32, height: u32, rgba: Vec<u8>) -> Option<Self> {
        RgbaImage::from_raw(width, height, rgba).map(Self::new)
    }

    pub fn width(&self) -> u32 {
        self.bitmap.width()
    }

    pub fn height(&self) -> u32 {
        self.bitmap.height()
    }

    pub const fn bitmap(&self) -> &RgbaImage {
        &self.bitmap
    }

    /// Raw RGBA8 pixel bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        self.bitmap.as_raw()
    }
}

/// A finite buffer of audio bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudioClip {
    bytes: Vec<u8>,
}

impl AudioClip {
    pub const fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Drain a stream into a clip, blocking until EOF.
    ///
    /// A read error ends the clip at the bytes read so far; the clip length is
    /// always the number of bytes actually obtained, never `nominal_len`.
    pub fn read_from<R: Read + ?Sized>(reader: &mut R, nominal_len: Option<u64>) -> Self {
        let capacity = nominal_len.unwrap_or(0).min(MAX_PREALLOC);
        let mut bytes = Vec::with_capacity(usize::try_from(capacity).unwrap_or(0));
        let mut chunk = [0u8; 8192];

        loop {
            match reader.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => bytes.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => {
                    warn!(read = bytes.len(), error = %e, "Audio stream stopped early");
                    break;
                }
            }
        }

        if let Some(nominal) = nominal_len {
            if (bytes.len() as u64) < nominal {
                debug!(read = bytes.len(), nominal, "Audio stream shorter than declared");
            }
        }
        Self { bytes }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Size in MiB, counted in whole KiB.
    #[allow(clippy::cast_precision_loss)]
    pub fn megabytes(&self) -> f64 {
        (self.bytes.len() / 1024) as f64 / 1024.0
    }
}

/// Payload of a snippet: exactly one case per content kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Text { sub_kind: TextSubKind, text: String },
    FileList(Vec<String>),
    Image(ImageData),
    Audio(AudioClip),
}

impl Payload {
    pub const fn kind(&self) -> FormatKind {
        match self {
            Self::Text { .. } => FormatKind::Text,
            Self::FileList(_) => FormatKind::FileList,
            Self::Image(_) => FormatKind::Image,
            Self::Audio(_) => FormatKind::Audio,
        }
    }

    /// Approximate in-memory size of the payload data.
    pub fn size_bytes(&self) -> u64 {
        let size = match self {
            Self::Text { text, .. } => text.len(),
            Self::FileList(paths) => paths.iter().map(String::len).sum(),
            Self::Image(image) => image.pixels().len(),
            Self::Audio(clip) => clip.len(),
        };
        size as u64
    }

    /// Default format label for this payload.
    pub const fn default_label(&self) -> &'static str {
        match self {
            Self::Text { sub_kind, .. } => sub_kind.default_label(),
            other => other.kind().default_label(),
        }
    }
}

/// A borrowed view of a snippet's payload, ready for a sink to place back
/// onto a system output.
#[derive(Debug, Clone, Copy)]
pub struct Materialized<'a> {
    pub format_label: &'a str,
    pub payload: &'a Payload,
}

impl Materialized<'_> {
    pub const fn kind(&self) -> FormatKind {
        self.payload.kind()
    }
}

type ReleaseCallback = Box<dyn FnOnce() + Send>;

/// One captured piece of content with its format metadata.
///
/// An owned variant releases its payload exactly once, either through
/// [`release`](Self::release) or when dropped. Variants built from a source
/// descriptor are not owned until a store adopts them.
pub struct ContentVariant {
    kind: FormatKind,
    format_label: String,
    payload: Option<Payload>,
    owns_payload: bool,
    on_release: Option<ReleaseCallback>,
}

impl ContentVariant {
    /// Build a non-owned variant. An empty label falls back to the payload's
    /// default label.
    pub fn new(format_label: impl Into<String>, payload: Payload) -> Self {
        let mut format_label = format_label.into();
        if format_label.is_empty() {
            format_label = payload.default_label().to_string();
        }
        Self {
            kind: payload.kind(),
            format_label,
            payload: Some(payload),
            owns_payload: false,
            on_release: None,
        }
    }

    pub(crate) fn new_owned(format_label: impl Into<String>, payload: Payload) -> Self {
        let mut variant = Self::new(format_label, payload);
        variant.owns_payload = true;
        variant
    }

    pub fn text(
        format_label: impl Into<String>,
        sub_kind: TextSubKind,
        text: impl Into<String>,
    ) -> Self {
        Self::new(
            format_label,
            Payload::Text {
                sub_kind,
                text: text.into(),
            },
        )
    }

    pub fn file_list<I, S>(format_label: impl Into<String>, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            format_label,
            Payload::FileList(paths.into_iter().map(Into::into).collect()),
        )
    }

    pub fn image(format_label: impl Into<String>, bitmap: RgbaImage) -> Self {
        Self::new(format_label, Payload::Image(ImageData::new(bitmap)))
    }

    pub fn audio(format_label: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::new(format_label, Payload::Audio(AudioClip::from_bytes(bytes)))
    }

    /// Register a callback run once when the owned payload is released.
    pub fn with_release_callback<F>(mut self, callback: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        self.on_release = Some(Box::new(callback));
        self
    }

    pub const fn kind(&self) -> FormatKind {
        self.kind
    }

    pub fn format_label(&self) -> &str {
        &self.format_label
    }

    /// Text sub-kind; `Some` iff this is a text snippet that is still live.
    pub const fn text_sub_kind(&self) -> Option<TextSubKind> {
        match &self.payload {
            Some(Payload::Text { sub_kind, .. }) => Some(*sub_kind),
            _ => None,
        }
    }

    pub const fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }

    pub const fn owns_payload(&self) -> bool {
        self.owns_payload
    }

    pub const fn is_released(&self) -> bool {
        self.payload.is_none()
    }

    /// Take ownership of the payload's resources.
    pub(crate) fn adopt(&mut self) {
        if self.payload.is_some() {
            self.owns_payload = true;
        }
    }

    /// Release the payload if this variant owns it.
    ///
    /// Returns true only for the call that actually released. Releasing a
    /// non-owned or already released variant is a no-op.
    pub fn release(&mut self) -> bool {
        if !self.owns_payload {
            return false;
        }
        let Some(payload) = self.payload.take() else {
            return false;
        };
        self.owns_payload = false;
        trace!(kind = %self.kind, format = %self.format_label, "Releasing snippet payload");
        drop(payload);
        if let Some(callback) = self.on_release.take() {
            callback();
        }
        true
    }

    /// Borrow the payload for placement onto an output.
    pub fn materialize(&self) -> Result<Materialized<'_>> {
        let payload = self.payload.as_ref().ok_or(SnipError::DataUnavailable)?;
        Ok(Materialized {
            format_label: &self.format_label,
            payload,
        })
    }

    pub const fn is_previewable(&self) -> bool {
        self.kind.is_previewable()
    }

    /// Short textual preview of the content.
    pub fn preview_text(&self) -> Result<String> {
        if !self.is_previewable() {
            return Err(SnipError::NoPreviewAvailable {
                kind: self.kind.to_string(),
            });
        }
        match self.payload.as_ref().ok_or(SnipError::DataUnavailable)? {
            Payload::Text { text, .. } => Ok(text.clone()),
            Payload::FileList(paths) => {
                let lines: Vec<String> = paths.iter().map(|p| format!("\t- {p}")).collect();
                Ok(format!("File Collection:\n{}", lines.join("\n")))
            }
            Payload::Audio(clip) => Ok(format!("Audio - {}MB", clip.megabytes())),
            Payload::Image(_) => Err(SnipError::NoPreviewAvailable {
                kind: self.kind.to_string(),
            }),
        }
    }

    /// Listing summary with a single-line preview.
    pub fn summary(&self, preview_chars: usize) -> ContentSummary {
        let (width, height) = match &self.payload {
            Some(Payload::Image(image)) => (Some(image.width()), Some(image.height())),
            _ => (None, None),
        };
        ContentSummary {
            kind: self.kind,
            format_label: self.format_label.clone(),
            text_sub_kind: self.text_sub_kind(),
            size_bytes: self.payload.as_ref().map_or(0, Payload::size_bytes),
            preview: self
                .preview_text()
                .ok()
                .map(|text| normalize_preview(&text, preview_chars)),
            width,
            height,
            released: self.is_released(),
        }
    }
}

impl Drop for ContentVariant {
    fn drop(&mut self) {
        self.release();
    }
}

impl PartialEq for ContentVariant {
    /// Compares observable content; ownership is not part of equality.
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.format_label == other.format_label
            && self.payload == other.payload
    }
}

impl fmt::Debug for ContentVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentVariant")
            .field("kind", &self.kind)
            .field("format_label", &self.format_label)
            .field("payload", &self.payload)
            .field("owns_payload", &self.owns_payload)
            .field("has_release_callback", &self.on_release.is_some())
            .finish()
    }
}

impl fmt::Display for ContentVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Snippet Object ({}, format '{}'", self.kind, self.format_label)?;
        if let Some(sub_kind) = self.text_sub_kind() {
            write!(f, ", text format '{sub_kind}'")?;
        }
        f.write_str(")\n\t")?;
        match &self.payload {
            None => f.write_str("<no data>"),
            Some(Payload::Text { text, .. }) => f.write_str(text),
            Some(Payload::FileList(paths)) => f.write_str(&paths.join(",\n\t")),
            Some(Payload::Image(image)) => {
                write!(f, "{}x{} bitmap", image.width(), image.height())
            }
            Some(Payload::Audio(clip)) => write!(f, "{} bytes of audio", clip.len()),
        }
    }
}

/// Serializable description of a snippet for listings.
#[derive(Debug, Clone, Serialize)]
pub struct ContentSummary {
    pub kind: FormatKind,
    pub format_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_sub_kind: Option<TextSubKind>,
    pub size_bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    pub released: bool,
}
