//! Content kinds and text sub-kinds.
//!
//! The numeric tags are part of the persisted record format and must never be
//! renumbered.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// The kind of payload a snippet carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatKind {
    Audio,
    FileList,
    Image,
    Text,
}

impl FormatKind {
    /// All kinds, in tag order.
    pub const ALL: [Self; 4] = [Self::Audio, Self::FileList, Self::Image, Self::Text];

    /// Wire tag for this kind.
    pub const fn tag(self) -> u8 {
        match self {
            Self::Audio => 0,
            Self::FileList => 1,
            Self::Image => 2,
            Self::Text => 3,
        }
    }

    /// Kind for a wire tag, or `None` for an unknown tag.
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::Audio),
            1 => Some(Self::FileList),
            2 => Some(Self::Image),
            3 => Some(Self::Text),
            _ => None,
        }
    }

    /// Format label used when a source declares none.
    ///
    /// Text uses the label of its sub-kind instead.
    pub const fn default_label(self) -> &'static str {
        match self {
            Self::Audio => "WaveAudio",
            Self::FileList => "FileDrop",
            Self::Image => "Bitmap",
            Self::Text => "Text",
        }
    }

    /// Whether content of this kind has a textual preview.
    pub const fn is_previewable(self) -> bool {
        !matches!(self, Self::Image)
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Audio => "Audio",
            Self::FileList => "FileList",
            Self::Image => "Image",
            Self::Text => "Text",
        };
        f.pad(name)
    }
}

/// Flavor of a text snippet, needed to place formatted text back correctly.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum TextSubKind {
    /// Plain ANSI text.
    #[default]
    #[value(name = "plain")]
    PlainText,
    /// Unicode text.
    #[value(name = "unicode")]
    UnicodeText,
    /// Rich Text Format.
    Rtf,
    /// HTML fragment.
    Html,
}

impl TextSubKind {
    pub const fn tag(self) -> u8 {
        match self {
            Self::PlainText => 0,
            Self::UnicodeText => 1,
            Self::Rtf => 2,
            Self::Html => 3,
        }
    }

    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::PlainText),
            1 => Some(Self::UnicodeText),
            2 => Some(Self::Rtf),
            3 => Some(Self::Html),
            _ => None,
        }
    }

    /// Conventional clipboard format name for this sub-kind.
    pub const fn default_label(self) -> &'static str {
        match self {
            Self::PlainText => "Text",
            Self::UnicodeText => "UnicodeText",
            Self::Rtf => "Rich Text Format",
            Self::Html => "HTML Format",
        }
    }
}

impl fmt::Display for TextSubKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PlainText => "PlainText",
            Self::UnicodeText => "UnicodeText",
            Self::Rtf => "Rtf",
            Self::Html => "Html",
        };
        f.pad(name)
    }
}
