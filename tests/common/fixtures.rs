//! Test fixture helpers.
//!
//! Provides temporary snippet directories, sample content and a builder for
//! records laid out byte-for-byte the way the .NET `BinaryWriter` writes them.

use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use oorandom::Rand64;
use snip::content::{ContentVariant, TextSubKind};
use snip::store::SnippetStore;
use tempfile::TempDir;

/// A snippets directory that is removed when dropped.
pub struct TempStore {
    pub dir: TempDir,
}

impl TempStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// A fresh store bound to this directory.
    #[must_use]
    pub fn store(&self) -> SnippetStore {
        SnippetStore::new(self.dir.path())
    }

    /// A fresh store with the directory's records loaded.
    #[must_use]
    pub fn loaded(&self) -> SnippetStore {
        let mut store = self.store();
        let report = store.load().expect("load failed");
        assert!(report.is_clean(), "unexpected failures: {:?}", report.failures);
        store
    }

    /// Write raw bytes as a record file.
    pub fn write_record(&self, file_name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.dir.path().join(file_name);
        std::fs::write(&path, bytes).expect("Failed to write record");
        path
    }
}

/// Small two-color bitmap.
#[must_use]
pub fn checker(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        if (x + y) % 2 == 0 {
            Rgba([250, 10, 10, 255])
        } else {
            Rgba([10, 10, 250, 200])
        }
    })
}

#[must_use]
pub fn greeting() -> ContentVariant {
    ContentVariant::text("text/plain", TextSubKind::PlainText, "hello")
}

/// Builds records in the legacy on-disk layout.
#[derive(Default)]
pub struct LegacyRecord {
    bytes: Vec<u8>,
}

impl LegacyRecord {
    #[must_use]
    pub fn new(kind_tag: u8, label: &str) -> Self {
        Self::default().byte(kind_tag).string(label)
    }

    #[must_use]
    pub fn byte(mut self, value: u8) -> Self {
        self.bytes.push(value);
        self
    }

    #[must_use]
    pub fn int(mut self, value: i32) -> Self {
        self.bytes.extend_from_slice(&value.to_le_bytes());
        self
    }

    #[must_use]
    pub fn raw(mut self, data: &[u8]) -> Self {
        self.bytes.extend_from_slice(data);
        self
    }

    /// 7-bit length prefix followed by UTF-8.
    #[must_use]
    pub fn string(mut self, value: &str) -> Self {
        let mut len = u32::try_from(value.len()).expect("string too long");
        while len >= 0x80 {
            self.bytes.push((len & 0x7F) as u8 | 0x80);
            len >>= 7;
        }
        self.bytes.push(len as u8);
        self.bytes.extend_from_slice(value.as_bytes());
        self
    }

    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.bytes
    }
}

/// Deterministic generator for randomized content.
pub struct Gen {
    rng: Rand64,
}

impl Gen {
    #[must_use]
    pub fn new(seed: u128) -> Self {
        Self {
            rng: Rand64::new(seed),
        }
    }

    pub fn range(&mut self, lo: u64, hi: u64) -> u64 {
        self.rng.rand_range(lo..hi)
    }

    pub fn bytes(&mut self, len: usize) -> Vec<u8> {
        (0..len).map(|_| self.rng.rand_u64() as u8).collect()
    }

    /// Mixed ASCII and multi-byte text, including whitespace and newlines.
    pub fn text(&mut self, max_chars: u64) -> String {
        const ALPHABET: &[char] = &[
            'a', 'Z', '0', ' ', '\n', '\t', 'é', 'ß', '✓', '雪', '🙂', '<', '"', '\\',
        ];
        let len = self.range(0, max_chars + 1);
        (0..len)
            .map(|_| ALPHABET[self.range(0, ALPHABET.len() as u64) as usize])
            .collect()
    }

    pub fn sub_kind(&mut self) -> TextSubKind {
        match self.range(0, 4) {
            0 => TextSubKind::PlainText,
            1 => TextSubKind::UnicodeText,
            2 => TextSubKind::Rtf,
            _ => TextSubKind::Html,
        }
    }

    pub fn bitmap(&mut self) -> RgbaImage {
        let width = self.range(1, 9) as u32;
        let height = self.range(1, 9) as u32;
        let pixels = self.bytes((width * height * 4) as usize);
        RgbaImage::from_raw(width, height, pixels).expect("buffer matches dimensions")
    }
}
