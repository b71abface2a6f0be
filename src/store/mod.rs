//! Named snippet collection with per-file persistence.
//!
//! Each snippet lives in its own record file under the store directory:
//!
//! ```text
//! ~/.local/share/snip/
//! └── snippets/
//!     ├── greeting.bin
//!     └── logo.bin
//! ```
//!
//! Names are matched case-insensitively and files are named after the
//! lowercased name. Save and load work record by record: a bad record is
//! reported and skipped, never fatal to the rest.

mod report;

use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, trace, warn};
use walkdir::WalkDir;

pub use report::{LoadReport, RecordFailure, SaveReport, SavedRecord};

use crate::codec;
use crate::config::SnipConfig;
use crate::content::{ContentVariant, Payload, SnippetSource};
use crate::error::{Result, SnipError};

/// Extension of persisted record files.
pub const RECORD_EXTENSION: &str = "bin";

const RESERVED_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Check a snippet name and return its trimmed form.
pub fn validate_name(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    let invalid = |reason: &str| SnipError::InvalidSnippetName {
        name: name.to_string(),
        reason: reason.to_string(),
    };
    if trimmed.is_empty() {
        return Err(invalid("name is empty"));
    }
    if let Some(c) = trimmed.chars().find(|c| RESERVED_CHARS.contains(c)) {
        return Err(invalid(&format!("contains reserved character '{c}'")));
    }
    if trimmed.chars().any(char::is_control) {
        return Err(invalid("contains control characters"));
    }
    Ok(trimmed)
}

fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

#[derive(Debug)]
struct Entry {
    name: String,
    variant: ContentVariant,
    /// Record file this entry was last loaded from or saved to.
    origin: Option<PathBuf>,
}

/// Named snippets bound to a directory.
#[derive(Debug)]
pub struct SnippetStore {
    dir: PathBuf,
    entries: Vec<Entry>,
    /// Files to delete on the next save, with the name that owned them.
    removed: Vec<(String, PathBuf)>,
    disposed: bool,
}

impl SnippetStore {
    /// Create an empty store bound to `dir`. Nothing touches disk yet.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            entries: Vec::new(),
            removed: Vec::new(),
            disposed: false,
        }
    }

    /// Create an empty store in the configured snippets directory.
    #[instrument(skip_all)]
    pub fn open(config: &SnipConfig) -> Result<Self> {
        let dir = config.snippets_dir()?;
        debug!(dir = %dir.display(), "Opening snippet store");
        Ok(Self::new(dir))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub const fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn ensure_live(&self) -> Result<()> {
        if self.disposed {
            return Err(SnipError::StoreDisposed);
        }
        Ok(())
    }

    fn position(&self, name: &str) -> Option<usize> {
        let key = name_key(name);
        self.entries.iter().position(|e| e.name.to_lowercase() == key)
    }

    /// Record file for `name`.
    pub fn file_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.{RECORD_EXTENSION}", name_key(name)))
    }

    /// Store `variant` under `name`, taking ownership of its payload.
    ///
    /// An existing entry under any casing is released and replaced in place;
    /// the entry takes the new spelling of the name. A released variant fails
    /// with [`SnipError::DataUnavailable`] and an image without pixels with
    /// [`SnipError::UnsupportedPayload`].
    #[instrument(skip(self, variant), fields(kind = %variant.kind()))]
    pub fn create(&mut self, name: &str, mut variant: ContentVariant) -> Result<()> {
        self.ensure_live()?;
        let name = validate_name(name)?.to_string();
        match variant.payload() {
            None => return Err(SnipError::DataUnavailable),
            Some(Payload::Image(image)) if image.width() == 0 || image.height() == 0 => {
                return Err(SnipError::unsupported(format!(
                    "{}x{} image has no pixels",
                    image.width(),
                    image.height()
                )));
            }
            Some(_) => {}
        }
        variant.adopt();

        let target = self.file_path(&name);
        self.removed.retain(|(_, path)| *path != target);

        let entry = Entry {
            name,
            variant,
            origin: None,
        };
        if let Some(i) = self.position(&entry.name) {
            let mut old = std::mem::replace(&mut self.entries[i], entry);
            old.variant.release();
            self.queue_stale_origin(old);
            debug!("Replaced existing snippet");
        } else {
            self.entries.push(entry);
            debug!(count = self.entries.len(), "Added snippet");
        }
        Ok(())
    }

    /// Queue the entry's record file for deletion unless the next save
    /// overwrites it anyway.
    fn queue_stale_origin(&mut self, entry: Entry) {
        let Some(origin) = entry.origin else {
            return;
        };
        let keep = self
            .entries
            .iter()
            .any(|e| self.file_path(&e.name) == origin);
        if !keep {
            debug!(path = %origin.display(), "Queued stale record for deletion");
            self.removed.push((entry.name, origin));
        }
    }

    /// Capture from `source` and store the result under `name`.
    #[instrument(skip(self, source))]
    pub fn create_from_source<S: SnippetSource + ?Sized>(
        &mut self,
        name: &str,
        source: &mut S,
    ) -> Result<()> {
        self.ensure_live()?;
        validate_name(name)?;
        let descriptor = source.fetch()?.ok_or(SnipError::NoContentAvailable)?;
        let variant = ContentVariant::from_descriptor(descriptor)?;
        self.create(name, variant)
    }

    /// Remove and release the entry for `name`.
    ///
    /// Returns whether an entry existed. The record file the entry came
    /// from, nested or not, is deleted on the next [`save`](Self::save).
    #[instrument(skip(self))]
    pub fn remove(&mut self, name: &str) -> bool {
        if self.disposed {
            return false;
        }
        let Some(i) = self.position(name) else {
            debug!("Snippet not found for removal");
            return false;
        };
        let Entry {
            name: stored,
            mut variant,
            origin,
        } = self.entries.remove(i);
        variant.release();
        let path = origin.unwrap_or_else(|| self.file_path(&stored));
        self.removed.push((stored, path));
        true
    }

    pub fn get(&self, name: &str) -> Option<&ContentVariant> {
        self.position(name).map(|i| &self.entries[i].variant)
    }

    /// Stored spelling of the name together with the entry.
    pub fn entry(&self, name: &str) -> Option<(&str, &ContentVariant)> {
        self.position(name).map(|i| {
            let entry = &self.entries[i];
            (entry.name.as_str(), &entry.variant)
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ContentVariant)> {
        self.entries.iter().map(|e| (e.name.as_str(), &e.variant))
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose name contains `query`, ignoring case.
    pub fn filter(&self, query: &str) -> Vec<(&str, &ContentVariant)> {
        let query = query.to_lowercase();
        self.iter()
            .filter(|(name, _)| name.to_lowercase().contains(&query))
            .collect()
    }

    /// Write every entry to its record file.
    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    pub fn save(&mut self) -> Result<SaveReport> {
        self.ensure_live()?;
        fs::create_dir_all(&self.dir)?;
        let mut report = SaveReport::default();

        for (name, path) in std::mem::take(&mut self.removed) {
            match fs::remove_file(&path) {
                Ok(()) => {
                    debug!(path = %path.display(), "Deleted record of removed snippet");
                    report.removed.push(path);
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => report.failures.push(RecordFailure {
                    name,
                    path,
                    error: e.into(),
                }),
            }
        }

        for entry in &mut self.entries {
            let path = self.dir.join(format!("{}.{RECORD_EXTENSION}", name_key(&entry.name)));
            match write_record(&path, &entry.variant) {
                Ok(bytes) => {
                    trace!(name = %entry.name, bytes, "Wrote record");
                    entry.origin = Some(path.clone());
                    report.written.push(SavedRecord {
                        name: entry.name.clone(),
                        path,
                        bytes,
                    });
                }
                Err(error) => {
                    warn!(name = %entry.name, error = %error, "Failed to save snippet");
                    report.failures.push(RecordFailure {
                        name: entry.name.clone(),
                        path,
                        error,
                    });
                }
            }
        }

        info!(
            written = report.written.len(),
            bytes = report.total_bytes(),
            failures = report.failures.len(),
            "Snippets saved"
        );
        Ok(report)
    }

    /// Replace the in-memory entries with the records on disk.
    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    pub fn load(&mut self) -> Result<LoadReport> {
        self.ensure_live()?;
        self.clear();
        self.removed.clear();
        let mut report = LoadReport::default();

        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
            debug!("Created empty snippets directory");
            return Ok(report);
        }

        let walker = WalkDir::new(&self.dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable directory entry");
                    continue;
                }
            };
            let path = entry.path();
            let is_record = path.extension() == Some(OsStr::new(RECORD_EXTENSION));
            if !entry.file_type().is_file() || !is_record {
                continue;
            }
            let Some(name) = path.file_stem().and_then(OsStr::to_str) else {
                warn!(path = %path.display(), "Skipping record with non UTF-8 name");
                continue;
            };

            match read_record(path) {
                Ok(Some(variant)) => {
                    trace!(name, kind = %variant.kind(), "Loaded record");
                    self.insert_loaded(name, variant, path);
                    report.loaded.push(name.to_string());
                }
                Ok(None) => {
                    debug!(path = %path.display(), "Record has no salvageable content");
                    report.skipped.push(path.to_path_buf());
                }
                Err(error) => {
                    warn!(path = %path.display(), error = %error, "Failed to load snippet");
                    report.failures.push(RecordFailure {
                        name: name.to_string(),
                        path: path.to_path_buf(),
                        error,
                    });
                }
            }
        }

        info!(
            loaded = report.loaded.len(),
            skipped = report.skipped.len(),
            failures = report.failures.len(),
            "Snippets loaded"
        );
        Ok(report)
    }

    fn insert_loaded(&mut self, name: &str, variant: ContentVariant, path: &Path) {
        let entry = Entry {
            name: name.to_string(),
            variant,
            origin: Some(path.to_path_buf()),
        };
        if let Some(i) = self.position(name) {
            let mut old = std::mem::replace(&mut self.entries[i], entry);
            old.variant.release();
        } else {
            self.entries.push(entry);
        }
    }

    fn clear(&mut self) {
        for mut entry in self.entries.drain(..) {
            entry.variant.release();
        }
    }

    /// Release every entry and refuse further use. Idempotent.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        let count = self.entries.len();
        self.clear();
        self.removed.clear();
        debug!(count, "Snippet store disposed");
    }
}

impl Drop for SnippetStore {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn write_record(path: &Path, variant: &ContentVariant) -> Result<usize> {
    let bytes = codec::encode_to_vec(variant)?;
    if bytes.is_empty() {
        return Err(SnipError::DataUnavailable);
    }
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }
    fs::write(path, &bytes)?;
    Ok(bytes.len())
}

fn read_record(path: &Path) -> Result<Option<ContentVariant>> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            SnipError::RecordNotFound {
                path: path.display().to_string(),
            }
        } else {
            SnipError::Io(e)
        }
    })?;
    codec::decode(&mut BufReader::new(file))
}
