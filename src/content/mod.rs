//! Captured content: the snippet entity and its payload cases.
//!
//! A [`ContentVariant`] holds exactly one payload (text, file list, image or
//! audio) together with the format label it was captured under.
//!
//! # Ownership
//!
//! Variants built from a [`PayloadDescriptor`] or the direct constructors do
//! not own their payload. A [`SnippetStore`](crate::store::SnippetStore)
//! adopts every variant it stores, and decoded variants are owned from the
//! start. An owned variant releases its payload exactly once, on
//! [`ContentVariant::release`] or on drop.
//!
//! # Usage
//!
//! ```ignore
//! use snip::content::{ContentVariant, PayloadDescriptor, TextSubKind};
//!
//! let snippet = PayloadDescriptor::new("text/plain")
//!     .with_text("hello")
//!     .with_text_sub_kind(TextSubKind::PlainText)
//!     .into_variant()?;
//! println!("{}", snippet.preview_text()?);
//! ```

mod kind;
mod preview;
mod source;
mod variant;

pub use kind::{FormatKind, TextSubKind};
pub use preview::normalize_preview;
pub use source::{PayloadDescriptor, SnippetSource};
pub use variant::{AudioClip, ContentSummary, ContentVariant, ImageData, Materialized, Payload};
