//! Binary record format for persisted snippets.
//!
//! One record per snippet file, little-endian throughout:
//!
//! ```text
//! u8      kind tag        0=Audio 1=FileList 2=Image 3=Text
//! string  format label
//! body:
//!   Text      u8 sub-kind (0=Plain 1=Unicode 2=Rtf 3=Html), string
//!   Audio     i32 N, N raw bytes
//!   FileList  i32 M, M strings
//!   Image     i32 N, N bytes of PNG
//! ```
//!
//! Strings are a 7-bit encoded byte length followed by UTF-8, so records
//! written by the .NET `BinaryWriter` read back unchanged.

mod wire;

use std::io::{Read, Write};

use byteorder::WriteBytesExt;
use tracing::{debug, instrument, trace};

use crate::content::{AudioClip, ContentVariant, FormatKind, ImageData, Payload, TextSubKind};
use crate::error::{Result, SnipError};
use crate::image_ops;

/// Cap on up-front file list capacity; larger lists grow as they are read.
const MAX_PREALLOC_FILES: u64 = 1024;

/// Encode a variant into `writer`, returning the number of bytes written.
///
/// A released variant writes nothing and returns 0.
#[instrument(skip_all, fields(kind = %variant.kind()))]
pub fn encode<W: Write>(variant: &ContentVariant, writer: &mut W) -> Result<usize> {
    let bytes = encode_to_vec(variant)?;
    writer.write_all(&bytes)?;
    Ok(bytes.len())
}

/// Encode a variant into a fresh buffer. Empty for a released variant.
pub fn encode_to_vec(variant: &ContentVariant) -> Result<Vec<u8>> {
    let Some(payload) = variant.payload() else {
        debug!(kind = %variant.kind(), "Skipping encode of released snippet");
        return Ok(Vec::new());
    };

    let mut out = Vec::new();
    out.write_u8(variant.kind().tag())?;
    wire::write_string(&mut out, variant.format_label(), "format label")?;

    match payload {
        Payload::Text { sub_kind, text } => {
            out.write_u8(sub_kind.tag())?;
            wire::write_string(&mut out, text, "text")?;
        }
        Payload::Audio(clip) => {
            wire::write_len(&mut out, clip.len(), "audio")?;
            out.extend_from_slice(clip.bytes());
        }
        Payload::FileList(paths) => {
            wire::write_len(&mut out, paths.len(), "file list")?;
            for path in paths {
                wire::write_string(&mut out, path, "file path")?;
            }
        }
        Payload::Image(image) => {
            let png = image_ops::encode_png(image.bitmap())?;
            wire::write_len(&mut out, png.len(), "image")?;
            out.extend_from_slice(&png);
        }
    }

    trace!(bytes = out.len(), "Encoded snippet");
    Ok(out)
}

/// Decode one record.
///
/// Returns `Ok(None)` for an unknown kind tag. The decoded variant owns its
/// payload.
#[instrument(skip_all)]
pub fn decode<R: Read>(reader: &mut R) -> Result<Option<ContentVariant>> {
    let tag = wire::read_u8(reader, "kind tag")?;
    let Some(kind) = FormatKind::from_tag(tag) else {
        debug!(tag, "Unknown kind tag, nothing to salvage");
        return Ok(None);
    };
    let label = wire::read_string(reader, "format label")?;

    let payload = match kind {
        FormatKind::Text => {
            let sub_tag = wire::read_u8(reader, "text sub-kind")?;
            let sub_kind = TextSubKind::from_tag(sub_tag)
                .ok_or_else(|| SnipError::malformed(format!("unknown text sub-kind {sub_tag}")))?;
            let text = wire::read_string(reader, "text")?;
            Payload::Text { sub_kind, text }
        }
        FormatKind::Audio => {
            let len = wire::read_len(reader, "audio")?;
            let bytes = wire::read_bytes(reader, len, "audio")?;
            Payload::Audio(AudioClip::from_bytes(bytes))
        }
        FormatKind::FileList => {
            let count = wire::read_len(reader, "file list")?;
            let capacity = usize::try_from(count.min(MAX_PREALLOC_FILES)).unwrap_or(0);
            let mut paths = Vec::with_capacity(capacity);
            for _ in 0..count {
                paths.push(wire::read_string(reader, "file path")?);
            }
            Payload::FileList(paths)
        }
        FormatKind::Image => {
            let len = wire::read_len(reader, "image")?;
            let png = wire::read_bytes(reader, len, "image")?;
            Payload::Image(ImageData::new(image_ops::decode_png(&png)?))
        }
    };

    let variant = ContentVariant::new_owned(label, payload);
    trace!(kind = %variant.kind(), format = variant.format_label(), "Decoded snippet");
    Ok(Some(variant))
}

/// Decode one record from a byte slice. Trailing bytes are ignored.
pub fn decode_slice(mut bytes: &[u8]) -> Result<Option<ContentVariant>> {
    decode(&mut bytes)
}
