//! Primitive readers and writers for the record layout.
//!
//! Integers are little-endian. Strings carry a 7-bit encoded byte length
//! followed by UTF-8 bytes.

use std::io::{self, ErrorKind, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{Result, SnipError};

/// Longest 7-bit encoding of a 32-bit length.
const MAX_7BIT_BYTES: u32 = 5;

fn truncated(field: &'static str, expected: u64) -> impl FnOnce(io::Error) -> SnipError {
    move |e| {
        if e.kind() == ErrorKind::UnexpectedEof {
            SnipError::TruncatedRecord { field, expected }
        } else {
            SnipError::Io(e)
        }
    }
}

pub fn read_u8<R: Read + ?Sized>(reader: &mut R, field: &'static str) -> Result<u8> {
    reader.read_u8().map_err(truncated(field, 1))
}

/// Read a signed 32-bit length or count, rejecting negative values.
pub fn read_len<R: Read + ?Sized>(reader: &mut R, field: &'static str) -> Result<u64> {
    let value = reader
        .read_i32::<LittleEndian>()
        .map_err(truncated(field, 4))?;
    u64::try_from(value)
        .map_err(|_| SnipError::malformed(format!("negative {field} length {value}")))
}

/// Read exactly `len` bytes.
///
/// The buffer grows with the bytes actually present, so a corrupt length
/// cannot force a large allocation.
pub fn read_bytes<R: Read + ?Sized>(
    reader: &mut R,
    len: u64,
    field: &'static str,
) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    reader.take(len).read_to_end(&mut buf)?;
    let got = buf.len() as u64;
    if got < len {
        return Err(SnipError::TruncatedRecord {
            field,
            expected: len - got,
        });
    }
    Ok(buf)
}

#[allow(clippy::cast_possible_wrap)]
pub fn read_7bit_len<R: Read + ?Sized>(reader: &mut R, field: &'static str) -> Result<u64> {
    let mut value: u32 = 0;
    for i in 0..MAX_7BIT_BYTES {
        let byte = read_u8(reader, field)?;
        if i == MAX_7BIT_BYTES - 1 && byte > 0x0F {
            return Err(SnipError::malformed(format!("{field} length prefix overflows")));
        }
        value |= u32::from(byte & 0x7F) << (7 * i);
        if byte & 0x80 == 0 {
            if i32::try_from(value).is_err() {
                return Err(SnipError::malformed(format!(
                    "negative {field} length {}",
                    value as i32
                )));
            }
            return Ok(u64::from(value));
        }
    }
    Err(SnipError::malformed(format!("{field} length prefix overflows")))
}

pub fn read_string<R: Read + ?Sized>(reader: &mut R, field: &'static str) -> Result<String> {
    let len = read_7bit_len(reader, field)?;
    let bytes = read_bytes(reader, len, field)?;
    String::from_utf8(bytes).map_err(|e| SnipError::malformed(format!("{field} is not UTF-8: {e}")))
}

/// Convert an in-memory length to the signed 32-bit wire form.
pub fn wire_len(len: usize, field: &str) -> Result<i32> {
    i32::try_from(len).map_err(|_| {
        SnipError::unsupported(format!("{field} of {len} bytes is too large to persist"))
    })
}

pub fn write_len<W: Write + ?Sized>(writer: &mut W, len: usize, field: &str) -> Result<()> {
    writer.write_i32::<LittleEndian>(wire_len(len, field)?)?;
    Ok(())
}

pub fn write_7bit_len<W: Write + ?Sized>(writer: &mut W, len: usize, field: &str) -> Result<()> {
    let mut value = wire_len(len, field)?.unsigned_abs();
    while value >= 0x80 {
        writer.write_u8((value as u8 & 0x7F) | 0x80)?;
        value >>= 7;
    }
    writer.write_u8(value as u8)?;
    Ok(())
}

pub fn write_string<W: Write + ?Sized>(writer: &mut W, value: &str, field: &str) -> Result<()> {
    write_7bit_len(writer, value.len(), field)?;
    writer.write_all(value.as_bytes())?;
    Ok(())
}
