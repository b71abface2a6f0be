//! Records laid out the way the .NET `BinaryWriter` writes them.

use snip::codec::decode_slice;
use snip::content::{FormatKind, Payload, TextSubKind};
use snip::error::SnipError;
use snip::image_ops;

use crate::common::fixtures::{LegacyRecord, TempStore, checker};
use crate::common::init_test_logging;

#[test]
fn test_reads_legacy_text() {
    let bytes = LegacyRecord::new(3, "HTML Format")
        .byte(3)
        .string("<p>caf\u{e9}</p>")
        .build();
    let variant = decode_slice(&bytes).unwrap().unwrap();
    assert_eq!(variant.kind(), FormatKind::Text);
    assert_eq!(variant.format_label(), "HTML Format");
    assert_eq!(variant.text_sub_kind(), Some(TextSubKind::Html));
    assert_eq!(variant.preview_text().unwrap(), "<p>caf\u{e9}</p>");
}

#[test]
fn test_reads_legacy_file_list_in_order() {
    let bytes = LegacyRecord::new(1, "FileDrop")
        .int(3)
        .string("C:\\z.txt")
        .string("C:\\a.txt")
        .string("D:\\Music\\m.wav")
        .build();
    let variant = decode_slice(&bytes).unwrap().unwrap();
    match variant.payload() {
        Some(Payload::FileList(paths)) => {
            assert_eq!(paths, &["C:\\z.txt", "C:\\a.txt", "D:\\Music\\m.wav"]);
        }
        other => panic!("unexpected payload {other:?}"),
    }
}

#[test]
fn test_reads_legacy_audio() {
    let wav = b"RIFF\x24\x00\x00\x00WAVEfmt ";
    let bytes = LegacyRecord::new(0, "WaveAudio")
        .int(wav.len() as i32)
        .raw(wav)
        .build();
    let variant = decode_slice(&bytes).unwrap().unwrap();
    match variant.payload() {
        Some(Payload::Audio(clip)) => assert_eq!(clip.bytes(), wav),
        other => panic!("unexpected payload {other:?}"),
    }
}

#[test]
fn test_reads_legacy_image() {
    let png = image_ops::encode_png(&checker(4, 3)).unwrap();
    let bytes = LegacyRecord::new(2, "Bitmap")
        .int(png.len() as i32)
        .raw(&png)
        .build();
    let variant = decode_slice(&bytes).unwrap().unwrap();
    let summary = variant.summary(60);
    assert_eq!((summary.width, summary.height), (Some(4), Some(3)));
}

fn assert_truncated(bytes: &[u8], expected_field: &str) {
    match decode_slice(bytes) {
        Err(SnipError::TruncatedRecord { field, .. }) => assert_eq!(field, expected_field),
        other => panic!("expected truncation in {expected_field}, got {other:?}"),
    }
}

#[test]
fn test_truncated_records() {
    init_test_logging();
    let audio = LegacyRecord::new(0, "WaveAudio").int(100).raw(&[0; 40]).build();
    assert_truncated(&audio, "audio");

    let image = LegacyRecord::new(2, "Bitmap").int(64).raw(&[0x89, b'P']).build();
    assert_truncated(&image, "image");

    let files = LegacyRecord::new(1, "FileDrop").int(2).string("C:\\a.txt").build();
    assert_truncated(&files, "file path");

    let label = LegacyRecord::default().byte(3).byte(10).raw(b"text").build();
    assert_truncated(&label, "format label");
}

#[test]
fn test_negative_length_is_malformed() {
    let bytes = LegacyRecord::new(0, "WaveAudio").int(-1).build();
    assert!(matches!(
        decode_slice(&bytes),
        Err(SnipError::MalformedRecord { .. })
    ));
}

#[test]
fn test_unknown_text_sub_kind_is_malformed() {
    let bytes = LegacyRecord::new(3, "Text").byte(9).string("x").build();
    assert!(matches!(
        decode_slice(&bytes),
        Err(SnipError::MalformedRecord { .. })
    ));
}

#[test]
fn test_store_loads_legacy_directory() {
    init_test_logging();
    let temp = TempStore::new();
    temp.write_record(
        "greeting.bin",
        &LegacyRecord::new(3, "Text").byte(0).string("hello").build(),
    );
    temp.write_record(
        "docs.bin",
        &LegacyRecord::new(1, "FileDrop").int(1).string("C:\\r.doc").build(),
    );
    temp.write_record("notes.txt", b"not a record");

    let store = temp.loaded();
    assert_eq!(store.names(), ["docs", "greeting"]);
    assert_eq!(store.get("Greeting").unwrap().preview_text().unwrap(), "hello");
}
