//! Randomized round-trips through the record codec.

use snip::codec::{decode_slice, encode, encode_to_vec};
use snip::content::{ContentVariant, FormatKind, Payload, TextSubKind};

use crate::common::fixtures::Gen;
use crate::common::init_test_logging;

const CASES: u64 = 64;

fn roundtrip(variant: &ContentVariant) -> ContentVariant {
    let bytes = encode_to_vec(variant).expect("encode failed");
    decode_slice(&bytes)
        .expect("decode failed")
        .expect("known kind decodes to a variant")
}

fn random_variant(g: &mut Gen) -> ContentVariant {
    let label = if g.range(0, 4) == 0 {
        String::new()
    } else {
        g.text(20)
    };
    match g.range(0, 4) {
        0 => ContentVariant::text(label, g.sub_kind(), g.text(300)),
        1 => {
            let count = g.range(0, 6);
            let paths: Vec<String> = (0..count).map(|_| g.text(40)).collect();
            ContentVariant::file_list(label, paths)
        }
        2 => ContentVariant::image(label, g.bitmap()),
        _ => {
            let len = g.range(0, 5000) as usize;
            ContentVariant::audio(label, g.bytes(len))
        }
    }
}

#[test]
fn test_random_variants_roundtrip() {
    init_test_logging();
    let mut g = Gen::new(0x5eed_cafe);
    for case in 0..CASES {
        let original = random_variant(&mut g);
        let decoded = roundtrip(&original);
        assert_eq!(decoded, original, "case {case} did not survive");
        assert!(decoded.owns_payload(), "decoded variants own their payload");
    }
}

#[test]
fn test_kind_tag_is_first_byte() {
    let cases = [
        (ContentVariant::audio("WaveAudio", vec![1]), 0u8),
        (ContentVariant::file_list("FileDrop", ["a"]), 1),
        (ContentVariant::image("Bitmap", image::RgbaImage::new(1, 1)), 2),
        (ContentVariant::text("Text", TextSubKind::Rtf, "{\\rtf1}"), 3),
    ];
    for (variant, tag) in &cases {
        let bytes = encode_to_vec(variant).unwrap();
        assert_eq!(bytes[0], *tag, "{}", variant.kind());
        assert_eq!(FormatKind::from_tag(*tag), Some(variant.kind()));
    }
}

#[test]
fn test_unknown_tag_decodes_to_nothing() {
    for tag in [4u8, 9, 0x7F, 0xFF] {
        let bytes = [tag, 4, b'J', b'u', b'n', b'k'];
        assert!(decode_slice(&bytes).unwrap().is_none(), "tag {tag}");
    }
}

#[test]
fn test_long_text_uses_multibyte_length() {
    let text = "x".repeat(20_000);
    let variant = ContentVariant::text("Text", TextSubKind::UnicodeText, text.clone());
    let bytes = encode_to_vec(&variant).unwrap();
    // tag, label "Text", sub-kind, then a three-byte length for 20000.
    assert_eq!(&bytes[6..10], &[1, 0xA0, 0x9C, 0x01]);
    match roundtrip(&variant).payload() {
        Some(Payload::Text { text: decoded, .. }) => assert_eq!(decoded, &text),
        other => panic!("unexpected payload {other:?}"),
    }
}

#[test]
fn test_encode_reports_written_bytes() {
    let variant = ContentVariant::file_list("FileDrop", ["C:\\a.txt", "C:\\b.txt"]);
    let mut sink = Vec::new();
    let written = encode(&variant, &mut sink).unwrap();
    assert_eq!(written, sink.len());
    assert_eq!(sink, encode_to_vec(&variant).unwrap());
}

#[test]
fn test_image_pixels_survive_png() {
    let mut g = Gen::new(7);
    let bitmap = g.bitmap();
    let decoded = roundtrip(&ContentVariant::image("PNG", bitmap.clone()));
    match decoded.payload() {
        Some(Payload::Image(image)) => {
            assert_eq!(image.width(), bitmap.width());
            assert_eq!(image.pixels(), bitmap.as_raw().as_slice());
        }
        other => panic!("unexpected payload {other:?}"),
    }
}
