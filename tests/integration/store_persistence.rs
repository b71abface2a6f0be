//! Store save/load cycles against real directories.

use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use snip::content::{
    ContentVariant, FormatKind, Payload, PayloadDescriptor, SnippetSource, TextSubKind,
};
use snip::error::{Result, SnipError};

use crate::common::fixtures::{LegacyRecord, TempStore, checker, greeting};
use crate::common::init_test_logging;

#[test]
fn test_text_survives_restart() {
    init_test_logging();
    let temp = TempStore::new();
    {
        let mut store = temp.store();
        store.create("greeting", greeting()).unwrap();
        let report = store.save().unwrap();
        assert!(report.is_clean());
        assert_eq!(report.written.len(), 1);
        assert!(temp.path().join("greeting.bin").is_file());
    }

    let store = temp.loaded();
    let variant = store.get("GREETING").expect("loaded under any casing");
    assert_eq!(variant.kind(), FormatKind::Text);
    assert_eq!(variant.format_label(), "text/plain");
    assert_eq!(variant.text_sub_kind(), Some(TextSubKind::PlainText));
    assert_eq!(variant.preview_text().unwrap(), "hello");
}

#[test]
fn test_every_kind_survives_restart() {
    let temp = TempStore::new();
    let originals = [
        ("notes", ContentVariant::text("Rich Text Format", TextSubKind::Rtf, "{\\rtf1 hi}")),
        ("docs", ContentVariant::file_list("FileDrop", ["C:\\a.txt", "C:\\b.txt"])),
        ("logo", ContentVariant::image("Bitmap", checker(5, 4))),
        ("chime", ContentVariant::audio("WaveAudio", vec![9; 3000])),
    ];
    {
        let mut store = temp.store();
        for (name, variant) in &originals {
            let payload = variant.payload().unwrap().clone();
            let copy = ContentVariant::new(variant.format_label(), payload);
            store.create(name, copy).unwrap();
        }
        assert_eq!(store.save().unwrap().written.len(), 4);
    }

    let store = temp.loaded();
    assert_eq!(store.len(), 4);
    for (name, variant) in &originals {
        assert_eq!(store.get(name).unwrap(), variant, "{name}");
    }
}

#[test]
fn test_file_order_is_preserved() {
    let temp = TempStore::new();
    let mut store = temp.store();
    store
        .create("docs", ContentVariant::file_list("FileDrop", ["C:\\a.txt", "C:\\b.txt"]))
        .unwrap();
    store.save().unwrap();

    let reloaded = temp.loaded();
    match reloaded.get("docs").unwrap().payload() {
        Some(Payload::FileList(paths)) => assert_eq!(paths, &["C:\\a.txt", "C:\\b.txt"]),
        other => panic!("unexpected payload {other:?}"),
    }
}

#[test]
fn test_overwrite_releases_previous_once() {
    let released = Arc::new(AtomicUsize::new(0));
    let hook = Arc::clone(&released);
    let temp = TempStore::new();
    let mut store = temp.store();

    store
        .create(
            "greeting",
            greeting().with_release_callback(move || {
                hook.fetch_add(1, Ordering::SeqCst);
            }),
        )
        .unwrap();
    store
        .create("Greeting", ContentVariant::text("Text", TextSubKind::PlainText, "bye"))
        .unwrap();
    assert_eq!(released.load(Ordering::SeqCst), 1);
    assert_eq!(store.len(), 1);

    store.save().unwrap();
    drop(store);
    assert_eq!(released.load(Ordering::SeqCst), 1);

    let store = temp.loaded();
    assert_eq!(store.get("greeting").unwrap().preview_text().unwrap(), "bye");
}

#[test]
fn test_partial_load_reports_corrupt_record() {
    init_test_logging();
    let temp = TempStore::new();
    {
        let mut store = temp.store();
        store.create("good", greeting()).unwrap();
        store.save().unwrap();
    }
    temp.write_record("broken.bin", &LegacyRecord::new(0, "WaveAudio").int(50).build());
    temp.write_record("future.bin", &LegacyRecord::new(42, "Vector").build());

    let mut store = temp.store();
    let report = store.load().unwrap();
    assert_eq!(report.loaded, ["good"]);
    assert_eq!(report.skipped, [temp.path().join("future.bin")]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].name, "broken");
    assert!(matches!(
        report.failures[0].error,
        SnipError::TruncatedRecord { field: "audio", .. }
    ));
    assert!(!report.is_clean());
    assert!(store.contains("good"));
    assert!(!store.contains("broken"));
}

#[test]
fn test_load_replaces_memory() {
    let temp = TempStore::new();
    let mut store = temp.store();
    store.create("on-disk", greeting()).unwrap();
    store.save().unwrap();
    store.create("memory-only", greeting()).unwrap();

    store.load().unwrap();
    assert_eq!(store.names(), ["on-disk"]);
}

#[test]
fn test_nested_records_load_by_stem() {
    let temp = TempStore::new();
    let nested = temp.path().join("archive");
    std::fs::create_dir_all(&nested).unwrap();
    std::fs::write(
        nested.join("old.bin"),
        LegacyRecord::new(3, "Text").byte(1).string("kept").build(),
    )
    .unwrap();

    let store = temp.loaded();
    assert_eq!(store.get("old").unwrap().preview_text().unwrap(), "kept");
}

fn write_nested_record(temp: &TempStore) -> std::path::PathBuf {
    let nested = temp.path().join("archive");
    std::fs::create_dir_all(&nested).unwrap();
    let path = nested.join("old.bin");
    std::fs::write(&path, LegacyRecord::new(3, "Text").byte(0).string("x").build()).unwrap();
    path
}

#[test]
fn test_removing_nested_record_deletes_its_file() {
    let temp = TempStore::new();
    let nested = write_nested_record(&temp);

    let mut store = temp.loaded();
    assert!(store.remove("OLD"));
    let report = store.save().unwrap();
    assert!(report.is_clean());
    assert_eq!(report.removed, [nested.clone()]);
    assert!(!nested.exists());

    assert!(!temp.loaded().contains("old"));
}

#[test]
fn test_replacing_nested_record_moves_it_to_top_level() {
    let temp = TempStore::new();
    let nested = write_nested_record(&temp);

    let mut store = temp.loaded();
    store
        .create("old", ContentVariant::text("Text", TextSubKind::PlainText, "new"))
        .unwrap();
    let report = store.save().unwrap();
    assert_eq!(report.removed, [nested.clone()]);
    assert!(!nested.exists());

    let reloaded = temp.loaded();
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded.get("old").unwrap().preview_text().unwrap(), "new");
}

#[test]
fn test_partial_save_reports_failed_record() {
    init_test_logging();
    let temp = TempStore::new();
    std::fs::create_dir_all(temp.path().join("bad.bin")).unwrap();

    let mut store = temp.store();
    store.create("good", greeting()).unwrap();
    store.create("bad", greeting()).unwrap();
    let report = store.save().unwrap();

    assert!(!report.is_clean());
    assert_eq!(report.written.len(), 1);
    assert_eq!(report.written[0].name, "good");
    assert!(temp.path().join("good.bin").is_file());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].name, "bad");
    assert_eq!(report.failures[0].path, temp.path().join("bad.bin"));
    assert!(matches!(report.failures[0].error, SnipError::Io(_)));
}

#[test]
fn test_removed_snippet_stays_gone() {
    let temp = TempStore::new();
    let mut store = temp.store();
    store.create("keep", greeting()).unwrap();
    store.create("drop", greeting()).unwrap();
    store.save().unwrap();

    assert!(store.remove("DROP"));
    let report = store.save().unwrap();
    assert_eq!(report.removed, [temp.path().join("drop.bin")]);

    let reloaded = temp.loaded();
    assert_eq!(reloaded.names(), ["keep"]);
}

#[test]
fn test_recreate_after_remove_keeps_file() {
    let temp = TempStore::new();
    let mut store = temp.store();
    store.create("note", greeting()).unwrap();
    store.save().unwrap();
    store.remove("note");
    store.create("NOTE", greeting()).unwrap();

    let report = store.save().unwrap();
    assert!(report.removed.is_empty());
    assert!(temp.path().join("note.bin").is_file());
}

#[test]
fn test_disposed_store_rejects_everything() {
    let temp = TempStore::new();
    let mut store = temp.store();
    store.create("greeting", greeting()).unwrap();
    store.dispose();

    assert!(store.is_disposed());
    assert!(store.get("greeting").is_none());
    assert!(matches!(store.save(), Err(SnipError::StoreDisposed)));
    assert!(matches!(
        store.create("x", greeting()),
        Err(SnipError::StoreDisposed)
    ));
}

struct Clipboard {
    next: Option<PayloadDescriptor>,
}

impl SnippetSource for Clipboard {
    fn fetch(&mut self) -> Result<Option<PayloadDescriptor>> {
        Ok(self.next.take())
    }
}

#[test]
fn test_capture_from_source_and_persist() {
    let temp = TempStore::new();
    let mut store = temp.store();
    let mut source = Clipboard {
        next: Some(
            PayloadDescriptor::new("WaveAudio")
                .with_audio(Cursor::new(vec![4u8; 2048]), Some(2048)),
        ),
    };
    store.create_from_source("chime", &mut source).unwrap();
    assert!(store.get("chime").unwrap().owns_payload());

    let err = store.create_from_source("again", &mut source).unwrap_err();
    assert!(matches!(err, SnipError::NoContentAvailable));

    store.save().unwrap();
    let reloaded = temp.loaded();
    match reloaded.get("chime").unwrap().payload() {
        Some(Payload::Audio(clip)) => assert_eq!(clip.len(), 2048),
        other => panic!("unexpected payload {other:?}"),
    }
}

#[test]
fn test_ambiguous_descriptor_is_rejected() {
    let mut store = TempStore::new().store();
    let mut source = Clipboard {
        next: Some(
            PayloadDescriptor::new("Mixed")
                .with_text("hi")
                .with_files(["C:\\a.txt"]),
        ),
    };
    let err = store.create_from_source("mixed", &mut source).unwrap_err();
    assert!(matches!(err, SnipError::UnsupportedPayload { .. }));
    assert!(store.is_empty());
}
