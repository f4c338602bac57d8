//! Export of the in-memory answers.

use std::fs;

use denim_engine::{EXPORT_FILE_NAME, EXPORT_MIME, NoticeLevel, export_snapshot};
use denim_types::{FieldValue, parse_percent};
use insta::assert_snapshot;
use tempfile::tempdir;

use crate::common::{field, file_app};

#[test]
fn export_writes_pretty_json_of_current_answers() {
    let storage = tempdir().expect("tempdir");
    let export = tempdir().expect("tempdir");
    let mut app = file_app(storage.path(), export.path());

    assert!(app.cycle_option(true));
    app.apply(
        &field("etp.blocks"),
        Some(FieldValue::Choices(vec![
            "Physical".to_string(),
            "Biological".to_string(),
        ])),
    );
    app.apply(
        &field("etp.reuse_pct"),
        parse_percent("150").map(FieldValue::Number),
    );

    // Nothing has been persisted yet; export reflects memory, not the slot.
    let path = app.export().expect("export succeeds");
    assert_eq!(path, export.path().join(EXPORT_FILE_NAME));
    assert_eq!(
        app.latest_notice().map(|n| n.level),
        Some(NoticeLevel::Info)
    );

    let text = fs::read_to_string(&path).expect("export file");
    assert_snapshot!(text, @r#"
    {
      "etp": {
        "blocks": [
          "Physical",
          "Biological"
        ],
        "reuse_pct": 100
      },
      "footprints": {},
      "handover": {},
      "indigo_control": {},
      "safety": {},
      "shade_finish": {},
      "warp_range": {
        "dye_range": "Rope"
      }
    }
    "#);
}

#[test]
fn artifact_names_the_file_and_mime_type() {
    let storage = tempdir().expect("tempdir");
    let export = tempdir().expect("tempdir");
    let app = file_app(storage.path(), export.path());

    let artifact = export_snapshot(app.document()).expect("serializes");
    assert_eq!(artifact.file_name, "denim_onboarding.json");
    assert_eq!(artifact.mime, EXPORT_MIME);
    let value: serde_json::Value = serde_json::from_slice(&artifact.bytes).expect("json");
    assert_eq!(value.as_object().map(serde_json::Map::len), Some(7));
}

#[test]
fn export_failure_is_a_warning_not_an_error() {
    let storage = tempdir().expect("tempdir");
    let export = tempdir().expect("tempdir");
    // A file where the export directory should be.
    let blocked = export.path().join("not_a_dir");
    fs::write(&blocked, "x").expect("write file");

    let mut app = file_app(storage.path(), &blocked);
    assert!(app.export().is_none());
    let notice = app.latest_notice().expect("notice");
    assert_eq!(notice.level, NoticeLevel::Warn);
    assert!(notice.text.starts_with("Export failed"));
}
