//! Integration tests for importing parts lists into a drawing

use partimport::host::memory::MemoryDrawing;
use partimport::prelude::*;
use partimport::{FailurePolicy, ImportStep};
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn drawing() -> MemoryDrawing {
    MemoryDrawing::load(&fixture_path("drawing.json")).expect("Should load drawing fixture")
}

fn import(drawing: &mut MemoryDrawing) -> (ImportReport, Vec<String>) {
    let mut messages: Vec<String> = Vec::new();
    let report = PartImportCore::import_file(
        &fixture_path("panel_parts.csv"),
        drawing,
        &ImportOptions::default(),
        &mut messages,
    )
    .expect("Import should succeed");
    (report, messages)
}

#[test]
fn test_import_places_every_valid_entry() {
    let mut dwg = drawing();
    let (report, messages) = import(&mut dwg);

    assert_eq!(report.placed.len(), 3);
    assert!(!report.has_failures());
    assert!(messages.is_empty(), "Unexpected messages: {:?}", messages);
    assert_eq!(dwg.blocks.len(), 3);
    assert!(dwg.blocks.iter().all(|b| b.pins_attached));
    assert_eq!(report.installation_code, "PLANT-7");
}

#[test]
fn test_import_populates_attributes() {
    let mut dwg = drawing();
    let (report, _) = import(&mut dwg);

    let breaker = dwg.block(report.placed[0].handle).expect("Should find breaker");
    assert_eq!(breaker.attribute("MFG"), Some("AB"));
    assert_eq!(breaker.attribute("CAT"), Some("140M-C2E-B10"));
    assert_eq!(breaker.attribute("DESC1"), Some("MOTOR PROTECTOR"));
    assert_eq!(breaker.attribute("INST"), Some("PLANT-7"));
    assert_eq!(breaker.attribute("RATING1"), Some("1.6A"));
    assert_eq!(breaker.attribute("RATING2"), Some("600V"));
    assert_eq!(breaker.attribute("VOLTAGE"), None);
    // Untouched library attribute survives
    assert_eq!(breaker.attribute("TAG1"), Some(""));
}

#[test]
fn test_import_updates_in_place_and_appends() {
    let mut dwg = drawing();
    let (report, _) = import(&mut dwg);

    let breaker = dwg.block(report.placed[0].handle).unwrap();
    let tags: Vec<_> = breaker.attributes.iter().map(|a| a.tag.as_str()).collect();
    assert_eq!(
        tags,
        vec![
            "TAG1", "MFG", "CAT", "RATING1", "ASSYCODE", "DESC1", "DESC2", "DESC3", "INST",
            "RATING2"
        ]
    );
}

#[test]
fn test_fixed_attributes_win_over_ratings() {
    let mut dwg = drawing();
    let (report, _) = import(&mut dwg);

    let relay = dwg.block(report.placed[2].handle).unwrap();
    assert_eq!(relay.attribute("MFG"), Some("AB"));
    assert_eq!(relay.attribute("RATING1"), Some("10A"));
    assert_eq!(relay.attribute("ASSYCODE"), Some("ASSY-A"));
}

#[test]
fn test_reimport_does_not_duplicate_attributes() {
    let mut dwg = drawing();
    let (report, _) = import(&mut dwg);
    let handle = report.placed[0].handle;
    let before = dwg.block(handle).unwrap().attributes.clone();

    // Reconcile the same desired state against the already populated block
    let entry = partimport::parse_entries(&fixture_path("panel_parts.csv")).unwrap()[0].clone();
    let desired = partimport::attributes::desired_attributes(
        &entry,
        "PLANT-7",
        [("RATING1", "1.6A"), ("RATING2", "600V")].into_iter().collect(),
    );
    let mut attributes = before.clone();
    partimport::reconcile(&desired, &mut attributes);

    assert_eq!(attributes, before);
}

#[test]
fn test_missing_symbol_is_skipped_and_reported() {
    let mut dwg = drawing();
    dwg.library.remove("HPB11");
    let (report, messages) = import(&mut dwg);

    assert_eq!(report.placed.len(), 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].symbol, "HPB11");
    assert_eq!(report.failures[0].step, Some(ImportStep::Placement));
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("HPB11"));
}

#[test]
fn test_abort_on_failure() {
    let mut dwg = drawing();
    dwg.library.remove("HPB11");
    let options = ImportOptions {
        on_failure: FailurePolicy::Abort,
        ..ImportOptions::default()
    };
    let mut messages: Vec<String> = Vec::new();

    let result = PartImportCore::import_file(
        &fixture_path("panel_parts.csv"),
        &mut dwg,
        &options,
        &mut messages,
    );

    assert!(matches!(result, Err(ImportError::Entry { .. })));
    // The breaker placed before the failure is kept
    assert_eq!(dwg.blocks.len(), 1);
    assert_eq!(messages.len(), 1);
}

#[test]
fn test_missing_installation_code_reads_empty() {
    let mut dwg = drawing();
    dwg.properties.clear();
    let (report, _) = import(&mut dwg);

    let breaker = dwg.block(report.placed[0].handle).unwrap();
    assert_eq!(breaker.attribute("INST"), Some(""));
}

#[test]
fn test_unreadable_spreadsheet_touches_nothing() {
    let mut dwg = drawing();
    let mut messages: Vec<String> = Vec::new();

    let result = PartImportCore::import_file(
        &fixture_path("missing.xlsx"),
        &mut dwg,
        &ImportOptions::default(),
        &mut messages,
    );

    assert!(matches!(result, Err(ImportError::Open(_))));
    assert_eq!(messages, vec!["Failed to open the spreadsheet".to_string()]);
    assert!(dwg.blocks.is_empty());
}

#[test]
fn test_report_serializes() {
    let mut dwg = drawing();
    let (report, _) = import(&mut dwg);

    let json = serde_json::to_value(&report).expect("Report should serialize");
    assert_eq!(json["rows_read"], 6);
    assert_eq!(json["placed"].as_array().map(|a| a.len()), Some(3));
}
