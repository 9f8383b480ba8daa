//! Simple import example: import a parts list into a JSON drawing and print the report.

use partimport::host::memory::MemoryDrawing;
use partimport::prelude::*;
use std::path::Path;

fn main() -> Result<(), ImportError> {
    let mut args = std::env::args().skip(1);
    let (Some(parts), Some(drawing_path)) = (args.next(), args.next()) else {
        eprintln!("Usage: cargo run --example simple_import <parts.xlsx|parts.csv> <drawing.json>");
        std::process::exit(1);
    };

    let drawing_path = Path::new(&drawing_path);
    let mut drawing = MemoryDrawing::load(drawing_path)?;
    let mut messages: Vec<String> = Vec::new();

    let report = PartImportCore::import_file(
        Path::new(&parts),
        &mut drawing,
        &ImportOptions::default(),
        &mut messages,
    )?;

    println!("Import results for: {}", parts);
    println!("Rows read: {} ({} skipped)", report.rows_read, report.rows_skipped);
    for placed in &report.placed {
        println!(
            "  {} {} at ({}, {}) -> {}",
            placed.symbol, placed.part_number, placed.position.x, placed.position.y, placed.handle
        );
    }
    for message in &messages {
        println!("  ! {}", message);
    }

    drawing.save(drawing_path)?;
    Ok(())
}
