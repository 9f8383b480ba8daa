//! PartImport - spreadsheet parts lists into electrical drawings
//!
//! This library turns the rows of a parts list (part number, manufacturer,
//! assembly, symbol, location, descriptions) into placed schematic symbols
//! whose attributes are filled from the row, the document's installation
//! code, and the catalog's ratings for the part.
//!
//! # Quick Start
//!
//! ```no_run
//! use partimport::prelude::*;
//! use partimport::host::memory::MemoryDrawing;
//! use std::path::Path;
//!
//! let mut drawing = MemoryDrawing::load(Path::new("drawing.json")).unwrap();
//! let mut messages: Vec<String> = Vec::new();
//! let report = PartImportCore::import_file(
//!     Path::new("parts.xlsx"),
//!     &mut drawing,
//!     &ImportOptions::default(),
//!     &mut messages,
//! ).unwrap();
//!
//! for placed in &report.placed {
//!     println!("{} -> {}", placed.symbol, placed.handle);
//! }
//! ```
//!
//! # Features
//!
//! - **Row parsing**: fixed-column rows with free-text `x, y` locations
//! - **Rating lookup**: decoding of the host's flattened list responses
//! - **Attribute reconciliation**: update in place, append the rest, never delete
//! - **Host ports**: any drawing host via [`host::CommandHost`] and [`host::DrawingDatabase`]

pub mod attributes;
pub mod core;
pub mod host;
pub mod parser;
pub mod sheet;

// Re-export main types
pub use attributes::{reconcile, AttributeInstance, AttributeMap};
pub use core::{
    EntryFailure, FailurePolicy, ImportError, ImportOptions, ImportReport, ImportStep,
    PartImportCore, PlacedEntry,
};
pub use host::{CommandHost, DrawingDatabase, Handle, HostError, MessageSink, ObjectRef};
pub use parser::{Entry, Point, Token};
pub use sheet::{Sheet, SheetError};

/// Read the valid entries of a spreadsheet file (convenience wrapper).
pub fn parse_entries(path: &std::path::Path) -> Result<Vec<Entry>, ImportError> {
    PartImportCore::read_entries(path, &ImportOptions::default()).map(|parsed| parsed.entries)
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        AttributeInstance, AttributeMap, Entry, ImportError, ImportOptions, ImportReport,
        MessageSink, PartImportCore,
    };
}
