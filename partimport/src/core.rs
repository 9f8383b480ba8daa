//! Core import logic shared by the CLI and any other host front end.
//! No host-specific dependencies: everything goes through the ports in
//! [`crate::host`].

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::attributes::{desired_attributes, reconcile, AttributeInstance};
use crate::host::{commands, CommandHost, DrawingDatabase, Handle, HostError, MessageSink};
use crate::parser::location::Point;
use crate::parser::ratings::parse_ratings;
use crate::parser::row::{parse_sheet, Entry, ParsedSheet};
use crate::parser::tokens::{render, Token};
use crate::sheet::{Sheet, SheetError};

/// Message written to the user when the spreadsheet cannot be read.
pub const OPEN_FAILED_MESSAGE: &str = "Failed to open the spreadsheet";

/// Document property holding the installation code.
pub const INSTALLATION_CODE_PROPERTY: &str = "Installation Code";

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Failed to open the spreadsheet: {0}")]
    Open(#[from] SheetError),
    #[error("{step} failed for symbol '{symbol}': {source}")]
    Entry {
        symbol: String,
        step: ImportStep,
        #[source]
        source: HostError,
    },
    #[error("Host error: {0}")]
    Host(#[from] HostError),
    #[error("Config error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Host interaction performed for each entry, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportStep {
    RatingLookup,
    Placement,
    AttributeUpdate,
    PinAttach,
}

impl fmt::Display for ImportStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportStep::RatingLookup => write!(f, "Rating lookup"),
            ImportStep::Placement => write!(f, "Placement"),
            ImportStep::AttributeUpdate => write!(f, "Attribute update"),
            ImportStep::PinAttach => write!(f, "Pin attachment"),
        }
    }
}

/// What to do when one entry cannot be imported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Report the entry and continue with the next one.
    #[default]
    Skip,
    /// Report the entry and stop. Entries already placed stay placed.
    Abort,
}

/// Options for an import run.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportOptions {
    /// Worksheet to read; the first one when unset.
    pub worksheet: Option<String>,
    pub installation_property: String,
    pub placement_mode: i32,
    pub pin_attach_mode: i32,
    pub on_failure: FailurePolicy,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            worksheet: None,
            installation_property: INSTALLATION_CODE_PROPERTY.to_string(),
            placement_mode: 2,
            pin_attach_mode: 1,
            on_failure: FailurePolicy::Skip,
        }
    }
}

impl ImportOptions {
    /// Load options from a JSON file. Missing fields take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ImportError> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| ImportError::Config(format!("{}: {}", path.display(), e)))
    }
}

/// A symbol placed and populated by the import.
#[derive(Debug, Clone, Serialize)]
pub struct PlacedEntry {
    pub symbol: String,
    pub part_number: String,
    pub handle: Handle,
    pub position: Point,
}

/// An entry the import gave up on.
#[derive(Debug, Clone, Serialize)]
pub struct EntryFailure {
    pub symbol: String,
    pub part_number: String,
    pub position: Point,
    pub step: Option<ImportStep>,
    pub reason: String,
}

/// Outcome of one import run.
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub source: Option<PathBuf>,
    pub installation_code: String,
    pub rows_read: usize,
    pub rows_skipped: usize,
    pub placed: Vec<PlacedEntry>,
    pub failures: Vec<EntryFailure>,
}

impl ImportReport {
    fn new(installation_code: String) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            source: None,
            installation_code,
            rows_read: 0,
            rows_skipped: 0,
            placed: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn total_entries(&self) -> usize {
        self.placed.len() + self.failures.len()
    }
}

/// Read the installation code from the document; absent reads as empty.
pub fn installation_code<D: DrawingDatabase + ?Sized>(db: &D, property: &str) -> String {
    db.custom_property(property).unwrap_or_default()
}

fn entry_error(entry: &Entry, step: ImportStep) -> impl FnOnce(HostError) -> ImportError + '_ {
    move |source| ImportError::Entry {
        symbol: entry.symbol.clone(),
        step,
        source,
    }
}

fn invoke<H: CommandHost + ?Sized>(host: &mut H, request: &[Token]) -> Result<Vec<Token>, HostError> {
    tracing::debug!("host <- {}", render(request));
    let response = host.invoke(request)?;
    tracing::debug!("host -> {}", render(&response));
    Ok(response)
}

/// Import orchestration API.
pub struct PartImportCore;

impl PartImportCore {
    /// Read and validate the entries of a spreadsheet file.
    pub fn read_entries(path: &Path, options: &ImportOptions) -> Result<ParsedSheet, ImportError> {
        let sheet = Sheet::open(path, options.worksheet.as_deref())?;
        Ok(parse_sheet(&sheet))
    }

    /// Import a spreadsheet file into the host drawing.
    ///
    /// If the file cannot be read the failure is reported once on `sink` and
    /// nothing is sent to the host.
    pub fn import_file<H>(
        path: &Path,
        host: &mut H,
        options: &ImportOptions,
        sink: &mut dyn MessageSink,
    ) -> Result<ImportReport, ImportError>
    where
        H: CommandHost + DrawingDatabase + ?Sized,
    {
        let parsed = match Self::read_entries(path, options) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Cannot read {}: {}", path.display(), e);
                sink.write_message(OPEN_FAILED_MESSAGE);
                return Err(e);
            }
        };

        tracing::info!(
            "Read {} rows from {} ({} valid, {} skipped)",
            parsed.rows_read,
            path.display(),
            parsed.entries.len(),
            parsed.rows_skipped
        );

        let mut report = Self::import_entries(&parsed.entries, host, options, sink)?;
        report.source = Some(path.to_path_buf());
        report.rows_read = parsed.rows_read;
        report.rows_skipped = parsed.rows_skipped;
        Ok(report)
    }

    /// Import already validated entries, strictly in order.
    pub fn import_entries<H>(
        entries: &[Entry],
        host: &mut H,
        options: &ImportOptions,
        sink: &mut dyn MessageSink,
    ) -> Result<ImportReport, ImportError>
    where
        H: CommandHost + DrawingDatabase + ?Sized,
    {
        let code = installation_code(&*host, &options.installation_property);
        let mut report = ImportReport::new(code);
        let span = tracing::info_span!("import", run_id = %report.run_id);
        let _guard = span.enter();

        for entry in entries {
            match Self::import_entry(entry, &report.installation_code, host, options) {
                Ok(placed) => report.placed.push(placed),
                Err(e) => {
                    let verb = match options.on_failure {
                        FailurePolicy::Skip => "Skipped",
                        FailurePolicy::Abort => "Aborted at",
                    };
                    let message = format!(
                        "{} {} at ({}, {}): {}",
                        verb,
                        entry.symbol,
                        entry.x(),
                        entry.y(),
                        e
                    );
                    tracing::warn!("{}", message);
                    sink.write_message(&message);

                    let step = match &e {
                        ImportError::Entry { step, .. } => Some(*step),
                        _ => None,
                    };
                    report.failures.push(EntryFailure {
                        symbol: entry.symbol.clone(),
                        part_number: entry.part_number.clone(),
                        position: entry.location,
                        step,
                        reason: e.to_string(),
                    });

                    if options.on_failure == FailurePolicy::Abort {
                        return Err(e);
                    }
                }
            }
        }

        tracing::info!(
            "Import finished: {} placed, {} failed",
            report.placed.len(),
            report.failures.len()
        );
        Ok(report)
    }

    /// Place one entry and populate its attributes.
    ///
    /// Sequence: rating lookup, placement, handle resolution, attribute
    /// reconciliation inside the host's write scope, pin attachment.
    pub fn import_entry<H>(
        entry: &Entry,
        installation_code: &str,
        host: &mut H,
        options: &ImportOptions,
    ) -> Result<PlacedEntry, ImportError>
    where
        H: CommandHost + DrawingDatabase + ?Sized,
    {
        let response = invoke(host, &commands::rating_lookup(entry))
            .map_err(entry_error(entry, ImportStep::RatingLookup))?;
        let ratings = parse_ratings(&response);
        let desired = desired_attributes(entry, installation_code, ratings);

        let response = invoke(host, &commands::insert_symbol(entry, options.placement_mode))
            .map_err(entry_error(entry, ImportStep::Placement))?;
        let handle = commands::placed_handle(&response)
            .map_err(entry_error(entry, ImportStep::Placement))?;
        let target = host
            .resolve_handle(handle)
            .map_err(entry_error(entry, ImportStep::Placement))?;

        host.edit_attributes(target, &mut |attrs: &mut Vec<AttributeInstance>| {
            reconcile(&desired, attrs)
        })
        .map_err(entry_error(entry, ImportStep::AttributeUpdate))?;

        invoke(host, &commands::attach_pinlist(target, options.pin_attach_mode))
            .map_err(entry_error(entry, ImportStep::PinAttach))?;

        tracing::debug!("Placed {} as {}", entry.symbol, handle);
        Ok(PlacedEntry {
            symbol: entry.symbol.clone(),
            part_number: entry.part_number.clone(),
            handle,
            position: entry.location,
        })
    }
}
