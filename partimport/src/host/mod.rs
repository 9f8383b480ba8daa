//! Host Ports Module
//!
//! The drawing application is reached through narrow, synchronous ports so
//! the import logic can run against any host (a live CAD session, or the
//! in-memory [`memory::MemoryDrawing`] used by the CLI and tests):
//!
//! - [`CommandHost`] - the flattened command protocol (request tokens in,
//!   response tokens out)
//! - [`DrawingDatabase`] - document metadata, handle resolution and scoped
//!   attribute edits
//! - [`MessageSink`] - single-line, user-visible messages

pub mod commands;
pub mod memory;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::attributes::AttributeInstance;
use crate::parser::tokens::Token;

/// Errors raised by a host collaborator.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Command rejected: {0}")]
    Rejected(String),

    #[error("Invalid handle: {0:?}")]
    InvalidHandle(String),

    #[error("Handle {0} does not resolve to a live object")]
    UnresolvedHandle(Handle),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persistent database handle of a drawing object, written in hex by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Handle(pub u64);

impl Handle {
    pub fn from_hex(text: &str) -> Result<Self, HostError> {
        let digits = text.trim();
        let digits = digits
            .strip_prefix("0x")
            .or_else(|| digits.strip_prefix("0X"))
            .unwrap_or(digits);
        u64::from_str_radix(digits, 16)
            .map(Handle)
            .map_err(|_| HostError::InvalidHandle(text.to_string()))
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:X}", self.0)
    }
}

/// Session-local reference to a live drawing object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectRef(pub u64);

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity {}", self.0)
    }
}

/// The host's command protocol. Calls are synchronous and ordered: a call
/// returns only after its effects are visible to the next one.
pub trait CommandHost {
    fn invoke(&mut self, request: &[Token]) -> Result<Vec<Token>, HostError>;
}

/// The drawing document the import writes into.
pub trait DrawingDatabase {
    /// Look up a document custom property by exact name.
    fn custom_property(&self, name: &str) -> Option<String>;

    /// Turn a persistent handle into a reference to a live object.
    fn resolve_handle(&self, handle: Handle) -> Result<ObjectRef, HostError>;

    /// Open `target` for write and let `edit` change its attributes.
    ///
    /// The host commits the edit when `edit` returns; if the target cannot
    /// be opened nothing is written.
    fn edit_attributes(
        &mut self,
        target: ObjectRef,
        edit: &mut dyn FnMut(&mut Vec<AttributeInstance>),
    ) -> Result<(), HostError>;
}

/// Single-line text sink for user-visible messages.
pub trait MessageSink {
    fn write_message(&mut self, line: &str);
}

impl MessageSink for Vec<String> {
    fn write_message(&mut self, line: &str) {
        self.push(line.to_string());
    }
}

/// Sink that forwards messages to the log only.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl MessageSink for LogSink {
    fn write_message(&mut self, line: &str) {
        tracing::info!("{}", line);
    }
}
