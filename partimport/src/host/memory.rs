//! In-memory drawing that speaks the host command protocol.
//!
//! Holds a symbol library (default attributes per symbol), a parts catalog
//! for rating lookups, document custom properties, and the symbols placed so
//! far. Serializes to JSON so a drawing can be prepared by hand, imported
//! into, and inspected afterwards.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::attributes::AttributeInstance;
use crate::host::commands::{ATTACH_PINLIST, INSERT_SYMBOL, RATING_LOOKUP};
use crate::host::{CommandHost, DrawingDatabase, Handle, HostError, ObjectRef};
use crate::parser::location::Point;
use crate::parser::tokens::{render, Token};

const FIRST_HANDLE: u64 = 0x200;

/// Catalog row answering rating lookups for one manufacturer/part number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub manufacturer: String,
    pub part_number: String,
    /// Empty matches any assembly code.
    #[serde(default)]
    pub assembly: String,
    /// Text values in lookup order, e.g. `[["RATING1", "10A"]]`.
    #[serde(default)]
    pub values: Vec<(String, String)>,
}

impl CatalogRecord {
    fn matches(&self, manufacturer: &str, part_number: &str, assembly: &str) -> bool {
        self.manufacturer.eq_ignore_ascii_case(manufacturer)
            && self.part_number.eq_ignore_ascii_case(part_number)
            && (self.assembly.is_empty() || self.assembly.eq_ignore_ascii_case(assembly))
    }
}

/// A symbol instance placed in the drawing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedBlock {
    pub handle: Handle,
    pub symbol: String,
    pub position: Point,
    #[serde(default)]
    pub attributes: Vec<AttributeInstance>,
    #[serde(default)]
    pub pins_attached: bool,
    /// Erased objects keep their handle but no longer resolve.
    #[serde(default)]
    pub erased: bool,
}

impl PlacedBlock {
    pub fn attribute(&self, tag: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.has_tag(tag))
            .map(|a| a.text.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryDrawing {
    pub properties: BTreeMap<String, String>,
    /// Symbol name to the attributes every new instance starts with.
    pub library: BTreeMap<String, Vec<AttributeInstance>>,
    pub catalog: Vec<CatalogRecord>,
    pub blocks: Vec<PlacedBlock>,
    next_handle: u64,
}

impl MemoryDrawing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self, HostError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), HostError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn with_property(mut self, name: &str, value: &str) -> Self {
        self.properties.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_symbol(mut self, name: &str, attributes: Vec<AttributeInstance>) -> Self {
        self.library.insert(name.to_string(), attributes);
        self
    }

    pub fn with_catalog(mut self, record: CatalogRecord) -> Self {
        self.catalog.push(record);
        self
    }

    pub fn block(&self, handle: Handle) -> Option<&PlacedBlock> {
        self.blocks.iter().find(|b| b.handle == handle)
    }

    pub fn block_mut(&mut self, handle: Handle) -> Option<&mut PlacedBlock> {
        self.blocks.iter_mut().find(|b| b.handle == handle)
    }

    fn allocate_handle(&mut self) -> Handle {
        let highest = self.blocks.iter().map(|b| b.handle.0 + 1).max().unwrap_or(0);
        let next = self.next_handle.max(highest).max(FIRST_HANDLE);
        self.next_handle = next + 1;
        Handle(next)
    }

    fn lookup_ratings(&self, args: &[Token]) -> Result<Vec<Token>, HostError> {
        let [Token::Nil, Token::Text(_symbol), Token::Text(mfg), Token::Text(part), Token::Text(assy)] =
            args
        else {
            return Err(HostError::Rejected(format!("{} {}", RATING_LOOKUP, render(args))));
        };

        let Some(record) = self.catalog.iter().find(|r| r.matches(mfg, part, assy)) else {
            return Ok(vec![Token::Nil]);
        };

        let mut response = Vec::with_capacity(record.values.len() * 4);
        for (key, value) in &record.values {
            response.push(Token::ListBegin);
            response.push(Token::text(key));
            response.push(Token::text(value));
            response.push(Token::ListEnd);
        }
        Ok(response)
    }

    fn insert_symbol(&mut self, args: &[Token]) -> Result<Vec<Token>, HostError> {
        let [Token::Text(symbol), Token::ListBegin, x, y, Token::ListEnd, Token::Nil, Token::Int(_mode)] =
            args
        else {
            return Err(HostError::Rejected(format!("{} {}", INSERT_SYMBOL, render(args))));
        };
        let (Some(x), Some(y)) = (x.as_real(), y.as_real()) else {
            return Err(HostError::Rejected(format!("{} {}", INSERT_SYMBOL, render(args))));
        };

        // Unknown symbols insert nothing, like a missing block file
        let Some(defaults) = self.library.get(symbol).cloned() else {
            return Ok(vec![Token::Nil]);
        };

        let handle = self.allocate_handle();
        self.blocks.push(PlacedBlock {
            handle,
            symbol: symbol.clone(),
            position: Point::new(x, y),
            attributes: defaults,
            pins_attached: false,
            erased: false,
        });
        Ok(vec![Token::Text(handle.to_string())])
    }

    fn attach_pinlist(&mut self, args: &[Token]) -> Result<Vec<Token>, HostError> {
        let [Token::Object(target), Token::Int(_mode)] = args else {
            return Err(HostError::Rejected(format!("{} {}", ATTACH_PINLIST, render(args))));
        };
        let block = self
            .live_block_mut(*target)
            .ok_or_else(|| HostError::Rejected(format!("{}: no such object {}", ATTACH_PINLIST, target)))?;
        block.pins_attached = true;
        Ok(vec![Token::Int(1)])
    }

    fn live_block_mut(&mut self, target: ObjectRef) -> Option<&mut PlacedBlock> {
        self.blocks
            .iter_mut()
            .find(|b| b.handle.0 == target.0 && !b.erased)
    }
}

impl CommandHost for MemoryDrawing {
    fn invoke(&mut self, request: &[Token]) -> Result<Vec<Token>, HostError> {
        let Some((Token::Text(command), args)) = request.split_first() else {
            return Err(HostError::UnknownCommand(render(request)));
        };

        match command.as_str() {
            RATING_LOOKUP => self.lookup_ratings(args),
            INSERT_SYMBOL => self.insert_symbol(args),
            ATTACH_PINLIST => self.attach_pinlist(args),
            other => Err(HostError::UnknownCommand(other.to_string())),
        }
    }
}

impl DrawingDatabase for MemoryDrawing {
    fn custom_property(&self, name: &str) -> Option<String> {
        self.properties.get(name).cloned()
    }

    fn resolve_handle(&self, handle: Handle) -> Result<ObjectRef, HostError> {
        match self.block(handle) {
            Some(block) if !block.erased => Ok(ObjectRef(block.handle.0)),
            _ => Err(HostError::UnresolvedHandle(handle)),
        }
    }

    fn edit_attributes(
        &mut self,
        target: ObjectRef,
        edit: &mut dyn FnMut(&mut Vec<AttributeInstance>),
    ) -> Result<(), HostError> {
        let block = self
            .live_block_mut(target)
            .ok_or_else(|| HostError::Rejected(format!("cannot open {} for write", target)))?;

        // Edit a working copy and commit it in one assignment
        let mut working = block.attributes.clone();
        edit(&mut working);
        block.attributes = working;
        Ok(())
    }
}
