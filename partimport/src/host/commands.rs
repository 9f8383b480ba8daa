//! Requests for the three host commands used by the import, and
//! interpretation of their responses.

use crate::host::{Handle, HostError, ObjectRef};
use crate::parser::row::Entry;
use crate::parser::tokens::Token;

/// Catalog lookup of text values (ratings) for a part.
pub const RATING_LOOKUP: &str = "c:ace_get_textvals";
/// Symbol insertion at a point.
pub const INSERT_SYMBOL: &str = "c:wd_insym2";
/// Pin list attachment for a placed symbol.
pub const ATTACH_PINLIST: &str = "c:wd_pinlist_attach";

pub fn rating_lookup(entry: &Entry) -> Vec<Token> {
    vec![
        Token::text(RATING_LOOKUP),
        Token::Nil,
        Token::text(&entry.symbol),
        Token::text(&entry.manufacturer),
        Token::text(&entry.part_number),
        Token::text(&entry.assembly),
    ]
}

pub fn insert_symbol(entry: &Entry, mode: i32) -> Vec<Token> {
    vec![
        Token::text(INSERT_SYMBOL),
        Token::text(&entry.symbol),
        Token::ListBegin,
        Token::Real(entry.x()),
        Token::Real(entry.y()),
        Token::ListEnd,
        Token::Nil,
        Token::Int(mode),
    ]
}

pub fn attach_pinlist(target: ObjectRef, mode: i32) -> Vec<Token> {
    vec![
        Token::text(ATTACH_PINLIST),
        Token::Object(target),
        Token::Int(mode),
    ]
}

/// Read the placed symbol's handle from an insertion response.
///
/// The first token must be the handle as hex text.
pub fn placed_handle(response: &[Token]) -> Result<Handle, HostError> {
    match response.first() {
        Some(Token::Text(text)) => Handle::from_hex(text),
        Some(other) => Err(HostError::InvalidHandle(other.to_string())),
        None => Err(HostError::InvalidHandle(String::new())),
    }
}
