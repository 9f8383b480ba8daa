//! Rating lookup response decoding.
//!
//! The lookup answers with a flat token list where every rating is a
//! four-token group: `ListBegin, Text(key), Text(value), ListEnd`.

use std::sync::OnceLock;

use regex::Regex;

use crate::attributes::AttributeMap;
use crate::parser::tokens::Token;

const GROUP_LEN: usize = 4;

fn rating_key_regex() -> Option<&'static Regex> {
    static KEY: OnceLock<Option<Regex>> = OnceLock::new();
    KEY.get_or_init(|| Regex::new(r"^RATING\d*").ok()).as_ref()
}

/// Whether an (already uppercased) key names a rating attribute.
pub fn is_rating_key(key: &str) -> bool {
    rating_key_regex().is_some_and(|re| re.is_match(key))
}

/// Decode a rating lookup response into `RATING*` key/value pairs.
///
/// Scanning stops at the first group that is not shaped
/// `ListBegin, Text, Text, ListEnd`, or when fewer than four tokens remain.
/// Everything accepted up to that point is returned. Groups whose key is not
/// a rating key are skipped. A later duplicate key overwrites an earlier one.
pub fn parse_ratings(tokens: &[Token]) -> AttributeMap {
    let mut ratings = AttributeMap::new();

    for group in tokens.chunks_exact(GROUP_LEN) {
        let (key, value) = match group {
            [Token::ListBegin, Token::Text(key), Token::Text(value), Token::ListEnd] => {
                (key, value)
            }
            _ => break,
        };

        let key = key.to_uppercase();
        let key = key.trim();
        if !is_rating_key(key) {
            continue;
        }

        ratings.insert(key, value.clone());
    }

    ratings
}
