use super::AttributeMap;
use crate::parser::row::Entry;

/// Tags seeded from every entry, in the order they are appended to a
/// symbol that lacks them.
pub const FIXED_TAGS: [&str; 7] = ["MFG", "CAT", "ASSYCODE", "DESC1", "DESC2", "DESC3", "INST"];

/// Build the complete attribute set an entry's symbol should carry.
///
/// Fixed tags always win over ratings: a rating whose key collides with a
/// fixed tag is dropped.
pub fn desired_attributes(
    entry: &Entry,
    installation_code: &str,
    ratings: AttributeMap,
) -> AttributeMap {
    let mut map = AttributeMap::new();
    map.insert("MFG", entry.manufacturer.as_str());
    map.insert("CAT", entry.part_number.as_str());
    map.insert("ASSYCODE", entry.assembly.as_str());
    map.insert("DESC1", entry.description1.as_str());
    map.insert("DESC2", entry.description2.as_str());
    map.insert("DESC3", entry.description3.as_str());
    map.insert("INST", installation_code);

    map.extend_missing(ratings);
    map
}
