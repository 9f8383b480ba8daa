pub mod location;
pub mod ratings;
pub mod row;
pub mod tokens;

// Re-export for convenience
pub use location::{extract, Point};
pub use ratings::{is_rating_key, parse_ratings};
pub use row::{parse_row, parse_sheet, ColumnIndex, Entry, ParsedSheet};
pub use tokens::{render, Token};
