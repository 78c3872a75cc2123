//! # Search Params Shared
//!
//! Value types shared by the search parameter crates: the delimited
//! `FilterField` bucket key, the `GeoPoint` coordinate pair and the
//! `SortDirection` enum.

mod errors;
mod filter_field;
mod geo_point;
mod sort_direction;

pub use errors::{FilterFieldError, ValueParseError};
pub use filter_field::{FilterField, DEFAULT_DELIMITER, EMPTY_TEXT};
pub use geo_point::GeoPoint;
pub use sort_direction::SortDirection;
