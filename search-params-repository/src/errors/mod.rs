//! Error types for the search params repository.

mod marshal_error;
mod search_error;

pub use marshal_error::{BoxError, MarshalError};
pub use search_error::SearchError;
