//! Utility modules shared across the crate.

pub mod errors;
pub mod logger;

pub use errors::{DuplitabError, ParseError, Result};
