//! Core infrastructure: error handling, fundamental types, and constants.

pub mod constants;
pub mod error;
pub mod types;

pub use constants::*;
pub use error::{Result, TreeBoostError};
pub use types::*;
