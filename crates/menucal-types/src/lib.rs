//! Core types for menu calorie estimation

mod error;
mod types;

pub use error::*;
pub use types::*;
