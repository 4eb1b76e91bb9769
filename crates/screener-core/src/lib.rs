//! Core types and traits for the screener.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Bar, Series)
//! - The indicator frame produced by the pipeline
//! - Trading signals
//! - Collaborator traits for price data, trading calendars, symbol lists and presentation

pub mod types;
pub mod traits;
pub mod error;

pub use error::{ScreenerError, ScreenerResult};
pub use types::*;
pub use traits::*;
