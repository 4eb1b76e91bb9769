//! CLI command implementations.

pub mod inspect;
pub mod scan;
pub mod validate;
