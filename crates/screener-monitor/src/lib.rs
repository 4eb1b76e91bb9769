//! Logging setup and text presentation.

mod logging;
mod table;

pub use logging::{setup_logging, LOG_FILE_NAME};
pub use table::TableSink;
