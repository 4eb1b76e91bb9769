//! Symbol list loaders.

use csv::ReaderBuilder;
use screener_core::error::DataError;
use screener_core::traits::SymbolSource;
use std::path::{Path, PathBuf};

/// Reads the `Symbol` column of a constituents CSV export.
///
/// The header is matched case-insensitively and blank entries are skipped.
#[derive(Debug, Clone)]
pub struct CsvSymbolList {
    path: PathBuf,
}

impl CsvSymbolList {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn read<R: std::io::Read>(reader: R) -> Result<Vec<String>, DataError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let column = reader
            .headers()
            .map_err(|e| DataError::ParseError(e.to_string()))?
            .iter()
            .position(|h| h.eq_ignore_ascii_case("symbol"))
            .ok_or_else(|| DataError::ParseError("no Symbol column".into()))?;

        let mut symbols = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| DataError::ParseError(e.to_string()))?;
            match record.get(column) {
                Some(symbol) if !symbol.is_empty() => symbols.push(symbol.to_string()),
                _ => {}
            }
        }
        Ok(symbols)
    }
}

impl SymbolSource for CsvSymbolList {
    fn symbols(&self) -> Result<Vec<String>, DataError> {
        let file = std::fs::File::open(&self.path)
            .map_err(|e| DataError::Internal(format!("{}: {}", self.path.display(), e)))?;
        Self::read(file)
    }
}

/// A fixed list, e.g. from a comma-separated command-line argument.
#[derive(Debug, Clone, Default)]
pub struct SymbolList(Vec<String>);

impl SymbolList {
    pub fn new(symbols: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self(symbols.into_iter().map(Into::into).collect())
    }

    /// Split `"AAPL, msft,,GOOG"` into trimmed, uppercased symbols.
    pub fn parse(list: &str) -> Self {
        Self(
            list.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_uppercase)
                .collect(),
        )
    }
}

impl SymbolSource for SymbolList {
    fn symbols(&self) -> Result<Vec<String>, DataError> {
        Ok(self.0.clone())
    }
}
