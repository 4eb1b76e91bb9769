//! Price sources, trading calendars and symbol lists for the screener.

mod alpha_vantage;
mod calendar;
mod csv_source;
mod symbols;

pub use alpha_vantage::{AlphaVantageConfig, AlphaVantageSource, OutputSize, DEFAULT_BASE_URL};
pub use calendar::{nyse_holidays, DateListCalendar, HolidayRules, WeekdayCalendar};
pub use csv_source::CsvPriceSource;
pub use symbols::{CsvSymbolList, SymbolList};
