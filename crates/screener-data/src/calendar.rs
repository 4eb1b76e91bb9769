//! Trading calendars.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use csv::ReaderBuilder;
use screener_core::error::DataError;
use screener_core::traits::TradingCalendar;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

use crate::csv_source::parse_date;

/// Rule-based holidays a [`WeekdayCalendar`] skips on top of its listed ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HolidayRules {
    /// Weekends and listed holidays only
    #[default]
    None,
    /// NYSE full-day closures
    Nyse,
}

impl HolidayRules {
    /// Holidays the rules produce for one calendar year, ascending.
    pub fn holidays(&self, year: i32) -> Vec<NaiveDate> {
        match self {
            HolidayRules::None => Vec::new(),
            HolidayRules::Nyse => nyse_holidays(year),
        }
    }
}

/// NYSE full-day holidays observed in `year`.
///
/// A fixed-date holiday on a Saturday is observed the Friday before, and on a
/// Sunday the Monday after. New Year's Day is the exception: on a Saturday it
/// is not observed at all, so December 31 stays a trading day.
pub fn nyse_holidays(year: i32) -> Vec<NaiveDate> {
    let fixed = |month: u32, day: u32| NaiveDate::from_ymd_opt(year, month, day);
    let nth = |month: u32, weekday: Weekday, n: u8| {
        NaiveDate::from_weekday_of_month_opt(year, month, weekday, n)
    };

    let new_year = fixed(1, 1).and_then(|date| match date.weekday() {
        Weekday::Sat => None,
        Weekday::Sun => date.succ_opt(),
        _ => Some(date),
    });
    let good_friday = easter_sunday(year).map(|easter| easter - Duration::days(2));
    let memorial_day = nth(5, Weekday::Mon, 5).or_else(|| nth(5, Weekday::Mon, 4));
    let juneteenth = fixed(6, 19).filter(|_| year >= 2022).and_then(observed);

    let mut holidays: Vec<NaiveDate> = [
        new_year,
        nth(1, Weekday::Mon, 3),
        nth(2, Weekday::Mon, 3),
        good_friday,
        memorial_day,
        juneteenth,
        fixed(7, 4).and_then(observed),
        nth(9, Weekday::Mon, 1),
        nth(11, Weekday::Thu, 4),
        fixed(12, 25).and_then(observed),
    ]
    .into_iter()
    .flatten()
    .collect();
    holidays.sort();
    holidays
}

fn observed(date: NaiveDate) -> Option<NaiveDate> {
    match date.weekday() {
        Weekday::Sat => date.pred_opt(),
        Weekday::Sun => date.succ_opt(),
        _ => Some(date),
    }
}

/// Gregorian Easter Sunday (anonymous computus).
fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}

/// Monday to Friday, minus rule-based and listed exchange holidays.
#[derive(Debug, Clone, Default)]
pub struct WeekdayCalendar {
    rules: HolidayRules,
    holidays: BTreeSet<NaiveDate>,
}

impl WeekdayCalendar {
    /// Create a calendar with no holidays.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a calendar applying the NYSE holiday rules.
    pub fn nyse() -> Self {
        Self::new().with_rules(HolidayRules::Nyse)
    }

    /// Create a calendar that skips the given holidays.
    pub fn with_holidays(holidays: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            rules: HolidayRules::None,
            holidays: holidays.into_iter().collect(),
        }
    }

    /// Also skip the holidays produced by `rules`.
    pub fn with_rules(mut self, rules: HolidayRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn rules(&self) -> HolidayRules {
        self.rules
    }

    /// Listed holidays, ascending.
    pub fn holidays(&self) -> impl Iterator<Item = &NaiveDate> {
        self.holidays.iter()
    }

    pub fn is_trading_day(&self, date: NaiveDate) -> bool {
        is_weekday(date)
            && !self.holidays.contains(&date)
            && !self.rules.holidays(date.year()).contains(&date)
    }

    fn closed_days(&self, start: NaiveDate, end: NaiveDate) -> BTreeSet<NaiveDate> {
        let mut closed = self.holidays.clone();
        for year in start.year()..=end.year() {
            closed.extend(self.rules.holidays(year));
        }
        closed
    }
}

fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

impl TradingCalendar for WeekdayCalendar {
    fn trading_days(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<NaiveDate>, DataError> {
        let closed = self.closed_days(start, end);
        Ok(start
            .iter_days()
            .take_while(|date| *date <= end)
            .filter(|date| is_weekday(*date) && !closed.contains(date))
            .collect())
    }

    fn name(&self) -> &str {
        match self.rules {
            HolidayRules::None => "weekday",
            HolidayRules::Nyse => "nyse",
        }
    }
}

/// An explicit list of trading dates, e.g. an exported exchange schedule.
#[derive(Debug, Clone)]
pub struct DateListCalendar {
    dates: BTreeSet<NaiveDate>,
}

impl DateListCalendar {
    /// Create a calendar from a list of dates.
    pub fn new(dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            dates: dates.into_iter().collect(),
        }
    }

    /// Load dates from a file.
    ///
    /// Accepts either one date per line, or a CSV with a `date` column
    /// (header matched case-insensitively).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| DataError::Internal(format!("{}: {}", path.as_ref().display(), e)))?;
        Self::parse(&contents)
    }

    fn parse(contents: &str) -> Result<Self, DataError> {
        let header = contents.lines().next().unwrap_or_default();
        let has_header = header.split(',').any(|h| h.trim().eq_ignore_ascii_case("date"));

        let dates = if has_header {
            let mut reader = ReaderBuilder::new()
                .has_headers(true)
                .flexible(true)
                .trim(csv::Trim::All)
                .from_reader(contents.as_bytes());
            let column = reader
                .headers()
                .map_err(|e| DataError::ParseError(e.to_string()))?
                .iter()
                .position(|h| h.eq_ignore_ascii_case("date"))
                .ok_or_else(|| DataError::ParseError("no date column".into()))?;

            reader
                .records()
                .filter_map(|record| match record {
                    Ok(record) => record
                        .get(column)
                        .filter(|field| !field.is_empty())
                        .map(parse_date),
                    Err(e) => Some(Err(DataError::ParseError(e.to_string()))),
                })
                .collect::<Result<BTreeSet<_>, _>>()?
        } else {
            contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(parse_date)
                .collect::<Result<BTreeSet<_>, _>>()?
        };

        Ok(Self { dates })
    }

    /// Number of known trading dates.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

impl TradingCalendar for DateListCalendar {
    fn trading_days(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<NaiveDate>, DataError> {
        if start > end {
            return Ok(Vec::new());
        }
        Ok(self.dates.range(start..=end).copied().collect())
    }

    fn name(&self) -> &str {
        "date-list"
    }
}
