//! Scope descriptors (which records a query aggregates) and pagination

use std::fmt;

use chrono::{Datelike, Months, NaiveDate, Weekday};

use super::error::{EngineError, EngineResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Day,
    Week,
    Month,
}

/// Inclusive date range with the granularity it was requested at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scope {
    granularity: Granularity,
    start: NaiveDate,
    end: NaiveDate,
}

impl Scope {
    pub fn day(date: NaiveDate) -> Self {
        Self {
            granularity: Granularity::Day,
            start: date,
            end: date,
        }
    }

    /// Month containing `date`
    pub fn month_of(date: NaiveDate) -> EngineResult<Self> {
        let start = date.with_day(1).ok_or_else(|| invalid_date(&date.to_string()))?;
        let end = start
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .ok_or_else(|| invalid_date(&date.to_string()))?;
        Ok(Self {
            granularity: Granularity::Month,
            start,
            end,
        })
    }

    /// ISO week (Monday to Sunday)
    pub fn iso_week(year: i32, week: u32) -> EngineResult<Self> {
        let bad = || EngineError::InvalidRequest(format!("Invalid week {}-{:02}", year, week));
        let start = NaiveDate::from_isoywd_opt(year, week, Weekday::Mon).ok_or_else(bad)?;
        let end = NaiveDate::from_isoywd_opt(year, week, Weekday::Sun).ok_or_else(bad)?;
        Ok(Self {
            granularity: Granularity::Week,
            start,
            end,
        })
    }

    /// Week containing `date`
    pub fn week_of(date: NaiveDate) -> EngineResult<Self> {
        let iso = date.iso_week();
        Self::iso_week(iso.year(), iso.week())
    }

    /// `YYYY-MM-DD` selects a day, `YYYY-MM` a month; anything else is rejected
    pub fn parse_date(value: &str) -> EngineResult<Self> {
        match value.len() {
            10 => NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map(Self::day)
                .map_err(|_| invalid_date(value)),
            7 => NaiveDate::parse_from_str(&format!("{}-01", value), "%Y-%m-%d")
                .map_err(|_| invalid_date(value))
                .and_then(Self::month_of),
            _ => Err(invalid_date(value)),
        }
    }

    /// `YYYY-WW`, ISO week numbering
    pub fn parse_week(value: &str) -> EngineResult<Self> {
        let bad = || EngineError::InvalidRequest(format!("Invalid week format {:?}, expected YYYY-WW", value));
        if value.len() != 7 {
            return Err(bad());
        }
        let (year, week) = value.split_once('-').ok_or_else(bad)?;
        let year: i32 = year.parse().map_err(|_| bad())?;
        let week: u32 = week.parse().map_err(|_| bad())?;
        Self::iso_week(year, week)
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

fn invalid_date(value: &str) -> EngineError {
    EngineError::InvalidRequest(format!(
        "Invalid date format {:?}, expected YYYY-MM-DD or YYYY-MM",
        value
    ))
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.granularity {
            Granularity::Day => write!(f, "day {}", self.start.format("%Y-%m-%d")),
            Granularity::Month => write!(f, "month {}", self.start.format("%Y-%m")),
            Granularity::Week => {
                let iso = self.start.iso_week();
                write!(f, "week {}-W{:02}", iso.year(), iso.week())
            }
        }
    }
}

/// Single-car selector; without a number it selects every car of the scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarScope {
    pub number: Option<String>,
    pub scope: Scope,
}

impl CarScope {
    pub fn parse(number: Option<String>, date: &str) -> EngineResult<Self> {
        let scope = Scope::parse_date(date)?;
        Ok(Self { number, scope })
    }
}

impl fmt::Display for CarScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.number {
            Some(number) => write!(f, "car {} on {}", number, self.scope),
            None => write!(f, "all cars on {}", self.scope),
        }
    }
}

/// 1-indexed page selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    pub const DEFAULT_LIMIT: u32 = 10;

    /// Both values optional; when present they must be positive
    pub fn new(page: Option<i64>, limit: Option<i64>) -> EngineResult<Self> {
        let positive = |value: Option<i64>, default: u32, name: &str| match value {
            None => Ok(default),
            Some(v) if v >= 1 => u32::try_from(v)
                .map_err(|_| EngineError::InvalidRequest(format!("{} is too large", name))),
            Some(v) => Err(EngineError::InvalidRequest(format!(
                "{} must be a positive integer, got {}",
                name, v
            ))),
        };
        Ok(Self {
            page: positive(page, 1, "page")?,
            limit: positive(limit, Self::DEFAULT_LIMIT, "limit")?,
        })
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = usize::try_from(self.offset()).unwrap_or(usize::MAX).min(items.len());
        let end = start.saturating_add(self.limit as usize).min(items.len());
        &items[start..end]
    }
}
