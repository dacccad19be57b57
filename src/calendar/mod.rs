//! Trading calendar: weekdays, holidays and session hours in the market timezone.
//!
//! Every operation takes the current instant explicitly so callers (and tests)
//! decide what "now" is.

pub mod holidays;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use chrono_tz::Tz;
use std::collections::BTreeSet;

use crate::config::{Config, TradingHours};

#[derive(Debug, Clone)]
pub struct TradingCalendar {
    hours: TradingHours,
    holidays: BTreeSet<NaiveDate>,
}

impl TradingCalendar {
    pub fn new(hours: TradingHours, holidays: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            hours,
            holidays: holidays.into_iter().collect(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.trading_hours.clone(), config.holidays.iter().copied())
    }

    pub fn timezone(&self) -> Tz {
        self.hours.timezone
    }

    pub fn local(&self, now: DateTime<Utc>) -> DateTime<Tz> {
        now.with_timezone(&self.hours.timezone)
    }

    pub fn local_date(&self, now: DateTime<Utc>) -> NaiveDate {
        self.local(now).date_naive()
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(&date)
    }

    /// Monday to Friday in the market timezone. Holidays are not consulted.
    pub fn is_trading_day(&self, now: DateTime<Utc>) -> bool {
        is_weekday(self.local_date(now))
    }

    /// Weekday, not a holiday, and local clock time within `[start, end)`.
    pub fn is_market_open(&self, now: DateTime<Utc>) -> bool {
        let local = self.local(now);
        let date = local.date_naive();
        if !is_weekday(date) || self.is_holiday(date) {
            return false;
        }
        let time = local.time();
        self.hours.start <= time && time < self.hours.end
    }

    /// Next session start after `now`, or `None` while the market is open.
    ///
    /// Rolls forward over weekends only: a holiday's session start is still
    /// returned, and `is_market_open` rejects it when the loop wakes up.
    pub fn next_trading_boundary(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if self.is_market_open(now) {
            return None;
        }
        let local = self.local(now);
        let mut date = local.date_naive();
        if !(is_weekday(date) && local.time() < self.hours.start) {
            date = date.succ_opt()?;
        }
        while !is_weekday(date) {
            date = date.succ_opt()?;
        }
        self.at_local(date, self.hours.start)
    }

    /// Instant of a local wall-clock time; the earliest one across a DST change.
    pub fn at_local(&self, date: NaiveDate, time: NaiveTime) -> Option<DateTime<Utc>> {
        let naive = date.and_time(time);
        let tz = self.hours.timezone;
        tz.from_local_datetime(&naive)
            .earliest()
            .or_else(|| tz.from_local_datetime(&(naive + Duration::hours(1))).earliest())
            .map(|dt| dt.with_timezone(&Utc))
    }
}

fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}
