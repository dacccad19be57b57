//! Unit tests for the trading calendar

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use stockwatch::calendar::TradingCalendar;
use stockwatch::config::Config;

fn calendar() -> TradingCalendar {
    TradingCalendar::from_config(&Config::default())
}

fn ist(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    chrono_tz::Asia::Kolkata
        .with_ymd_and_hms(y, m, d, h, min, 0)
        .unwrap()
        .with_timezone(&Utc)
}

#[test]
fn test_saturday_morning_rolls_to_monday_open() {
    let cal = calendar();
    let saturday = ist(2025, 3, 8, 11, 0);
    assert!(!cal.is_market_open(saturday));
    assert!(!cal.is_trading_day(saturday));
    assert_eq!(cal.next_trading_boundary(saturday), Some(ist(2025, 3, 10, 9, 15)));
}

#[test]
fn test_weekends_closed_at_every_hour() {
    let cal = calendar();
    for day in [8, 9] {
        for hour in 0..24 {
            assert!(!cal.is_market_open(ist(2025, 3, day, hour, 30)));
        }
    }
}

#[test]
fn test_listed_holiday_is_closed_all_day() {
    let cal = calendar();
    assert!(cal.is_holiday(NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()));
    for hour in 0..24 {
        assert!(!cal.is_market_open(ist(2025, 3, 14, hour, 0)));
    }
    // the report gate only looks at the weekday
    assert!(cal.is_trading_day(ist(2025, 3, 14, 13, 0)));
}

#[test]
fn test_boundary_search_does_not_skip_holidays() {
    let cal = calendar();
    // Thursday after close; Friday 2025-03-14 is a holiday
    let boundary = cal.next_trading_boundary(ist(2025, 3, 13, 16, 0)).unwrap();
    assert_eq!(boundary, ist(2025, 3, 14, 9, 15));
    assert!(!cal.is_market_open(boundary));
}

#[test]
fn test_custom_holiday_list_replaces_defaults() {
    let mut config = Config::default();
    config.holidays = vec![NaiveDate::from_ymd_opt(2025, 3, 5).unwrap()];
    let cal = TradingCalendar::from_config(&config);
    assert!(!cal.is_market_open(ist(2025, 3, 5, 11, 0)));
    assert!(cal.is_market_open(ist(2025, 3, 14, 11, 0)));
}

#[test]
fn test_other_timezone_sessions() {
    let mut config = Config::default();
    config.trading_hours.timezone = chrono_tz::America::New_York;
    config.trading_hours.start = chrono::NaiveTime::from_hms_opt(9, 30, 0).unwrap();
    config.trading_hours.end = chrono::NaiveTime::from_hms_opt(16, 0, 0).unwrap();
    config.holidays.clear();
    let cal = TradingCalendar::from_config(&config);

    // 2025-03-05 15:00 UTC is 10:00 EST
    assert!(cal.is_market_open(Utc.with_ymd_and_hms(2025, 3, 5, 15, 0, 0).unwrap()));
    assert!(!cal.is_market_open(Utc.with_ymd_and_hms(2025, 3, 5, 21, 30, 0).unwrap()));
}
