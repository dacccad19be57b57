//! Exchange holidays on which the market stays closed all day.

use chrono::NaiveDate;

/// NSE trading holidays that fall on weekdays, as (year, month, day).
const NSE_HOLIDAYS: &[(i32, u32, u32)] = &[
    // 2025
    (2025, 2, 26),
    (2025, 3, 14),
    (2025, 3, 31),
    (2025, 4, 10),
    (2025, 4, 14),
    (2025, 4, 18),
    (2025, 5, 1),
    (2025, 8, 15),
    (2025, 8, 27),
    (2025, 10, 2),
    (2025, 10, 21),
    (2025, 10, 22),
    (2025, 11, 5),
    (2025, 12, 25),
    // 2026
    (2026, 1, 26),
    (2026, 3, 3),
    (2026, 3, 26),
    (2026, 3, 31),
    (2026, 4, 3),
    (2026, 4, 14),
    (2026, 5, 1),
    (2026, 5, 28),
    (2026, 6, 26),
    (2026, 9, 14),
    (2026, 10, 2),
    (2026, 10, 20),
    (2026, 11, 10),
    (2026, 11, 24),
    (2026, 12, 25),
];

pub fn default_holidays() -> Vec<NaiveDate> {
    NSE_HOLIDAYS
        .iter()
        .filter_map(|&(y, m, d)| NaiveDate::from_ymd_opt(y, m, d))
        .collect()
}
