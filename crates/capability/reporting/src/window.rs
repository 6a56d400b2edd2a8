//! 报表窗口计算。
//!
//! 所有窗口均为 UTC 下的自然日/自然月，毫秒级闭区间：
//! 起点为 00:00:00.000，终点为 23:59:59.999。

use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};

/// 一天的毫秒数。
const DAY_MS: i64 = 86_400_000;

/// 自然日窗口（闭区间）。
pub fn day_window(date: NaiveDate) -> (i64, i64) {
    let start = date.and_time(NaiveTime::MIN).and_utc().timestamp_millis();
    (start, start + DAY_MS - 1)
}

/// 自然月窗口（闭区间）。
///
/// `month_index` 为 0 基（0 = 一月）；非法年月返回 None。
pub fn month_window(year: i32, month_index: u32) -> Option<(i64, i64)> {
    let month = month_index.checked_add(1)?;
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    let start = first.and_time(NaiveTime::MIN).and_utc().timestamp_millis();
    let end = next_first.and_time(NaiveTime::MIN).and_utc().timestamp_millis() - 1;
    Some((start, end))
}

/// 日报周期键：`YYYY-MM-DD`。
pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// 月报周期键：`YYYY-MM`。
pub fn month_key(year: i32, month_index: u32) -> String {
    format!("{year:04}-{:02}", month_index + 1)
}

/// 时间戳所属自然日的键（UTC）。
pub fn day_key_of_ms(ts_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ts_ms)
        .map(|at| at.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// 时间戳的进场小时（UTC，0-23）。
pub fn hour_of_ms(ts_ms: i64) -> u32 {
    DateTime::<Utc>::from_timestamp_millis(ts_ms)
        .map(|at| at.hour())
        .unwrap_or_default()
}

/// 窗口覆盖的自然日键列表（升序）。
pub fn day_keys_in_window(start_ms: i64, end_ms: i64) -> Vec<String> {
    let Some(start) = DateTime::<Utc>::from_timestamp_millis(start_ms) else {
        return Vec::new();
    };
    let Some(end) = DateTime::<Utc>::from_timestamp_millis(end_ms) else {
        return Vec::new();
    };
    let mut keys = Vec::new();
    let mut day = start.date_naive();
    let last = end.date_naive();
    while day <= last {
        keys.push(day_key(day));
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    keys
}

/// 时间戳所属日期（UTC），用于下载文件名。
pub fn date_of_ms(ts_ms: i64) -> Option<NaiveDate> {
    DateTime::<Utc>::from_timestamp_millis(ts_ms).map(|at| at.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_window_is_inclusive_millisecond_bounds() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).expect("date");
        let (start, end) = day_window(date);
        assert_eq!(end - start, DAY_MS - 1);
        assert_eq!(day_key_of_ms(start), "2024-03-15");
        assert_eq!(day_key_of_ms(end), "2024-03-15");
        assert_eq!(day_key_of_ms(end + 1), "2024-03-16");
    }

    #[test]
    fn month_window_respects_leap_years() {
        let (start, end) = month_window(2024, 1).expect("window");
        assert_eq!(day_keys_in_window(start, end).len(), 29);
        let (start, end) = month_window(2023, 1).expect("window");
        assert_eq!(day_keys_in_window(start, end).len(), 28);
    }

    #[test]
    fn month_window_rejects_bad_month_index() {
        assert!(month_window(2024, 12).is_none());
    }

    #[test]
    fn month_key_is_one_based() {
        assert_eq!(month_key(2024, 0), "2024-01");
        assert_eq!(month_key(2024, 11), "2024-12");
    }
}
