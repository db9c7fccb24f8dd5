use chrono::{DateTime, TimeZone, Utc};

/// Half-open `[start, end)` range of a UTC calendar year, in epoch milliseconds.
pub fn year_bounds(year: i32) -> Option<(i64, i64)> {
    let start = Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).single()?;
    let end = Utc.with_ymd_and_hms(year.checked_add(1)?, 1, 1, 0, 0, 0).single()?;
    Some((start.timestamp_millis(), end.timestamp_millis()))
}

pub fn from_millis(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or_default()
}

pub fn to_millis(dt: DateTime<Utc>) -> i64 {
    dt.timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_year_bounds() {
        let (start, end) = year_bounds(2024).unwrap();
        assert_eq!(from_millis(start).year(), 2024);
        assert_eq!(from_millis(end).year(), 2025);
        assert_eq!(from_millis(end - 1).year(), 2024);
        // 2024 is a leap year
        assert_eq!(end - start, 366 * 24 * 3600 * 1000);
    }

    #[test]
    fn test_year_out_of_range() {
        assert_eq!(year_bounds(i32::MAX), None);
    }

    #[test]
    fn test_millis_round_trip() {
        let dt = Utc.with_ymd_and_hms(2023, 5, 17, 8, 30, 0).unwrap();
        assert_eq!(from_millis(to_millis(dt)), dt);
    }
}
