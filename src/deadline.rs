//! Human-readable time left until a task or project deadline.

use chrono::{Datelike, NaiveDate};

pub fn is_overdue(deadline: NaiveDate, today: NaiveDate) -> bool {
    deadline < today
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(30)
}

fn plural(count: i64, unit: &str) -> Option<String> {
    match count {
        c if c <= 0 => None,
        1 => Some(format!("1 {}", unit)),
        c => Some(format!("{} {}s", c, unit)),
    }
}

/// Calendar distance from `today` to `deadline`, e.g.
/// `"1 year 2 months 3 days remaining"`.
///
/// Days borrow from the length of the month before `today`'s month.
pub fn time_remaining(deadline: NaiveDate, today: NaiveDate) -> String {
    if is_overdue(deadline, today) {
        return "Time is overdue".to_string();
    }

    let mut years = i64::from(deadline.year() - today.year());
    let mut months = i64::from(deadline.month()) - i64::from(today.month());
    let mut days = i64::from(deadline.day()) - i64::from(today.day());

    if days < 0 {
        let (prev_year, prev_month) = if today.month() == 1 {
            (today.year() - 1, 12)
        } else {
            (today.year(), today.month() - 1)
        };
        days += i64::from(days_in_month(prev_year, prev_month));
        months -= 1;
    }
    if months < 0 {
        months += 12;
        years -= 1;
    }

    let parts: Vec<String> = [plural(years, "year"), plural(months, "month"), plural(days, "day")]
        .into_iter()
        .flatten()
        .collect();

    if parts.is_empty() {
        "Due today".to_string()
    } else {
        format!("{} remaining", parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_overdue() {
        assert!(is_overdue(date(2025, 1, 1), date(2025, 1, 2)));
        assert!(!is_overdue(date(2025, 1, 2), date(2025, 1, 2)));
        assert_eq!(time_remaining(date(2024, 12, 31), date(2025, 1, 1)), "Time is overdue");
    }

    #[test]
    fn test_due_today() {
        assert_eq!(time_remaining(date(2025, 5, 5), date(2025, 5, 5)), "Due today");
    }

    #[test]
    fn test_single_day() {
        assert_eq!(time_remaining(date(2025, 5, 6), date(2025, 5, 5)), "1 day remaining");
    }

    #[test]
    fn test_years_months_days() {
        assert_eq!(
            time_remaining(date(2026, 7, 8), date(2025, 5, 5)),
            "1 year 2 months 3 days remaining"
        );
    }

    #[test]
    fn test_zero_parts_are_omitted() {
        assert_eq!(time_remaining(date(2027, 5, 5), date(2025, 5, 5)), "2 years remaining");
        assert_eq!(time_remaining(date(2025, 6, 5), date(2025, 5, 5)), "1 month remaining");
    }

    #[test]
    fn test_day_borrow_uses_previous_month_length() {
        // March 20 -> April 10: borrow February 2025 (28 days).
        assert_eq!(time_remaining(date(2025, 4, 10), date(2025, 3, 20)), "18 days remaining");
    }

    #[test]
    fn test_month_borrow_across_year_end() {
        assert_eq!(
            time_remaining(date(2026, 2, 1), date(2025, 11, 1)),
            "3 months remaining"
        );
        // January 15 -> February 5 borrows December (31 days).
        assert_eq!(time_remaining(date(2025, 2, 5), date(2025, 1, 15)), "21 days remaining");
    }

    #[test]
    fn test_days_in_month_leap_year() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(2025, 12), 31);
    }
}
