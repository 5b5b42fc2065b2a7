use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Days between a period's start and its (inclusive) end.
const PERIOD_SPAN_DAYS: u64 = 14;

/// First day of the second half of a month.
const SECOND_HALF_START_DAY: u32 = 16;

/// A half-month window that payroll amounts are bucketed into.
///
/// The first half runs from the 1st to the 15th. The second half starts on the
/// 16th and always spans fifteen days, so in short months it ends in the next
/// month (2023-02-16 maps to 2023-02-16..=2023-03-02).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PayPeriod {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl PayPeriod {
    /// Resolves the period `date` belongs to.
    pub fn containing(date: NaiveDate) -> Self {
        let month_start = date - Days::new(u64::from(date.day0()));
        let start_date = if date.day() < SECOND_HALF_START_DAY {
            month_start
        } else {
            month_start + Days::new(u64::from(SECOND_HALF_START_DAY - 1))
        };

        Self {
            start_date,
            end_date: start_date + Days::new(PERIOD_SPAN_DAYS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case(ymd(2023, 3, 1), ymd(2023, 3, 1), ymd(2023, 3, 15))]
    #[case(ymd(2023, 3, 9), ymd(2023, 3, 1), ymd(2023, 3, 15))]
    #[case(ymd(2023, 3, 15), ymd(2023, 3, 1), ymd(2023, 3, 15))]
    #[case(ymd(2024, 2, 14), ymd(2024, 2, 1), ymd(2024, 2, 15))]
    fn first_half_starts_on_the_first(
        #[case] date: NaiveDate,
        #[case] start: NaiveDate,
        #[case] end: NaiveDate,
    ) {
        let period = PayPeriod::containing(date);
        assert_eq!(period.start_date, start);
        assert_eq!(period.end_date, end);
    }

    #[rstest]
    #[case(ymd(2023, 3, 16), ymd(2023, 3, 16), ymd(2023, 3, 30))]
    #[case(ymd(2023, 3, 31), ymd(2023, 3, 16), ymd(2023, 3, 30))]
    #[case(ymd(2023, 4, 30), ymd(2023, 4, 16), ymd(2023, 4, 30))]
    #[case(ymd(2023, 12, 20), ymd(2023, 12, 16), ymd(2023, 12, 30))]
    fn second_half_starts_on_the_sixteenth(
        #[case] date: NaiveDate,
        #[case] start: NaiveDate,
        #[case] end: NaiveDate,
    ) {
        let period = PayPeriod::containing(date);
        assert_eq!(period.start_date, start);
        assert_eq!(period.end_date, end);
    }

    #[rstest]
    #[case(ymd(2023, 2, 28), ymd(2023, 3, 2))]
    #[case(ymd(2024, 2, 29), ymd(2024, 3, 1))]
    fn second_half_of_short_month_runs_into_next_month(
        #[case] date: NaiveDate,
        #[case] end: NaiveDate,
    ) {
        let period = PayPeriod::containing(date);
        assert_eq!(period.start_date.day(), 16);
        assert_eq!(period.end_date, end);
    }

    #[test]
    fn every_day_of_a_year_resolves_to_a_fifteen_day_window() {
        let mut date = ymd(2023, 1, 1);
        while date.year() == 2023 {
            let period = PayPeriod::containing(date);
            assert_eq!(period.start_date.month(), date.month());
            assert_eq!((period.end_date - period.start_date).num_days(), 14);
            assert!(period.start_date <= date);
            if date.day() < 16 {
                assert_eq!(period.start_date.day(), 1);
            } else {
                assert_eq!(period.start_date.day(), 16);
            }
            date = date.succ_opt().unwrap();
        }
    }
}
