use crate::pattern::DatePattern;
use time::{Date, Month, PrimitiveDateTime};

///
/// Granularity
///
/// Calendar unit separating consecutive buckets, inferred from the output
/// pattern. The finest unit present wins, so `yyyyMMdd` steps daily.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Granularity {
    Day,
    Month,
    Year,
}

impl Granularity {
    /// Derive the step unit; `None` when the pattern names no calendar field.
    #[must_use]
    pub fn of(pattern: &DatePattern) -> Option<Self> {
        if pattern.contains("dd") {
            Some(Self::Day)
        } else if pattern.contains("MM") {
            Some(Self::Month)
        } else if pattern.contains("yy") {
            Some(Self::Year)
        } else {
            None
        }
    }

    /// Advance by one unit, keeping the time of day.
    ///
    /// Month and year steps clamp the day of month, so Jan 31 steps to the
    /// last day of February. Returns `None` past the supported calendar range.
    #[must_use]
    pub fn step(self, from: PrimitiveDateTime) -> Option<PrimitiveDateTime> {
        let date = match self {
            Self::Day => from.date().next_day()?,
            Self::Month => add_months(from.date(), 1)?,
            Self::Year => add_months(from.date(), 12)?,
        };

        Some(PrimitiveDateTime::new(date, from.time()))
    }
}

fn add_months(date: Date, months: i32) -> Option<Date> {
    let index = date.year().checked_mul(12)? + i32::from(u8::from(date.month())) - 1;
    let index = index.checked_add(months)?;

    let year = index.div_euclid(12);
    let month = u8::try_from(index.rem_euclid(12) + 1).ok()?;
    let month = Month::try_from(month).ok()?;

    let last_valid_day = (28..=31)
        .rev()
        .find(|&day| Date::from_calendar_date(year, month, day).is_ok())?;

    Date::from_calendar_date(year, month, date.day().min(last_valid_day)).ok()
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use time::Time;

    fn at(y: i32, m: u8, d: u8) -> PrimitiveDateTime {
        let month = Month::try_from(m).unwrap();
        PrimitiveDateTime::new(
            Date::from_calendar_date(y, month, d).unwrap(),
            Time::from_hms(13, 45, 0).unwrap(),
        )
    }

    fn granularity(source: &str) -> Option<Granularity> {
        Granularity::of(&DatePattern::compile(source).unwrap())
    }

    #[test]
    fn finest_field_wins() {
        assert_eq!(granularity("yyyyMMdd"), Some(Granularity::Day));
        assert_eq!(granularity("yyMMdd"), Some(Granularity::Day));
        assert_eq!(granularity("dd"), Some(Granularity::Day));
        assert_eq!(granularity("yyyyMM"), Some(Granularity::Month));
        assert_eq!(granularity("MM"), Some(Granularity::Month));
        assert_eq!(granularity("yyyy"), Some(Granularity::Year));
        assert_eq!(granularity("yy"), Some(Granularity::Year));
        assert_eq!(granularity("HH"), None);
    }

    #[test]
    fn day_step_rolls_over_month_and_leap_day() {
        assert_eq!(Granularity::Day.step(at(2024, 1, 31)), Some(at(2024, 2, 1)));
        assert_eq!(Granularity::Day.step(at(2024, 2, 28)), Some(at(2024, 2, 29)));
        assert_eq!(Granularity::Day.step(at(2023, 2, 28)), Some(at(2023, 3, 1)));
        assert_eq!(Granularity::Day.step(at(2024, 12, 31)), Some(at(2025, 1, 1)));
    }

    #[test]
    fn month_step_clamps_day_of_month() {
        assert_eq!(Granularity::Month.step(at(2024, 1, 31)), Some(at(2024, 2, 29)));
        assert_eq!(Granularity::Month.step(at(2023, 1, 31)), Some(at(2023, 2, 28)));
        assert_eq!(Granularity::Month.step(at(2024, 12, 15)), Some(at(2025, 1, 15)));
    }

    #[test]
    fn year_step_clamps_leap_day() {
        assert_eq!(Granularity::Year.step(at(2024, 2, 29)), Some(at(2025, 2, 28)));
        assert_eq!(Granularity::Year.step(at(2023, 6, 1)), Some(at(2024, 6, 1)));
    }

    #[test]
    fn step_past_calendar_range_is_none() {
        let last = PrimitiveDateTime::new(Date::MAX, Time::MIDNIGHT);

        assert_eq!(Granularity::Day.step(last), None);
        assert_eq!(Granularity::Month.step(last), None);
        assert_eq!(Granularity::Year.step(last), None);
    }
}
