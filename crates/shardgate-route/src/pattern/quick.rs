use std::ops::Range;

const YEAR: Range<usize> = 0..4;
const SHORT_YEAR: Range<usize> = 2..4;
const MONTH: Range<usize> = 5..7;
const DAY: Range<usize> = 8..10;

///
/// QuickFormat
///
/// Output patterns that can be produced by slicing a `yyyy-MM-dd...` value
/// at fixed offsets, skipping full date parsing.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum QuickFormat {
    YearMonthDay,
    YearMonth,
    Year,
    ShortYearMonthDay,
    ShortYearMonth,
    ShortYear,
    MonthDay,
    Month,
    Day,
}

impl QuickFormat {
    pub const ALL: [Self; 9] = [
        Self::YearMonthDay,
        Self::YearMonth,
        Self::Year,
        Self::ShortYearMonthDay,
        Self::ShortYearMonth,
        Self::ShortYear,
        Self::MonthDay,
        Self::Month,
        Self::Day,
    ];

    /// Match an output pattern exactly against the recognized set.
    #[must_use]
    pub fn from_pattern(pattern: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|code| code.pattern() == pattern)
    }

    #[must_use]
    pub const fn pattern(self) -> &'static str {
        match self {
            Self::YearMonthDay => "yyyyMMdd",
            Self::YearMonth => "yyyyMM",
            Self::Year => "yyyy",
            Self::ShortYearMonthDay => "yyMMdd",
            Self::ShortYearMonth => "yyMM",
            Self::ShortYear => "yy",
            Self::MonthDay => "MMdd",
            Self::Month => "MM",
            Self::Day => "dd",
        }
    }

    /// Shortest source value that carries every required field.
    #[must_use]
    pub const fn min_len(self) -> usize {
        match self {
            Self::YearMonthDay | Self::ShortYearMonthDay | Self::MonthDay | Self::Day => DAY.end,
            Self::YearMonth | Self::ShortYearMonth | Self::Month => MONTH.end,
            Self::Year | Self::ShortYear => YEAR.end,
        }
    }

    const fn fields(self) -> &'static [Range<usize>] {
        match self {
            Self::YearMonthDay => &[YEAR, MONTH, DAY],
            Self::YearMonth => &[YEAR, MONTH],
            Self::Year => &[YEAR],
            Self::ShortYearMonthDay => &[SHORT_YEAR, MONTH, DAY],
            Self::ShortYearMonth => &[SHORT_YEAR, MONTH],
            Self::ShortYear => &[SHORT_YEAR],
            Self::MonthDay => &[MONTH, DAY],
            Self::Month => &[MONTH],
            Self::Day => &[DAY],
        }
    }

    /// Slice the label out of `value`.
    ///
    /// Yields `None` when the value is too short or a sliced field is not
    /// all ASCII digits; the caller then falls back to a full parse.
    #[must_use]
    pub fn apply(self, value: &str) -> Option<String> {
        if value.len() < self.min_len() {
            return None;
        }

        let mut label = String::with_capacity(self.pattern().len());
        for range in self.fields() {
            let field = value.get(range.clone())?;
            if !field.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            label.push_str(field);
        }

        Some(label)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_exactly_the_fast_path_codes() {
        for code in QuickFormat::ALL {
            assert_eq!(QuickFormat::from_pattern(code.pattern()), Some(code));
        }

        assert_eq!(QuickFormat::from_pattern("yyyy-MM"), None);
        assert_eq!(QuickFormat::from_pattern("yyyyMMddHH"), None);
        assert_eq!(QuickFormat::from_pattern("YYYYMMDD"), None);
    }

    #[test]
    fn slices_fixed_offsets() {
        let value = "2024-03-09 17:20:00";

        assert_eq!(QuickFormat::YearMonthDay.apply(value).as_deref(), Some("20240309"));
        assert_eq!(QuickFormat::YearMonth.apply(value).as_deref(), Some("202403"));
        assert_eq!(QuickFormat::Year.apply(value).as_deref(), Some("2024"));
        assert_eq!(QuickFormat::ShortYearMonthDay.apply(value).as_deref(), Some("240309"));
        assert_eq!(QuickFormat::ShortYearMonth.apply(value).as_deref(), Some("2403"));
        assert_eq!(QuickFormat::ShortYear.apply(value).as_deref(), Some("24"));
        assert_eq!(QuickFormat::MonthDay.apply(value).as_deref(), Some("0309"));
        assert_eq!(QuickFormat::Month.apply(value).as_deref(), Some("03"));
        assert_eq!(QuickFormat::Day.apply(value).as_deref(), Some("09"));
    }

    #[test]
    fn short_values_fall_through() {
        assert_eq!(QuickFormat::YearMonthDay.apply("2024-03-0"), None);
        assert_eq!(QuickFormat::Day.apply("2024-03"), None);
        assert_eq!(QuickFormat::YearMonth.apply("2024-03").as_deref(), Some("202403"));
        assert_eq!(QuickFormat::Month.apply("2024-0"), None);
        assert_eq!(QuickFormat::ShortYear.apply("2024").as_deref(), Some("24"));
        assert_eq!(QuickFormat::Year.apply("202"), None);
    }

    #[test]
    fn non_digit_fields_fall_through() {
        assert_eq!(QuickFormat::YearMonthDay.apply("20240309xx"), None);
        assert_eq!(QuickFormat::Year.apply("abcd-01-01"), None);
        // multi-byte text must not panic on a char boundary
        assert_eq!(QuickFormat::YearMonthDay.apply("2024-é-09xx"), None);
    }
}
