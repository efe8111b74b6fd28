//! Date/time pattern machinery for bucket naming.
//!
//! Patterns use the conventional letter syntax (`yyyy-MM-dd HH:mm:ss`,
//! `yyyyMM`, quoted `'literals'`) and are compiled once into `time` format
//! descriptions. Nothing here is mutated after construction.

mod granularity;
mod quick;

pub use granularity::Granularity;
pub use quick::QuickFormat;

use crate::error::RouteError;
use std::{fmt, num::NonZeroU8, sync::LazyLock};
use thiserror::Error as ThisError;
use time::{
    Date, Month, PrimitiveDateTime, Time,
    format_description::{self, OwnedFormatItem},
    parsing::Parsed,
};

///
/// CONSTANTS
///

/// Input pattern assumed when no `date-pattern` is configured.
pub const DEFAULT_DATE_PATTERN: &str = "yyyy-MM-dd HH:mm:ss";

/// Date-only prefix of the default pattern.
pub const DEFAULT_DATE_ONLY_PATTERN: &str = "yyyy-MM-dd";

// Prefixes of the default pattern that end on a field boundary, shortest first.
const DEFAULT_PATTERN_PREFIXES: [&str; 6] = [
    "yyyy",
    "yyyy-MM",
    DEFAULT_DATE_ONLY_PATTERN,
    "yyyy-MM-dd HH",
    "yyyy-MM-dd HH:mm",
    DEFAULT_DATE_PATTERN,
];

// Longest value the default pattern can consume; longer values are truncated.
const FIT_MAX_LEN: usize = DEFAULT_DATE_PATTERN.len();

// Two-digit years are read in this century.
const TWO_DIGIT_YEAR_BASE: i32 = 2000;

static DEFAULT_PATTERN: LazyLock<DatePattern> = LazyLock::new(|| {
    DatePattern::compile(DEFAULT_DATE_PATTERN).expect("default date pattern compiles")
});

static FIT_PATTERNS: LazyLock<Vec<DatePattern>> = LazyLock::new(|| {
    DEFAULT_PATTERN_PREFIXES
        .iter()
        .map(|source| DatePattern::compile(source).expect("default pattern prefix compiles"))
        .collect()
});

/// Shared default input pattern.
#[must_use]
pub fn default_pattern() -> &'static DatePattern {
    &DEFAULT_PATTERN
}

/// Best-effort parse against the default pattern.
///
/// Values longer than 19 characters are cut to fit `yyyy-MM-dd HH:mm:ss`.
/// Shorter values must be a prefix of it ending on a field boundary
/// (`yyyy`, `yyyy-MM`, ..., `yyyy-MM-dd HH:mm`); missing fields take the
/// start of their period.
pub fn fit_parse(value: &str) -> Result<PrimitiveDateTime, RouteError> {
    let fitted = if value.len() > FIT_MAX_LEN {
        value
            .get(..FIT_MAX_LEN)
            .ok_or_else(|| RouteError::value_parse(value, DEFAULT_DATE_PATTERN))?
    } else {
        value
    };

    // every prefix pattern is as long as the values it matches
    let Some(pattern) = FIT_PATTERNS
        .iter()
        .find(|pattern| pattern.as_str().len() == fitted.len())
    else {
        return Err(RouteError::value_parse(value, DEFAULT_DATE_PATTERN));
    };

    pattern
        .parse(fitted)
        .ok_or_else(|| RouteError::value_parse(value, pattern.as_str()))
}

///
/// PatternError
///

#[derive(Debug, ThisError)]
pub enum PatternError {
    #[error("date pattern is empty")]
    Empty,

    #[error("unsupported field '{field}' in date pattern '{pattern}'")]
    UnsupportedField { pattern: String, field: String },

    #[error("unterminated quoted literal in date pattern '{pattern}'")]
    UnterminatedQuote { pattern: String },

    #[error("date pattern '{pattern}' is invalid: {message}")]
    Invalid { pattern: String, message: String },

    #[error("date pattern '{pattern}' cannot format {value}: {message}")]
    Format {
        pattern: String,
        value: String,
        message: String,
    },
}

///
/// DatePattern
///
/// One compiled letter pattern. Parsing requires the whole input to match;
/// fields the pattern does not carry default to the start of their period.
///

#[derive(Clone)]
pub struct DatePattern {
    source: String,
    format: OwnedFormatItem,
}

impl DatePattern {
    /// Compile a letter pattern, failing on unsupported letters or syntax.
    pub fn compile(source: &str) -> Result<Self, PatternError> {
        if source.is_empty() {
            return Err(PatternError::Empty);
        }

        let description = translate(source)?;
        let format = format_description::parse_owned::<2>(&description).map_err(|err| {
            PatternError::Invalid {
                pattern: source.to_string(),
                message: err.to_string(),
            }
        })?;

        Ok(Self {
            source: source.to_string(),
            format,
        })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Substring test against the pattern source.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.source.contains(needle)
    }

    #[must_use]
    pub fn parse(&self, value: &str) -> Option<PrimitiveDateTime> {
        let mut parsed = Parsed::new();
        let rest = parsed.parse_item(value.as_bytes(), &self.format).ok()?;
        if !rest.is_empty() {
            return None;
        }

        let year = match (parsed.year(), parsed.year_last_two()) {
            (Some(year), _) => year,
            (None, Some(last_two)) => TWO_DIGIT_YEAR_BASE + i32::from(last_two),
            (None, None) => return None,
        };
        let month = parsed.month().unwrap_or(Month::January);
        let day = parsed.day().map_or(1, NonZeroU8::get);

        let date = Date::from_calendar_date(year, month, day).ok()?;
        let time = Time::from_hms_nano(
            parsed.hour_24().unwrap_or(0),
            parsed.minute().unwrap_or(0),
            parsed.second().unwrap_or(0),
            parsed.subsecond().unwrap_or(0),
        )
        .ok()?;

        Some(PrimitiveDateTime::new(date, time))
    }

    pub fn format(&self, value: &PrimitiveDateTime) -> Result<String, PatternError> {
        value
            .format(&self.format)
            .map_err(|err| PatternError::Format {
                pattern: self.source.clone(),
                value: value.to_string(),
                message: err.to_string(),
            })
    }
}

impl fmt::Debug for DatePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DatePattern({})", self.source)
    }
}

impl fmt::Display for DatePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

///
/// Translation
///

// Translate a letter pattern into a version-2 `time` format description.
fn translate(source: &str) -> Result<String, PatternError> {
    let chars: Vec<char> = source.chars().collect();
    let mut out = String::with_capacity(source.len() * 4);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '\'' {
            i = translate_quoted(source, &chars, i, &mut out)?;
            continue;
        }

        if c.is_ascii_alphabetic() {
            let run = chars[i..].iter().take_while(|&&x| x == c).count();
            out.push_str(&component(source, c, run)?);
            i += run;
            continue;
        }

        push_literal(&mut out, c);
        i += 1;
    }

    Ok(out)
}

// Consume a quoted literal starting at `start`; returns the index after it.
fn translate_quoted(
    source: &str,
    chars: &[char],
    start: usize,
    out: &mut String,
) -> Result<usize, PatternError> {
    // '' outside a quote is a literal apostrophe
    if chars.get(start + 1) == Some(&'\'') {
        push_literal(out, '\'');
        return Ok(start + 2);
    }

    let mut j = start + 1;
    loop {
        match chars.get(j).copied() {
            None => {
                return Err(PatternError::UnterminatedQuote {
                    pattern: source.to_string(),
                });
            }
            Some('\'') if chars.get(j + 1) == Some(&'\'') => {
                push_literal(out, '\'');
                j += 2;
            }
            Some('\'') => return Ok(j + 1),
            Some(ch) => {
                push_literal(out, ch);
                j += 1;
            }
        }
    }
}

fn component(source: &str, letter: char, run: usize) -> Result<String, PatternError> {
    let item = match (letter, run) {
        ('y' | 'u', 2) => "[year repr:last_two]".to_string(),
        ('y' | 'u', _) => "[year]".to_string(),
        ('M', 1) => "[month padding:none]".to_string(),
        ('M', 2) => "[month]".to_string(),
        ('M', 3) => "[month repr:short]".to_string(),
        ('M', 4) => "[month repr:long]".to_string(),
        ('d', 1) => "[day padding:none]".to_string(),
        ('d', 2) => "[day]".to_string(),
        ('H', 1) => "[hour padding:none]".to_string(),
        ('H', 2) => "[hour]".to_string(),
        ('m', 1) => "[minute padding:none]".to_string(),
        ('m', 2) => "[minute]".to_string(),
        ('s', 1) => "[second padding:none]".to_string(),
        ('s', 2) => "[second]".to_string(),
        ('S', 1..=9) => format!("[subsecond digits:{run}]"),
        _ => {
            let field: String = std::iter::repeat_n(letter, run).collect();
            return Err(PatternError::UnsupportedField {
                pattern: source.to_string(),
                field,
            });
        }
    };

    Ok(item)
}

fn push_literal(out: &mut String, c: char) {
    if matches!(c, '[' | ']' | '\\') {
        out.push('\\');
    }
    out.push(c);
}
