//! Value formats which a column can offer for its cells.
//!
//! A `ValueFormat` is the persisted key, the matching `ValueFormatter` does the printing.
//! All formatters are stateless statics, resolving a format never fails.

use std::fmt;

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, EnumIter, IntoStaticStr,
)]
pub enum ValueFormat {
    /// Number without fraction digits
    #[strum(serialize = "NUMBER_1_0")]
    Number0,
    #[strum(serialize = "NUMBER_1_1")]
    Number1,
    #[strum(serialize = "NUMBER_1_2")]
    Number2,
    #[strum(serialize = "NUMBER_1_3")]
    Number3,
    /// Seconds shown as full hours
    #[strum(serialize = "TIME_HH")]
    TimeHh,
    #[strum(serialize = "TIME_HH_MM")]
    TimeHhMm,
    #[strum(serialize = "TIME_HH_MM_SS")]
    TimeHhMmSs,
    /// Seconds per distance unit shown as minutes and seconds
    #[strum(serialize = "PACE_MM_SS")]
    PaceMmSs,
    #[strum(serialize = "CALORIES_CAL")]
    CaloriesCal,
    #[strum(serialize = "CALORIES_KCAL")]
    CaloriesKcal,
    #[strum(serialize = "TEXT")]
    Text,
}

impl ValueFormat {
    /// Persisted spelling, e.g. `TIME_HH_MM`.
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Parses a persisted name, unknown names are no format.
    pub fn from_name(name: &str) -> Option<Self> {
        name.trim().parse().ok()
    }
}

pub trait ValueFormatter: fmt::Debug + Sync {
    fn print_long(&self, value: i64) -> String;
    fn print_double(&self, value: f64) -> String;
}

/// Used when neither the profile nor the column has a format.
#[derive(Debug)]
pub struct DefaultFormatter;

impl ValueFormatter for DefaultFormatter {
    fn print_long(&self, value: i64) -> String {
        value.to_string()
    }

    fn print_double(&self, value: f64) -> String {
        value.to_string()
    }
}

#[derive(Debug)]
pub struct NumberFormatter {
    fraction_digits: usize,
}

impl ValueFormatter for NumberFormatter {
    fn print_long(&self, value: i64) -> String {
        format!("{:.*}", self.fraction_digits, value as f64)
    }

    fn print_double(&self, value: f64) -> String {
        format!("{:.*}", self.fraction_digits, value)
    }
}

#[derive(Debug, Clone, Copy)]
enum TimePattern {
    Hours,
    HoursMinutes,
    HoursMinutesSeconds,
}

#[derive(Debug)]
pub struct TimeFormatter {
    pattern: TimePattern,
}

impl ValueFormatter for TimeFormatter {
    fn print_long(&self, value: i64) -> String {
        let sign = if value < 0 { "-" } else { "" };
        let seconds = value.unsigned_abs();
        let hours = seconds / 3600;
        let minutes = (seconds % 3600) / 60;
        match self.pattern {
            TimePattern::Hours => format!("{sign}{hours}"),
            TimePattern::HoursMinutes => format!("{sign}{hours}:{minutes:02}"),
            TimePattern::HoursMinutesSeconds => {
                format!("{sign}{hours}:{minutes:02}:{:02}", seconds % 60)
            }
        }
    }

    fn print_double(&self, value: f64) -> String {
        self.print_long(value.round() as i64)
    }
}

#[derive(Debug)]
pub struct PaceFormatter;

impl ValueFormatter for PaceFormatter {
    fn print_long(&self, value: i64) -> String {
        let sign = if value < 0 { "-" } else { "" };
        let seconds = value.unsigned_abs();
        format!("{sign}{}:{:02}", seconds / 60, seconds % 60)
    }

    fn print_double(&self, value: f64) -> String {
        self.print_long(value.round() as i64)
    }
}

/// Input is always in calories.
#[derive(Debug)]
pub struct CaloriesFormatter {
    is_kilo: bool,
}

impl ValueFormatter for CaloriesFormatter {
    fn print_long(&self, value: i64) -> String {
        self.print_double(value as f64)
    }

    fn print_double(&self, value: f64) -> String {
        if self.is_kilo {
            format!("{:.1}", value / 1000.0)
        } else {
            format!("{value:.0}")
        }
    }
}

#[derive(Debug)]
pub struct TextFormatter;

impl ValueFormatter for TextFormatter {
    fn print_long(&self, value: i64) -> String {
        value.to_string()
    }

    fn print_double(&self, value: f64) -> String {
        value.to_string()
    }
}

static DEFAULT: DefaultFormatter = DefaultFormatter;
static NUMBER_0: NumberFormatter = NumberFormatter { fraction_digits: 0 };
static NUMBER_1: NumberFormatter = NumberFormatter { fraction_digits: 1 };
static NUMBER_2: NumberFormatter = NumberFormatter { fraction_digits: 2 };
static NUMBER_3: NumberFormatter = NumberFormatter { fraction_digits: 3 };
static TIME_HH: TimeFormatter = TimeFormatter {
    pattern: TimePattern::Hours,
};
static TIME_HH_MM: TimeFormatter = TimeFormatter {
    pattern: TimePattern::HoursMinutes,
};
static TIME_HH_MM_SS: TimeFormatter = TimeFormatter {
    pattern: TimePattern::HoursMinutesSeconds,
};
static PACE_MM_SS: PaceFormatter = PaceFormatter;
static CALORIES_CAL: CaloriesFormatter = CaloriesFormatter { is_kilo: false };
static CALORIES_KCAL: CaloriesFormatter = CaloriesFormatter { is_kilo: true };
static TEXT: TextFormatter = TextFormatter;

pub fn resolve(format: ValueFormat) -> &'static dyn ValueFormatter {
    match format {
        ValueFormat::Number0 => &NUMBER_0,
        ValueFormat::Number1 => &NUMBER_1,
        ValueFormat::Number2 => &NUMBER_2,
        ValueFormat::Number3 => &NUMBER_3,
        ValueFormat::TimeHh => &TIME_HH,
        ValueFormat::TimeHhMm => &TIME_HH_MM,
        ValueFormat::TimeHhMmSs => &TIME_HH_MM_SS,
        ValueFormat::PaceMmSs => &PACE_MM_SS,
        ValueFormat::CaloriesCal => &CALORIES_CAL,
        ValueFormat::CaloriesKcal => &CALORIES_KCAL,
        ValueFormat::Text => &TEXT,
    }
}

pub fn default_formatter() -> &'static dyn ValueFormatter {
    &DEFAULT
}

/// Label for menus.
pub fn display_name(format: ValueFormat) -> &'static str {
    match format {
        ValueFormat::Number0 => "1",
        ValueFormat::Number1 => "1.1",
        ValueFormat::Number2 => "1.12",
        ValueFormat::Number3 => "1.123",
        ValueFormat::TimeHh => "hh",
        ValueFormat::TimeHhMm => "hh:mm",
        ValueFormat::TimeHhMmSs => "hh:mm:ss",
        ValueFormat::PaceMmSs => "mm:ss",
        ValueFormat::CaloriesCal => "cal",
        ValueFormat::CaloriesKcal => "kcal",
        ValueFormat::Text => "Text",
    }
}
