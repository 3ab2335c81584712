// Millisecond durations held in exact tenths
//
// Task self times are rounded to one decimal place when extracted. Storing
// them as integer tenths keeps every later sum exact, so totals per URL, per
// category, and overall always agree.

use serde::{Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Non-breaking space between value and unit
const UNIT_SEPARATOR: char = '\u{a0}';

/// A non-negative duration in tenths of a millisecond
///
/// Addition saturates instead of wrapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Millis(u64);

impl Millis {
    pub const ZERO: Millis = Millis(0);

    pub const fn from_tenths(tenths: u64) -> Self {
        Millis(tenths)
    }

    pub const fn from_whole_ms(ms: u64) -> Self {
        Millis(ms * 10)
    }

    /// Round a millisecond value to one decimal place
    ///
    /// Negative and non-finite inputs clamp to zero.
    pub fn from_ms(ms: f64) -> Self {
        if !ms.is_finite() || ms <= 0.0 {
            return Millis::ZERO;
        }
        Millis((ms * 10.0).round() as u64)
    }

    pub const fn tenths(self) -> u64 {
        self.0
    }

    pub fn as_ms(self) -> f64 {
        self.0 as f64 / 10.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Format with thousands separators, rounded to `granularity` milliseconds
    ///
    /// ```
    /// use arranque::bootup::Millis;
    ///
    /// let ms = Millis::from_ms(1234.56);
    /// assert_eq!(ms.format(0.1), "1,234.6\u{a0}ms");
    /// assert_eq!(ms.format(10.0), "1,230\u{a0}ms");
    /// ```
    pub fn format(self, granularity: f64) -> String {
        format_millis(self.as_ms(), granularity)
    }
}

impl Add for Millis {
    type Output = Millis;

    fn add(self, rhs: Millis) -> Millis {
        Millis(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Millis {
    fn add_assign(&mut self, rhs: Millis) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sum for Millis {
    fn sum<I: Iterator<Item = Millis>>(iter: I) -> Millis {
        iter.fold(Millis::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Millis> for Millis {
    fn sum<I: Iterator<Item = &'a Millis>>(iter: I) -> Millis {
        iter.copied().sum()
    }
}

impl fmt::Display for Millis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(0.1))
    }
}

/// Serialized as a plain millisecond number
impl Serialize for Millis {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_ms())
    }
}

/// Format a millisecond value for display, e.g. `1,500.4 ms`
///
/// The value is rounded to the nearest multiple of `granularity`; the number
/// of decimals shown follows the granularity (0.1 → one decimal, ≥1 → none).
pub fn format_millis(ms: f64, granularity: f64) -> String {
    let granularity = if granularity > 0.0 { granularity } else { 1.0 };
    let decimals = if granularity >= 1.0 {
        0
    } else {
        (-granularity.log10()).ceil() as usize
    };

    let rounded = (ms / granularity).round() * granularity;
    let text = format!("{:.*}", decimals, rounded.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (text.as_str(), None),
    };

    let mut out = String::new();
    if rounded < 0.0 {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac_part) = frac_part {
        out.push('.');
        out.push_str(frac_part);
    }
    out.push(UNIT_SEPARATOR);
    out.push_str("ms");
    out
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
