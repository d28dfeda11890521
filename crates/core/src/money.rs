//! Money amounts in the smallest currency unit.

use core::iter::Sum;
use core::ops::{Add, AddAssign};
use serde::{Deserialize, Serialize};

/// Thousands separator used by [`Money::grouped`] (narrow no-break space).
const GROUP_SEPARATOR: char = '\u{202f}';

/// An amount of money stored as an integer number of kopecks/cents.
///
/// Storing the smallest unit makes `price × quantity` exact, so a line total is
/// always "rounded to 2 decimal places" without float drift.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub fn cents(self) -> i64 {
        self.0
    }

    /// Parse a decimal amount that may use either `,` or `.` as separator.
    ///
    /// Returns `None` for anything that is not a finite number. Sub-cent digits
    /// are rounded half away from zero.
    pub fn parse_decimal(raw: &str) -> Option<Self> {
        let normalized = raw.trim().replace(',', ".");
        if normalized.is_empty() {
            return None;
        }
        let value: f64 = normalized.parse().ok()?;
        if !value.is_finite() {
            return None;
        }
        Some(Self((value * 100.0).round() as i64))
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// `self × quantity`, saturating instead of overflowing.
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(i64::from(quantity)))
    }

    /// Apply a percentage surcharge, rounding half up to the cent.
    pub fn with_markup(self, percent: u32) -> Self {
        let scaled = i128::from(self.0) * (100 + i128::from(percent));
        let rounded = if scaled >= 0 {
            (scaled + 50) / 100
        } else {
            (scaled - 50) / 100
        };
        Self(rounded.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64)
    }

    /// Display form used in reports: `1 234,56` (narrow no-break space groups,
    /// comma decimals).
    pub fn grouped(self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = (abs / 100).to_string();
        let cents = abs % 100;

        let mut grouped = String::with_capacity(units.len() + units.len() / 3);
        for (i, ch) in units.chars().enumerate() {
            if i > 0 && (units.len() - i) % 3 == 0 {
                grouped.push(GROUP_SEPARATOR);
            }
            grouped.push(ch);
        }
        format!("{sign}{grouped},{cents:02}")
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        *self = *self + rhs;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}
