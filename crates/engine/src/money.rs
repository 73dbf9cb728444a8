use std::fmt;

use serde::{Deserialize, Serialize};

/// Money amount represented as **integer cents**.
///
/// Budget limits and spent amounts are always carried as cents to avoid
/// floating-point drift. The only floating value the engine produces is the
/// progress percentage, see [`MoneyCents::percent_of`].
///
/// # Examples
///
/// ```rust
/// use engine::MoneyCents;
///
/// let amount = MoneyCents::new(12_34);
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct MoneyCents(i64);

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Share of `limit` represented by `self`, in percent, rounded to two
    /// decimals. A non-positive limit yields `0.0`.
    ///
    /// ```rust
    /// use engine::MoneyCents;
    ///
    /// let spent = MoneyCents::new(250_00);
    /// assert_eq!(spent.percent_of(MoneyCents::new(1000_00)), 25.0);
    /// ```
    #[must_use]
    pub fn percent_of(self, limit: MoneyCents) -> f64 {
        if !limit.is_positive() {
            return 0.0;
        }
        let raw = self.0 as f64 / limit.0 as f64 * 100.0;
        (raw * 100.0).round() / 100.0
    }
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = abs / 100;
        let cents = abs % 100;
        write!(f, "{sign}{units}.{cents:02}")
    }
}

impl From<i64> for MoneyCents {
    fn from(value: i64) -> Self {
        Self(value)
    }
}
