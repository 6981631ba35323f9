use std::fmt;

use crate::{Currency, ValidationError};

/// Largest amount in minor units that survives a round trip through `f64`.
const MAX_MINOR: i64 = (1 << 53) - 1;

/// Positive monetary value tagged with its [`Currency`].
///
/// The amount is kept as **integer minor units** (cents) so equality and
/// addition are exact; [`Money::amount`] gives the decimal view.
///
/// # Examples
///
/// ```rust
/// use engine::{Currency, Money};
///
/// let lunch = Money::new(25.555, Currency::Usd).unwrap();
/// assert_eq!(lunch.amount(), 25.56);
/// assert_eq!(lunch.to_string(), "25.56 USD");
///
/// assert!(Money::new(0.0, Currency::Usd).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Money {
    minor: i64,
    currency: Currency,
}

impl Money {
    /// Creates a value from a decimal amount, rounded to 2 fractional digits
    /// (half away from zero).
    ///
    /// Rejects non-positive and non-finite amounts, and amounts that round
    /// down to zero.
    pub fn new(amount: f64, currency: Currency) -> Result<Self, ValidationError> {
        Self::from_minor(Self::minor_units(amount)?, currency)
    }

    /// Rounds a decimal amount to minor units, applying the same rules as
    /// [`Money::new`] without picking a currency.
    pub fn minor_units(amount: f64) -> Result<i64, ValidationError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(ValidationError::new("amount", "Amount must be positive"));
        }

        let scaled = (amount * 100.0).round();
        if scaled > MAX_MINOR as f64 {
            return Err(ValidationError::new("amount", "Amount is too large"));
        }
        if scaled < 1.0 {
            return Err(ValidationError::new("amount", "Amount must be positive"));
        }

        Ok(scaled as i64)
    }

    /// Creates a value from integer minor units, as stored by the engine.
    pub fn from_minor(minor: i64, currency: Currency) -> Result<Self, ValidationError> {
        if minor <= 0 {
            return Err(ValidationError::new("amount", "Amount must be positive"));
        }
        if minor > MAX_MINOR {
            return Err(ValidationError::new("amount", "Amount is too large"));
        }
        Ok(Self { minor, currency })
    }

    /// Decimal amount with at most 2 fractional digits.
    #[must_use]
    pub fn amount(&self) -> f64 {
        self.minor as f64 / 100.0
    }

    /// Raw amount in minor units.
    #[must_use]
    pub const fn minor(&self) -> i64 {
        self.minor
    }

    #[must_use]
    pub const fn currency(&self) -> Currency {
        self.currency
    }

    /// Adds two values of the same currency.
    pub fn try_add(&self, other: &Money) -> Result<Money, ValidationError> {
        if self.currency != other.currency {
            return Err(ValidationError::new(
                "currency",
                "Cannot add money with different currencies",
            ));
        }

        let minor = self
            .minor
            .checked_add(other.minor)
            .ok_or_else(|| ValidationError::new("amount", "Amount is too large"))?;
        Self::from_minor(minor, self.currency)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let units = self.minor / 100;
        let cents = self.minor % 100;
        write!(f, "{units}.{cents:02} {}", self.currency)
    }
}
