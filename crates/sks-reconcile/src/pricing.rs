//! Pricing policy: supplier cost -> customer-facing sale price.
//!
//! Pure and deterministic. The markup multiplier is a constructor parameter
//! (micros-scaled), not business logic buried in the engine, so it can be
//! changed in config and tested independently.

use std::fmt;

use crate::types::MICROS_SCALE;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    /// A negative supplier cost reached the pricing transform.
    NegativeCost { cost_micros: i64 },
    /// The markup multiplier is zero or negative.
    InvalidMarkup { markup_micros: i64 },
    /// The computed sale price does not fit in i64 micros.
    Overflow { cost_micros: i64 },
}

impl fmt::Display for PricingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricingError::NegativeCost { cost_micros } => {
                write!(f, "supplier cost must be >= 0, got {cost_micros} micros")
            }
            PricingError::InvalidMarkup { markup_micros } => {
                write!(f, "markup must be > 0, got {markup_micros} micros")
            }
            PricingError::Overflow { cost_micros } => {
                write!(f, "sale price overflows for cost {cost_micros} micros")
            }
        }
    }
}

impl std::error::Error for PricingError {}

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// Fixed-markup pricing: `sale = round_to_unit(cost * markup)`.
///
/// The platform's price precision is whole currency units, so the computed
/// price is rounded to the nearest unit, half away from zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PricingPolicy {
    markup_micros: i64,
}

impl PricingPolicy {
    /// Multiplier reproducing the established behavior: x1.6, rounded to
    /// whole currency units.
    pub const DEFAULT_MARKUP_MICROS: i64 = 1_600_000;

    pub fn new(markup_micros: i64) -> Result<Self, PricingError> {
        if markup_micros <= 0 {
            return Err(PricingError::InvalidMarkup { markup_micros });
        }
        Ok(Self { markup_micros })
    }

    pub fn markup_micros(&self) -> i64 {
        self.markup_micros
    }

    /// Compute the sale price for a supplier cost, both in micros.
    ///
    /// A cost of exactly 0 is valid and yields 0. Negative cost is an error.
    pub fn compute_sale_price(&self, cost_micros: i64) -> Result<i64, PricingError> {
        if cost_micros < 0 {
            return Err(PricingError::NegativeCost { cost_micros });
        }

        // cost_micros * markup_micros is scaled by 1e12 per currency unit.
        // One combined rounding step (half up; operands are non-negative)
        // straight to whole units, then back to micros.
        let numer = cost_micros as i128 * self.markup_micros as i128;
        let denom = (MICROS_SCALE as i128) * (MICROS_SCALE as i128);
        let units = (numer + denom / 2) / denom;

        let sale_micros = units
            .checked_mul(MICROS_SCALE as i128)
            .and_then(|v| i64::try_from(v).ok())
            .ok_or(PricingError::Overflow { cost_micros })?;
        Ok(sale_micros)
    }
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            markup_micros: Self::DEFAULT_MARKUP_MICROS,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn units(n: i64) -> i64 {
        n * MICROS_SCALE
    }

    #[test]
    fn default_markup_reproduces_reference_prices() {
        let p = PricingPolicy::default();
        assert_eq!(p.compute_sale_price(units(100)).unwrap(), units(160));
        assert_eq!(p.compute_sale_price(units(120)).unwrap(), units(192));
    }

    #[test]
    fn zero_cost_yields_zero_price() {
        let p = PricingPolicy::default();
        assert_eq!(p.compute_sale_price(0).unwrap(), 0);
    }

    #[test]
    fn negative_cost_is_rejected() {
        let p = PricingPolicy::default();
        assert_eq!(
            p.compute_sale_price(-1),
            Err(PricingError::NegativeCost { cost_micros: -1 })
        );
    }

    #[test]
    fn rounds_to_whole_units_half_up() {
        let p = PricingPolicy::default();
        // 99.99 * 1.6 = 159.984 -> 160
        assert_eq!(p.compute_sale_price(99_990_000).unwrap(), units(160));
        // 4.5 * 1.6 = 7.2 -> 7
        assert_eq!(p.compute_sale_price(4_500_000).unwrap(), units(7));
        // 103.4375 * 1.6 = 165.5 -> 166 (half away from zero)
        assert_eq!(p.compute_sale_price(103_437_500).unwrap(), units(166));
    }

    #[test]
    fn custom_markup_is_honored() {
        // x2.0
        let p = PricingPolicy::new(2_000_000).unwrap();
        assert_eq!(p.compute_sale_price(units(50)).unwrap(), units(100));
    }

    #[test]
    fn non_positive_markup_is_rejected() {
        assert!(matches!(
            PricingPolicy::new(0),
            Err(PricingError::InvalidMarkup { .. })
        ));
        assert!(matches!(
            PricingPolicy::new(-1_000_000),
            Err(PricingError::InvalidMarkup { .. })
        ));
    }

    #[test]
    fn deterministic_for_equal_inputs() {
        let p = PricingPolicy::default();
        let a = p.compute_sale_price(123_456_000).unwrap();
        let b = p.compute_sale_price(123_456_000).unwrap();
        assert_eq!(a, b);
    }
}
