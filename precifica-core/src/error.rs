//! The one fatal condition in the pipeline.

use thiserror::Error;

/// Derivation failure. Everything else in the pipeline degrades to zero;
/// only an impossible gross-up refuses to produce a price.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum PricingError {
    /// Tax plus card fee claim the whole final price (or more), so no final
    /// value satisfies `final × (1 − r) = value_before_taxes`.
    #[error("tax and card fee take {percent}% of the final price; the quote is undefined at 100% or more")]
    DeductionRateTooHigh { percent: f64 },
}
