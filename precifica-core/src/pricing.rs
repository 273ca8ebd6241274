//! Pricing derivation: pure mapping from a [`QuoteInput`] to a [`Breakdown`].
//!
//! Stage order, each stage reading only earlier ones:
//! 1. labor totals from the task list
//! 2. office overhead spread over worked hours
//! 3. ad-hoc extra costs
//! 4. base cost = labor + overhead + extras
//! 5. technical surcharges (additive percent of base)
//! 6. profit on the adjusted value
//! 7. tax/card-fee gross-up (rates are shares of the *final* price, inverted
//!    algebraically, never applied forward)
//! 8-9. final value and unit prices
//! 10. discount on the fully loaded value
//! 11. margin against realized revenue (reporting only)
//!
//! Deterministic and total over sanitized inputs: every division guards its
//! denominator and yields 0 instead of a non-finite number. The single fatal
//! case is a combined deduction rate at or above 100%.

use serde::{Deserialize, Serialize};

use crate::error::PricingError;
use crate::model::{sanitize, QuoteInput};

/// Every subtotal of the pipeline plus the final figures. Recomputed whole
/// from the input bundle; holds no identity of its own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    pub total_hours: f64,
    pub total_tasks_cost: f64,

    pub office_hourly_rate: f64,
    pub total_office_cost: f64,

    pub total_extra_cost: f64,
    pub base_cost: f64,

    pub technical_adjustments_percent: f64,
    pub technical_adjustments_value: f64,
    pub value_with_technical_adjustments: f64,

    pub profit_value: f64,
    pub value_before_taxes: f64,

    pub taxes_and_fees_value: f64,
    pub final_value: f64,

    pub final_value_per_hour: f64,
    pub final_value_per_sq_meter: f64,

    pub discount_value: f64,
    pub discounted_final_value: f64,

    /// Margin over realized revenue (the discounted final), not over cost.
    pub profit_margin_percent: f64,
}

/// Guarded division: zero (or negative) denominators yield 0, never NaN/inf.
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Derive the full price breakdown for one input bundle.
pub fn derive_breakdown(input: &QuoteInput) -> Result<Breakdown, PricingError> {
    let total_hours: f64 = input.tasks.iter().map(|t| sanitize(t.hours)).sum();
    let total_tasks_cost: f64 = input.tasks.iter().map(|t| t.labor_cost()).sum();

    let office_hourly_rate = input.office_costs.hourly_rate();
    let total_office_cost = office_hourly_rate * total_hours;

    let total_extra_cost = input.extra_costs.total();

    let base_cost = total_tasks_cost + total_office_cost + total_extra_cost;

    let technical_adjustments_percent = input.technical_adjustments.combined_percent();
    let technical_adjustments_value = base_cost * technical_adjustments_percent / 100.0;
    let value_with_technical_adjustments = base_cost + technical_adjustments_value;

    let profit_percent = sanitize(input.final_adjustments.profit_percent);
    let profit_value = value_with_technical_adjustments * profit_percent / 100.0;
    let value_before_taxes = value_with_technical_adjustments + profit_value;

    // Deducted-from-final semantics: after taking tax + fee out of the final
    // price, value_before_taxes must remain. Inverting final × (1 − r) =
    // value_before_taxes breaks down at r >= 1.
    let deducted_percent = input.final_adjustments.deducted_percent();
    if deducted_percent >= 100.0 {
        return Err(PricingError::DeductionRateTooHigh {
            percent: deducted_percent,
        });
    }
    let rate = deducted_percent / 100.0;
    let taxes_and_fees_value = if rate > 0.0 {
        value_before_taxes / (1.0 - rate) - value_before_taxes
    } else {
        0.0
    };

    let final_value = value_before_taxes + taxes_and_fees_value;

    let final_value_per_hour = ratio(final_value, total_hours);
    let final_value_per_sq_meter = ratio(final_value, sanitize(input.project.area_m2));

    let discount_value = final_value * sanitize(input.discount_percent) / 100.0;
    let discounted_final_value = final_value - discount_value;

    let profit_margin_percent = if base_cost > 0.0 {
        ratio(discounted_final_value - base_cost, discounted_final_value) * 100.0
    } else {
        0.0
    };

    Ok(Breakdown {
        total_hours,
        total_tasks_cost,
        office_hourly_rate,
        total_office_cost,
        total_extra_cost,
        base_cost,
        technical_adjustments_percent,
        technical_adjustments_value,
        value_with_technical_adjustments,
        profit_value,
        value_before_taxes,
        taxes_and_fees_value,
        final_value,
        final_value_per_hour,
        final_value_per_sq_meter,
        discount_value,
        discounted_final_value,
        profit_margin_percent,
    })
}
