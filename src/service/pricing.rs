//! Quotation totals.
//!
//! `subTotal` is the sum of `amount × quantity` over every line item,
//! `agencyFees = round(subTotal × agencyFeePercent) / 100` with the rounding
//! applied half-up before the division, and `grandTotal = subTotal + agencyFees`.

use serde::{Deserialize, Serialize};

use crate::model::quotation::{Category, Quotation};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct QuotationTotals {
    pub sub_total: f64,
    pub agency_fees: f64,
    pub grand_total: f64,
}

fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

pub fn sub_total(categories: &[Category]) -> f64 {
    categories
        .iter()
        .flat_map(|category| category.items.iter())
        .map(|item| item.line_total())
        .sum()
}

pub fn agency_fees(sub_total: f64, agency_fee_percent: f64) -> f64 {
    round_half_up(sub_total * agency_fee_percent) / 100.0
}

pub fn compute_totals(categories: &[Category], agency_fee_percent: f64) -> QuotationTotals {
    let sub_total = sub_total(categories);
    let agency_fees = agency_fees(sub_total, agency_fee_percent);
    QuotationTotals {
        sub_total,
        agency_fees,
        grand_total: sub_total + agency_fees,
    }
}

/// Discards whatever totals the quotation carried and recomputes them,
/// including every line item's `total`.
pub fn apply_totals(quotation: &mut Quotation) -> QuotationTotals {
    quotation.sub_total = 0.0;
    quotation.agency_fees = 0.0;
    quotation.grand_total = 0.0;
    for item in quotation.categories.iter_mut().flat_map(|c| c.items.iter_mut()) {
        item.total = item.line_total();
    }

    let totals = compute_totals(&quotation.categories, quotation.agency_fee_percent);
    quotation.sub_total = totals.sub_total;
    quotation.agency_fees = totals.agency_fees;
    quotation.grand_total = totals.grand_total;
    totals
}

pub fn check_fee_percent(agency_fee_percent: f64) -> Result<(), String> {
    if !agency_fee_percent.is_finite() || !(0.0..=100.0).contains(&agency_fee_percent) {
        return Err(format!(
            "Agency fee percent must be between 0 and 100, got {}",
            agency_fee_percent
        ));
    }
    Ok(())
}
