use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::profile::PaymentTiming;
use crate::core::{Client, FaturaError, InvoiceScope, percent_of, round2};

/// Fee charged on a supplier invoice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedFee {
    /// Percentage applied.
    pub rate: Decimal,
    /// `round2(base × rate / 100)`.
    pub amount: Decimal,
}

/// Compute the operation or anticipation fee on `base`.
///
/// Fixed-fee clients use `taxaOperacao` (15% when unset). Variable-fee
/// clients need a `timing`; without one this fails with
/// [`FaturaError::PaymentTimingRequired`].
pub fn compute_fee(
    base: Decimal,
    client: &Client,
    timing: Option<PaymentTiming>,
) -> Result<AppliedFee, FaturaError> {
    let rate = client
        .fee
        .rate(timing)
        .ok_or_else(|| FaturaError::PaymentTimingRequired(client.id.clone()))?;
    let amount = percent_of(base, rate);
    tracing::debug!(client = %client.id, %base, %rate, %amount, "fee computed");
    Ok(AppliedFee { rate, amount })
}

/// Share of a complete invoice's fee that belongs to a parts-only or
/// services-only view.
///
/// The parts share is `round2(fee × parts / (parts + services))`; the
/// services share is the remainder, so both shares add up to `fee`.
pub fn prorate_fee(
    fee: Decimal,
    scope: InvoiceScope,
    discounted_parts: Decimal,
    discounted_services: Decimal,
) -> Decimal {
    let total = discounted_parts + discounted_services;
    if total.is_zero() {
        return Decimal::ZERO;
    }
    let parts_share = round2(fee * discounted_parts / total);
    match scope {
        InvoiceScope::Complete => fee,
        InvoiceScope::Parts => parts_share,
        InvoiceScope::Services => fee - parts_share,
    }
}
