use std::collections::BTreeSet;

use crate::core::{Client, Direction, FaturaError, InvoiceScope, ServiceOrder};
use crate::impostos::TaxRuleTable;
use crate::taxas::PaymentTiming;

use super::summary::{InvoiceSummary, build_invoice_summary};

/// Check that `orders` can become one invoice of `direction` for `client`.
///
/// Rejects, in this order: an empty selection, orders of more than one
/// client, orders of another client, (supplier invoices) orders of more than
/// one supplier, repeated orders, orders whose status is not invoiceable or
/// that are already invoiced in this direction, and a variable-fee client
/// without a payment timing on a supplier invoice.
pub fn validate_selection(
    orders: &[ServiceOrder],
    direction: Direction,
    client: &Client,
    timing: Option<PaymentTiming>,
) -> Result<(), FaturaError> {
    if orders.is_empty() {
        return Err(FaturaError::EmptySelection);
    }

    let client_ids: BTreeSet<&str> = orders.iter().map(|o| o.client_id.as_str()).collect();
    if client_ids.len() > 1 {
        return Err(FaturaError::CrossClientSelection(
            client_ids.into_iter().map(String::from).collect(),
        ));
    }
    if let Some(found) = client_ids.first() {
        if *found != client.id {
            return Err(FaturaError::ClientMismatch {
                expected: client.id.clone(),
                found: (*found).to_string(),
            });
        }
    }

    if direction == Direction::Supplier {
        let supplier_ids: BTreeSet<&str> =
            orders.iter().map(|o| o.supplier.id.as_str()).collect();
        if supplier_ids.len() > 1 {
            return Err(FaturaError::CrossSupplierSelection(
                supplier_ids.into_iter().map(String::from).collect(),
            ));
        }
    }

    let mut seen = BTreeSet::new();
    for order in orders {
        if !seen.insert(order.code.as_str()) {
            return Err(FaturaError::Validation(format!(
                "order '{}' selected more than once",
                order.code
            )));
        }
        if !order.status.is_invoiceable() {
            return Err(FaturaError::NotEligible {
                code: order.code.clone(),
                status: order.status.label().to_string(),
            });
        }
        if order.is_invoiced(direction) {
            return Err(FaturaError::AlreadyInvoiced {
                code: order.code.clone(),
                direction: direction.label().to_string(),
            });
        }
    }

    if direction == Direction::Supplier && client.fee.requires_timing() && timing.is_none() {
        return Err(FaturaError::PaymentTimingRequired(client.id.clone()));
    }

    Ok(())
}

/// Validate a selection, build its complete summary, and refuse summaries
/// that must not be persisted.
///
/// This is the entry point for invoice generation: every rejection in
/// [`validate_selection`] happens before any total is computed, and a
/// negative after-tax or due amount surfaces as
/// [`FaturaError::InconsistentState`].
pub fn prepare_invoice(
    orders: &[ServiceOrder],
    direction: Direction,
    client: &Client,
    table: Option<&TaxRuleTable>,
    timing: Option<PaymentTiming>,
) -> Result<InvoiceSummary, FaturaError> {
    if let Err(err) = validate_selection(orders, direction, client, timing) {
        tracing::warn!(client = %client.id, direction = direction.label(), "selection rejected: {err}");
        return Err(err);
    }

    let summary = build_invoice_summary(
        orders,
        direction,
        client,
        table,
        timing,
        InvoiceScope::Complete,
    )?;
    summary.check_integrity()?;
    Ok(summary)
}
