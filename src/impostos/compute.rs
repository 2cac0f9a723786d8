use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::table::{TaxKind, TaxRuleTable};
use crate::core::{Client, InvoiceScope, ServiceOrder, percent_of};

/// One withheld category on an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxLineItem {
    #[serde(rename = "tipo")]
    pub kind: TaxKind,
    /// Parts base the rate was applied to (zero outside the scope).
    #[serde(rename = "basePecas")]
    pub parts_base: Decimal,
    /// Services base the rate was applied to (zero outside the scope).
    #[serde(rename = "baseServicos")]
    pub services_base: Decimal,
    /// Rate applied to the parts side, in percent.
    #[serde(rename = "aliquotaPecas")]
    pub parts_rate: Decimal,
    /// Rate applied to the services side, in percent.
    #[serde(rename = "aliquotaServicos")]
    pub services_rate: Decimal,
    /// Cent-rounded amount withheld for this category.
    #[serde(rename = "valor")]
    pub amount: Decimal,
}

/// Result of [`compute_taxes`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub total: Decimal,
    /// Non-zero categories in `TaxKind::ALL` order.
    pub line_items: Vec<TaxLineItem>,
}

/// Compute the tax withheld on `orders` for `client`.
///
/// # Logic
///
/// 1. No table, or a client without tax categories → zero
/// 2. Orders whose supplier is under Simples Nacional contribute nothing
/// 3. Discounted parts and services are summed over the remaining orders,
///    restricted to `scope`
/// 4. Each category the client is subject to, in `TaxKind::ALL` order:
///    municipal and state/federal apply their per-side rate to each side
///    separately; withholding applies its flat rate to both sides combined
/// 5. Every rate application is rounded to cents before summing; zero
///    categories are left out of the line items
pub fn compute_taxes(
    orders: &[ServiceOrder],
    client: &Client,
    table: Option<&TaxRuleTable>,
    scope: InvoiceScope,
) -> TaxBreakdown {
    let Some(table) = table else {
        return TaxBreakdown::default();
    };
    if client.tax_kinds.is_empty() {
        return TaxBreakdown::default();
    }

    let (parts_base, services_base) = taxable_bases(orders, scope);
    if parts_base.is_zero() && services_base.is_zero() {
        return TaxBreakdown::default();
    }

    let mut breakdown = TaxBreakdown::default();
    for kind in TaxKind::ALL {
        if !client.applies(kind) {
            continue;
        }

        let (parts_rate, services_rate) = table.side_rates(kind);
        let amount = match kind {
            TaxKind::Withholding => percent_of(parts_base + services_base, parts_rate),
            _ => percent_of(parts_base, parts_rate) + percent_of(services_base, services_rate),
        };

        tracing::debug!(
            kind = kind.key(),
            %parts_base,
            %services_base,
            %amount,
            "tax category computed"
        );

        if amount.is_zero() {
            continue;
        }
        breakdown.total += amount;
        breakdown.line_items.push(TaxLineItem {
            kind,
            parts_base,
            services_base,
            parts_rate,
            services_rate,
            amount,
        });
    }

    breakdown
}

/// Discounted parts and services of the orders whose supplier is
/// "não optante", restricted to `scope`.
pub fn taxable_bases(orders: &[ServiceOrder], scope: InvoiceScope) -> (Decimal, Decimal) {
    orders
        .iter()
        .filter(|o| o.supplier.withholds_taxes())
        .map(|o| o.discounted_in(scope))
        .fold((Decimal::ZERO, Decimal::ZERO), |(p, s), (op, os)| {
            (p + op, s + os)
        })
}
