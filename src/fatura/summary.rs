use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{
    Client, Direction, FaturaError, InvoiceScope, ServiceOrder, ValidationError, join_errors,
    validate_summary,
};
use crate::impostos::{TaxLineItem, TaxRuleTable, compute_taxes};
use crate::taxas::{AppliedFee, PaymentTiming, compute_fee, prorate_fee};

/// Financial summary of an invoice view.
///
/// `valorComDesconto → valorAposImpostos → valorDevido`. Persisted onto the
/// invoice record as a snapshot; renderers display it as is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceSummary {
    #[serde(rename = "tipo")]
    pub direction: Direction,
    #[serde(rename = "escopo")]
    pub scope: InvoiceScope,
    #[serde(rename = "valorPecas")]
    pub gross_parts: Decimal,
    #[serde(rename = "valorServico")]
    pub gross_services: Decimal,
    #[serde(rename = "valorPecasComDesconto")]
    pub discounted_parts: Decimal,
    #[serde(rename = "valorServicoComDesconto")]
    pub discounted_services: Decimal,
    /// `valorComDesconto`.
    #[serde(rename = "valorComDesconto")]
    pub discounted_total: Decimal,
    /// `descontoTotal`: gross − discounted.
    #[serde(rename = "descontoTotal")]
    pub discount_total: Decimal,
    /// `valorImpostos`.
    #[serde(rename = "valorImpostos")]
    pub tax_total: Decimal,
    #[serde(rename = "impostos")]
    pub tax_line_items: Vec<TaxLineItem>,
    /// `valorAposImpostos`: discounted − taxes.
    #[serde(rename = "valorAposImpostos")]
    pub after_tax: Decimal,
    /// `valorTaxasOperacao`: zero on client invoices.
    #[serde(rename = "valorTaxasOperacao")]
    pub fee_total: Decimal,
    #[serde(rename = "feePercentApplied")]
    pub fee_rate: Decimal,
    /// `valorDevido`: after-tax − fee.
    #[serde(rename = "valorDevido")]
    pub amount_due: Decimal,
}

impl InvoiceSummary {
    /// Arithmetic and sign problems; empty for a consistent summary.
    pub fn integrity_issues(&self) -> Vec<ValidationError> {
        validate_summary(self)
    }

    /// [`FaturaError::InconsistentState`] if the summary must not be
    /// persisted.
    pub fn check_integrity(&self) -> Result<(), FaturaError> {
        let issues = self.integrity_issues();
        if issues.is_empty() {
            return Ok(());
        }
        let message = join_errors(&issues);
        tracing::warn!(
            direction = self.direction.label(),
            amount_due = %self.amount_due,
            after_tax = %self.after_tax,
            "{message}"
        );
        Err(FaturaError::InconsistentState(message))
    }
}

/// Complete, parts-only and services-only views of one invoice.
///
/// The two partial fees add up to the complete fee exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceViews {
    #[serde(rename = "completa")]
    pub complete: InvoiceSummary,
    #[serde(rename = "pecas")]
    pub parts: InvoiceSummary,
    #[serde(rename = "servicos")]
    pub services: InvoiceSummary,
}

/// Build the financial summary of `orders` as an invoice of `direction`.
///
/// # Pipeline
///
/// 1. Gross parts and services (restricted to `scope`)
/// 2. Discounted parts and services → `valorComDesconto`, `descontoTotal`
/// 3. Taxes with the same scope → `valorImpostos`
/// 4. `valorAposImpostos = valorComDesconto − valorImpostos`
/// 5. Supplier invoices only: fee on `valorAposImpostos`. Partial scopes
///    take their pro-rated share of the complete invoice's fee
/// 6. `valorDevido = valorAposImpostos − fee`
///
/// Fails only with [`FaturaError::PaymentTimingRequired`], before anything
/// is computed. Negative results are kept as computed; see
/// [`InvoiceSummary::check_integrity`].
pub fn build_invoice_summary(
    orders: &[ServiceOrder],
    direction: Direction,
    client: &Client,
    table: Option<&TaxRuleTable>,
    timing: Option<PaymentTiming>,
    scope: InvoiceScope,
) -> Result<InvoiceSummary, FaturaError> {
    ensure_timing(direction, client, timing)?;

    let fee = match (direction, scope) {
        (Direction::Client, _) => AppliedFee::default(),
        (Direction::Supplier, InvoiceScope::Complete) => {
            let after_tax = after_tax_of(orders, client, table, InvoiceScope::Complete);
            compute_fee(after_tax, client, timing)?
        }
        (Direction::Supplier, partial) => {
            let complete = build_invoice_summary(
                orders,
                direction,
                client,
                table,
                timing,
                InvoiceScope::Complete,
            )?;
            AppliedFee {
                rate: complete.fee_rate,
                amount: prorate_fee(
                    complete.fee_total,
                    partial,
                    complete.discounted_parts,
                    complete.discounted_services,
                ),
            }
        }
    };

    Ok(summarize(orders, direction, client, table, scope, fee))
}

/// Build all three views of one invoice in a single pass.
pub fn build_invoice_views(
    orders: &[ServiceOrder],
    direction: Direction,
    client: &Client,
    table: Option<&TaxRuleTable>,
    timing: Option<PaymentTiming>,
) -> Result<InvoiceViews, FaturaError> {
    let complete = build_invoice_summary(
        orders,
        direction,
        client,
        table,
        timing,
        InvoiceScope::Complete,
    )?;

    let partial = |scope| {
        let fee = AppliedFee {
            rate: complete.fee_rate,
            amount: prorate_fee(
                complete.fee_total,
                scope,
                complete.discounted_parts,
                complete.discounted_services,
            ),
        };
        summarize(orders, direction, client, table, scope, fee)
    };

    Ok(InvoiceViews {
        parts: partial(InvoiceScope::Parts),
        services: partial(InvoiceScope::Services),
        complete,
    })
}

fn ensure_timing(
    direction: Direction,
    client: &Client,
    timing: Option<PaymentTiming>,
) -> Result<(), FaturaError> {
    if direction == Direction::Supplier && client.fee.requires_timing() && timing.is_none() {
        tracing::warn!(client = %client.id, "supplier invoice without payment timing");
        return Err(FaturaError::PaymentTimingRequired(client.id.clone()));
    }
    Ok(())
}

fn after_tax_of(
    orders: &[ServiceOrder],
    client: &Client,
    table: Option<&TaxRuleTable>,
    scope: InvoiceScope,
) -> Decimal {
    let discounted: Decimal = orders
        .iter()
        .map(|o| {
            let (p, s) = o.discounted_in(scope);
            p + s
        })
        .sum();
    discounted - compute_taxes(orders, client, table, scope).total
}

fn summarize(
    orders: &[ServiceOrder],
    direction: Direction,
    client: &Client,
    table: Option<&TaxRuleTable>,
    scope: InvoiceScope,
    fee: AppliedFee,
) -> InvoiceSummary {
    let mut gross_parts = Decimal::ZERO;
    let mut gross_services = Decimal::ZERO;
    let mut discounted_parts = Decimal::ZERO;
    let mut discounted_services = Decimal::ZERO;
    for order in orders {
        let (gp, gs) = order.gross_in(scope);
        let (dp, ds) = order.discounted_in(scope);
        gross_parts += gp;
        gross_services += gs;
        discounted_parts += dp;
        discounted_services += ds;
    }

    let discounted_total = discounted_parts + discounted_services;
    let discount_total = gross_parts + gross_services - discounted_total;

    let taxes = compute_taxes(orders, client, table, scope);
    let after_tax = discounted_total - taxes.total;
    let amount_due = after_tax - fee.amount;

    tracing::debug!(
        direction = direction.label(),
        orders = orders.len(),
        %discounted_total,
        tax_total = %taxes.total,
        fee = %fee.amount,
        %amount_due,
        "invoice summary built"
    );

    InvoiceSummary {
        direction,
        scope,
        gross_parts,
        gross_services,
        discounted_parts,
        discounted_services,
        discounted_total,
        discount_total,
        tax_total: taxes.total,
        tax_line_items: taxes.line_items,
        after_tax,
        fee_total: fee.amount,
        fee_rate: fee.rate,
        amount_due,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ClientBuilder, ServiceOrderBuilder, Supplier};
    use crate::impostos::TaxKind;
    use crate::taxas::{AnticipationRates, FeeProfile};
    use rust_decimal_macros::dec;

    fn order() -> ServiceOrder {
        ServiceOrderBuilder::new(
            "OS-1",
            "1001",
            "C-1",
            Supplier::new("F-1", "Oficina").nao_optante_simples(true),
        )
        .parts(dec!(1000), dec!(10))
        .services(dec!(500), dec!(10))
        .build()
        .unwrap()
    }

    fn client() -> Client {
        ClientBuilder::new("C-1", "Cliente")
            .tax_kind(TaxKind::Withholding)
            .fee(FeeProfile::operation(dec!(15)))
            .build()
    }

    #[test]
    fn client_invoice_has_no_fee() {
        let table = TaxRuleTable::default().with_withholding(dec!(5));
        let s = build_invoice_summary(
            &[order()],
            Direction::Client,
            &client(),
            Some(&table),
            None,
            InvoiceScope::Complete,
        )
        .unwrap();
        assert_eq!(s.fee_total, dec!(0));
        assert_eq!(s.fee_rate, dec!(0));
        assert_eq!(s.amount_due, dec!(1282.50));
        assert!(s.integrity_issues().is_empty());
    }

    #[test]
    fn variable_fee_client_invoice_needs_no_timing() {
        let client = ClientBuilder::new("C-1", "Cliente")
            .fee(FeeProfile::variable(AnticipationRates::default()))
            .build();
        let s = build_invoice_summary(
            &[order()],
            Direction::Client,
            &client,
            None,
            None,
            InvoiceScope::Complete,
        );
        assert!(s.is_ok());
    }

    #[test]
    fn views_split_fee_exactly() {
        let table = TaxRuleTable::default().with_withholding(dec!(5));
        let views = build_invoice_views(
            &[order()],
            Direction::Supplier,
            &client(),
            Some(&table),
            None,
        )
        .unwrap();
        assert_eq!(views.complete.fee_total, dec!(192.38));
        assert_eq!(
            views.parts.fee_total + views.services.fee_total,
            views.complete.fee_total
        );
        assert_eq!(views.parts.scope, InvoiceScope::Parts);
        assert_eq!(views.parts.discounted_total, dec!(900));
        assert_eq!(views.services.discounted_total, dec!(450));
    }

    #[test]
    fn negative_result_is_reported_not_clamped() {
        let table = TaxRuleTable::default().with_withholding(dec!(90));
        let client = ClientBuilder::new("C-1", "Cliente")
            .tax_kind(TaxKind::Withholding)
            .fee(FeeProfile::operation(dec!(150)))
            .build();
        let s = build_invoice_summary(
            &[order()],
            Direction::Supplier,
            &client,
            Some(&table),
            None,
            InvoiceScope::Complete,
        )
        .unwrap();
        assert!(s.amount_due < Decimal::ZERO);
        assert!(matches!(
            s.check_integrity(),
            Err(FaturaError::InconsistentState(_))
        ));
    }
}
