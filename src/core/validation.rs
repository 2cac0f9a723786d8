use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::error::ValidationError;
use super::money::apply_discount;
use super::types::*;
use crate::fatura::InvoiceSummary;

/// Validate a stored service order: non-negative values, discount ranges,
/// and the discount invariant.
/// Returns all validation errors found (not just the first).
pub fn validate_order(order: &ServiceOrder) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let prefix = format!("orders[{}]", order.code);

    if order.code.trim().is_empty() {
        errors.push(ValidationError::new("codigo", "order code must not be empty"));
    }

    for (field, value) in [
        ("valorPecas", order.gross_parts),
        ("valorServico", order.gross_services),
        ("valorPecasComDesconto", order.discounted_parts),
        ("valorServicoComDesconto", order.discounted_services),
        ("valorFinal", order.final_value),
    ] {
        if value < Decimal::ZERO {
            errors.push(ValidationError::new(
                format!("{prefix}.{field}"),
                format!("amount {value} must not be negative"),
            ));
        }
        check_decimal_places(&value, &format!("{prefix}.{field}"), &mut errors);
    }

    check_side(
        &prefix,
        "Pecas",
        order.gross_parts,
        order.parts_discount_pct,
        order.discounted_parts,
        &mut errors,
    );
    check_side(
        &prefix,
        "Servico",
        order.gross_services,
        order.services_discount_pct,
        order.discounted_services,
        &mut errors,
    );

    // Cent-rounded at each discount step, not on the sum
    let expected_final = order.discounted_parts + order.discounted_services;
    if order.final_value != expected_final {
        errors.push(ValidationError::new(
            format!("{prefix}.valorFinal"),
            format!(
                "final value {} does not match discounted parts {} + discounted services {}",
                order.final_value, order.discounted_parts, order.discounted_services
            ),
        ));
    }

    errors
}

fn check_side(
    prefix: &str,
    side: &str,
    gross: Decimal,
    discount_pct: Decimal,
    discounted: Decimal,
    errors: &mut Vec<ValidationError>,
) {
    if discount_pct < Decimal::ZERO || discount_pct > dec!(100) {
        errors.push(ValidationError::new(
            format!("{prefix}.desconto{side}Perc"),
            format!("discount {discount_pct}% is outside 0–100"),
        ));
        return;
    }

    if discounted > gross {
        errors.push(ValidationError::new(
            format!("{prefix}.valor{side}ComDesconto"),
            format!("discounted value {discounted} exceeds gross value {gross}"),
        ));
    }

    let expected = apply_discount(gross, discount_pct);
    if discounted != expected {
        errors.push(ValidationError::new(
            format!("{prefix}.valor{side}ComDesconto"),
            format!(
                "discounted value {discounted} does not match {gross} less {discount_pct}% ({expected})"
            ),
        ));
    }
}

/// Validate the arithmetic of a computed invoice summary.
///
/// Checks every pipeline step and that no resulting amount is negative.
/// A negative after-tax or due amount means rates or order data upstream are
/// misconfigured; it is reported, never clamped.
pub fn validate_summary(summary: &InvoiceSummary) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let expected_discounted = summary.discounted_parts + summary.discounted_services;
    if summary.discounted_total != expected_discounted {
        errors.push(ValidationError::new(
            "valorComDesconto",
            format!(
                "discounted total {} does not match parts {} + services {}",
                summary.discounted_total, summary.discounted_parts, summary.discounted_services
            ),
        ));
    }

    let expected_discount =
        summary.gross_parts + summary.gross_services - summary.discounted_total;
    if summary.discount_total != expected_discount {
        errors.push(ValidationError::new(
            "descontoTotal",
            format!(
                "discount total {} does not match gross minus discounted {}",
                summary.discount_total, expected_discount
            ),
        ));
    }

    let line_items_total: Decimal = summary.tax_line_items.iter().map(|l| l.amount).sum();
    if summary.tax_total != line_items_total {
        errors.push(ValidationError::new(
            "valorImpostos",
            format!(
                "tax total {} does not match sum of line items {}",
                summary.tax_total, line_items_total
            ),
        ));
    }

    let expected_after_tax = summary.discounted_total - summary.tax_total;
    if summary.after_tax != expected_after_tax {
        errors.push(ValidationError::new(
            "valorAposImpostos",
            format!(
                "after-tax amount {} does not match {} - {}",
                summary.after_tax, summary.discounted_total, summary.tax_total
            ),
        ));
    }

    let expected_due = summary.after_tax - summary.fee_total;
    if summary.amount_due != expected_due {
        errors.push(ValidationError::new(
            "valorDevido",
            format!(
                "amount due {} does not match {} - {}",
                summary.amount_due, summary.after_tax, summary.fee_total
            ),
        ));
    }

    if summary.direction == Direction::Client && !summary.fee_total.is_zero() {
        errors.push(ValidationError::new(
            "valorTaxasOperacao",
            "client invoices never carry an operation fee",
        ));
    }

    for (field, value) in [
        ("descontoTotal", summary.discount_total),
        ("valorImpostos", summary.tax_total),
        ("valorTaxasOperacao", summary.fee_total),
        ("valorAposImpostos", summary.after_tax),
        ("valorDevido", summary.amount_due),
    ] {
        if value < Decimal::ZERO {
            errors.push(ValidationError::new(
                field,
                format!("amount {value} is negative"),
            ));
        }
    }

    errors
}

fn check_decimal_places(value: &Decimal, field: &str, errors: &mut Vec<ValidationError>) {
    let rounded = value.round_dp(2);
    if *value != rounded {
        errors.push(ValidationError::new(
            field,
            format!("amount {} has more than 2 decimal places", value),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::builder::ServiceOrderBuilder;

    fn order() -> ServiceOrder {
        ServiceOrderBuilder::new("OS-1", "1", "C-1", Supplier::new("F-1", "Oficina"))
            .parts(dec!(1000), dec!(10))
            .services(dec!(500), dec!(10))
            .build()
            .unwrap()
    }

    #[test]
    fn built_order_is_valid() {
        assert!(validate_order(&order()).is_empty());
    }

    #[test]
    fn detects_wrong_discounted_value() {
        let mut o = order();
        o.discounted_parts = dec!(901);
        o.final_value = dec!(1351);
        let errors = validate_order(&o);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].field.ends_with("valorPecasComDesconto"));
        assert!(errors[0].message.contains("does not match"));
    }

    #[test]
    fn detects_final_value_mismatch() {
        let mut o = order();
        o.final_value = dec!(1349.99);
        let errors = validate_order(&o);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].field.ends_with("valorFinal"));
    }

    #[test]
    fn detects_discount_out_of_range() {
        let mut o = order();
        o.services_discount_pct = dec!(120);
        let errors = validate_order(&o);
        assert!(errors.iter().any(|e| e.field.ends_with("descontoServicoPerc")));
    }

    #[test]
    fn detects_excess_precision() {
        let mut o = order();
        o.gross_parts = dec!(1000.001);
        let errors = validate_order(&o);
        assert!(errors.iter().any(|e| e.message.contains("more than 2 decimal places")));
    }
}
