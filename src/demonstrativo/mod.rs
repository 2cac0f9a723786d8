//! Plain-text invoice statement (demonstrativo).
//!
//! Renders computed amounts as they are; nothing here recomputes or
//! rounds a value differently from the summary.

use std::fmt::Write;

use rust_decimal::Decimal;

use crate::core::{Direction, format_brl};
use crate::fatura::{Fatura, InvoiceScope, InvoiceSummary};

const LABEL_WIDTH: usize = 30;
const VALUE_WIDTH: usize = 16;

/// Render the financial lines of a summary.
pub fn render_summary(summary: &InvoiceSummary) -> String {
    let mut out = String::new();
    let scope = match summary.scope {
        InvoiceScope::Complete => "Peças e serviços",
        InvoiceScope::Parts => "Somente peças",
        InvoiceScope::Services => "Somente serviços",
    };
    line(&mut out, "Escopo", scope);
    money(&mut out, "Valor bruto", summary.gross_parts + summary.gross_services);
    money(&mut out, "Desconto", summary.discount_total);
    money(&mut out, "Valor com desconto", summary.discounted_total);
    for item in &summary.tax_line_items {
        let label = if item.parts_rate == item.services_rate {
            format!("{} ({}%)", item.kind.label(), percent(item.parts_rate))
        } else {
            format!(
                "{} ({}% / {}%)",
                item.kind.label(),
                percent(item.parts_rate),
                percent(item.services_rate)
            )
        };
        money(&mut out, &label, item.amount);
    }
    money(&mut out, "Valor após impostos", summary.after_tax);
    if summary.direction == Direction::Supplier {
        let label = format!("Taxa ({}%)", percent(summary.fee_rate));
        money(&mut out, &label, summary.fee_total);
    }
    money(&mut out, "Valor devido", summary.amount_due);
    out
}

/// Render a full statement for an invoice.
pub fn render_statement(fatura: &Fatura) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Fatura {}", fatura.number);
    line(&mut out, "Tipo", fatura.direction.label());
    line(&mut out, "Emissão", &date(fatura.issue_date));
    if let Some(period) = &fatura.period {
        let text = format!("{} a {}", date(period.start), date(period.end));
        line(&mut out, "Período", &text);
    }
    if let Some(d) = fatura.expected_receipt {
        line(&mut out, "Previsão de recebimento", &date(d));
    }
    if let Some(d) = fatura.due_date {
        line(&mut out, "Vencimento", &date(d));
    }
    if let Some(timing) = fatura.payment_timing {
        line(&mut out, "Pagamento", timing.label());
    }
    line(&mut out, "Status", fatura.status().label());
    let numbers = fatura
        .orders
        .iter()
        .map(|a| a.order.number.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    line(&mut out, "Ordens", &numbers);
    rule(&mut out);
    out.push_str(&render_summary(&fatura.summary));
    rule(&mut out);
    money(&mut out, "Valor pago", fatura.amount_paid());
    money(&mut out, "Valor restante", fatura.amount_remaining());
    out
}

fn line(out: &mut String, label: &str, value: &str) {
    let _ = writeln!(
        out,
        "{label:<lw$}{value:>vw$}",
        lw = LABEL_WIDTH,
        vw = VALUE_WIDTH
    );
}

fn money(out: &mut String, label: &str, value: Decimal) {
    line(out, label, &format_brl(value));
}

fn rule(out: &mut String) {
    out.push_str(&"-".repeat(LABEL_WIDTH + VALUE_WIDTH));
    out.push('\n');
}

fn date(d: chrono::NaiveDate) -> String {
    d.format("%d/%m/%Y").to_string()
}

fn percent(rate: Decimal) -> String {
    rate.normalize().to_string().replace('.', ",")
}
