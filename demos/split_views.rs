use fatura::core::*;
use fatura::fatura::*;
use fatura::impostos::{RateSet, SplitRates, TaxKind, TaxRuleTable};
use fatura::taxas::{AnticipationRates, FeeProfile, PaymentTiming};
use rust_decimal_macros::dec;

fn print(name: &str, s: &InvoiceSummary) {
    println!(
        "{name:<10} com desconto {:>12}  impostos {:>10}  taxa {:>10}  devido {:>12}",
        format_brl(s.discounted_total),
        format_brl(s.tax_total),
        format_brl(s.fee_total),
        format_brl(s.amount_due)
    );
}

fn main() {
    let supplier = Supplier::new("F-7", "Auto Peças Sul").nao_optante_simples(true);
    let client = ClientBuilder::new("C-3", "Secretaria de Obras")
        .tax_kinds([TaxKind::Municipal, TaxKind::Federal])
        .fee(FeeProfile::variable(
            AnticipationRates::default().set(PaymentTiming::Days30, dec!(10)),
        ))
        .build();
    let table = TaxRuleTable::default()
        .with_municipal(dec!(2), dec!(5))
        .with_federal(SplitRates::new(
            RateSet::new(dec!(1.2), dec!(0.65), dec!(3), dec!(1)),
            RateSet::new(dec!(4.8), dec!(0.65), dec!(3), dec!(1)),
        ));

    let orders: Vec<ServiceOrder> = (1..=3)
        .map(|i| {
            ServiceOrderBuilder::new(format!("OS-{i}"), format!("20{i}"), "C-3", supplier.clone())
                .parts(dec!(333.33) * rust_decimal::Decimal::from(i), dec!(12))
                .services(dec!(150.10), dec!(8))
                .build()
                .unwrap()
        })
        .collect();

    // A variable-fee client needs the payment timing on supplier invoices
    match build_invoice_views(&orders, Direction::Supplier, &client, Some(&table), None) {
        Err(e) => println!("Without timing: {e}\n"),
        Ok(_) => unreachable!(),
    }

    for timing in [PaymentTiming::Immediate, PaymentTiming::Days30, PaymentTiming::OnTerm] {
        let views = build_invoice_views(
            &orders,
            Direction::Supplier,
            &client,
            Some(&table),
            Some(timing),
        )
        .unwrap();
        println!("{} ({}%)", timing.label(), views.complete.fee_rate);
        print("completa", &views.complete);
        print("peças", &views.parts);
        print("serviços", &views.services);
        println!();
    }
}
