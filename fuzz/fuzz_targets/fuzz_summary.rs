#![no_main]

use fatura::core::*;
use fatura::fatura::*;
use fatura::impostos::{TaxKind, TaxRuleTable};
use fatura::taxas::FeeProfile;
use libfuzzer_sys::fuzz_target;
use rust_decimal::Decimal;

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }
    let rate = Decimal::from(data[0] % 101);
    let fee = Decimal::from(data[1] % 101);
    let table = TaxRuleTable::default()
        .with_municipal(rate, rate)
        .with_withholding(Decimal::from(data[2] % 101));
    let client = ClientBuilder::new("C-1", "Cliente")
        .tax_kinds(TaxKind::ALL)
        .fee(FeeProfile::operation(fee))
        .build();

    let orders: Vec<ServiceOrder> = data[3..]
        .chunks(4)
        .enumerate()
        .filter_map(|(i, c)| {
            let gross = |hi: u8, lo: u8| Decimal::new(i64::from(u16::from_be_bytes([hi, lo])), 2);
            let parts = gross(c[0], *c.get(1).unwrap_or(&0));
            let services = gross(*c.get(2).unwrap_or(&0), *c.get(3).unwrap_or(&0));
            ServiceOrderBuilder::new(
                format!("OS-{i}"),
                format!("{i}"),
                "C-1",
                Supplier::new("F-1", "Oficina").nao_optante_simples(i % 2 == 0),
            )
            .parts(parts, Decimal::from(c[0] % 101))
            .services(services, Decimal::ZERO)
            .build()
            .ok()
        })
        .collect();

    if let Ok(views) = build_invoice_views(&orders, Direction::Supplier, &client, Some(&table), None) {
        assert_eq!(
            views.parts.fee_total + views.services.fee_total,
            views.complete.fee_total
        );
        assert_eq!(
            views.complete.amount_due,
            views.complete.after_tax - views.complete.fee_total
        );
    }
});
