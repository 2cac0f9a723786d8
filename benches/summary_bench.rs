use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use fatura::core::*;
use fatura::fatura::*;
use fatura::impostos::*;
use fatura::taxas::*;

fn build_orders(n: usize) -> Vec<ServiceOrder> {
    (1..=n)
        .map(|i| {
            ServiceOrderBuilder::new(
                format!("OS-{i}"),
                format!("{}", 10_000 + i),
                "C-1",
                Supplier::new("F-1", "Oficina Central").nao_optante_simples(i % 3 != 0),
            )
            .parts(Decimal::new(12_345 + i as i64, 2), dec!(7.5))
            .services(Decimal::new(54_321 + i as i64, 2), dec!(5))
            .build()
            .unwrap()
        })
        .collect()
}

fn client() -> Client {
    ClientBuilder::new("C-1", "Prefeitura Municipal")
        .tax_kinds(TaxKind::ALL)
        .fee(FeeProfile::operation(dec!(15)))
        .build()
}

fn table() -> TaxRuleTable {
    TaxRuleTable::default()
        .with_municipal(dec!(2), dec!(5))
        .with_federal(SplitRates::new(
            RateSet::new(dec!(1.2), dec!(0.65), dec!(3), dec!(1)),
            RateSet::new(dec!(4.8), dec!(0.65), dec!(3), dec!(1)),
        ))
        .with_withholding(dec!(1))
}

fn bench_summary(c: &mut Criterion) {
    let client = client();
    let table = table();
    for n in [10, 1000] {
        let orders = build_orders(n);
        c.bench_function(&format!("summary_{n}_orders"), |b| {
            b.iter(|| {
                black_box(build_invoice_summary(
                    black_box(&orders),
                    Direction::Supplier,
                    &client,
                    Some(&table),
                    None,
                    InvoiceScope::Complete,
                ))
            });
        });
    }
}

fn bench_views(c: &mut Criterion) {
    let client = client();
    let table = table();
    let orders = build_orders(1000);
    c.bench_function("views_1000_orders", |b| {
        b.iter(|| {
            black_box(build_invoice_views(
                black_box(&orders),
                Direction::Supplier,
                &client,
                Some(&table),
                None,
            ))
        });
    });
}

fn bench_prepare(c: &mut Criterion) {
    let client = client();
    let table = table();
    let orders = build_orders(1000);
    c.bench_function("prepare_invoice_1000_orders", |b| {
        b.iter(|| {
            black_box(prepare_invoice(
                black_box(&orders),
                Direction::Supplier,
                &client,
                Some(&table),
                None,
            ))
        });
    });
}

criterion_group!(benches, bench_summary, bench_views, bench_prepare);
criterion_main!(benches);
