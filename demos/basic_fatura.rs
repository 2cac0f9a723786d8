use chrono::NaiveDate;
use fatura::core::*;
use fatura::fatura::*;
use fatura::impostos::{TaxKind, TaxRuleTable};
use fatura::taxas::FeeProfile;
use rust_decimal_macros::dec;

fn main() {
    let supplier = Supplier::new("F-1", "Oficina Central").nao_optante_simples(true);
    let client = ClientBuilder::new("C-1", "Prefeitura Municipal")
        .tax_kind(TaxKind::Withholding)
        .fee(FeeProfile::operation(dec!(15)))
        .build();
    let table = TaxRuleTable::default().with_withholding(dec!(5));

    let orders = vec![
        ServiceOrderBuilder::new("OS-1", "1001", "C-1", supplier.clone())
            .parts(dec!(1000), dec!(10))
            .services(dec!(500), dec!(10))
            .build()
            .unwrap(),
        ServiceOrderBuilder::new("OS-2", "1002", "C-1", supplier)
            .services(dec!(780), dec!(5))
            .build()
            .unwrap(),
    ];

    let mut numbering = FaturaNumbering::new(2024);
    let issue_date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let number = numbering.issue(Direction::Supplier, issue_date).unwrap();

    let mut fatura = FaturaBuilder::new(number, Direction::Supplier, issue_date)
        .client(&client)
        .tax_table(&table)
        .period(
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 31).unwrap(),
        )
        .expected_receipt(NaiveDate::from_ymd_opt(2024, 6, 10).unwrap())
        .orders(orders)
        .build()
        .unwrap();

    let s = &fatura.summary;
    println!("Fatura {} ({})", fatura.number, fatura.direction.label());
    println!("  Valor com desconto:  {}", format_brl(s.discounted_total));
    println!("  Impostos:            {}", format_brl(s.tax_total));
    println!("  Valor após impostos: {}", format_brl(s.after_tax));
    println!("  Taxa ({}%):          {}", s.fee_rate, format_brl(s.fee_total));
    println!("  Valor devido:        {}", format_brl(s.amount_due));

    fatura.mark_order_paid("OS-1").unwrap();
    println!(
        "\nAfter paying OS-1: {} / pago {} / restante {}",
        fatura.status().label(),
        format_brl(fatura.amount_paid()),
        format_brl(fatura.amount_remaining())
    );
}
