//! Selection rejections and degenerate inputs.

use chrono::NaiveDate;
use fatura::core::*;
use fatura::fatura::*;
use fatura::impostos::*;
use fatura::taxas::*;
use rust_decimal_macros::dec;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn order(code: &str, client: &str, supplier: &str) -> ServiceOrder {
    ServiceOrderBuilder::new(
        code,
        code,
        client,
        Supplier::new(supplier, "Oficina").nao_optante_simples(true),
    )
    .parts(dec!(100), dec!(0))
    .services(dec!(100), dec!(0))
    .build()
    .unwrap()
}

fn client() -> Client {
    ClientBuilder::new("C-1", "Cliente")
        .tax_kind(TaxKind::Withholding)
        .build()
}

fn table() -> TaxRuleTable {
    TaxRuleTable::default().with_withholding(dec!(5))
}

fn prepare(orders: &[ServiceOrder], direction: Direction) -> Result<InvoiceSummary, FaturaError> {
    prepare_invoice(orders, direction, &client(), Some(&table()), None)
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

#[test]
fn orders_of_two_clients() {
    let err = prepare(
        &[order("1", "C-1", "F-1"), order("2", "C-2", "F-1")],
        Direction::Client,
    )
    .unwrap_err();
    match err {
        FaturaError::CrossClientSelection(ids) => assert_eq!(ids, vec!["C-1", "C-2"]),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn orders_of_another_client() {
    let err = prepare(&[order("1", "C-9", "F-1")], Direction::Client).unwrap_err();
    assert!(matches!(
        err,
        FaturaError::ClientMismatch { ref expected, ref found } if expected == "C-1" && found == "C-9"
    ));
}

#[test]
fn two_suppliers_only_matter_for_supplier_invoices() {
    let orders = [order("1", "C-1", "F-1"), order("2", "C-1", "F-2")];
    assert!(matches!(
        prepare(&orders, Direction::Supplier),
        Err(FaturaError::CrossSupplierSelection(_))
    ));
    let summary = prepare(&orders, Direction::Client).unwrap();
    assert_eq!(summary.discounted_total, dec!(400));
}

#[test]
fn repeated_order() {
    let err = prepare(
        &[order("1", "C-1", "F-1"), order("1", "C-1", "F-1")],
        Direction::Client,
    )
    .unwrap_err();
    assert!(matches!(err, FaturaError::Validation(_)));
}

#[test]
fn status_must_be_invoiceable() {
    for status in [OrderStatus::Open, OrderStatus::InProgress, OrderStatus::Cancelled] {
        let mut o = order("1", "C-1", "F-1");
        o.status = status;
        let err = prepare(&[o], Direction::Supplier).unwrap_err();
        assert!(
            matches!(err, FaturaError::NotEligible { ref status, .. } if !status.is_empty()),
            "{err:?}"
        );
    }
}

#[test]
fn invoiced_flag_is_per_direction() {
    let mut o = order("1", "C-1", "F-1");
    o.invoiced_to_client = true;
    assert!(matches!(
        prepare(std::slice::from_ref(&o), Direction::Client),
        Err(FaturaError::AlreadyInvoiced { .. })
    ));
    assert!(prepare(&[o], Direction::Supplier).is_ok());
}

#[test]
fn client_invoice_of_variable_fee_client_needs_no_timing() {
    let client = ClientBuilder::new("C-1", "Cliente")
        .fee(FeeProfile::variable(AnticipationRates::default()))
        .build();
    let orders = [order("1", "C-1", "F-1")];
    assert!(prepare_invoice(&orders, Direction::Client, &client, None, None).is_ok());
    assert!(matches!(
        validate_selection(&orders, Direction::Supplier, &client, None),
        Err(FaturaError::PaymentTimingRequired(_))
    ));
    assert!(
        validate_selection(&orders, Direction::Supplier, &client, Some(PaymentTiming::Days50))
            .is_ok()
    );
}

// ---------------------------------------------------------------------------
// Degenerate amounts
// ---------------------------------------------------------------------------

#[test]
fn zero_value_orders() {
    let o = ServiceOrderBuilder::new("1", "1", "C-1", Supplier::new("F-1", "Oficina"))
        .build()
        .unwrap();
    let s = prepare(&[o], Direction::Supplier).unwrap();
    assert_eq!(s.discounted_total, dec!(0));
    assert_eq!(s.tax_total, dec!(0));
    assert_eq!(s.fee_total, dec!(0));
    assert_eq!(s.amount_due, dec!(0));
}

#[test]
fn parts_only_order_has_empty_services_view() {
    let o = ServiceOrderBuilder::new("1", "1", "C-1", Supplier::new("F-1", "Oficina"))
        .parts(dec!(250), dec!(0))
        .build()
        .unwrap();
    let views = build_invoice_views(&[o], Direction::Supplier, &client(), Some(&table()), None)
        .unwrap();
    assert_eq!(views.services.discounted_total, dec!(0));
    assert_eq!(views.services.fee_total, dec!(0));
    assert_eq!(views.parts.fee_total, views.complete.fee_total);
}

#[test]
fn no_tax_table_means_no_tax() {
    let s = prepare_invoice(
        &[order("1", "C-1", "F-1")],
        Direction::Client,
        &client(),
        None,
        None,
    )
    .unwrap();
    assert_eq!(s.tax_total, dec!(0));
    assert_eq!(s.amount_due, dec!(200));
}

#[test]
fn negative_after_tax_is_refused() {
    let table = TaxRuleTable::default()
        .with_municipal(dec!(60), dec!(60))
        .with_withholding(dec!(60));
    let client = ClientBuilder::new("C-1", "Cliente")
        .tax_kinds([TaxKind::Municipal, TaxKind::Withholding])
        .build();
    let err = prepare_invoice(
        &[order("1", "C-1", "F-1")],
        Direction::Client,
        &client,
        Some(&table),
        None,
    )
    .unwrap_err();
    match err {
        FaturaError::InconsistentState(message) => assert!(message.contains("valorAposImpostos")),
        other => panic!("unexpected {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Lifecycle corners
// ---------------------------------------------------------------------------

#[test]
fn releasing_one_direction_keeps_the_other() {
    let client = client();
    let supplier_side = FaturaBuilder::new("FF-1", Direction::Supplier, date(2024, 6, 1))
        .client(&client)
        .tax_table(&table())
        .add_order(order("1", "C-1", "F-1"))
        .build()
        .unwrap();
    let locked = supplier_side.orders[0].order.clone();

    let client_side = FaturaBuilder::new("FC-1", Direction::Client, date(2024, 6, 1))
        .client(&client)
        .tax_table(&table())
        .add_order(locked)
        .build()
        .unwrap();

    let released = client_side.release();
    let order = &released.unlocked[0];
    assert!(!order.invoiced_to_client);
    assert!(order.invoiced_to_supplier);
    assert_eq!(order.status, OrderStatus::AwaitingPayment);
}

#[test]
fn unknown_order_code() {
    let mut fatura = FaturaBuilder::new("FF-1", Direction::Supplier, date(2024, 6, 1))
        .client(&client())
        .orders([order("1", "C-1", "F-1"), order("2", "C-1", "F-1")])
        .build()
        .unwrap();
    assert!(matches!(
        fatura.remove_order("3", &client(), None),
        Err(FaturaError::OrderNotFound(_))
    ));
}

#[test]
fn error_messages() {
    assert_eq!(
        FaturaError::EmptySelection.to_string(),
        "no service orders selected"
    );
    let err = FaturaError::PaymentTimingRequired("C-1".into());
    assert!(err.to_string().contains("C-1"));
}
