use fatura::core::*;
use fatura::taxas::*;
use rust_decimal_macros::dec;

fn client(fee: FeeProfile) -> Client {
    ClientBuilder::new("C-1", "Cliente").fee(fee).build()
}

#[test]
fn default_operation_rate() {
    let fee = compute_fee(dec!(1000), &client(FeeProfile::default()), None).unwrap();
    assert_eq!(fee.rate, DEFAULT_OPERATION_RATE);
    assert_eq!(fee.amount, dec!(150.00));
}

#[test]
fn anticipation_defaults_decrease_with_delay() {
    let profile = FeeProfile::variable(AnticipationRates::default());
    let rates: Vec<_> = PaymentTiming::ALL
        .iter()
        .map(|t| profile.rate(Some(*t)).unwrap())
        .collect();
    assert_eq!(
        rates,
        vec![dec!(15), dec!(13), dec!(11), dec!(9), dec!(7), dec!(5), dec!(0)]
    );
    assert!(rates.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn configured_anticipation_rate_wins() {
    let rates = AnticipationRates::default()
        .set(PaymentTiming::Immediate, dec!(12.5))
        .set(PaymentTiming::Days60, dec!(2));
    let c = client(FeeProfile::variable(rates));

    let fee = compute_fee(dec!(1000), &c, Some(PaymentTiming::Immediate)).unwrap();
    assert_eq!(fee.amount, dec!(125.00));
    let fee = compute_fee(dec!(1000), &c, Some(PaymentTiming::Days60)).unwrap();
    assert_eq!(fee.amount, dec!(20.00));
    let fee = compute_fee(dec!(1000), &c, Some(PaymentTiming::Days40)).unwrap();
    assert_eq!(fee.rate, dec!(9));
}

#[test]
fn fee_profile_wire_format() {
    let fixed: Client = serde_json::from_str(
        r#"{ "id": "C-1", "nome": "Cliente", "tipoTaxa": "operacao", "taxaOperacao": "12" }"#,
    )
    .unwrap();
    assert_eq!(fixed.fee, FeeProfile::operation(dec!(12)));
    assert!(fixed.tax_kinds.is_empty());

    let variable: Client = serde_json::from_str(
        r#"{
            "id": "C-2",
            "nome": "Cliente",
            "tipoImposto": ["federais"],
            "tipoTaxa": "antecipacao_variavel",
            "taxasAntecipacao": { "aVista": "14", "dias30": "10" }
        }"#,
    )
    .unwrap();
    assert!(variable.fee.requires_timing());
    assert_eq!(variable.fee.rate(Some(PaymentTiming::Immediate)), Some(dec!(14)));
    assert_eq!(variable.fee.rate(Some(PaymentTiming::AfterClosing)), Some(dec!(13)));
    assert_eq!(variable.fee.rate(None), None);
}

#[test]
fn timing_keys() {
    let timing: PaymentTiming = serde_json::from_str(r#""aposFechamento""#).unwrap();
    assert_eq!(timing, PaymentTiming::AfterClosing);
    assert_eq!(PaymentTiming::from_key("dias50"), Some(PaymentTiming::Days50));
    assert_eq!(PaymentTiming::from_key("dias90"), None);
    assert_eq!(PaymentTiming::OnTerm.label(), "A prazo");
}

#[test]
fn prorating_is_exact_for_awkward_splits() {
    for (fee, parts, services) in [
        (dec!(0.01), dec!(1), dec!(1)),
        (dec!(100.00), dec!(1), dec!(2)),
        (dec!(33.33), dec!(0.01), dec!(999.99)),
        (dec!(192.38), dec!(900), dec!(0)),
    ] {
        let p = prorate_fee(fee, InvoiceScope::Parts, parts, services);
        let s = prorate_fee(fee, InvoiceScope::Services, parts, services);
        assert_eq!(p + s, fee, "{fee} split {parts}/{services}");
        assert_eq!(prorate_fee(fee, InvoiceScope::Complete, parts, services), fee);
    }
}
