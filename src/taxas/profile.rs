use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Operation fee applied when the client record carries no `taxaOperacao`.
pub const DEFAULT_OPERATION_RATE: Decimal = dec!(15);

/// When the supplier is paid, chosen at invoice generation for clients
/// with variable anticipation fees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentTiming {
    /// À vista: immediate payment.
    #[serde(rename = "aVista")]
    Immediate,
    /// Após fechamento: paid after the period closes.
    #[serde(rename = "aposFechamento")]
    AfterClosing,
    /// 30 days after the invoice.
    #[serde(rename = "dias30")]
    Days30,
    /// 40 days after the invoice.
    #[serde(rename = "dias40")]
    Days40,
    /// 50 days after the invoice.
    #[serde(rename = "dias50")]
    Days50,
    /// 60 days after the invoice.
    #[serde(rename = "dias60")]
    Days60,
    /// A prazo: paid on the regular term, no anticipation.
    #[serde(rename = "aprazado")]
    OnTerm,
}

impl PaymentTiming {
    pub const ALL: [PaymentTiming; 7] = [
        PaymentTiming::Immediate,
        PaymentTiming::AfterClosing,
        PaymentTiming::Days30,
        PaymentTiming::Days40,
        PaymentTiming::Days50,
        PaymentTiming::Days60,
        PaymentTiming::OnTerm,
    ];

    /// Key used in `taxasAntecipacao` and in invoice records.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Immediate => "aVista",
            Self::AfterClosing => "aposFechamento",
            Self::Days30 => "dias30",
            Self::Days40 => "dias40",
            Self::Days50 => "dias50",
            Self::Days60 => "dias60",
            Self::OnTerm => "aprazado",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.key() == key)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Immediate => "À vista",
            Self::AfterClosing => "Após fechamento",
            Self::Days30 => "30 dias após a fatura",
            Self::Days40 => "40 dias após a fatura",
            Self::Days50 => "50 dias após a fatura",
            Self::Days60 => "60 dias após a fatura",
            Self::OnTerm => "A prazo",
        }
    }

    /// Rate used when the client record has none for this timing.
    /// Earlier payment costs more.
    pub fn default_rate(&self) -> Decimal {
        match self {
            Self::Immediate => dec!(15),
            Self::AfterClosing => dec!(13),
            Self::Days30 => dec!(11),
            Self::Days40 => dec!(9),
            Self::Days50 => dec!(7),
            Self::Days60 => dec!(5),
            Self::OnTerm => dec!(0),
        }
    }
}

/// `taxasAntecipacao`: per-timing percentages, each optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnticipationRates {
    #[serde(rename = "aVista", default, skip_serializing_if = "Option::is_none")]
    pub immediate: Option<Decimal>,
    #[serde(rename = "aposFechamento", default, skip_serializing_if = "Option::is_none")]
    pub after_closing: Option<Decimal>,
    #[serde(rename = "dias30", default, skip_serializing_if = "Option::is_none")]
    pub days_30: Option<Decimal>,
    #[serde(rename = "dias40", default, skip_serializing_if = "Option::is_none")]
    pub days_40: Option<Decimal>,
    #[serde(rename = "dias50", default, skip_serializing_if = "Option::is_none")]
    pub days_50: Option<Decimal>,
    #[serde(rename = "dias60", default, skip_serializing_if = "Option::is_none")]
    pub days_60: Option<Decimal>,
    #[serde(rename = "aprazado", default, skip_serializing_if = "Option::is_none")]
    pub on_term: Option<Decimal>,
}

impl AnticipationRates {
    pub fn set(mut self, timing: PaymentTiming, rate: Decimal) -> Self {
        *self.slot(timing) = Some(rate);
        self
    }

    /// Configured rate for `timing`, or the timing's default.
    pub fn rate_for(&self, timing: PaymentTiming) -> Decimal {
        let configured = match timing {
            PaymentTiming::Immediate => self.immediate,
            PaymentTiming::AfterClosing => self.after_closing,
            PaymentTiming::Days30 => self.days_30,
            PaymentTiming::Days40 => self.days_40,
            PaymentTiming::Days50 => self.days_50,
            PaymentTiming::Days60 => self.days_60,
            PaymentTiming::OnTerm => self.on_term,
        };
        configured.unwrap_or_else(|| timing.default_rate())
    }

    fn slot(&mut self, timing: PaymentTiming) -> &mut Option<Decimal> {
        match timing {
            PaymentTiming::Immediate => &mut self.immediate,
            PaymentTiming::AfterClosing => &mut self.after_closing,
            PaymentTiming::Days30 => &mut self.days_30,
            PaymentTiming::Days40 => &mut self.days_40,
            PaymentTiming::Days50 => &mut self.days_50,
            PaymentTiming::Days60 => &mut self.days_60,
            PaymentTiming::OnTerm => &mut self.on_term,
        }
    }
}

/// How a client's supplier invoices are charged (`tipoTaxa`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tipoTaxa")]
pub enum FeeProfile {
    /// Fixed operation fee (`operacao`).
    #[serde(rename = "operacao")]
    Operation {
        /// `taxaOperacao`; [`DEFAULT_OPERATION_RATE`] when absent.
        #[serde(rename = "taxaOperacao", default, skip_serializing_if = "Option::is_none")]
        rate: Option<Decimal>,
    },
    /// Fee depends on the payment timing chosen per invoice
    /// (`antecipacao_variavel`).
    #[serde(rename = "antecipacao_variavel")]
    VariableAnticipation {
        #[serde(rename = "taxasAntecipacao", default)]
        rates: AnticipationRates,
    },
}

impl Default for FeeProfile {
    fn default() -> Self {
        Self::Operation { rate: None }
    }
}

impl FeeProfile {
    pub fn operation(rate: Decimal) -> Self {
        Self::Operation { rate: Some(rate) }
    }

    pub fn variable(rates: AnticipationRates) -> Self {
        Self::VariableAnticipation { rates }
    }

    /// Whether a payment timing must be chosen for supplier invoices.
    pub fn requires_timing(&self) -> bool {
        matches!(self, Self::VariableAnticipation { .. })
    }

    /// Rate for the chosen timing; `None` when the profile is variable and
    /// no timing was given.
    pub fn rate(&self, timing: Option<PaymentTiming>) -> Option<Decimal> {
        match self {
            Self::Operation { rate } => Some(rate.unwrap_or(DEFAULT_OPERATION_RATE)),
            Self::VariableAnticipation { rates } => timing.map(|t| rates.rate_for(t)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timing_keys_roundtrip() {
        for timing in PaymentTiming::ALL {
            assert_eq!(PaymentTiming::from_key(timing.key()), Some(timing));
        }
        assert_eq!(PaymentTiming::from_key("dias90"), None);
    }

    #[test]
    fn defaults_decrease_with_later_payment() {
        let rates: Vec<_> = PaymentTiming::ALL.iter().map(|t| t.default_rate()).collect();
        for pair in rates.windows(2) {
            assert!(pair[0] > pair[1], "{} should exceed {}", pair[0], pair[1]);
        }
        assert_eq!(PaymentTiming::OnTerm.default_rate(), dec!(0));
    }

    #[test]
    fn configured_rate_overrides_default() {
        let rates = AnticipationRates::default().set(PaymentTiming::Immediate, dec!(12));
        assert_eq!(rates.rate_for(PaymentTiming::Immediate), dec!(12));
        assert_eq!(rates.rate_for(PaymentTiming::AfterClosing), dec!(13));
    }

    #[test]
    fn operation_rate_defaults_to_fifteen() {
        assert_eq!(FeeProfile::default().rate(None), Some(dec!(15)));
        assert_eq!(FeeProfile::operation(dec!(8)).rate(None), Some(dec!(8)));
    }

    #[test]
    fn variable_profile_needs_timing() {
        let profile = FeeProfile::variable(AnticipationRates::default());
        assert!(profile.requires_timing());
        assert_eq!(profile.rate(None), None);
        assert_eq!(profile.rate(Some(PaymentTiming::Days60)), Some(dec!(5)));
    }
}
