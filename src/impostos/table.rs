//! Tax rule table as stored by the tax configuration store.
//!
//! Fields that are absent, null, or not numbers resolve to zero while the
//! record is deserialized, so the arithmetic never sees a missing rate.

use rust_decimal::Decimal;
use serde::de::{Deserializer, IgnoredAny};
use serde::{Deserialize, Serialize};

/// Withholding tax categories a client can be subject to (`tipoImposto`).
///
/// Declaration order is the computation and line-item order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TaxKind {
    /// Impostos municipais: `ir` only.
    #[serde(rename = "municipais")]
    Municipal,
    /// Impostos estaduais: `ir + pis + cofins + csll` per side.
    #[serde(rename = "estaduais")]
    State,
    /// Impostos federais: `ir + pis + cofins + csll` per side.
    #[serde(rename = "federais")]
    Federal,
    /// Retenções do órgão: flat percentage on parts + services combined.
    #[serde(rename = "retencoes")]
    Withholding,
}

impl TaxKind {
    /// All categories in computation order.
    pub const ALL: [TaxKind; 4] = [
        TaxKind::Municipal,
        TaxKind::State,
        TaxKind::Federal,
        TaxKind::Withholding,
    ];

    /// Key used by client records.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Municipal => "municipais",
            Self::State => "estaduais",
            Self::Federal => "federais",
            Self::Withholding => "retencoes",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "municipais" => Some(Self::Municipal),
            "estaduais" => Some(Self::State),
            "federais" => Some(Self::Federal),
            "retencoes" => Some(Self::Withholding),
            _ => None,
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Municipal => "Impostos municipais",
            Self::State => "Impostos estaduais",
            Self::Federal => "Impostos federais",
            Self::Withholding => "Retenções do órgão",
        }
    }
}

/// Percentages for one side (parts or services) of a category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateSet {
    #[serde(default, deserialize_with = "lenient_rate")]
    pub ir: Decimal,
    #[serde(default, deserialize_with = "lenient_rate")]
    pub pis: Decimal,
    #[serde(default, deserialize_with = "lenient_rate")]
    pub cofins: Decimal,
    #[serde(default, deserialize_with = "lenient_rate")]
    pub csll: Decimal,
}

impl RateSet {
    /// Only `ir` set; the shape municipal taxes use.
    pub fn ir(ir: Decimal) -> Self {
        Self {
            ir,
            ..Self::default()
        }
    }

    pub fn new(ir: Decimal, pis: Decimal, cofins: Decimal, csll: Decimal) -> Self {
        Self { ir, pis, cofins, csll }
    }

    /// `ir + pis + cofins + csll`, summed before being applied.
    pub fn combined(&self) -> Decimal {
        self.ir + self.pis + self.cofins + self.csll
    }
}

/// Rates of a category split by value type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitRates {
    #[serde(rename = "pecas", default, deserialize_with = "lenient")]
    pub parts: RateSet,
    #[serde(rename = "servicos", default, deserialize_with = "lenient")]
    pub services: RateSet,
}

impl SplitRates {
    pub fn new(parts: RateSet, services: RateSet) -> Self {
        Self { parts, services }
    }
}

/// Flat withholding (`retencoesOrgao`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatRate {
    #[serde(default, deserialize_with = "lenient_rate")]
    pub percentual: Decimal,
}

/// The active tax configuration. Injected into every computation call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRuleTable {
    #[serde(rename = "impostosMunicipais", default, deserialize_with = "lenient")]
    pub municipal: SplitRates,
    #[serde(rename = "impostosEstaduais", default, deserialize_with = "lenient")]
    pub state: SplitRates,
    #[serde(rename = "impostosFederais", default, deserialize_with = "lenient")]
    pub federal: SplitRates,
    #[serde(rename = "retencoesOrgao", default, deserialize_with = "lenient")]
    pub withholding: FlatRate,
}

impl TaxRuleTable {
    pub fn with_municipal(mut self, parts_ir: Decimal, services_ir: Decimal) -> Self {
        self.municipal = SplitRates::new(RateSet::ir(parts_ir), RateSet::ir(services_ir));
        self
    }

    pub fn with_state(mut self, rates: SplitRates) -> Self {
        self.state = rates;
        self
    }

    pub fn with_federal(mut self, rates: SplitRates) -> Self {
        self.federal = rates;
        self
    }

    pub fn with_withholding(mut self, percentual: Decimal) -> Self {
        self.withholding = FlatRate { percentual };
        self
    }

    /// Per-side rate of a split category. `Withholding` returns the flat
    /// percentage for both sides.
    pub fn side_rates(&self, kind: TaxKind) -> (Decimal, Decimal) {
        match kind {
            TaxKind::Municipal => (self.municipal.parts.ir, self.municipal.services.ir),
            TaxKind::State => (self.state.parts.combined(), self.state.services.combined()),
            TaxKind::Federal => (
                self.federal.parts.combined(),
                self.federal.services.combined(),
            ),
            TaxKind::Withholding => (self.withholding.percentual, self.withholding.percentual),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
    Value(T),
    Other(IgnoredAny),
}

/// Deserialize `T`, falling back to its default for any other shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(match Lenient::<T>::deserialize(deserializer)? {
        Lenient::Value(v) => v,
        Lenient::Other(_) => T::default(),
    })
}

/// A percentage: numbers or numeric strings; anything else, including
/// negative values, is zero.
fn lenient_rate<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let rate: Decimal = lenient(deserializer)?;
    Ok(rate.max(Decimal::ZERO))
}
