use rust_decimal::Decimal;
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

use crate::impostos::TaxKind;
use crate::taxas::{AnticipationRates, FeeProfile};

/// Ordem de Serviço (OS): one authorized unit of billable work.
///
/// Field names on the wire follow the order repository (`valorPecas`,
/// `faturadoFornecedor`, ...). Discounted values are carried as stored;
/// use [`validate_order`](super::validate_order) to check them against the
/// gross values and discount percentages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceOrder {
    /// `codigo`: unique order code.
    #[serde(rename = "codigo")]
    pub code: String,
    /// `numeroOS`: human-facing order number.
    #[serde(rename = "numeroOS")]
    pub number: String,
    /// `clienteId`: the client that owns the work.
    #[serde(rename = "clienteId")]
    pub client_id: String,
    /// `fornecedor`: the supplier that performed the work.
    #[serde(rename = "fornecedor")]
    pub supplier: Supplier,
    /// `valorPecas`: gross parts value.
    #[serde(rename = "valorPecas")]
    pub gross_parts: Decimal,
    /// `valorServico`: gross services value.
    #[serde(rename = "valorServico")]
    pub gross_services: Decimal,
    /// `descontoPecasPerc`: contractual parts discount, 0–100.
    #[serde(rename = "descontoPecasPerc", default)]
    pub parts_discount_pct: Decimal,
    /// `descontoServicoPerc`: contractual services discount, 0–100.
    #[serde(rename = "descontoServicoPerc", default)]
    pub services_discount_pct: Decimal,
    /// `valorPecasComDesconto`: round2(gross parts × (1 − discount/100)).
    #[serde(rename = "valorPecasComDesconto")]
    pub discounted_parts: Decimal,
    /// `valorServicoComDesconto`: round2(gross services × (1 − discount/100)).
    #[serde(rename = "valorServicoComDesconto")]
    pub discounted_services: Decimal,
    /// `valorFinal`: discounted parts + discounted services.
    #[serde(rename = "valorFinal")]
    pub final_value: Decimal,
    pub status: OrderStatus,
    /// `faturadoFornecedor`: attached to a supplier-direction invoice.
    #[serde(rename = "faturadoFornecedor", default)]
    pub invoiced_to_supplier: bool,
    /// `faturadoCliente`: attached to a client-direction invoice.
    #[serde(rename = "faturadoCliente", default)]
    pub invoiced_to_client: bool,
}

impl ServiceOrder {
    /// Whether the order is already locked into an invoice of `direction`.
    pub fn is_invoiced(&self, direction: Direction) -> bool {
        match direction {
            Direction::Supplier => self.invoiced_to_supplier,
            Direction::Client => self.invoiced_to_client,
        }
    }

    pub fn set_invoiced(&mut self, direction: Direction, invoiced: bool) {
        match direction {
            Direction::Supplier => self.invoiced_to_supplier = invoiced,
            Direction::Client => self.invoiced_to_client = invoiced,
        }
    }

    /// Gross parts and services restricted to `scope`.
    pub fn gross_in(&self, scope: InvoiceScope) -> (Decimal, Decimal) {
        scope.restrict(self.gross_parts, self.gross_services)
    }

    /// Discounted parts and services restricted to `scope`.
    pub fn discounted_in(&self, scope: InvoiceScope) -> (Decimal, Decimal) {
        scope.restrict(self.discounted_parts, self.discounted_services)
    }
}

/// Fornecedor: the party that performed the work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    /// `naoOptanteSimples`: true when the supplier is NOT under the Simples
    /// Nacional regime. Only then is tax withheld on its orders.
    #[serde(rename = "naoOptanteSimples", default)]
    pub nao_optante_simples: bool,
}

impl Supplier {
    /// A supplier under the simplified regime (no withholding).
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            nao_optante_simples: false,
        }
    }

    pub fn nao_optante_simples(mut self, value: bool) -> Self {
        self.nao_optante_simples = value;
        self
    }

    /// Tax is withheld on this supplier's orders.
    pub fn withholds_taxes(&self) -> bool {
        self.nao_optante_simples
    }
}

/// Cliente: the party that owns and pays for the work.
///
/// Records without `tipoTaxa` load with the default operation fee. Unknown
/// `tipoImposto` keys are skipped with a warning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ClientRecord")]
pub struct Client {
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    /// `tipoImposto`: tax categories withheld on this client's invoices.
    /// Empty means nothing is ever withheld.
    #[serde(rename = "tipoImposto", default)]
    pub tax_kinds: Vec<TaxKind>,
    /// `tipoTaxa` plus `taxaOperacao` / `taxasAntecipacao`.
    #[serde(flatten)]
    pub fee: FeeProfile,
}

impl Client {
    pub fn applies(&self, kind: TaxKind) -> bool {
        self.tax_kinds.contains(&kind)
    }
}

/// Client record as stored, before defaults are filled in.
#[derive(Deserialize)]
struct ClientRecord {
    id: String,
    #[serde(rename = "nome")]
    name: String,
    #[serde(rename = "tipoImposto", default)]
    tax_kinds: Vec<TaxKey>,
    #[serde(rename = "tipoTaxa", default)]
    fee_kind: Option<FeeKind>,
    #[serde(rename = "taxaOperacao", default)]
    operation_rate: Option<Decimal>,
    #[serde(rename = "taxasAntecipacao", default)]
    anticipation_rates: Option<AnticipationRates>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TaxKey {
    Key(String),
    Other(IgnoredAny),
}

#[derive(Deserialize)]
enum FeeKind {
    #[serde(rename = "operacao")]
    Operation,
    #[serde(rename = "antecipacao_variavel")]
    VariableAnticipation,
}

impl From<ClientRecord> for Client {
    fn from(record: ClientRecord) -> Self {
        let mut tax_kinds = Vec::new();
        for key in record.tax_kinds {
            match key {
                TaxKey::Key(key) => match TaxKind::from_key(&key) {
                    Some(kind) if !tax_kinds.contains(&kind) => tax_kinds.push(kind),
                    Some(_) => {}
                    None => {
                        tracing::warn!(client = %record.id, key = %key, "unknown tax kind skipped")
                    }
                },
                TaxKey::Other(_) => {
                    tracing::warn!(client = %record.id, "non-string tax kind skipped")
                }
            }
        }

        let fee = match record.fee_kind {
            Some(FeeKind::VariableAnticipation) => FeeProfile::VariableAnticipation {
                rates: record.anticipation_rates.unwrap_or_default(),
            },
            Some(FeeKind::Operation) => FeeProfile::Operation {
                rate: record.operation_rate,
            },
            None => FeeProfile::default(),
        };

        Self {
            id: record.id,
            name: record.name,
            tax_kinds,
            fee,
        }
    }
}

/// Order lifecycle.
///
/// `Open → InProgress → Authorized → AwaitingPayment → Paid`, with
/// `Cancelled` reachable from any state before `Paid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Aberta.
    #[serde(rename = "Aberta")]
    Open,
    /// Em Andamento.
    #[serde(rename = "Em Andamento")]
    InProgress,
    /// Autorizada: ready to be invoiced.
    #[serde(rename = "Autorizada")]
    Authorized,
    /// Aguardando pagamento: attached to an invoice.
    #[serde(rename = "Aguardando pagamento")]
    AwaitingPayment,
    /// Paga.
    #[serde(rename = "Paga")]
    Paid,
    /// Cancelada.
    #[serde(rename = "Cancelada")]
    Cancelled,
}

impl OrderStatus {
    /// Label as shown to users and stored by the order repository.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Open => "Aberta",
            Self::InProgress => "Em Andamento",
            Self::Authorized => "Autorizada",
            Self::AwaitingPayment => "Aguardando pagamento",
            Self::Paid => "Paga",
            Self::Cancelled => "Cancelada",
        }
    }

    /// Parse from the stored label.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Aberta" => Some(Self::Open),
            "Em Andamento" => Some(Self::InProgress),
            "Autorizada" => Some(Self::Authorized),
            "Aguardando pagamento" => Some(Self::AwaitingPayment),
            "Paga" => Some(Self::Paid),
            "Cancelada" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Only authorized, awaiting-payment and paid orders can be invoiced.
    pub fn is_invoiceable(&self) -> bool {
        matches!(self, Self::Authorized | Self::AwaitingPayment | Self::Paid)
    }

    /// Whether moving from `self` to `next` is a legal step.
    ///
    /// `AwaitingPayment → Authorized` is allowed: it happens when an order
    /// is released from a deleted invoice.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        match (self, next) {
            (Open, InProgress) | (InProgress, Authorized) => true,
            (Authorized, AwaitingPayment) | (AwaitingPayment, Paid) => true,
            (AwaitingPayment, Authorized) => true,
            (Paid | Cancelled, Cancelled) => false,
            (_, Cancelled) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Invoice direction (`tipo` of a fatura): which party is billed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Payable to the supplier. Carries the operation/anticipation fee.
    #[serde(rename = "Fornecedor")]
    Supplier,
    /// Receivable from the client. Never carries a fee.
    #[serde(rename = "Cliente")]
    Client,
}

impl Direction {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Supplier => "Fornecedor",
            Self::Client => "Cliente",
        }
    }
}

/// Which value type an invoice view covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvoiceScope {
    /// Parts and services together.
    #[serde(rename = "completa")]
    Complete,
    /// Parts only.
    #[serde(rename = "pecas")]
    Parts,
    /// Services only.
    #[serde(rename = "servicos")]
    Services,
}

impl InvoiceScope {
    pub fn includes_parts(&self) -> bool {
        matches!(self, Self::Complete | Self::Parts)
    }

    pub fn includes_services(&self) -> bool {
        matches!(self, Self::Complete | Self::Services)
    }

    /// Zero out the side this scope excludes.
    pub fn restrict(&self, parts: Decimal, services: Decimal) -> (Decimal, Decimal) {
        let parts = if self.includes_parts() {
            parts
        } else {
            Decimal::ZERO
        };
        let services = if self.includes_services() {
            services
        } else {
            Decimal::ZERO
        };
        (parts, services)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn status_labels_roundtrip() {
        for status in [
            OrderStatus::Open,
            OrderStatus::InProgress,
            OrderStatus::Authorized,
            OrderStatus::AwaitingPayment,
            OrderStatus::Paid,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(OrderStatus::from_label(status.label()), Some(status));
        }
        assert_eq!(OrderStatus::from_label("Faturada"), None);
    }

    #[test]
    fn invoiceable_statuses() {
        assert!(!OrderStatus::Open.is_invoiceable());
        assert!(!OrderStatus::InProgress.is_invoiceable());
        assert!(OrderStatus::Authorized.is_invoiceable());
        assert!(OrderStatus::AwaitingPayment.is_invoiceable());
        assert!(OrderStatus::Paid.is_invoiceable());
        assert!(!OrderStatus::Cancelled.is_invoiceable());
    }

    #[test]
    fn cancel_only_before_payment() {
        assert!(OrderStatus::Open.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::AwaitingPayment.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Paid.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Cancelled));
    }

    #[test]
    fn forward_transitions_only() {
        assert!(OrderStatus::Open.can_transition_to(OrderStatus::InProgress));
        assert!(OrderStatus::Authorized.can_transition_to(OrderStatus::AwaitingPayment));
        assert!(!OrderStatus::Open.can_transition_to(OrderStatus::Paid));
        assert!(!OrderStatus::Paid.can_transition_to(OrderStatus::Authorized));
    }

    #[test]
    fn client_record_defaults() {
        let json = r#"{"id":"C-1","nome":"X","tipoImposto":["federais","iss",3,"federais"]}"#;
        let client: Client = serde_json::from_str(json).unwrap();
        assert_eq!(client.tax_kinds, vec![TaxKind::Federal]);
        assert_eq!(client.fee, FeeProfile::default());
    }

    #[test]
    fn scope_restricts_sides() {
        let (p, s) = InvoiceScope::Parts.restrict(dec!(10), dec!(20));
        assert_eq!((p, s), (dec!(10), dec!(0)));
        let (p, s) = InvoiceScope::Services.restrict(dec!(10), dec!(20));
        assert_eq!((p, s), (dec!(0), dec!(20)));
        let (p, s) = InvoiceScope::Complete.restrict(dec!(10), dec!(20));
        assert_eq!((p, s), (dec!(10), dec!(20)));
    }
}
