use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::error::FaturaError;
use super::money::apply_discount;
use super::types::*;
use crate::impostos::TaxKind;
use crate::taxas::FeeProfile;

/// Builder for service orders. Computes the discounted values from the
/// gross values and discount percentages.
///
/// ```
/// use fatura::core::*;
/// use rust_decimal_macros::dec;
///
/// let order = ServiceOrderBuilder::new("OS-1", "1001", "C-1", Supplier::new("F-1", "Oficina"))
///     .parts(dec!(1000), dec!(10))
///     .services(dec!(500), dec!(0))
///     .build()
///     .unwrap();
/// assert_eq!(order.discounted_parts, dec!(900));
/// assert_eq!(order.final_value, dec!(1400));
/// ```
pub struct ServiceOrderBuilder {
    code: String,
    number: String,
    client_id: String,
    supplier: Supplier,
    gross_parts: Decimal,
    parts_discount_pct: Decimal,
    gross_services: Decimal,
    services_discount_pct: Decimal,
    status: OrderStatus,
    invoiced_to_supplier: bool,
    invoiced_to_client: bool,
}

impl ServiceOrderBuilder {
    pub fn new(
        code: impl Into<String>,
        number: impl Into<String>,
        client_id: impl Into<String>,
        supplier: Supplier,
    ) -> Self {
        Self {
            code: code.into(),
            number: number.into(),
            client_id: client_id.into(),
            supplier,
            gross_parts: Decimal::ZERO,
            parts_discount_pct: Decimal::ZERO,
            gross_services: Decimal::ZERO,
            services_discount_pct: Decimal::ZERO,
            status: OrderStatus::Authorized,
            invoiced_to_supplier: false,
            invoiced_to_client: false,
        }
    }

    /// Gross parts value and its discount percentage.
    pub fn parts(mut self, gross: Decimal, discount_pct: Decimal) -> Self {
        self.gross_parts = gross;
        self.parts_discount_pct = discount_pct;
        self
    }

    /// Gross services value and its discount percentage.
    pub fn services(mut self, gross: Decimal, discount_pct: Decimal) -> Self {
        self.gross_services = gross;
        self.services_discount_pct = discount_pct;
        self
    }

    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = status;
        self
    }

    /// Mark the order as already attached to an invoice of `direction`.
    pub fn invoiced(mut self, direction: Direction) -> Self {
        match direction {
            Direction::Supplier => self.invoiced_to_supplier = true,
            Direction::Client => self.invoiced_to_client = true,
        }
        self
    }

    pub fn build(self) -> Result<ServiceOrder, FaturaError> {
        if self.code.trim().is_empty() {
            return Err(FaturaError::Builder("order code is required".into()));
        }
        if self.gross_parts < Decimal::ZERO || self.gross_services < Decimal::ZERO {
            return Err(FaturaError::Builder(format!(
                "order '{}': gross values must not be negative",
                self.code
            )));
        }
        for (side, pct) in [
            ("parts", self.parts_discount_pct),
            ("services", self.services_discount_pct),
        ] {
            if pct < Decimal::ZERO || pct > dec!(100) {
                return Err(FaturaError::Builder(format!(
                    "order '{}': {side} discount {pct}% is outside 0–100",
                    self.code
                )));
            }
        }

        let discounted_parts = apply_discount(self.gross_parts, self.parts_discount_pct);
        let discounted_services = apply_discount(self.gross_services, self.services_discount_pct);

        Ok(ServiceOrder {
            code: self.code,
            number: self.number,
            client_id: self.client_id,
            supplier: self.supplier,
            gross_parts: self.gross_parts,
            gross_services: self.gross_services,
            parts_discount_pct: self.parts_discount_pct,
            services_discount_pct: self.services_discount_pct,
            discounted_parts,
            discounted_services,
            final_value: discounted_parts + discounted_services,
            status: self.status,
            invoiced_to_supplier: self.invoiced_to_supplier,
            invoiced_to_client: self.invoiced_to_client,
        })
    }
}

/// Builder for clients.
pub struct ClientBuilder {
    id: String,
    name: String,
    tax_kinds: Vec<TaxKind>,
    fee: FeeProfile,
}

impl ClientBuilder {
    /// A client with no tax categories and the default operation fee.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tax_kinds: Vec::new(),
            fee: FeeProfile::default(),
        }
    }

    pub fn tax_kind(mut self, kind: TaxKind) -> Self {
        if !self.tax_kinds.contains(&kind) {
            self.tax_kinds.push(kind);
        }
        self
    }

    pub fn tax_kinds(mut self, kinds: impl IntoIterator<Item = TaxKind>) -> Self {
        for kind in kinds {
            self = self.tax_kind(kind);
        }
        self
    }

    pub fn fee(mut self, fee: FeeProfile) -> Self {
        self.fee = fee;
        self
    }

    pub fn build(self) -> Client {
        Client {
            id: self.id,
            name: self.name,
            tax_kinds: self.tax_kinds,
            fee: self.fee,
        }
    }
}
