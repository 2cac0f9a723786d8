use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};

use crate::core::{
    Client, Direction, FaturaError, InvoiceScope, OrderStatus, ServiceOrder, round2,
};
use crate::impostos::TaxRuleTable;
use crate::taxas::PaymentTiming;

use super::selection::prepare_invoice;
use super::summary::{InvoiceSummary, InvoiceViews, build_invoice_summary, build_invoice_views};

/// Payment status of one order within an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    #[serde(rename = "Aguardando pagamento")]
    AwaitingPayment,
    #[serde(rename = "Paga")]
    Paid,
}

/// Invoice status, derived from its orders' payment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FaturaStatus {
    /// No order paid.
    #[serde(rename = "Aguardando pagamento")]
    AwaitingPayment,
    /// Some orders paid.
    #[serde(rename = "Parcialmente paga")]
    PartiallyPaid,
    /// All orders paid.
    #[serde(rename = "Paga")]
    Paid,
}

impl FaturaStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::AwaitingPayment => "Aguardando pagamento",
            Self::PartiallyPaid => "Parcialmente paga",
            Self::Paid => "Paga",
        }
    }
}

/// An order attached to an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachedOrder {
    #[serde(rename = "ordem")]
    pub order: ServiceOrder,
    #[serde(rename = "statusPagamento")]
    pub payment: PaymentStatus,
}

/// Invoicing period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    #[serde(rename = "inicio")]
    pub start: NaiveDate,
    #[serde(rename = "fim")]
    pub end: NaiveDate,
}

/// Orders handed back when an invoice is deleted.
#[derive(Debug, Clone, Default)]
pub struct ReleasedOrders {
    /// Unpaid orders with the flag cleared. Back to `Autorizada` unless the
    /// other direction still holds them.
    pub unlocked: Vec<ServiceOrder>,
    /// Paid orders; they stay as they are.
    pub paid: Vec<ServiceOrder>,
}

/// Fatura: an invoice built from service orders of one client.
///
/// The serialized record also carries `status`, `valorPago` and
/// `valorRestante`. They are derived from the orders on load.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Fatura {
    #[serde(rename = "numero")]
    pub number: String,
    #[serde(rename = "tipo")]
    pub direction: Direction,
    #[serde(rename = "dataEmissao")]
    pub issue_date: NaiveDate,
    #[serde(rename = "clienteId")]
    pub client_id: String,
    /// Set on supplier invoices.
    #[serde(rename = "fornecedorId", default, skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<String>,
    #[serde(rename = "periodo", default, skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,
    /// Payment timing chosen for variable-fee clients.
    #[serde(rename = "momentoPagamento", default, skip_serializing_if = "Option::is_none")]
    pub payment_timing: Option<PaymentTiming>,
    /// `previsaoRecebimento`: supplier invoices only.
    #[serde(rename = "previsaoRecebimento", default, skip_serializing_if = "Option::is_none")]
    pub expected_receipt: Option<NaiveDate>,
    /// `dataVencimento`: client invoices only.
    #[serde(rename = "dataVencimento", default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    /// Snapshot of the complete view, overwritten when orders are removed.
    #[serde(rename = "resumo")]
    pub summary: InvoiceSummary,
    #[serde(rename = "ordens")]
    pub orders: Vec<AttachedOrder>,
}

impl Fatura {
    pub fn status(&self) -> FaturaStatus {
        let paid = self
            .orders
            .iter()
            .filter(|a| a.payment == PaymentStatus::Paid)
            .count();
        if paid == 0 {
            FaturaStatus::AwaitingPayment
        } else if paid == self.orders.len() {
            FaturaStatus::Paid
        } else {
            FaturaStatus::PartiallyPaid
        }
    }

    /// `valorPago`.
    ///
    /// Each paid order contributes its share of `valorDevido` in proportion
    /// to its final value. Once every order is paid this is exactly
    /// `valorDevido`.
    pub fn amount_paid(&self) -> Decimal {
        match self.status() {
            FaturaStatus::AwaitingPayment => Decimal::ZERO,
            FaturaStatus::Paid => self.summary.amount_due,
            FaturaStatus::PartiallyPaid => {
                let base = self.summary.discounted_total;
                if base.is_zero() {
                    return Decimal::ZERO;
                }
                self.orders
                    .iter()
                    .filter(|a| a.payment == PaymentStatus::Paid)
                    .map(|a| round2(self.summary.amount_due * a.order.final_value / base))
                    .sum()
            }
        }
    }

    /// `valorRestante = valorDevido − valorPago`.
    pub fn amount_remaining(&self) -> Decimal {
        self.summary.amount_due - self.amount_paid()
    }

    pub fn order_codes(&self) -> Vec<&str> {
        self.orders.iter().map(|a| a.order.code.as_str()).collect()
    }

    /// Complete, parts-only and services-only views for the detail screen
    /// and documents.
    pub fn views(
        &self,
        client: &Client,
        table: Option<&TaxRuleTable>,
    ) -> Result<InvoiceViews, FaturaError> {
        self.ensure_client(client)?;
        let orders: Vec<ServiceOrder> = self.orders.iter().map(|a| a.order.clone()).collect();
        build_invoice_views(&orders, self.direction, client, table, self.payment_timing)
    }

    /// Mark one order as paid.
    pub fn mark_order_paid(&mut self, code: &str) -> Result<(), FaturaError> {
        let attached = self
            .orders
            .iter_mut()
            .find(|a| a.order.code == code)
            .ok_or_else(|| FaturaError::OrderNotFound(code.to_string()))?;
        if attached.payment == PaymentStatus::Paid {
            return Ok(());
        }
        attached.payment = PaymentStatus::Paid;
        attached.order.status = OrderStatus::Paid;

        tracing::info!(fatura = %self.number, order = code, status = ?self.status(), "order paid");
        Ok(())
    }

    /// Detach an unpaid order and recompute the summary.
    ///
    /// The order comes back with its flag for this direction cleared. The
    /// last order cannot be removed; delete the invoice with
    /// [`release`](Self::release) instead.
    pub fn remove_order(
        &mut self,
        code: &str,
        client: &Client,
        table: Option<&TaxRuleTable>,
    ) -> Result<ServiceOrder, FaturaError> {
        self.ensure_client(client)?;
        let index = self
            .orders
            .iter()
            .position(|a| a.order.code == code)
            .ok_or_else(|| FaturaError::OrderNotFound(code.to_string()))?;
        if self.orders[index].payment == PaymentStatus::Paid {
            return Err(FaturaError::Validation(format!(
                "order '{code}' is already paid and cannot be removed"
            )));
        }
        if self.orders.len() == 1 {
            return Err(FaturaError::EmptySelection);
        }

        let remaining: Vec<ServiceOrder> = self
            .orders
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, a)| a.order.clone())
            .collect();
        let summary = build_invoice_summary(
            &remaining,
            self.direction,
            client,
            table,
            self.payment_timing,
            InvoiceScope::Complete,
        )?;
        summary.check_integrity()?;

        let attached = self.orders.remove(index);
        self.summary = summary;
        tracing::info!(
            fatura = %self.number,
            order = code,
            amount_due = %self.summary.amount_due,
            "order removed"
        );
        Ok(unlock(attached.order, self.direction))
    }

    /// Delete the invoice, handing back its orders.
    pub fn release(self) -> ReleasedOrders {
        let mut released = ReleasedOrders::default();
        for attached in self.orders {
            match attached.payment {
                PaymentStatus::Paid => released.paid.push(attached.order),
                PaymentStatus::AwaitingPayment => {
                    released.unlocked.push(unlock(attached.order, self.direction))
                }
            }
        }
        tracing::info!(
            fatura = %self.number,
            unlocked = released.unlocked.len(),
            paid = released.paid.len(),
            "invoice deleted"
        );
        released
    }

    fn ensure_client(&self, client: &Client) -> Result<(), FaturaError> {
        if client.id != self.client_id {
            return Err(FaturaError::ClientMismatch {
                expected: self.client_id.clone(),
                found: client.id.clone(),
            });
        }
        Ok(())
    }
}

/// Persisted shape of a [`Fatura`].
#[derive(Serialize)]
struct FaturaRecord<'a> {
    #[serde(rename = "numero")]
    number: &'a str,
    #[serde(rename = "tipo")]
    direction: Direction,
    #[serde(rename = "dataEmissao")]
    issue_date: NaiveDate,
    #[serde(rename = "clienteId")]
    client_id: &'a str,
    #[serde(rename = "fornecedorId", skip_serializing_if = "Option::is_none")]
    supplier_id: Option<&'a str>,
    #[serde(rename = "periodo", skip_serializing_if = "Option::is_none")]
    period: Option<Period>,
    #[serde(rename = "momentoPagamento", skip_serializing_if = "Option::is_none")]
    payment_timing: Option<PaymentTiming>,
    #[serde(rename = "previsaoRecebimento", skip_serializing_if = "Option::is_none")]
    expected_receipt: Option<NaiveDate>,
    #[serde(rename = "dataVencimento", skip_serializing_if = "Option::is_none")]
    due_date: Option<NaiveDate>,
    status: FaturaStatus,
    #[serde(rename = "valorPago")]
    amount_paid: Decimal,
    #[serde(rename = "valorRestante")]
    amount_remaining: Decimal,
    #[serde(rename = "resumo")]
    summary: &'a InvoiceSummary,
    #[serde(rename = "ordens")]
    orders: &'a [AttachedOrder],
}

impl Serialize for Fatura {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let amount_paid = self.amount_paid();
        FaturaRecord {
            number: &self.number,
            direction: self.direction,
            issue_date: self.issue_date,
            client_id: &self.client_id,
            supplier_id: self.supplier_id.as_deref(),
            period: self.period,
            payment_timing: self.payment_timing,
            expected_receipt: self.expected_receipt,
            due_date: self.due_date,
            status: self.status(),
            amount_paid,
            amount_remaining: self.summary.amount_due - amount_paid,
            summary: &self.summary,
            orders: &self.orders,
        }
        .serialize(serializer)
    }
}

/// Clear the flag for `direction`; an order awaiting payment that no other
/// invoice holds goes back to `Autorizada`.
fn unlock(mut order: ServiceOrder, direction: Direction) -> ServiceOrder {
    order.set_invoiced(direction, false);
    let other = match direction {
        Direction::Supplier => Direction::Client,
        Direction::Client => Direction::Supplier,
    };
    if order.status == OrderStatus::AwaitingPayment && !order.is_invoiced(other) {
        order.status = OrderStatus::Authorized;
    }
    order
}

/// Builder for invoices.
///
/// ```
/// use chrono::NaiveDate;
/// use fatura::core::*;
/// use fatura::fatura::*;
/// use rust_decimal_macros::dec;
///
/// let client = ClientBuilder::new("C-1", "Cliente").build();
/// let order = ServiceOrderBuilder::new("OS-1", "1", "C-1", Supplier::new("F-1", "Oficina"))
///     .services(dec!(200), dec!(0))
///     .build()
///     .unwrap();
///
/// let fatura = FaturaBuilder::new("FC-2024-0001", Direction::Client, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
///     .client(&client)
///     .add_order(order)
///     .build()
///     .unwrap();
/// assert_eq!(fatura.summary.amount_due, dec!(200));
/// assert!(fatura.orders[0].order.invoiced_to_client);
/// ```
pub struct FaturaBuilder {
    number: String,
    direction: Direction,
    issue_date: NaiveDate,
    client: Option<Client>,
    table: Option<TaxRuleTable>,
    payment_timing: Option<PaymentTiming>,
    period: Option<Period>,
    expected_receipt: Option<NaiveDate>,
    due_date: Option<NaiveDate>,
    orders: Vec<ServiceOrder>,
}

impl FaturaBuilder {
    pub fn new(number: impl Into<String>, direction: Direction, issue_date: NaiveDate) -> Self {
        Self {
            number: number.into(),
            direction,
            issue_date,
            client: None,
            table: None,
            payment_timing: None,
            period: None,
            expected_receipt: None,
            due_date: None,
            orders: Vec::new(),
        }
    }

    pub fn client(mut self, client: &Client) -> Self {
        self.client = Some(client.clone());
        self
    }

    pub fn tax_table(mut self, table: &TaxRuleTable) -> Self {
        self.table = Some(*table);
        self
    }

    pub fn payment_timing(mut self, timing: PaymentTiming) -> Self {
        self.payment_timing = Some(timing);
        self
    }

    pub fn period(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.period = Some(Period { start, end });
        self
    }

    pub fn expected_receipt(mut self, date: NaiveDate) -> Self {
        self.expected_receipt = Some(date);
        self
    }

    pub fn due_date(mut self, date: NaiveDate) -> Self {
        self.due_date = Some(date);
        self
    }

    pub fn add_order(mut self, order: ServiceOrder) -> Self {
        self.orders.push(order);
        self
    }

    pub fn orders(mut self, orders: impl IntoIterator<Item = ServiceOrder>) -> Self {
        self.orders.extend(orders);
        self
    }

    /// Validate the selection, compute the summary, and lock the orders.
    ///
    /// Orders already `Paga` are attached as paid.
    pub fn build(self) -> Result<Fatura, FaturaError> {
        let client = self
            .client
            .ok_or_else(|| FaturaError::Builder("client is required".into()))?;
        if self.number.trim().is_empty() {
            return Err(FaturaError::Builder("invoice number is required".into()));
        }
        if let Some(period) = &self.period {
            if period.start > period.end {
                return Err(FaturaError::Builder(format!(
                    "period start {} is after period end {}",
                    period.start, period.end
                )));
            }
        }
        match self.direction {
            Direction::Supplier if self.due_date.is_some() => {
                return Err(FaturaError::Builder(
                    "due date applies to client invoices; use expected_receipt".into(),
                ));
            }
            Direction::Client if self.expected_receipt.is_some() => {
                return Err(FaturaError::Builder(
                    "expected receipt applies to supplier invoices; use due_date".into(),
                ));
            }
            _ => {}
        }

        let summary = prepare_invoice(
            &self.orders,
            self.direction,
            &client,
            self.table.as_ref(),
            self.payment_timing,
        )?;

        let supplier_id = match self.direction {
            Direction::Supplier => self.orders.first().map(|o| o.supplier.id.clone()),
            Direction::Client => None,
        };

        let orders = self
            .orders
            .into_iter()
            .map(|mut order| {
                order.set_invoiced(self.direction, true);
                if order.status == OrderStatus::Authorized {
                    order.status = OrderStatus::AwaitingPayment;
                }
                let payment = match order.status {
                    OrderStatus::Paid => PaymentStatus::Paid,
                    _ => PaymentStatus::AwaitingPayment,
                };
                AttachedOrder { order, payment }
            })
            .collect::<Vec<_>>();

        tracing::info!(
            fatura = %self.number,
            direction = self.direction.label(),
            client = %client.id,
            orders = orders.len(),
            amount_due = %summary.amount_due,
            "invoice created"
        );

        Ok(Fatura {
            number: self.number,
            direction: self.direction,
            issue_date: self.issue_date,
            client_id: client.id,
            supplier_id,
            period: self.period,
            payment_timing: self.payment_timing,
            expected_receipt: self.expected_receipt,
            due_date: self.due_date,
            summary,
            orders,
        })
    }
}
