//! Invoice aggregation and lifecycle.
//!
//! [`build_invoice_summary`] is the single place where discounts, taxes and
//! fees are combined, for both directions and all three views. Supplier
//! invoices charge their fee on the amount after tax withholding.
//!
//! # Example
//!
//! ```
//! use fatura::core::*;
//! use fatura::fatura::*;
//! use fatura::impostos::{TaxKind, TaxRuleTable};
//! use fatura::taxas::{AnticipationRates, FeeProfile, PaymentTiming};
//! use rust_decimal_macros::dec;
//!
//! let supplier = Supplier::new("F-1", "Oficina").nao_optante_simples(true);
//! let order = ServiceOrderBuilder::new("OS-1", "1", "C-1", supplier)
//!     .parts(dec!(1000), dec!(10))
//!     .services(dec!(500), dec!(10))
//!     .build()
//!     .unwrap();
//! let client = ClientBuilder::new("C-1", "Cliente")
//!     .tax_kind(TaxKind::Withholding)
//!     .fee(FeeProfile::variable(AnticipationRates::default()))
//!     .build();
//! let table = TaxRuleTable::default().with_withholding(dec!(5));
//!
//! let orders = [order];
//! let missing = prepare_invoice(&orders, Direction::Supplier, &client, Some(&table), None);
//! assert!(matches!(missing, Err(FaturaError::PaymentTimingRequired(_))));
//!
//! let summary = prepare_invoice(
//!     &orders,
//!     Direction::Supplier,
//!     &client,
//!     Some(&table),
//!     Some(PaymentTiming::AfterClosing),
//! )
//! .unwrap();
//! // 1282.50 * 13% = 166.725 → 166.73
//! assert_eq!(summary.fee_total, dec!(166.73));
//! assert_eq!(summary.amount_due, dec!(1115.77));
//! ```

mod lifecycle;
mod selection;
mod summary;

pub use lifecycle::{
    AttachedOrder, Fatura, FaturaBuilder, FaturaStatus, PaymentStatus, Period, ReleasedOrders,
};
pub use selection::{prepare_invoice, validate_selection};
pub use summary::{InvoiceSummary, InvoiceViews, build_invoice_summary, build_invoice_views};

pub use crate::core::{Direction, InvoiceScope};
