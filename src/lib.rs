//! # fatura
//!
//! Invoice financial engine for a services brokerage. Service orders placed
//! by clients with suppliers are aggregated into invoices ("faturas") in two
//! directions: payable to the supplier and receivable from the client. The
//! engine derives discount, Brazilian tax withholding, and operation or
//! anticipation fee breakdowns and produces the final amount due
//! ("valor devido").
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//! Every percentage application is rounded to cents immediately.
//!
//! ## Quick Start
//!
//! ```rust
//! use fatura::core::*;
//! use fatura::fatura::{build_invoice_summary, Direction, InvoiceScope};
//! use fatura::impostos::{TaxKind, TaxRuleTable};
//! use fatura::taxas::FeeProfile;
//! use rust_decimal_macros::dec;
//!
//! let supplier = Supplier::new("F-1", "Oficina Central").nao_optante_simples(true);
//! let order = ServiceOrderBuilder::new("OS-1", "1001", "C-1", supplier)
//!     .parts(dec!(1000), dec!(10))
//!     .services(dec!(500), dec!(10))
//!     .build()
//!     .unwrap();
//! let client = ClientBuilder::new("C-1", "Prefeitura")
//!     .tax_kind(TaxKind::Withholding)
//!     .fee(FeeProfile::operation(dec!(15)))
//!     .build();
//! let table = TaxRuleTable::default().with_withholding(dec!(5));
//!
//! let summary = build_invoice_summary(
//!     &[order],
//!     Direction::Supplier,
//!     &client,
//!     Some(&table),
//!     None,
//!     InvoiceScope::Complete,
//! )
//! .unwrap();
//!
//! assert_eq!(summary.discounted_total, dec!(1350.00));
//! assert_eq!(summary.tax_total, dec!(67.50));
//! assert_eq!(summary.fee_total, dec!(192.38));
//! assert_eq!(summary.amount_due, dec!(1090.12));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Orders, tax and fee engines, invoice summary and lifecycle |
//! | `json` | Load tax tables, clients and orders from JSON; export summaries |
//! | `report` | Plain-text invoice statement (demonstrativo) |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "core")]
pub mod impostos;

#[cfg(feature = "core")]
pub mod taxas;

#[cfg(feature = "core")]
pub mod fatura;

#[cfg(feature = "json")]
pub mod config;

#[cfg(feature = "report")]
pub mod demonstrativo;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
