//! Tax withholding on service orders.
//!
//! Four categories are withheld when the client is subject to them and the
//! order's supplier is not under Simples Nacional: municipal, state, federal
//! (each split into parts and services), and the flat "retenções do órgão".
//!
//! # Example
//!
//! ```
//! use fatura::core::*;
//! use fatura::impostos::*;
//! use rust_decimal_macros::dec;
//!
//! let supplier = Supplier::new("F-1", "Oficina").nao_optante_simples(true);
//! let order = ServiceOrderBuilder::new("OS-1", "1", "C-1", supplier)
//!     .parts(dec!(900), dec!(0))
//!     .services(dec!(450), dec!(0))
//!     .build()
//!     .unwrap();
//! let client = ClientBuilder::new("C-1", "Cliente").tax_kind(TaxKind::Withholding).build();
//! let table = TaxRuleTable::default().with_withholding(dec!(5));
//!
//! let taxes = compute_taxes(&[order], &client, Some(&table), InvoiceScope::Complete);
//! assert_eq!(taxes.total, dec!(67.50));
//! ```

mod compute;
mod table;

pub use compute::{TaxBreakdown, TaxLineItem, compute_taxes, taxable_bases};
pub use table::{FlatRate, RateSet, SplitRates, TaxKind, TaxRuleTable};
