//! JSON records from the surrounding stores.
//!
//! Tax tables, clients and orders are read with the field names the stores
//! use (`impostosMunicipais`, `tipoImposto`, `valorPecasComDesconto`, ...).
//! A document that is not valid JSON, or a record missing a required field,
//! is a [`FaturaError::Config`]; inside a tax table, absent or malformed
//! rates resolve to zero instead.
//!
//! # Example
//!
//! ```
//! use fatura::config::load_tax_table;
//! use rust_decimal_macros::dec;
//!
//! let table = load_tax_table(r#"{
//!     "impostosMunicipais": { "pecas": { "ir": 2 }, "servicos": { "ir": "5" } },
//!     "impostosFederais": { "pecas": null },
//!     "retencoesOrgao": { "percentual": 4.8 }
//! }"#).unwrap();
//! assert_eq!(table.municipal.services.ir, dec!(5));
//! assert_eq!(table.federal.parts.combined(), dec!(0));
//! assert_eq!(table.withholding.percentual, dec!(4.8));
//! ```

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::core::{Client, FaturaError, ServiceOrder};
use crate::fatura::{Fatura, InvoiceSummary};
use crate::impostos::TaxRuleTable;

/// Read the active tax rule table.
pub fn load_tax_table(json: &str) -> Result<TaxRuleTable, FaturaError> {
    parse("tax table", json)
}

/// Read one client record.
pub fn load_client(json: &str) -> Result<Client, FaturaError> {
    parse("client", json)
}

/// Read a list of service orders.
pub fn load_orders(json: &str) -> Result<Vec<ServiceOrder>, FaturaError> {
    parse("service orders", json)
}

/// Read a persisted invoice.
pub fn load_fatura(json: &str) -> Result<Fatura, FaturaError> {
    parse("fatura", json)
}

/// Serialize a summary for persistence.
pub fn summary_to_json(summary: &InvoiceSummary) -> Result<String, FaturaError> {
    to_json("summary", summary)
}

/// Serialize an invoice for persistence.
pub fn fatura_to_json(fatura: &Fatura) -> Result<String, FaturaError> {
    to_json("fatura", fatura)
}

fn parse<T: DeserializeOwned>(what: &str, json: &str) -> Result<T, FaturaError> {
    serde_json::from_str(json).map_err(|e| {
        tracing::warn!("could not read {what}: {e}");
        FaturaError::Config(format!("{what}: {e}"))
    })
}

fn to_json<T: Serialize>(what: &str, value: &T) -> Result<String, FaturaError> {
    serde_json::to_string_pretty(value).map_err(|e| FaturaError::Config(format!("{what}: {e}")))
}
