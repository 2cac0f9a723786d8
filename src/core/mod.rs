//! Core records, builders, validation, and numbering.
//!
//! Service orders, clients and suppliers as supplied by the surrounding
//! stores, plus cent rounding and BRL display helpers shared by the tax,
//! fee, and invoice modules.

mod builder;
mod error;
pub mod money;
mod numbering;
mod types;
mod validation;

pub use builder::*;
pub use error::*;
pub use money::{format_brl, percent_of, round2};
pub use numbering::*;
pub use types::*;
pub use validation::*;
