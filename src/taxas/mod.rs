//! Operation and anticipation fees charged on supplier invoices.
//!
//! A client either has a fixed operation fee (`operacao`) or fees keyed by
//! when the supplier is paid (`antecipacao_variavel`). Client invoices never
//! carry a fee.

mod compute;
mod profile;

pub use compute::{AppliedFee, compute_fee, prorate_fee};
pub use profile::{AnticipationRates, DEFAULT_OPERATION_RATE, FeeProfile, PaymentTiming};
