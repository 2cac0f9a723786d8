use thiserror::Error;

/// Errors raised while building orders, selecting orders for an invoice,
/// or managing an invoice's lifecycle.
///
/// The computation functions never fail on missing configuration: an absent
/// tax table or fee rate resolves to zero or to its default.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FaturaError {
    /// No orders were selected.
    #[error("no service orders selected")]
    EmptySelection,

    /// The selection spans more than one client.
    #[error("selection spans more than one client: {0:?}")]
    CrossClientSelection(Vec<String>),

    /// A supplier invoice selection spans more than one supplier.
    #[error("selection spans more than one supplier: {0:?}")]
    CrossSupplierSelection(Vec<String>),

    /// The client passed in is not the one the orders or the invoice
    /// belong to. `expected` is the client being invoiced.
    #[error("expected client '{expected}', found client '{found}'")]
    ClientMismatch { expected: String, found: String },

    /// A variable-fee client needs a payment timing on supplier invoices.
    #[error("client '{0}' uses variable anticipation fees; a payment timing must be chosen")]
    PaymentTimingRequired(String),

    /// The order's status does not allow invoicing.
    #[error("order '{code}' has status '{status}' and cannot be invoiced")]
    NotEligible { code: String, status: String },

    /// The order is already attached to an invoice of this direction.
    #[error("order '{code}' is already invoiced for {direction}")]
    AlreadyInvoiced { code: String, direction: String },

    /// The order is not part of the invoice.
    #[error("order '{0}' is not attached to this invoice")]
    OrderNotFound(String),

    /// Computed amounts are negative or do not add up.
    #[error("inconsistent invoice state: {0}")]
    InconsistentState(String),

    /// One or more validation rules failed.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Builder encountered invalid or missing configuration.
    #[error("builder error: {0}")]
    Builder(String),

    /// Invoice number sequencing error.
    #[error("numbering error: {0}")]
    Numbering(String),

    /// A configuration document could not be read.
    #[error("configuration error: {0}")]
    Config(String),
}

/// A single validation error with field path and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dot-separated path to the invalid field (e.g. "orders[0].valorFinal").
    pub field: String,
    /// Human-readable error description.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Join validation errors into a single message.
pub(crate) fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
