//! Domain error model.

use thiserror::Error;

use crate::id::{FlowerId, SaleId};

/// Result type used across the domain layer.
pub type ShopResult<T> = Result<T, ShopError>;

/// Domain-level error.
///
/// Every variant is a deterministic business failure surfaced straight to the
/// caller. Nothing here is retried, and a failed operation leaves no partial state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShopError {
    /// A field failed a static constraint (empty string, bad range, malformed key).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A secondary key (cpf / cnpj) is already used by a different entity.
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    /// A referenced entity does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The operation is not allowed in the sale's current state.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Requested quantity exceeds what the flower has on hand.
    #[error(
        "insufficient stock for flower {flower_id}: requested {requested}, available {available}"
    )]
    InsufficientStock {
        flower_id: FlowerId,
        requested: u64,
        available: u32,
    },

    /// Finalize was attempted on a sale without line items.
    #[error("sale {0} has no items")]
    EmptySale(SaleId),
}

impl ShopError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn duplicate_key(msg: impl Into<String>) -> Self {
        Self::DuplicateKey(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn insufficient_stock(flower_id: FlowerId, requested: u64, available: u32) -> Self {
        Self::InsufficientStock {
            flower_id,
            requested,
            available,
        }
    }
}

/// Fails with [`ShopError::Validation`] when `value` is blank.
pub fn require_non_empty(field: &str, value: &str) -> ShopResult<()> {
    if value.trim().is_empty() {
        return Err(ShopError::validation(format!("{field} cannot be empty")));
    }
    Ok(())
}
