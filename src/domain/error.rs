//! Domain Error Types
//!
//! Pure domain errors that don't depend on infrastructure.

use thiserror::Error;
use uuid::Uuid;

/// Business rule violations and domain invariant failures.
///
/// These are independent of the persistence/scheduling layer. A missing
/// exposure rule is a configuration defect and aborts a whole sync pass;
/// the remaining variants guard invariants of individual entities.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// No exposure rule is configured for a currency seen in the pass.
    /// Exposure policy is mandatory, so this is fatal for the pass.
    #[error("No remittance exposure rule found for currency {currency}")]
    ExposureRuleNotFound { currency: String },

    /// An order id tracked by an accumulator could not be re-fetched at
    /// closing time. The tracked set must always reference existing
    /// orders, so this is an unrecoverable invariant violation.
    #[error("Tracked remittance order {0} no longer exists")]
    TrackedOrderMissing(Uuid),

    /// Malformed settlement date code string (expected `"D<n>;D<m>"`).
    #[error("Invalid settlement date code: {0}")]
    InvalidDateCode(String),

    /// An order may be closed exactly once.
    #[error("Remittance order {0} is already closed")]
    OrderAlreadyClosed(Uuid),

    /// Summing order amounts overflowed the 64-bit minor-unit range.
    #[error("Exposure amount overflow in bucket {bucket}")]
    ExposureOverflow { bucket: String },
}

impl DomainError {
    /// Create a missing-rule error for a currency.
    pub fn rule_not_found(currency: impl Into<String>) -> Self {
        Self::ExposureRuleNotFound {
            currency: currency.into(),
        }
    }

    /// Check if this is a configuration defect (operator action needed,
    /// local retries will not help).
    pub fn is_configuration_defect(&self) -> bool {
        matches!(self, Self::ExposureRuleNotFound { .. })
    }
}
