//! Settlement date codes
//!
//! Compact classifiers for interbank settlement timing. A code such as
//! `D0` means funds move the same business day, `D1` the next, and so on.
//! Upstream systems hand the send/receive pair over as a single compact
//! string of the form `"D0;D1"`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::DomainError;

/// Number of business days until funds move for one leg of a settlement.
///
/// # Example
/// ```
/// use otc_remit::domain::SettlementDateCode;
///
/// let code: SettlementDateCode = "D2".parse().unwrap();
/// assert_eq!(code.days(), 2);
/// assert_eq!(code.to_string(), "D2");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SettlementDateCode(u8);

impl SettlementDateCode {
    /// Same-day settlement (`D0`).
    pub const D0: SettlementDateCode = SettlementDateCode(0);

    pub fn new(days: u8) -> Self {
        Self(days)
    }

    /// Business days until the leg settles.
    pub fn days(&self) -> u8 {
        self.0
    }

    /// Parse a compact `"D<n>;D<m>"` pair into (send, receive) codes.
    ///
    /// Fails unless the input is exactly two semicolon-separated
    /// `D`-prefixed tokens. Orders carrying different settlement timing
    /// settle on different interbank cycles, so the pair is part of the
    /// grouping key and must parse before any bucket is touched.
    pub fn parse_pair(raw: &str) -> Result<(Self, Self), DomainError> {
        let mut tokens = raw.split(';');

        let send = tokens
            .next()
            .ok_or_else(|| DomainError::InvalidDateCode(raw.to_string()))?;
        let receive = tokens
            .next()
            .ok_or_else(|| DomainError::InvalidDateCode(raw.to_string()))?;

        if tokens.next().is_some() {
            return Err(DomainError::InvalidDateCode(raw.to_string()));
        }

        Ok((send.parse()?, receive.parse()?))
    }
}

impl FromStr for SettlementDateCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let days = s
            .strip_prefix('D')
            .ok_or_else(|| DomainError::InvalidDateCode(s.to_string()))?;

        let days: u8 = days
            .parse()
            .map_err(|_| DomainError::InvalidDateCode(s.to_string()))?;

        Ok(Self(days))
    }
}

impl fmt::Display for SettlementDateCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "D{}", self.0)
    }
}

impl TryFrom<String> for SettlementDateCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SettlementDateCode> for String {
    fn from(code: SettlementDateCode) -> Self {
        code.to_string()
    }
}
