//! Wallet address type.

use crate::error::AddressError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The Bitcoin base58 alphabet (no `0`, `O`, `I`, `l`).
const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// A wallet address as reported by the connected wallet app.
///
/// Addresses are base58-encoded public keys, 32–44 characters long. The
/// address is the isolation boundary for balances and ledgers: two different
/// addresses never share credit state.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Parse and validate a raw address string.
    pub fn parse(raw: impl Into<String>) -> Result<Self, AddressError> {
        let s = raw.into();
        if s.len() < 32 || s.len() > 44 {
            return Err(AddressError::Length(s.len()));
        }
        if let Some(c) = s.chars().find(|c| !BASE58_ALPHABET.contains(*c)) {
            return Err(AddressError::Character(c));
        }
        Ok(Self(s))
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for WalletAddress {
    type Error = AddressError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "4Nd1mYvK7R2ZqpJcW8sThU6eDxGaBfLvMwPnQrSty9Ej";

    #[test]
    fn parse_valid_address() {
        let addr = WalletAddress::parse(VALID).unwrap();
        assert_eq!(addr.as_str(), VALID);
    }

    #[test]
    fn reject_short_address() {
        assert!(matches!(
            WalletAddress::parse("tooShort"),
            Err(AddressError::Length(8))
        ));
    }

    #[test]
    fn reject_non_base58_characters() {
        // '0' and 'O' are not in the base58 alphabet.
        let raw = format!("0{}", &VALID[1..]);
        assert!(matches!(
            WalletAddress::parse(raw),
            Err(AddressError::Character('0'))
        ));
    }
}
