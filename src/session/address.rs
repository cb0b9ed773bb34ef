//! Chain address type.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::WalletSessionError;

/// Maximum number of hex digits in an address (20 bytes).
pub const MAX_HEX_DIGITS: usize = 40;

/// A well-formed chain address.
///
/// Addresses are `0x` followed by between 1 and 40 hexadecimal digits.
/// The original spelling is kept as-is, so a checksummed address displays
/// exactly as the wallet reported it. Equality and hashing ignore the case
/// of the hex digits: `0xAbC` and `0xabc` are the same account.
#[derive(Debug, Clone)]
pub struct Address(String);

impl Address {
    /// Parse and validate an address string.
    pub fn parse(s: &str) -> crate::Result<Self> {
        let digits = s
            .strip_prefix("0x")
            .ok_or_else(|| WalletSessionError::InvalidAddress(s.into()))?;

        if digits.is_empty()
            || digits.len() > MAX_HEX_DIGITS
            || !digits.bytes().all(|b| b.is_ascii_hexdigit())
        {
            return Err(WalletSessionError::InvalidAddress(s.into()));
        }

        Ok(Self(s.to_string()))
    }

    /// Get the address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for Address {}

impl Hash for Address {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for b in self.0.bytes() {
            state.write_u8(b.to_ascii_lowercase());
        }
        state.write_usize(self.0.len());
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Address {
    type Err = WalletSessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::parse(s)
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Address::parse(&raw).map_err(serde::de::Error::custom)
    }
}
