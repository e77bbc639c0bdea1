//! User profile types
//!
//! A profile links an account id to the wallet that receives session rewards.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::StillMintError;

static WALLET_ADDRESS_RE: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^0x[a-fA-F0-9]{40}$").expect("wallet address pattern is valid")
});

/// Hex-encoded Ethereum-style account address (`0x` + 40 hex digits).
///
/// Case is preserved as entered; no checksum validation is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WalletAddress(String);

impl WalletAddress {
    pub fn parse(raw: &str) -> Result<Self, StillMintError> {
        let trimmed = raw.trim();
        if WALLET_ADDRESS_RE.is_match(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(StillMintError::InvalidInput(format!("Invalid Ethereum wallet address: {raw}")))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for WalletAddress {
    type Err = StillMintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for WalletAddress {
    type Error = StillMintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<WalletAddress> for String {
    fn from(value: WalletAddress) -> Self {
        value.0
    }
}

/// User profile stored in local database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub wallet_address: WalletAddress,
    pub created_at: DateTime<Utc>,
}
