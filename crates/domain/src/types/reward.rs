//! Reward token amounts and mint receipts

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{DISPLAY_FRACTION_DIGITS, TOKEN_DECIMALS};
use crate::types::user::WalletAddress;

/// Token quantity in base units (`10^TOKEN_DECIMALS` base units per token).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenAmount(u128);

impl TokenAmount {
    pub const ZERO: Self = Self(0);

    pub fn from_base_units(units: u128) -> Self {
        Self(units)
    }

    /// `tokens` whole tokens at [`TOKEN_DECIMALS`] precision.
    pub fn from_whole_tokens(tokens: u64) -> Self {
        Self(u128::from(tokens) * 10u128.pow(TOKEN_DECIMALS))
    }

    pub fn base_units(self) -> u128 {
        self.0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Render with `fraction_digits` decimals, rounding half up.
    ///
    /// `decimals` is the token precision; `fraction_digits` above it are
    /// padded with zeros.
    pub fn format_units(self, decimals: u32, fraction_digits: u32) -> String {
        let scale = 10u128.pow(decimals);
        let mut whole = self.0 / scale;
        let remainder = self.0 % scale;

        if fraction_digits == 0 {
            if remainder * 2 >= scale && scale > 1 {
                whole += 1;
            }
            return whole.to_string();
        }

        let fraction = if fraction_digits >= decimals {
            remainder * 10u128.pow(fraction_digits - decimals)
        } else {
            let divisor = 10u128.pow(decimals - fraction_digits);
            let rounded = (remainder + divisor / 2) / divisor;
            if rounded == 10u128.pow(fraction_digits) {
                whole += 1;
                0
            } else {
                rounded
            }
        };

        format!("{whole}.{fraction:0width$}", width = fraction_digits as usize)
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_units(TOKEN_DECIMALS, DISPLAY_FRACTION_DIGITS))
    }
}

/// Confirmation returned by the reward issuer after a mint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardReceipt {
    pub tx_id: String,
    pub wallet: WalletAddress,
    pub amount: TokenAmount,
    pub minted_at: DateTime<Utc>,
}
