//! Port interfaces for reward issuance and session history
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations.

use async_trait::async_trait;
use stillmint_domain::{Result, RewardReceipt, SessionRecord, TokenAmount, WalletAddress};

/// Mints reward tokens to a wallet.
#[async_trait]
pub trait RewardIssuer: Send + Sync {
    /// Mint `amount` to `wallet` and return the receipt.
    async fn mint(&self, wallet: &WalletAddress, amount: TokenAmount) -> Result<RewardReceipt>;

    /// Current token balance held by `wallet`.
    async fn balance_of(&self, wallet: &WalletAddress) -> Result<TokenAmount>;
}

/// Trait for persisting session history
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Save a session record
    async fn save_session(&self, record: SessionRecord) -> Result<()>;

    /// All records for `user_id`, newest first
    async fn sessions_for_user(&self, user_id: &str) -> Result<Vec<SessionRecord>>;
}
