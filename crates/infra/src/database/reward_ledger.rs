//! Local reward ledger
//!
//! Stands in for the token contract: every mint is a row in `reward_ledger`
//! and a wallet's balance is the sum of its rows.

use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::params;
use stillmint_common::Clock;
use stillmint_core::rewards::ports::RewardIssuer;
use stillmint_domain::{
    Result as DomainResult, RewardReceipt, StillMintError, TokenAmount, WalletAddress,
};
use tokio::task;
use tracing::info;
use uuid::Uuid;

use super::manager::DbManager;
use super::to_millis;
use crate::errors::conversions::to_domain;

/// SQLite-backed [`RewardIssuer`].
pub struct LocalLedgerRewardIssuer {
    db: Arc<DbManager>,
    clock: Arc<dyn Clock>,
}

impl LocalLedgerRewardIssuer {
    pub fn new(db: Arc<DbManager>, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }
}

#[async_trait]
impl RewardIssuer for LocalLedgerRewardIssuer {
    async fn mint(&self, wallet: &WalletAddress, amount: TokenAmount) -> DomainResult<RewardReceipt> {
        if amount == TokenAmount::ZERO {
            return Err(StillMintError::Reward("refusing to mint a zero amount".into()));
        }

        let db = Arc::clone(&self.db);
        let receipt = RewardReceipt {
            tx_id: format!("ledger-{}", Uuid::now_v7()),
            wallet: wallet.clone(),
            amount,
            minted_at: self.clock.now_utc(),
        };
        let row = receipt.clone();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO reward_ledger (tx_id, wallet_address, amount, minted_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    &row.tx_id,
                    row.wallet.as_str(),
                    row.amount.base_units().to_string(),
                    to_millis(row.minted_at),
                ],
            )
            .map_err(to_domain)?;
            Ok(())
        })
        .await
        .map_err(to_domain)??;

        info!(tx_id = %receipt.tx_id, wallet = %receipt.wallet, amount = %receipt.amount, "reward minted");
        Ok(receipt)
    }

    async fn balance_of(&self, wallet: &WalletAddress) -> DomainResult<TokenAmount> {
        let db = Arc::clone(&self.db);
        let wallet = wallet.as_str().to_string();

        task::spawn_blocking(move || -> DomainResult<TokenAmount> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare("SELECT amount FROM reward_ledger WHERE wallet_address = ?1")
                .map_err(to_domain)?;
            let amounts = stmt
                .query_map(params![&wallet], |row| row.get::<_, String>(0))
                .map_err(to_domain)?;

            let mut total = TokenAmount::ZERO;
            for amount in amounts {
                let raw = amount.map_err(to_domain)?;
                let units = raw.parse::<u128>().map_err(|err| {
                    StillMintError::Database(format!("corrupt ledger amount {raw:?}: {err}"))
                })?;
                total = total
                    .checked_add(TokenAmount::from_base_units(units))
                    .ok_or_else(|| StillMintError::Reward("balance overflow".into()))?;
            }
            Ok(total)
        })
        .await
        .map_err(to_domain)?
    }
}
