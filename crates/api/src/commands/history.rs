//! Session history and balance commands

use std::time::Instant;

use serde::Serialize;
use stillmint_domain::constants::TOKEN_SYMBOL;
use stillmint_domain::{Result as DomainResult, SessionRecord, TokenAmount, WalletAddress};

use crate::context::AppContext;
use crate::utils::logging::log_command_execution;

/// Wallet balance as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceView {
    pub user_id: String,
    pub wallet: WalletAddress,
    pub amount: TokenAmount,
    /// Amount rendered with two fraction digits and the token symbol.
    pub display: String,
}

/// Completed sessions for `user_id`, newest first.
pub async fn get_session_history(
    ctx: &AppContext,
    user_id: &str,
) -> DomainResult<Vec<SessionRecord>> {
    let start = Instant::now();
    let result = ctx.meditation.history(user_id).await;
    log_command_execution("history::list", start.elapsed(), &result);
    result
}

pub async fn get_balance(ctx: &AppContext, user_id: &str) -> DomainResult<BalanceView> {
    let start = Instant::now();

    let result: DomainResult<BalanceView> = async {
        let profile = ctx.users.profile(user_id).await?;
        let amount = ctx.meditation.balance(user_id).await?;
        Ok(BalanceView {
            user_id: profile.id,
            wallet: profile.wallet_address,
            amount,
            display: format!("{amount} {TOKEN_SYMBOL}"),
        })
    }
    .await;

    log_command_execution("history::balance", start.elapsed(), &result);
    result
}
