//! Meditation reward service - core business logic

use std::sync::Arc;

use stillmint_common::Clock;
use stillmint_domain::{
    Result, RewardReceipt, SessionRecord, SessionVerdict, StillMintError, TokenAmount,
};
use tracing::{error, info};

use super::ports::{RewardIssuer, SessionRepository};
use crate::user::ports::UserProfileRepository;

/// What happened to a finished session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewardOutcome {
    /// Tokens minted and the session recorded.
    Granted { receipt: RewardReceipt, record: SessionRecord },
    /// Disqualified; nothing minted or stored.
    Withheld { verdict: SessionVerdict },
}

/// Handles verdicts: mints rewards and keeps the session history.
pub struct MeditationService {
    issuer: Arc<dyn RewardIssuer>,
    sessions: Arc<dyn SessionRepository>,
    users: Arc<dyn UserProfileRepository>,
    clock: Arc<dyn Clock>,
    tokens_per_session: u64,
}

impl MeditationService {
    pub fn new(
        issuer: Arc<dyn RewardIssuer>,
        sessions: Arc<dyn SessionRepository>,
        users: Arc<dyn UserProfileRepository>,
        clock: Arc<dyn Clock>,
        tokens_per_session: u64,
    ) -> Self {
        Self { issuer, sessions, users, clock, tokens_per_session }
    }

    /// Settle a verdict for `user_id`.
    ///
    /// A disqualified verdict is withheld without touching any collaborator.
    /// For a completed one the reward is minted first; the history record is
    /// only written once the mint succeeded.
    pub async fn complete_session(
        &self,
        user_id: &str,
        verdict: SessionVerdict,
    ) -> Result<RewardOutcome> {
        if !verdict.is_qualified() {
            info!(
                user_id,
                violations = verdict.violation_count,
                "session disqualified; reward withheld"
            );
            return Ok(RewardOutcome::Withheld { verdict });
        }

        let profile = self
            .users
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| StillMintError::NotFound(format!("user profile {user_id}")))?;

        let amount = TokenAmount::from_whole_tokens(self.tokens_per_session);
        let receipt = self.issuer.mint(&profile.wallet_address, amount).await.map_err(|err| {
            error!(user_id, error = %err, "reward mint failed");
            err
        })?;

        let record = SessionRecord::from_verdict(
            user_id,
            &verdict,
            self.tokens_per_session,
            receipt.tx_id.clone(),
            self.clock.now_utc(),
        );
        self.sessions.save_session(record.clone()).await?;

        info!(
            user_id,
            tx_id = %receipt.tx_id,
            tokens = self.tokens_per_session,
            "session reward granted"
        );
        Ok(RewardOutcome::Granted { receipt, record })
    }

    /// Session history for `user_id`, newest first.
    pub async fn history(&self, user_id: &str) -> Result<Vec<SessionRecord>> {
        let mut records = self.sessions.sessions_for_user(user_id).await?;
        records.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        Ok(records)
    }

    /// Token balance of the wallet linked to `user_id`.
    pub async fn balance(&self, user_id: &str) -> Result<TokenAmount> {
        let profile = self
            .users
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| StillMintError::NotFound(format!("user profile {user_id}")))?;
        self.issuer.balance_of(&profile.wallet_address).await
    }

    pub fn tokens_per_session(&self) -> u64 {
        self.tokens_per_session
    }
}
