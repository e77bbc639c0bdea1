//! Mock port implementations for testing
//!
//! Provides in-memory mocks for the core reward and profile ports, enabling
//! deterministic tests without database dependencies.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use stillmint_core::{RewardIssuer, SessionRepository, StoredCredentials, UserProfileRepository};
use stillmint_domain::{
    Result as DomainResult, RewardReceipt, SessionRecord, StillMintError, TokenAmount,
    UserProfile, WalletAddress,
};

pub const WALLET: &str = "0x52908400098527886E0F7030069857D2E4169EE7";

pub fn profile(id: &str) -> UserProfile {
    UserProfile {
        id: id.to_string(),
        email: format!("{id}@example.com"),
        wallet_address: WalletAddress::parse(WALLET).unwrap(),
        created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
    }
}

/// In-memory mock for `UserProfileRepository`.
#[derive(Default, Clone)]
pub struct MockUserRepository {
    profiles: Arc<Mutex<HashMap<String, StoredCredentials>>>,
}

impl MockUserRepository {
    /// Seed a profile without a usable password.
    pub fn with_profile(self, profile: UserProfile) -> Self {
        let stored = StoredCredentials { profile, password_hash: String::new() };
        self.profiles.lock().insert(stored.profile.id.clone(), stored);
        self
    }

    pub fn with_credentials(self, profile: UserProfile, password_hash: &str) -> Self {
        let stored = StoredCredentials { profile, password_hash: password_hash.to_string() };
        self.profiles.lock().insert(stored.profile.id.clone(), stored);
        self
    }

    pub fn len(&self) -> usize {
        self.profiles.lock().len()
    }

    pub fn password_hash(&self, id: &str) -> Option<String> {
        self.profiles.lock().get(id).map(|stored| stored.password_hash.clone())
    }
}

#[async_trait]
impl UserProfileRepository for MockUserRepository {
    async fn get_by_id(&self, id: &str) -> DomainResult<Option<UserProfile>> {
        Ok(self.profiles.lock().get(id).map(|stored| stored.profile.clone()))
    }

    async fn get_credentials_by_email(&self, email: &str) -> DomainResult<Option<StoredCredentials>> {
        Ok(self
            .profiles
            .lock()
            .values()
            .find(|stored| stored.profile.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn create(&self, profile: UserProfile, password_hash: String) -> DomainResult<()> {
        self.profiles
            .lock()
            .insert(profile.id.clone(), StoredCredentials { profile, password_hash });
        Ok(())
    }
}

/// In-memory mock for `SessionRepository`.
///
/// Returns records in insertion order so callers must do their own sorting.
#[derive(Default, Clone)]
pub struct MockSessionRepository {
    records: Arc<Mutex<Vec<SessionRecord>>>,
}

impl MockSessionRepository {
    pub fn with_record(self, record: SessionRecord) -> Self {
        self.records.lock().push(record);
        self
    }

    pub fn saved(&self) -> Vec<SessionRecord> {
        self.records.lock().clone()
    }
}

#[async_trait]
impl SessionRepository for MockSessionRepository {
    async fn save_session(&self, record: SessionRecord) -> DomainResult<()> {
        self.records.lock().push(record);
        Ok(())
    }

    async fn sessions_for_user(&self, user_id: &str) -> DomainResult<Vec<SessionRecord>> {
        Ok(self.records.lock().iter().filter(|r| r.user_id == user_id).cloned().collect())
    }
}

/// In-memory mock for `RewardIssuer` with an optional forced failure.
#[derive(Default, Clone)]
pub struct MockRewardIssuer {
    balances: Arc<Mutex<HashMap<String, TokenAmount>>>,
    mints: Arc<AtomicU64>,
    fail_with: Arc<Mutex<Option<String>>>,
}

impl MockRewardIssuer {
    pub fn failing(message: &str) -> Self {
        let issuer = Self::default();
        *issuer.fail_with.lock() = Some(message.to_string());
        issuer
    }

    pub fn mint_count(&self) -> u64 {
        self.mints.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RewardIssuer for MockRewardIssuer {
    async fn mint(&self, wallet: &WalletAddress, amount: TokenAmount) -> DomainResult<RewardReceipt> {
        if let Some(message) = self.fail_with.lock().clone() {
            return Err(StillMintError::Reward(message));
        }
        let n = self.mints.fetch_add(1, Ordering::SeqCst) + 1;
        let mut balances = self.balances.lock();
        let balance = balances.entry(wallet.to_string()).or_default();
        *balance = balance.checked_add(amount).unwrap();
        Ok(RewardReceipt {
            tx_id: format!("mock-tx-{n}"),
            wallet: wallet.clone(),
            amount,
            minted_at: Utc::now(),
        })
    }

    async fn balance_of(&self, wallet: &WalletAddress) -> DomainResult<TokenAmount> {
        Ok(self.balances.lock().get(wallet.as_str()).copied().unwrap_or_default())
    }
}
