//! User registration and login service

use std::sync::Arc;

use stillmint_common::crypto::{hash_password, verify_password};
use stillmint_common::Clock;
use stillmint_domain::{Result, StillMintError, UserProfile, WalletAddress};
use tracing::{info, warn};

use super::ports::UserProfileRepository;

/// Shortest password accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

const BAD_CREDENTIALS: &str = "invalid email or password";

pub struct UserService {
    users: Arc<dyn UserProfileRepository>,
    clock: Arc<dyn Clock>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserProfileRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { users, clock }
    }

    /// Register a profile linking `id` to a wallet, protected by `password`.
    ///
    /// The password is stored only as an Argon2 hash.
    ///
    /// # Errors
    /// `InvalidInput` for a blank id or email, a password shorter than
    /// [`MIN_PASSWORD_LEN`], a malformed wallet address, or an id or email
    /// that is already registered.
    pub async fn register(
        &self,
        id: &str,
        email: &str,
        wallet: &str,
        password: &str,
    ) -> Result<UserProfile> {
        let id = id.trim();
        let email = email.trim();
        if id.is_empty() {
            return Err(StillMintError::InvalidInput("user id must not be empty".into()));
        }
        if email.is_empty() || !email.contains('@') {
            return Err(StillMintError::InvalidInput(format!("Invalid email address: {email}")));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(StillMintError::InvalidInput(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        let wallet_address = WalletAddress::parse(wallet)?;

        if self.users.get_by_id(id).await?.is_some() {
            return Err(StillMintError::InvalidInput(format!("user {id} is already registered")));
        }
        if self.users.get_credentials_by_email(email).await?.is_some() {
            return Err(StillMintError::InvalidInput(format!("email {email} is already registered")));
        }

        let password_hash = hash_password(password)
            .map_err(|e| StillMintError::Internal(format!("password hashing failed: {e}")))?;

        let profile = UserProfile {
            id: id.to_string(),
            email: email.to_string(),
            wallet_address,
            created_at: self.clock.now_utc(),
        };
        self.users.create(profile.clone(), password_hash).await?;

        info!(user_id = %profile.id, wallet = %profile.wallet_address, "user registered");
        Ok(profile)
    }

    /// Sign in with the email and password given at registration.
    ///
    /// # Errors
    /// `InvalidInput` with the same message for an unknown email and a wrong
    /// password.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile> {
        let Some(stored) = self.users.get_credentials_by_email(email.trim()).await? else {
            warn!("login attempt for unknown email");
            return Err(StillMintError::InvalidInput(BAD_CREDENTIALS.into()));
        };

        if stored.password_hash.is_empty() {
            warn!(user_id = %stored.profile.id, "login rejected: no password on record");
            return Err(StillMintError::InvalidInput(BAD_CREDENTIALS.into()));
        }

        let matches = verify_password(password, &stored.password_hash).map_err(|e| {
            StillMintError::Internal(format!(
                "stored password hash for user {} is unreadable: {e}",
                stored.profile.id
            ))
        })?;
        if !matches {
            warn!(user_id = %stored.profile.id, "login rejected: wrong password");
            return Err(StillMintError::InvalidInput(BAD_CREDENTIALS.into()));
        }

        info!(user_id = %stored.profile.id, "user logged in");
        Ok(stored.profile)
    }

    pub async fn profile(&self, id: &str) -> Result<UserProfile> {
        self.users
            .get_by_id(id)
            .await?
            .ok_or_else(|| StillMintError::NotFound(format!("user profile {id}")))
    }
}
