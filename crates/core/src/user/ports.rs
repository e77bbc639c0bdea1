//! Port interfaces for user profile management
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations for user profile operations.

use async_trait::async_trait;
use stillmint_domain::{Result, UserProfile};

/// A profile together with its stored password hash.
///
/// Only the user service sees the hash; it never leaves the core crate in a
/// command result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    pub profile: UserProfile,
    /// Argon2 PHC string
    pub password_hash: String,
}

/// Trait for user profile persistence and retrieval
#[async_trait]
pub trait UserProfileRepository: Send + Sync {
    /// Get user profile by ID
    async fn get_by_id(&self, id: &str) -> Result<Option<UserProfile>>;

    /// Look up a profile and its password hash by email (case-insensitive)
    async fn get_credentials_by_email(&self, email: &str) -> Result<Option<StoredCredentials>>;

    /// Create a new user profile with its password hash
    async fn create(&self, profile: UserProfile, password_hash: String) -> Result<()>;
}
