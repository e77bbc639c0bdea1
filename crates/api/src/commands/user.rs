//! User registration and login commands

use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use stillmint_domain::{Result as DomainResult, UserProfile};
use tracing::info;

use crate::context::AppContext;
use crate::utils::logging::log_command_execution;

/// Input for [`register_user`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub id: String,
    pub email: String,
    pub wallet: String,
    #[serde(skip_serializing)]
    pub password: String,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("wallet", &self.wallet)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Link a user id to an email, a password and a reward wallet.
pub async fn register_user(ctx: &AppContext, request: RegisterRequest) -> DomainResult<UserProfile> {
    let command_name = "user::register";
    let start = Instant::now();
    info!(command = command_name, user_id = %request.id, "Executing register");

    let result = ctx
        .users
        .register(&request.id, &request.email, &request.wallet, &request.password)
        .await;

    log_command_execution(command_name, start.elapsed(), &result);
    result
}

/// Check an email and password and return the matching profile.
pub async fn login_user(ctx: &AppContext, email: &str, password: &str) -> DomainResult<UserProfile> {
    let command_name = "user::login";
    let start = Instant::now();
    info!(command = command_name, "Executing login");

    let result = ctx.users.login(email, password).await;

    log_command_execution(command_name, start.elapsed(), &result);
    result
}

/// Look up a registered profile.
pub async fn get_user_profile(ctx: &AppContext, user_id: &str) -> DomainResult<UserProfile> {
    let start = Instant::now();
    let result = ctx.users.profile(user_id).await;
    log_command_execution("user::profile", start.elapsed(), &result);
    result
}
