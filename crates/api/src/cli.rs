//! Command-line interface for the `stillmint` binary.

use std::convert::Infallible;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand};

use crate::commands::{MeditateRequest, RegisterRequest, SensorSource};

/// StillMint - stay still, earn tokens
#[derive(Parser, Debug)]
#[command(name = "stillmint")]
#[command(version, about, long_about = None)]
#[command(arg_required_else_help = true)]
#[command(
    after_help = "Without --trace or --stdin a session runs without a sensor and every tick counts as still."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Link a user to an email, a password and a reward wallet
    Register(RegisterArgs),

    /// Check an email and password and show the profile
    Login {
        /// Email given at registration
        email: String,

        /// Login password
        #[arg(long, env = "STILLMINT_PASSWORD", hide_env_values = true)]
        password: Password,
    },

    /// Run a session and settle the reward
    Meditate(MeditateArgs),

    /// List rewarded sessions, newest first
    History {
        /// User id
        user_id: String,
    },

    /// Show the wallet's token balance
    Balance {
        /// User id
        user_id: String,
    },

    /// Check the database and runtime
    Health,
}

/// Arguments for `stillmint register`.
#[derive(Args, Debug, PartialEq, Eq)]
pub struct RegisterArgs {
    /// User id
    pub user_id: String,

    /// Email address used to log in
    pub email: String,

    /// Ethereum address that receives rewards (0x + 40 hex digits)
    pub wallet: String,

    /// Login password, at least six characters
    #[arg(long, env = "STILLMINT_PASSWORD", hide_env_values = true)]
    pub password: Password,
}

impl RegisterArgs {
    pub fn into_request(self) -> RegisterRequest {
        RegisterRequest {
            id: self.user_id,
            email: self.email,
            wallet: self.wallet,
            password: self.password.0,
        }
    }
}

/// Arguments for `stillmint meditate`.
#[derive(Args, Debug, PartialEq, Eq)]
pub struct MeditateArgs {
    /// User id
    pub user_id: String,

    /// Replay a JSON-lines accelerometer trace
    #[arg(long, value_name = "PATH", conflicts_with = "stdin")]
    pub trace: Option<PathBuf>,

    /// Restart the trace when it runs out
    #[arg(long = "loop", requires = "trace")]
    pub looping: bool,

    /// Read JSON-lines samples from stdin
    #[arg(long)]
    pub stdin: bool,

    /// Session length in seconds (default from config)
    #[arg(long, value_name = "N")]
    pub seconds: Option<u32>,

    /// Violation limit (default from config)
    #[arg(long, value_name = "N")]
    pub limit: Option<u32>,
}

impl MeditateArgs {
    pub fn into_request(self) -> MeditateRequest {
        let source = match self.trace {
            Some(path) => SensorSource::Trace { path, looping: self.looping },
            None if self.stdin => SensorSource::Stdin,
            None => SensorSource::Unavailable,
        };
        let mut request = MeditateRequest::new(self.user_id, source);
        request.total_seconds = self.seconds;
        request.violation_limit = self.limit;
        request
    }
}

/// A password taken from the command line or `STILLMINT_PASSWORD`.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl FromStr for Password {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}
