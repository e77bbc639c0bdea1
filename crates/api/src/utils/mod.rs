//! Application-layer helpers.

pub mod health;
pub mod logging;
