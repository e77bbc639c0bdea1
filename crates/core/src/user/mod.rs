//! User registration, login and profile lookup.

pub mod ports;
pub mod service;

pub use service::UserService;
