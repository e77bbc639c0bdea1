//! Lifecycle helpers for long-lived subscribers.

pub mod subscription;

pub use subscription::Subscription;
