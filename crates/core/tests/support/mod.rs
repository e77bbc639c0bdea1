//! Shared test helpers for `stillmint-core` integration tests.
//!
//! These helpers provide reusable fixtures and lightweight mocks so that
//! session and reward tests can focus on behaviour instead of boilerplate.

#![allow(dead_code)]

pub mod repositories;
pub mod stillness;
