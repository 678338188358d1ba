//! Test utilities for integration testing.
//!
//! This module provides:
//! - Test data factories for creating valid test fixtures
//! - A manually driven clock
//! - In-memory implementations of the persistence, hashing and email ports
//! - Helper builders for constructing use case instances and app state with test dependencies

mod app_state_builder;
mod clock;
mod factories;
mod user_mocks;

pub use app_state_builder::*;
pub use clock::*;
pub use factories::*;
pub use user_mocks::*;
