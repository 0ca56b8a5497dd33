//! Test utilities for HTTP-level testing.
//!
//! `TestAppStateBuilder` wires every use case to the in-memory adapters so
//! route tests run without Postgres or Redis.

mod app_state_builder;

pub use app_state_builder::*;
