//! Test helpers module
//!
//! Utilities shared by the integration tests: a bot wired to in-memory
//! storage and the texts it is expected to send.

#![allow(dead_code)]

pub mod test_context;
pub mod test_data;

pub use test_context::*;
pub use test_data::*;
