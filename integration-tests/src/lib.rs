//! dex-raise Integration Tests
//!
//! End-to-end tests that drive the dex-raise program through its client
//! against an in-process ledger:
//!
//! - **Initialization**: config address lookup, the single successful
//!   initialization and every rejection path
//! - **Whitelist**: administrator-gated membership updates
//! - **Concurrency**: racing submissions resolve to exactly one winner

#![allow(clippy::arithmetic_side_effects)]

pub mod harness;

#[cfg(test)]
mod initialize_tests;
