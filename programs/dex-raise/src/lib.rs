//! dex-raise escrow program: configuration subsystem
//!
//! Establishes the program's singleton config account exactly once and binds
//! the administrator, fee wallet and treasury to it.
//!
//! ## Addressing
//!
//! The config account lives at the program-derived address of the seed
//! `"config"` under the program id ([`pda::find_config_address`]). Clients
//! compute it locally; the program rejects any other target.
//!
//! ## Authority model
//!
//! - `Initialize` may only be signed by the deployment's
//!   `initialization_authority` ([`settings::ProgramSettings`]).
//! - Every later privileged instruction is signed by the `administrator`
//!   stored in the config.
//!
//! Both checks go through the same [`authority::AuthorityGate`].
//!
//! ## Instructions
//!
//! | Instruction          | Description                                        |
//! |----------------------|----------------------------------------------------|
//! | Initialize           | One-time setup: administrator, fee wallet, treasury |
//! | AddToWhitelist       | Administrator adds a withdrawal whitelist member     |
//! | RemoveFromWhitelist  | Administrator removes a withdrawal whitelist member  |

#![allow(clippy::arithmetic_side_effects)]

pub mod authority;
pub mod client;
pub mod constants;
pub mod error;
pub mod instruction;
pub mod ledger;
pub mod pda;
pub mod processor;
pub mod settings;
pub mod state;
pub mod store;

/// Re-export the program ID.
pub use processor::id;
