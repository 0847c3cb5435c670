//! Constants for the dex-raise program.

/// Seed of the singleton config account address.
pub const CONFIG_SEED: &[u8] = b"config";

/// Basis-point denominator; a fee above this would exceed the amount it is
/// charged on.
pub const MAX_BASIS_POINTS: u16 = 10_000;

/// Capacity of the withdrawal whitelist stored in the config account.
pub const MAX_WHITELIST_LEN: usize = 10;
