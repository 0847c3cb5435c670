//! Program-derived addresses.
//!
//! The config account lives at the program-derived address of the seed
//! [`CONFIG_SEED`] under the program id. The address is reproducible by anyone
//! who knows the program id and never lies on the ed25519 curve, so no private
//! key can sign for it and callers cannot pick it.

use {
    crate::{constants::CONFIG_SEED, error::EscrowError},
    solana_pubkey::Pubkey,
};

/// Derive the address and bump for a single-seed namespace `tag` owned by
/// `program_id`.
///
/// The bump search starts at 255 and walks down until the hash falls off the
/// curve, so the result is the same for every caller.
pub fn derive_address(tag: &[u8], program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[tag], program_id)
}

/// Address and bump of the config account for `program_id`.
pub fn find_config_address(program_id: &Pubkey) -> (Pubkey, u8) {
    derive_address(CONFIG_SEED, program_id)
}

/// Re-derive the config address from a persisted bump without searching.
pub fn create_config_address(program_id: &Pubkey, bump: u8) -> Result<Pubkey, EscrowError> {
    Pubkey::create_program_address(&[CONFIG_SEED, &[bump]], program_id)
        .map_err(|_| EscrowError::InvalidAddress)
}

/// Whether `address` is the config account address of `program_id`.
pub fn is_config_address(address: &Pubkey, program_id: &Pubkey) -> bool {
    find_config_address(program_id).0 == *address
}
