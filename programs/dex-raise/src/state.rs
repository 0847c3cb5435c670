//! Account state types for the dex-raise program.

use {
    crate::constants::MAX_WHITELIST_LEN,
    borsh::{BorshDeserialize, BorshSerialize},
    solana_pubkey::Pubkey,
};

/// Discriminator byte written at the start of the config account to
/// distinguish it from uninitialized or foreign account data.
pub const ESCROW_CONFIG_DISCRIMINATOR: u8 = 1;

/// Global configuration of the escrow program.
///
/// Serialised with Borsh; the first byte of account data is the discriminator.
///
/// There is exactly **one** EscrowConfig account per deployment, at the
/// program-derived address of the `"config"` seed.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct EscrowConfig {
    /// Signs every privileged instruction after initialization.
    pub administrator: Pubkey,

    /// Receives protocol fees.
    pub fee_wallet: Pubkey,

    /// Receives raised funds.
    pub treasury: Pubkey,

    /// Fee rate in basis points (10 000 = 100 %).
    pub fee_basis_points: u16,

    /// Members allowed to receive withdrawals, at most [`MAX_WHITELIST_LEN`].
    pub whitelist: Vec<Pubkey>,

    /// Bump of the config address, kept so later instructions can re-derive
    /// it without a search.
    pub bump: u8,
}

impl EscrowConfig {
    /// Account size: the whitelist is allocated at full capacity up front so
    /// the account never needs to grow.
    ///
    /// Layout:
    ///   discriminator    (1)
    ///   administrator    (32)
    ///   fee_wallet       (32)
    ///   treasury         (32)
    ///   fee_basis_points (2)
    ///   whitelist        (4 + 32 * 10)
    ///   bump             (1)
    ///   = 424 bytes
    pub const SERIALIZED_SIZE: usize = 1 + 32 + 32 + 32 + 2 + 4 + 32 * MAX_WHITELIST_LEN + 1;

    /// Whether `data` carries an initialised config.
    pub fn is_initialized(data: &[u8]) -> bool {
        data.first() == Some(&ESCROW_CONFIG_DISCRIMINATOR)
    }

    /// Deserialise from raw account data (expects leading discriminator byte).
    pub fn deserialize(data: &[u8]) -> Result<Self, std::io::Error> {
        if !Self::is_initialized(data) {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "missing or invalid escrow config discriminator",
            ));
        }
        let mut cursor = &data[1..];
        BorshDeserialize::deserialize_reader(&mut cursor)
    }

    /// Serialise into raw account data (prepends discriminator byte).
    pub fn serialize_into(&self, data: &mut [u8]) -> Result<(), std::io::Error> {
        if self.whitelist.len() > MAX_WHITELIST_LEN {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "whitelist exceeds account capacity",
            ));
        }
        if data.len() < Self::SERIALIZED_SIZE {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "account data buffer too small",
            ));
        }
        data[0] = ESCROW_CONFIG_DISCRIMINATOR;
        let mut cursor = &mut data[1..];
        BorshSerialize::serialize(self, &mut cursor)
    }

    /// Serialise into a freshly allocated, zero-padded account buffer.
    pub fn to_account_data(&self) -> Result<Vec<u8>, std::io::Error> {
        let mut data = vec![0; Self::SERIALIZED_SIZE];
        self.serialize_into(&mut data)?;
        Ok(data)
    }
}
