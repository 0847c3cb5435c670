//! Custom errors for the dex-raise program.

use {
    num_derive::{FromPrimitive, ToPrimitive},
    num_traits::{FromPrimitive, ToPrimitive},
    thiserror::Error,
};

/// Every way an instruction can be rejected.
///
/// The discriminants are the custom error codes surfaced to clients and must
/// stay stable; append new variants at the end.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum EscrowError {
    #[error("Config account address does not match the derived address")]
    InvalidAddress = 0,

    #[error("Config account is already initialised")]
    AlreadyInitialized,

    #[error("Signer is not authorised for this instruction")]
    Unauthorized,

    #[error("Instruction parameter is malformed or out of range")]
    InvalidParameter,

    #[error("Payer cannot cover the rent-exempt balance of the config account")]
    InsufficientFunds,

    #[error("Config account is not initialised")]
    NotInitialized,

    #[error("Config account data is invalid or corrupted")]
    InvalidAccountData,

    #[error("Account is not owned by the dex-raise program")]
    InvalidAccountOwner,

    #[error("Instruction was routed to the wrong program")]
    IncorrectProgramId,

    #[error("Instruction is missing required accounts")]
    NotEnoughAccountKeys,

    #[error("Account must be writable")]
    AccountNotWritable,

    #[error("Instruction data could not be decoded")]
    InvalidInstructionData,

    #[error("Member is already on the whitelist")]
    AlreadyOnWhitelist,

    #[error("Whitelist is full")]
    WhitelistFull,

    #[error("Arithmetic overflow")]
    ArithmeticOverflow,
}

impl EscrowError {
    /// Custom error code reported to clients.
    pub fn code(self) -> u32 {
        // Every discriminant fits: the enum is fieldless and starts at zero.
        self.to_u32().unwrap_or(u32::MAX)
    }

    /// Maps a custom error code back to the error, if the code is known.
    pub fn from_code(code: u32) -> Option<Self> {
        Self::from_u32(code)
    }
}
