//! Instruction definitions for the dex-raise program.
//!
//! All instructions are serialised / deserialised via `bincode`.

use {
    crate::pda::find_config_address,
    serde::{Deserialize, Serialize},
    solana_instruction::{AccountMeta, Instruction},
    solana_pubkey::Pubkey,
};

/// Payload of [`EscrowInstruction::Initialize`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitializeParams {
    /// Authority for every privileged instruction after initialization.
    pub administrator: Pubkey,
    /// Receives protocol fees.
    pub fee_wallet: Pubkey,
    /// Receives raised funds.
    pub treasury: Pubkey,
    /// Fee rate in basis points; capped by the deployment settings.
    pub fee_basis_points: u16,
    /// Seeds the withdrawal whitelist.
    pub initial_whitelisted_member: Option<Pubkey>,
}

/// Instructions supported by the dex-raise program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EscrowInstruction {
    /// One-time creation of the config account.
    ///
    /// # Accounts expected
    ///
    /// 0. `[writable]`          Config account (derived from the `"config"` seed).
    /// 1. `[signer, writable]`  Initialiser; pays for the account and must be
    ///                           the deployment's initialization authority.
    /// 2. `[]`                  System program.
    Initialize(InitializeParams),

    /// Add a member to the withdrawal whitelist.
    ///
    /// # Accounts expected
    ///
    /// 0. `[writable]`  Config account.
    /// 1. `[signer]`    Administrator.
    AddToWhitelist { member: Pubkey },

    /// Remove a member from the withdrawal whitelist. Removing a member that
    /// is not listed succeeds without changes.
    ///
    /// # Accounts expected
    ///
    /// 0. `[writable]`  Config account.
    /// 1. `[signer]`    Administrator.
    RemoveFromWhitelist { member: Pubkey },
}

pub fn initialize(program_id: &Pubkey, payer: &Pubkey, params: InitializeParams) -> Instruction {
    let (config, _) = find_config_address(program_id);
    Instruction::new_with_bincode(
        *program_id,
        &EscrowInstruction::Initialize(params),
        vec![
            AccountMeta::new(config, false),
            AccountMeta::new(*payer, true),
            AccountMeta::new_readonly(solana_sdk_ids::system_program::id(), false),
        ],
    )
}

pub fn add_to_whitelist(program_id: &Pubkey, administrator: &Pubkey, member: Pubkey) -> Instruction {
    whitelist_instruction(
        program_id,
        administrator,
        EscrowInstruction::AddToWhitelist { member },
    )
}

pub fn remove_from_whitelist(
    program_id: &Pubkey,
    administrator: &Pubkey,
    member: Pubkey,
) -> Instruction {
    whitelist_instruction(
        program_id,
        administrator,
        EscrowInstruction::RemoveFromWhitelist { member },
    )
}

fn whitelist_instruction(
    program_id: &Pubkey,
    administrator: &Pubkey,
    instruction: EscrowInstruction,
) -> Instruction {
    let (config, _) = find_config_address(program_id);
    Instruction::new_with_bincode(
        *program_id,
        &instruction,
        vec![
            AccountMeta::new(config, false),
            AccountMeta::new_readonly(*administrator, true),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> InitializeParams {
        InitializeParams {
            administrator: Pubkey::new_from_array([1; 32]),
            fee_wallet: Pubkey::new_from_array([2; 32]),
            treasury: Pubkey::new_from_array([3; 32]),
            fee_basis_points: 50,
            initial_whitelisted_member: None,
        }
    }

    #[test]
    fn test_initialize_targets_derived_config() {
        let program_id = crate::id();
        let payer = Pubkey::new_from_array([4; 32]);
        let ix = initialize(&program_id, &payer, params());

        assert_eq!(ix.program_id, program_id);
        assert_eq!(ix.accounts.len(), 3);
        assert_eq!(ix.accounts[0].pubkey, find_config_address(&program_id).0);
        assert!(ix.accounts[0].is_writable && !ix.accounts[0].is_signer);
        assert!(ix.accounts[1].is_writable && ix.accounts[1].is_signer);
        assert_eq!(ix.accounts[2].pubkey, solana_sdk_ids::system_program::id());

        let decoded: EscrowInstruction = bincode::deserialize(&ix.data).unwrap();
        assert_eq!(decoded, EscrowInstruction::Initialize(params()));
    }

    #[test]
    fn test_whitelist_instructions_require_admin_signature() {
        let program_id = crate::id();
        let admin = Pubkey::new_from_array([5; 32]);
        let member = Pubkey::new_from_array([6; 32]);

        for ix in [
            add_to_whitelist(&program_id, &admin, member),
            remove_from_whitelist(&program_id, &admin, member),
        ] {
            assert_eq!(ix.accounts.len(), 2);
            assert_eq!(ix.accounts[1].pubkey, admin);
            assert!(ix.accounts[1].is_signer && !ix.accounts[1].is_writable);
        }
    }
}
