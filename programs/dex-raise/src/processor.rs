//! Instruction processing logic for the dex-raise program.

use {
    crate::{
        authority::{AuthorityGate, AuthorityPredicate, SignerMatches},
        constants::{MAX_BASIS_POINTS, MAX_WHITELIST_LEN},
        error::EscrowError,
        instruction::{EscrowInstruction, InitializeParams},
        ledger::{Ledger, LedgerTransaction},
        pda::{create_config_address, find_config_address},
        settings::ProgramSettings,
        state::EscrowConfig,
        store::ConfigStore,
    },
    log::*,
    solana_bincode::limited_deserialize,
    solana_instruction::{AccountMeta, Instruction},
    solana_pubkey::Pubkey,
};

// ---------------------------------------------------------------------------
// Program ID
// ---------------------------------------------------------------------------

solana_pubkey::declare_id!("7F6rVPdLuDi15Mdoq57wwEnNPQnshfW6z7gDYHoQP3o3");

/// What a successful instruction did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// The config account was created; carries the record as written.
    Initialized {
        address: Pubkey,
        config: EscrowConfig,
    },
    /// The whitelist now reads `whitelist`.
    WhitelistUpdated {
        address: Pubkey,
        whitelist: Vec<Pubkey>,
    },
}

/// Account view of one instruction. An account counts as a signer only if
/// its meta asks for a signature and the transaction actually carries one.
struct InstructionAccounts<'a> {
    metas: &'a [AccountMeta],
    signers: &'a [Pubkey],
}

impl InstructionAccounts<'_> {
    fn check_number_of_instruction_accounts(&self, expected: usize) -> Result<(), EscrowError> {
        if self.metas.len() < expected {
            return Err(EscrowError::NotEnoughAccountKeys);
        }
        Ok(())
    }

    fn key(&self, index: usize) -> Result<&Pubkey, EscrowError> {
        self.metas
            .get(index)
            .map(|meta| &meta.pubkey)
            .ok_or(EscrowError::NotEnoughAccountKeys)
    }

    fn is_signer(&self, index: usize) -> bool {
        self.metas
            .get(index)
            .is_some_and(|meta| meta.is_signer && self.signers.contains(&meta.pubkey))
    }

    fn is_writable(&self, index: usize) -> bool {
        self.metas.get(index).is_some_and(|meta| meta.is_writable)
    }
}

/// Executes dex-raise instructions against a [`Ledger`].
///
/// Each instruction runs in its own ledger transaction: every check and
/// write either commits together or not at all.
#[derive(Debug, Clone)]
pub struct Processor<P = SignerMatches> {
    settings: ProgramSettings,
    gate: AuthorityGate<P>,
}

impl Processor {
    pub fn new(settings: ProgramSettings) -> Self {
        Self::with_gate(settings, AuthorityGate::new())
    }
}

impl<P: AuthorityPredicate> Processor<P> {
    pub fn with_gate(settings: ProgramSettings, gate: AuthorityGate<P>) -> Self {
        Self { settings, gate }
    }

    pub fn settings(&self) -> &ProgramSettings {
        &self.settings
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.settings.program_id
    }

    /// Decode and execute `instruction`. `signers` are the keys whose
    /// signatures the transaction carries.
    pub fn process_instruction(
        &self,
        ledger: &Ledger,
        instruction: &Instruction,
        signers: &[Pubkey],
    ) -> Result<ProcessOutcome, EscrowError> {
        if instruction.program_id != self.settings.program_id {
            return Err(EscrowError::IncorrectProgramId);
        }
        let escrow_instruction: EscrowInstruction =
            limited_deserialize(&instruction.data, solana_packet::PACKET_DATA_SIZE as u64)
                .map_err(|_| EscrowError::InvalidInstructionData)?;

        trace!("dex-raise process_instruction: {escrow_instruction:?}");

        let accounts = InstructionAccounts {
            metas: &instruction.accounts,
            signers,
        };
        ledger.transact(|txn| match escrow_instruction {
            EscrowInstruction::Initialize(params) => self.process_initialize(txn, &accounts, params),
            EscrowInstruction::AddToWhitelist { member } => {
                self.process_update_whitelist(txn, &accounts, |whitelist| {
                    if member == Pubkey::default() {
                        return Err(EscrowError::InvalidParameter);
                    }
                    if whitelist.contains(&member) {
                        return Err(EscrowError::AlreadyOnWhitelist);
                    }
                    if whitelist.len() >= MAX_WHITELIST_LEN {
                        return Err(EscrowError::WhitelistFull);
                    }
                    whitelist.push(member);
                    Ok(())
                })
            }
            EscrowInstruction::RemoveFromWhitelist { member } => {
                self.process_update_whitelist(txn, &accounts, |whitelist| {
                    whitelist.retain(|listed| *listed != member);
                    Ok(())
                })
            }
        })
    }

    // -----------------------------------------------------------------------
    // Instruction handlers
    // -----------------------------------------------------------------------

    /// `Initialize(params)`
    ///
    /// Accounts:
    ///   0. `[writable]`          Config account (derived address).
    ///   1. `[signer, writable]`  Initialiser / payer.
    ///   2. `[]`                  System program.
    fn process_initialize(
        &self,
        txn: &mut LedgerTransaction<'_>,
        accounts: &InstructionAccounts<'_>,
        params: InitializeParams,
    ) -> Result<ProcessOutcome, EscrowError> {
        accounts.check_number_of_instruction_accounts(3)?;
        let program_id = self.settings.program_id;

        // --- Target must be the derived config address ---
        let config_key = *accounts.key(0)?;
        let (expected_key, bump) = find_config_address(&program_id);
        if config_key != expected_key {
            debug!("Initialize: {config_key} is not the config address {expected_key}");
            return Err(EscrowError::InvalidAddress);
        }
        if !accounts.is_writable(0) || !accounts.is_writable(1) {
            return Err(EscrowError::AccountNotWritable);
        }
        if *accounts.key(2)? != solana_sdk_ids::system_program::id() {
            return Err(EscrowError::IncorrectProgramId);
        }

        // --- At most once ---
        let mut store = ConfigStore::new(txn, program_id);
        if !store.is_vacant(&config_key) {
            debug!("Initialize: config account {config_key} already initialised");
            return Err(EscrowError::AlreadyInitialized);
        }

        // --- Only the deployment's initialization authority ---
        let payer = *accounts.key(1)?;
        self.gate.check(
            &payer,
            accounts.is_signer(1),
            &self.settings.initialization_authority,
        )?;

        self.validate_initialize_params(&params)?;

        let config = EscrowConfig {
            administrator: params.administrator,
            fee_wallet: params.fee_wallet,
            treasury: params.treasury,
            fee_basis_points: params.fee_basis_points,
            whitelist: params.initial_whitelisted_member.into_iter().collect(),
            bump,
        };
        store.create(&config_key, &payer, &config)?;

        info!(
            "Initialize: config={config_key}, administrator={}, fee_wallet={}, treasury={}, fee_basis_points={}",
            config.administrator, config.fee_wallet, config.treasury, config.fee_basis_points
        );
        Ok(ProcessOutcome::Initialized {
            address: config_key,
            config,
        })
    }

    fn validate_initialize_params(&self, params: &InitializeParams) -> Result<(), EscrowError> {
        for (name, key) in [
            ("administrator", &params.administrator),
            ("fee_wallet", &params.fee_wallet),
            ("treasury", &params.treasury),
        ] {
            if *key == Pubkey::default() {
                debug!("Initialize: {name} must not be the default pubkey");
                return Err(EscrowError::InvalidParameter);
            }
        }
        if params.initial_whitelisted_member == Some(Pubkey::default()) {
            debug!("Initialize: whitelisted member must not be the default pubkey");
            return Err(EscrowError::InvalidParameter);
        }
        let max_fee_basis_points = self.settings.max_fee_basis_points.min(MAX_BASIS_POINTS);
        if params.fee_basis_points > max_fee_basis_points {
            debug!(
                "Initialize: fee_basis_points {} exceeds {max_fee_basis_points}",
                params.fee_basis_points
            );
            return Err(EscrowError::InvalidParameter);
        }
        Ok(())
    }

    /// `AddToWhitelist { member }` / `RemoveFromWhitelist { member }`
    ///
    /// Accounts:
    ///   0. `[writable]`  Config account.
    ///   1. `[signer]`    Administrator.
    fn process_update_whitelist<F>(
        &self,
        txn: &mut LedgerTransaction<'_>,
        accounts: &InstructionAccounts<'_>,
        update: F,
    ) -> Result<ProcessOutcome, EscrowError>
    where
        F: FnOnce(&mut Vec<Pubkey>) -> Result<(), EscrowError>,
    {
        accounts.check_number_of_instruction_accounts(2)?;
        let program_id = self.settings.program_id;

        let config_key = *accounts.key(0)?;
        if !accounts.is_writable(0) {
            return Err(EscrowError::AccountNotWritable);
        }

        let mut store = ConfigStore::new(txn, program_id);
        let mut config = store
            .load(&config_key)?
            .ok_or(EscrowError::NotInitialized)?;
        if create_config_address(&program_id, config.bump)? != config_key {
            debug!("whitelist: {config_key} is not the config address");
            return Err(EscrowError::InvalidAddress);
        }

        let signer = *accounts.key(1)?;
        self.gate
            .check(&signer, accounts.is_signer(1), &config.administrator)?;

        update(&mut config.whitelist)?;
        store.save(&config_key, &config)?;

        debug!("whitelist: {} member(s)", config.whitelist.len());
        Ok(ProcessOutcome::WhitelistUpdated {
            address: config_key,
            whitelist: config.whitelist,
        })
    }
}
