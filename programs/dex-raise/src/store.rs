//! Config account repository on top of the ledger.
//!
//! Creation is create-if-absent: [`ConfigStore::create`] refuses any address
//! that already holds data or belongs to another program, and because it runs
//! inside a ledger transaction the check and the write commit together.

use {
    crate::{
        error::EscrowError,
        ledger::{Ledger, LedgerTransaction},
        pda::find_config_address,
        state::EscrowConfig,
    },
    log::*,
    solana_account::Account,
    solana_pubkey::Pubkey,
};

pub struct ConfigStore<'t, 'a> {
    txn: &'t mut LedgerTransaction<'a>,
    program_id: Pubkey,
}

impl<'t, 'a> ConfigStore<'t, 'a> {
    pub fn new(txn: &'t mut LedgerTransaction<'a>, program_id: Pubkey) -> Self {
        Self { txn, program_id }
    }

    /// Whether the account at `address` can still be created: it holds no
    /// data and no program has claimed it. Lamports alone do not count.
    pub fn is_vacant(&self, address: &Pubkey) -> bool {
        match self.txn.get_account(address) {
            None => true,
            Some(account) => {
                account.data.is_empty() && account.owner == solana_sdk_ids::system_program::id()
            }
        }
    }

    /// Load the config at `address`; `None` if it was never initialised.
    pub fn load(&self, address: &Pubkey) -> Result<Option<EscrowConfig>, EscrowError> {
        let Some(account) = self.txn.get_account(address) else {
            return Ok(None);
        };
        if !EscrowConfig::is_initialized(&account.data) {
            return Ok(None);
        }
        if account.owner != self.program_id {
            return Err(EscrowError::InvalidAccountOwner);
        }
        EscrowConfig::deserialize(&account.data)
            .map(Some)
            .map_err(|_| EscrowError::InvalidAccountData)
    }

    /// Allocate the config account at `address`, funded by `payer`, and write
    /// `config` into it.
    ///
    /// The payer only covers the shortfall between the rent-exempt minimum and
    /// whatever the address already holds.
    pub fn create(
        &mut self,
        address: &Pubkey,
        payer: &Pubkey,
        config: &EscrowConfig,
    ) -> Result<(), EscrowError> {
        if !self.is_vacant(address) {
            return Err(EscrowError::AlreadyInitialized);
        }

        let space = EscrowConfig::SERIALIZED_SIZE;
        let minimum_balance = self.txn.rent().minimum_balance(space);
        let current = self.txn.get_lamports(address);
        let shortfall = minimum_balance.saturating_sub(current);
        if self.txn.get_lamports(payer) < shortfall {
            debug!(
                "config store: payer {payer} holds {} lamports, {shortfall} required",
                self.txn.get_lamports(payer)
            );
            return Err(EscrowError::InsufficientFunds);
        }
        self.txn.transfer(payer, address, shortfall)?;

        let data = config
            .to_account_data()
            .map_err(|_| EscrowError::InvalidAccountData)?;
        let account = Account {
            lamports: self.txn.get_lamports(address),
            data,
            owner: self.program_id,
            executable: false,
            rent_epoch: 0,
        };
        self.txn.set_account(*address, account);
        Ok(())
    }

    /// Overwrite an existing config in place.
    pub fn save(&mut self, address: &Pubkey, config: &EscrowConfig) -> Result<(), EscrowError> {
        let mut account = self
            .txn
            .get_account(address)
            .cloned()
            .ok_or(EscrowError::NotInitialized)?;
        if account.owner != self.program_id {
            return Err(EscrowError::InvalidAccountOwner);
        }
        if !EscrowConfig::is_initialized(&account.data) {
            return Err(EscrowError::NotInitialized);
        }
        config
            .serialize_into(&mut account.data)
            .map_err(|_| EscrowError::InvalidAccountData)?;
        self.txn.set_account(*address, account);
        Ok(())
    }
}

/// Read the committed config of `program_id` from outside any transaction.
pub fn read_config(ledger: &Ledger, program_id: &Pubkey) -> Result<Option<EscrowConfig>, EscrowError> {
    let (address, _) = find_config_address(program_id);
    ledger.view(|txn| ConfigStore::new(txn, *program_id).load(&address))
}
