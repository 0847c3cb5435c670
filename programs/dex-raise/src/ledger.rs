//! In-process account ledger with atomic, serialized transactions.
//!
//! Every instruction runs inside [`Ledger::transact`]. The closure sees the
//! committed accounts through a [`LedgerTransaction`] overlay and stages its
//! writes there; the overlay is merged only when the closure returns `Ok`.
//! A single writer lock serializes transactions, so two callers racing to
//! create the same account are ordered and the second one observes the first
//! one's commit.

use {
    crate::error::EscrowError,
    log::*,
    parking_lot::RwLock,
    solana_account::Account,
    solana_pubkey::Pubkey,
    solana_rent::Rent,
    std::{
        collections::HashMap,
        sync::atomic::{AtomicU64, Ordering},
    },
};

#[derive(Debug, Default)]
pub struct Ledger {
    accounts: RwLock<HashMap<Pubkey, Account>>,
    rent: Rent,
    transaction_count: AtomicU64,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rent(rent: Rent) -> Self {
        Self {
            rent,
            ..Self::default()
        }
    }

    pub fn rent(&self) -> &Rent {
        &self.rent
    }

    /// Number of committed transactions.
    pub fn transaction_count(&self) -> u64 {
        self.transaction_count.load(Ordering::Acquire)
    }

    pub fn get_account(&self, address: &Pubkey) -> Option<Account> {
        self.accounts.read().get(address).cloned()
    }

    pub fn get_balance(&self, address: &Pubkey) -> u64 {
        self.accounts
            .read()
            .get(address)
            .map(|account| account.lamports)
            .unwrap_or_default()
    }

    /// Credit `lamports` to a system-owned wallet, creating it if needed.
    pub fn airdrop(&self, address: &Pubkey, lamports: u64) -> Result<u64, EscrowError> {
        self.transact(|txn| {
            let mut account = txn
                .get_account(address)
                .cloned()
                .unwrap_or_else(|| Account::new(0, 0, &solana_sdk_ids::system_program::id()));
            account.lamports = account
                .lamports
                .checked_add(lamports)
                .ok_or(EscrowError::ArithmeticOverflow)?;
            let balance = account.lamports;
            txn.set_account(*address, account);
            Ok(balance)
        })
    }

    /// Run `f` against the committed accounts; anything it stages is dropped.
    pub fn view<T, F>(&self, f: F) -> T
    where
        F: FnOnce(&mut LedgerTransaction<'_>) -> T,
    {
        let accounts = self.accounts.read();
        let mut txn = LedgerTransaction {
            committed: &accounts,
            pending: HashMap::new(),
            rent: &self.rent,
        };
        f(&mut txn)
    }

    /// Run `f` as one atomic transaction.
    ///
    /// Writes staged by `f` become visible to other callers only if it
    /// returns `Ok`; on `Err` the ledger is left exactly as it was.
    pub fn transact<T, F>(&self, f: F) -> Result<T, EscrowError>
    where
        F: FnOnce(&mut LedgerTransaction<'_>) -> Result<T, EscrowError>,
    {
        let mut accounts = self.accounts.write();
        let mut txn = LedgerTransaction {
            committed: &accounts,
            pending: HashMap::new(),
            rent: &self.rent,
        };
        let result = f(&mut txn);
        let pending = txn.pending;
        match result {
            Ok(value) => {
                trace!("ledger: committing {} account write(s)", pending.len());
                accounts.extend(pending);
                self.transaction_count.fetch_add(1, Ordering::AcqRel);
                Ok(value)
            }
            Err(err) => {
                trace!(
                    "ledger: aborting transaction, discarding {} write(s): {err}",
                    pending.len()
                );
                Err(err)
            }
        }
    }
}

/// Overlay over the committed accounts for the duration of one transaction.
#[derive(Debug)]
pub struct LedgerTransaction<'a> {
    committed: &'a HashMap<Pubkey, Account>,
    pending: HashMap<Pubkey, Account>,
    rent: &'a Rent,
}

impl LedgerTransaction<'_> {
    pub fn rent(&self) -> &Rent {
        self.rent
    }

    pub fn get_account(&self, address: &Pubkey) -> Option<&Account> {
        self.pending
            .get(address)
            .or_else(|| self.committed.get(address))
    }

    pub fn get_lamports(&self, address: &Pubkey) -> u64 {
        self.get_account(address)
            .map(|account| account.lamports)
            .unwrap_or_default()
    }

    pub fn set_account(&mut self, address: Pubkey, account: Account) {
        self.pending.insert(address, account);
    }

    /// Move `lamports` from `from` to `to`; `to` is created as a system
    /// account if it does not exist.
    pub fn transfer(&mut self, from: &Pubkey, to: &Pubkey, lamports: u64) -> Result<(), EscrowError> {
        if lamports == 0 {
            return Ok(());
        }
        let mut source = self
            .get_account(from)
            .cloned()
            .ok_or(EscrowError::InsufficientFunds)?;
        source.lamports = source
            .lamports
            .checked_sub(lamports)
            .ok_or(EscrowError::InsufficientFunds)?;
        self.set_account(*from, source);

        let mut destination = self
            .get_account(to)
            .cloned()
            .unwrap_or_else(|| Account::new(0, 0, &solana_sdk_ids::system_program::id()));
        destination.lamports = destination
            .lamports
            .checked_add(lamports)
            .ok_or(EscrowError::ArithmeticOverflow)?;
        self.set_account(*to, destination);
        Ok(())
    }
}
