//! Off-chain client: builds, signs and submits dex-raise instructions.

use {
    crate::{
        authority::{AuthorityPredicate, SignerMatches},
        error::EscrowError,
        instruction::{self, InitializeParams},
        ledger::Ledger,
        pda::find_config_address,
        processor::{ProcessOutcome, Processor},
        state::EscrowConfig,
        store::read_config,
    },
    log::*,
    solana_instruction::Instruction,
    solana_keypair::Keypair,
    solana_pubkey::Pubkey,
    solana_signature::Signature,
    solana_signer::Signer,
    std::sync::Arc,
};

/// Result of a committed transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReceipt {
    /// Signature of the first signer; identifies the transaction.
    pub signature: Signature,
    pub outcome: ProcessOutcome,
}

pub struct EscrowClient<P = SignerMatches> {
    ledger: Arc<Ledger>,
    processor: Arc<Processor<P>>,
}

impl<P> Clone for EscrowClient<P> {
    fn clone(&self) -> Self {
        Self {
            ledger: Arc::clone(&self.ledger),
            processor: Arc::clone(&self.processor),
        }
    }
}

impl<P: AuthorityPredicate> EscrowClient<P> {
    pub fn new(ledger: Arc<Ledger>, processor: Arc<Processor<P>>) -> Self {
        Self { ledger, processor }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn program_id(&self) -> &Pubkey {
        self.processor.program_id()
    }

    /// Config address of the program; computed locally.
    pub fn config_address(&self) -> Pubkey {
        find_config_address(self.program_id()).0
    }

    /// The committed config, or `None` before initialization.
    pub fn get_config(&self) -> Result<Option<EscrowConfig>, EscrowError> {
        read_config(&self.ledger, self.program_id())
    }

    pub fn initialize(
        &self,
        payer: &Keypair,
        params: InitializeParams,
    ) -> Result<TransactionReceipt, EscrowError> {
        let ix = instruction::initialize(self.program_id(), &payer.pubkey(), params);
        self.send_instruction(ix, &[payer])
    }

    pub fn add_to_whitelist(
        &self,
        administrator: &Keypair,
        member: Pubkey,
    ) -> Result<TransactionReceipt, EscrowError> {
        let ix = instruction::add_to_whitelist(self.program_id(), &administrator.pubkey(), member);
        self.send_instruction(ix, &[administrator])
    }

    pub fn remove_from_whitelist(
        &self,
        administrator: &Keypair,
        member: Pubkey,
    ) -> Result<TransactionReceipt, EscrowError> {
        let ix =
            instruction::remove_from_whitelist(self.program_id(), &administrator.pubkey(), member);
        self.send_instruction(ix, &[administrator])
    }

    /// Sign `instruction` with `signers` and execute it as one transaction.
    pub fn send_instruction(
        &self,
        instruction: Instruction,
        signers: &[&Keypair],
    ) -> Result<TransactionReceipt, EscrowError> {
        let message = transaction_message(&instruction, self.ledger.transaction_count());
        let signatures: Vec<Signature> = signers
            .iter()
            .map(|signer| signer.sign_message(&message))
            .collect();
        let signature = signatures
            .first()
            .copied()
            .ok_or(EscrowError::Unauthorized)?;
        let signer_keys: Vec<Pubkey> = signers.iter().map(|signer| signer.pubkey()).collect();

        match self
            .processor
            .process_instruction(&self.ledger, &instruction, &signer_keys)
        {
            Ok(outcome) => {
                debug!("transaction {signature} committed");
                Ok(TransactionReceipt { signature, outcome })
            }
            Err(err) => {
                warn!("transaction {signature} failed: {err} (code {})", err.code());
                Err(err)
            }
        }
    }
}

/// Bytes covered by the signatures: program, accounts, data and the ledger
/// position the transaction was built against.
fn transaction_message(instruction: &Instruction, sequence: u64) -> Vec<u8> {
    let mut message = Vec::with_capacity(
        8 + 32 + instruction.accounts.len() * 34 + instruction.data.len(),
    );
    message.extend_from_slice(&sequence.to_le_bytes());
    message.extend_from_slice(instruction.program_id.as_ref());
    for meta in &instruction.accounts {
        message.extend_from_slice(meta.pubkey.as_ref());
        message.push(u8::from(meta.is_signer));
        message.push(u8::from(meta.is_writable));
    }
    message.extend_from_slice(&instruction.data);
    message
}
