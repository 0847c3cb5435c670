//! dex-raise Test Harness
//!
//! Sets up an in-process ledger with a deployed dex-raise processor and the
//! keys that take part in initialization:
//!
//! - the deployer (the deployment's initialization authority, pays rent)
//! - the administrator, fee wallet and treasury bound at initialization
//! - a stranger holding funds but no authority
//!
//! Nothing talks to a network; every call goes straight through
//! [`EscrowClient`] into the ledger.

use {
    dex_raise_program::{
        client::EscrowClient,
        instruction::InitializeParams,
        ledger::Ledger,
        processor::Processor,
        settings::ProgramSettings,
    },
    solana_keypair::Keypair,
    solana_pubkey::Pubkey,
    solana_signer::Signer,
    std::sync::{Arc, Once},
};

// ─── Constants ───────────────────────────────────────────────────────────────

/// One SOL in lamports.
pub const SOL: u64 = 1_000_000_000;

/// Starting balance of every funded test key.
pub const DEFAULT_BALANCE: u64 = 10 * SOL;

/// Fee used by the canonical initialization (0.5 %).
pub const DEFAULT_FEE_BASIS_POINTS: u16 = 50;

static LOGGER: Once = Once::new();

/// Route `log` output through `env_logger`; honours `RUST_LOG`.
pub fn setup_logging() {
    LOGGER.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

// ─── Test harness ────────────────────────────────────────────────────────────

pub struct TestHarness {
    pub client: EscrowClient,
    /// Initialization authority of the deployment.
    pub deployer: Keypair,
    pub administrator: Keypair,
    pub fee_wallet: Pubkey,
    pub treasury: Pubkey,
    /// Funded key with no role.
    pub stranger: Keypair,
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl TestHarness {
    /// Fresh ledger; deployer and stranger hold [`DEFAULT_BALANCE`].
    pub fn new() -> Self {
        let deployer = Keypair::new();
        let settings = ProgramSettings::new(deployer.pubkey());
        Self::with_settings(deployer, settings)
    }

    /// Harness whose deployment uses `settings`; `deployer` is funded but is
    /// only the initialization authority if `settings` says so.
    pub fn with_settings(deployer: Keypair, settings: ProgramSettings) -> Self {
        setup_logging();

        let ledger = Arc::new(Ledger::new());
        let administrator = Keypair::new();
        let stranger = Keypair::new();
        for key in [deployer.pubkey(), administrator.pubkey(), stranger.pubkey()] {
            ledger
                .airdrop(&key, DEFAULT_BALANCE)
                .expect("airdrop to fresh key");
        }

        let processor = Arc::new(Processor::new(settings));
        Self {
            client: EscrowClient::new(ledger, processor),
            deployer,
            administrator,
            fee_wallet: Keypair::new().pubkey(),
            treasury: Keypair::new().pubkey(),
            stranger,
        }
    }

    pub fn ledger(&self) -> &Ledger {
        self.client.ledger()
    }

    pub fn program_id(&self) -> Pubkey {
        *self.client.program_id()
    }

    pub fn config_address(&self) -> Pubkey {
        self.client.config_address()
    }

    /// The canonical payload: harness administrator, fee wallet and treasury.
    pub fn initialize_params(&self) -> InitializeParams {
        InitializeParams {
            administrator: self.administrator.pubkey(),
            fee_wallet: self.fee_wallet,
            treasury: self.treasury,
            fee_basis_points: DEFAULT_FEE_BASIS_POINTS,
            initial_whitelisted_member: None,
        }
    }

    /// Run the canonical initialization signed by the deployer.
    pub fn initialize(&self) {
        self.client
            .initialize(&self.deployer, self.initialize_params())
            .expect("initialize config");
    }
}
