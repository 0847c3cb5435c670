//! Integration tests for config initialization.
//!
//! Covers the deploy-time handshake end to end: locating the config address
//! off-chain, the one successful initialization, and each rejection path.

use {
    crate::harness::{TestHarness, DEFAULT_BALANCE, DEFAULT_FEE_BASIS_POINTS},
    assert_matches::assert_matches,
    dex_raise_program::{
        constants::MAX_BASIS_POINTS,
        error::EscrowError,
        instruction::{self, InitializeParams},
        pda::{derive_address, find_config_address},
        processor::ProcessOutcome,
        settings::ProgramSettings,
        state::EscrowConfig,
    },
    solana_keypair::Keypair,
    solana_pubkey::Pubkey,
    solana_signer::Signer,
    test_case::test_case,
};

// ═══════════════════════════════════════════════════════════════════════════
//  1. Address lookup
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_client_locates_config_without_network() {
    let harness = TestHarness::new();
    let (address, _) = derive_address(b"config", &harness.program_id());
    assert_eq!(harness.config_address(), address);
    assert!(harness.ledger().get_account(&address).is_none());
    assert_eq!(harness.client.get_config(), Ok(None));
}

// ═══════════════════════════════════════════════════════════════════════════
//  2. Successful initialization
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_initialize_then_read_back() {
    // The deployer initialises and administers: Initialize(admin=K1, W, T) signed by K1.
    let k1 = Keypair::new();
    let harness = TestHarness::with_settings(k1.insecure_clone(), ProgramSettings::new(k1.pubkey()));
    let params = InitializeParams {
        administrator: k1.pubkey(),
        ..harness.initialize_params()
    };

    let receipt = harness.client.initialize(&k1, params).unwrap();

    let (address, bump) = find_config_address(&harness.program_id());
    let expected = EscrowConfig {
        administrator: k1.pubkey(),
        fee_wallet: harness.fee_wallet,
        treasury: harness.treasury,
        fee_basis_points: DEFAULT_FEE_BASIS_POINTS,
        whitelist: vec![],
        bump,
    };
    assert_eq!(
        receipt.outcome,
        ProcessOutcome::Initialized {
            address,
            config: expected.clone(),
        }
    );
    assert_eq!(harness.client.get_config(), Ok(Some(expected)));
}

#[test]
fn test_initialize_charges_rent_to_payer() {
    let harness = TestHarness::new();
    harness.initialize();

    let account = harness.ledger().get_account(&harness.config_address()).unwrap();
    let rent = harness
        .ledger()
        .rent()
        .minimum_balance(EscrowConfig::SERIALIZED_SIZE);
    assert_eq!(account.lamports, rent);
    assert_eq!(account.owner, harness.program_id());
    assert_eq!(
        harness.ledger().get_balance(&harness.deployer.pubkey()),
        DEFAULT_BALANCE - rent
    );
}

#[test]
fn test_initialize_with_whitelisted_member() {
    let harness = TestHarness::new();
    let member = Keypair::new().pubkey();
    let params = InitializeParams {
        initial_whitelisted_member: Some(member),
        ..harness.initialize_params()
    };
    harness.client.initialize(&harness.deployer, params).unwrap();

    let config = harness.client.get_config().unwrap().unwrap();
    assert_eq!(config.whitelist, vec![member]);
}

#[test]
fn test_donated_lamports_do_not_block_initialization() {
    let harness = TestHarness::new();
    // Anyone can send lamports to the derived address ahead of time.
    harness
        .ledger()
        .airdrop(&harness.config_address(), 5_000)
        .unwrap();

    harness.initialize();

    let rent = harness
        .ledger()
        .rent()
        .minimum_balance(EscrowConfig::SERIALIZED_SIZE);
    assert_eq!(
        harness.ledger().get_balance(&harness.deployer.pubkey()),
        DEFAULT_BALANCE - (rent - 5_000)
    );
}

// ═══════════════════════════════════════════════════════════════════════════
//  3. Idempotency
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_repeat_initialize_is_rejected_and_state_unchanged() {
    let harness = TestHarness::new();
    harness.initialize();
    let before = harness.ledger().get_account(&harness.config_address()).unwrap();

    assert_eq!(
        harness
            .client
            .initialize(&harness.deployer, harness.initialize_params()),
        Err(EscrowError::AlreadyInitialized)
    );

    let after = harness.ledger().get_account(&harness.config_address()).unwrap();
    assert_eq!(before.data, after.data);
    assert_eq!(before, after);
}

#[test_case(|h: &TestHarness| InitializeParams { administrator: h.stranger.pubkey(), ..h.initialize_params() }; "different administrator")]
#[test_case(|h: &TestHarness| InitializeParams { fee_basis_points: 0, ..h.initialize_params() }; "different fee")]
#[test_case(|h: &TestHarness| InitializeParams { administrator: Pubkey::default(), ..h.initialize_params() }; "malformed payload")]
fn test_second_initialize_fails_with_any_inputs(params: fn(&TestHarness) -> InitializeParams) {
    let harness = TestHarness::new();
    harness.initialize();
    let before = harness.ledger().get_account(&harness.config_address()).unwrap();

    assert_eq!(
        harness.client.initialize(&harness.deployer, params(&harness)),
        Err(EscrowError::AlreadyInitialized)
    );
    assert_eq!(
        harness.ledger().get_account(&harness.config_address()).unwrap(),
        before
    );
}

// ═══════════════════════════════════════════════════════════════════════════
//  4. Rejections
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_stranger_cannot_initialize() {
    let harness = TestHarness::new();
    let params = InitializeParams {
        administrator: harness.stranger.pubkey(),
        ..harness.initialize_params()
    };

    assert_eq!(
        harness.client.initialize(&harness.stranger, params),
        Err(EscrowError::Unauthorized)
    );
    assert!(harness
        .ledger()
        .get_account(&harness.config_address())
        .is_none());
    assert_eq!(
        harness.ledger().get_balance(&harness.stranger.pubkey()),
        DEFAULT_BALANCE
    );
}

#[test]
fn test_arbitrary_target_is_invalid_address() {
    let harness = TestHarness::new();
    let mut ix = instruction::initialize(
        &harness.program_id(),
        &harness.deployer.pubkey(),
        harness.initialize_params(),
    );
    // Pass an arbitrary identity as the "config" account.
    let arbitrary = Keypair::new().pubkey();
    ix.accounts[0].pubkey = arbitrary;

    assert_eq!(
        harness.client.send_instruction(ix, &[&harness.deployer]),
        Err(EscrowError::InvalidAddress)
    );
    assert!(harness.ledger().get_account(&arbitrary).is_none());
    assert!(harness
        .ledger()
        .get_account(&harness.config_address())
        .is_none());
}

#[test]
fn test_fee_above_protocol_maximum_is_invalid_parameter() {
    let harness = TestHarness::new();
    let params = InitializeParams {
        fee_basis_points: MAX_BASIS_POINTS + 1,
        ..harness.initialize_params()
    };
    assert_eq!(
        harness.client.initialize(&harness.deployer, params),
        Err(EscrowError::InvalidParameter)
    );
    assert_eq!(harness.client.get_config(), Ok(None));
}

#[test]
fn test_failed_attempt_does_not_prevent_later_success() {
    let harness = TestHarness::new();
    let bad = InitializeParams {
        treasury: Pubkey::default(),
        ..harness.initialize_params()
    };
    assert_eq!(
        harness.client.initialize(&harness.deployer, bad),
        Err(EscrowError::InvalidParameter)
    );

    let receipt = harness
        .client
        .initialize(&harness.deployer, harness.initialize_params())
        .unwrap();
    assert_matches!(receipt.outcome, ProcessOutcome::Initialized { .. });
}

#[test]
fn test_underfunded_deployer_is_insufficient_funds() {
    let deployer = Keypair::new();
    let harness = TestHarness::with_settings(
        deployer.insecure_clone(),
        ProgramSettings::new(deployer.pubkey()),
    );
    // Drain the deployer down to one lamport.
    let drained = Keypair::new();
    harness
        .ledger()
        .transact(|txn| txn.transfer(&deployer.pubkey(), &drained.pubkey(), DEFAULT_BALANCE - 1))
        .unwrap();

    assert_eq!(
        harness
            .client
            .initialize(&deployer, harness.initialize_params()),
        Err(EscrowError::InsufficientFunds)
    );
    assert_eq!(harness.client.get_config(), Ok(None));
    assert_eq!(harness.ledger().get_balance(&deployer.pubkey()), 1);
}
