//! Signer authorization shared by every privileged instruction.
//!
//! The gate is decoupled from how signatures are produced: the processor
//! tells it whether the caller signed, and an [`AuthorityPredicate`] decides
//! whether that caller may act for the expected authority.

use {crate::error::EscrowError, log::*, solana_pubkey::Pubkey};

/// Decides whether `caller` may act as `expected`.
pub trait AuthorityPredicate: Send + Sync {
    fn is_authorized(&self, caller: &Pubkey, expected: &Pubkey) -> bool;
}

/// The caller must be the expected authority itself.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SignerMatches;

impl AuthorityPredicate for SignerMatches {
    fn is_authorized(&self, caller: &Pubkey, expected: &Pubkey) -> bool {
        caller == expected
    }
}

impl<F> AuthorityPredicate for F
where
    F: Fn(&Pubkey, &Pubkey) -> bool + Send + Sync,
{
    fn is_authorized(&self, caller: &Pubkey, expected: &Pubkey) -> bool {
        self(caller, expected)
    }
}

#[derive(Debug, Default, Clone)]
pub struct AuthorityGate<P = SignerMatches> {
    predicate: P,
}

impl AuthorityGate {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<P: AuthorityPredicate> AuthorityGate<P> {
    pub fn with_predicate(predicate: P) -> Self {
        Self { predicate }
    }

    /// Succeeds iff `caller` signed and the predicate accepts it for
    /// `expected`; otherwise `Unauthorized`.
    pub fn check(
        &self,
        caller: &Pubkey,
        is_signer: bool,
        expected: &Pubkey,
    ) -> Result<(), EscrowError> {
        if !is_signer {
            debug!("authority gate: {caller} did not sign");
            return Err(EscrowError::Unauthorized);
        }
        if !self.predicate.is_authorized(caller, expected) {
            debug!("authority gate: {caller} is not authorised for {expected}");
            return Err(EscrowError::Unauthorized);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADMIN: Pubkey = Pubkey::new_from_array([7; 32]);
    const OTHER: Pubkey = Pubkey::new_from_array([8; 32]);

    #[test]
    fn test_signer_matches() {
        let gate = AuthorityGate::new();
        assert_eq!(gate.check(&ADMIN, true, &ADMIN), Ok(()));
        assert_eq!(
            gate.check(&OTHER, true, &ADMIN),
            Err(EscrowError::Unauthorized)
        );
    }

    #[test]
    fn test_missing_signature_is_unauthorized() {
        let gate = AuthorityGate::new();
        assert_eq!(
            gate.check(&ADMIN, false, &ADMIN),
            Err(EscrowError::Unauthorized)
        );
    }

    #[test]
    fn test_injected_predicate() {
        // Delegation table: OTHER may act for ADMIN.
        let gate = AuthorityGate::with_predicate(|caller: &Pubkey, expected: &Pubkey| {
            caller == expected || (*caller == OTHER && *expected == ADMIN)
        });
        assert_eq!(gate.check(&OTHER, true, &ADMIN), Ok(()));
        assert_eq!(
            gate.check(&ADMIN, true, &OTHER),
            Err(EscrowError::Unauthorized)
        );
        assert_eq!(
            gate.check(&OTHER, false, &ADMIN),
            Err(EscrowError::Unauthorized)
        );
    }
}
