//! Voter identity resolution.
//!
//! A visitor either presents a token minted earlier or receives a fresh one.
//! The caller persists a freshly minted token client-side (the HTTP layer
//! sets a long-lived cookie); nothing is stored server-side until a vote.

use std::sync::Arc;

use heritage_types::VoterToken;

use crate::GovernanceError;

/// Source of unpredictable bytes for token minting.
pub trait EntropySource: Send + Sync {
    fn fill(&self, buf: &mut [u8]) -> Result<(), GovernanceError>;
}

/// Operating-system CSPRNG.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&self, buf: &mut [u8]) -> Result<(), GovernanceError> {
        getrandom::getrandom(buf).map_err(|e| GovernanceError::EntropyUnavailable(e.to_string()))
    }
}

/// A resolved voter and whether the token was minted by this call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedVoter {
    pub token: VoterToken,
    pub minted: bool,
}

#[derive(Clone)]
pub struct IdentityResolver {
    entropy: Arc<dyn EntropySource>,
}

impl IdentityResolver {
    pub fn new(entropy: Arc<dyn EntropySource>) -> Self {
        Self { entropy }
    }

    /// Return `existing` unchanged if it is a well-formed token, otherwise
    /// mint a new random one.
    pub fn resolve(&self, existing: Option<&str>) -> Result<ResolvedVoter, GovernanceError> {
        if let Some(token) = existing.and_then(|raw| VoterToken::parse(raw).ok()) {
            return Ok(ResolvedVoter {
                token,
                minted: false,
            });
        }
        Ok(ResolvedVoter {
            token: self.mint()?,
            minted: true,
        })
    }

    /// Parse a presented token without minting. Malformed tokens read as absent.
    pub fn existing(&self, presented: Option<&str>) -> Option<VoterToken> {
        presented.and_then(|raw| VoterToken::parse(raw).ok())
    }

    fn mint(&self) -> Result<VoterToken, GovernanceError> {
        let mut bytes = [0u8; VoterToken::BYTES];
        self.entropy.fill(&mut bytes)?;
        Ok(VoterToken::from_bytes(bytes))
    }
}

impl Default for IdentityResolver {
    fn default() -> Self {
        Self::new(Arc::new(OsEntropy))
    }
}
