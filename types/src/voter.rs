//! Pseudonymous voter identity.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::TypeError;

/// Opaque per-browser identity used solely as the join key for vote uniqueness.
///
/// Always 32 random bytes rendered as 64 lowercase hex characters. Carries no
/// personal data and proves nothing beyond possession of the cookie.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VoterToken(String);

impl VoterToken {
    /// Number of random bytes behind a token.
    pub const BYTES: usize = 32;
    /// Length of the hex rendering.
    pub const LEN: usize = Self::BYTES * 2;

    pub fn from_bytes(bytes: [u8; Self::BYTES]) -> Self {
        Self(hex::encode(bytes))
    }

    /// Accept a previously issued token. Anything that is not exactly
    /// 64 lowercase hex characters is rejected.
    pub fn parse(raw: &str) -> Result<Self, TypeError> {
        let well_formed = raw.len() == Self::LEN
            && raw
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if well_formed {
            Ok(Self(raw.to_string()))
        } else {
            Err(TypeError::InvalidVoterToken)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for VoterToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for VoterToken {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<VoterToken> for String {
    fn from(token: VoterToken) -> Self {
        token.0
    }
}
