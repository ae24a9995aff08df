//! Nullable entropy — deterministic voter tokens.

use heritage_governance::{EntropySource, GovernanceError};
use std::sync::Mutex;

/// A deterministic entropy source for testing.
///
/// Fills each request with the next byte from a counter, so successive
/// tokens are distinct and predictable.
pub struct NullRandom {
    next: Mutex<u8>,
}

impl NullRandom {
    pub fn new(seed: u8) -> Self {
        Self {
            next: Mutex::new(seed),
        }
    }
}

impl Default for NullRandom {
    fn default() -> Self {
        Self::new(1)
    }
}

impl EntropySource for NullRandom {
    fn fill(&self, buf: &mut [u8]) -> Result<(), GovernanceError> {
        let mut next = self.next.lock().unwrap();
        buf.fill(*next);
        *next = next.wrapping_add(1);
        Ok(())
    }
}
