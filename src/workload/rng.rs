/*!
 * Linear Congruential Generator
 *
 * Small, fast and statistically weak. Good enough to shape an operation mix,
 * nothing more.
 */

use crate::collections::Key;
use std::time::{SystemTime, UNIX_EPOCH};

/// Number of distinct values `next_u15` produces
pub const LCG_RANGE: u32 = 32_768;

const MULTIPLIER: u32 = 1_103_515_245;
const INCREMENT: u32 = 12_345;

/// 32-bit LCG yielding 15-bit outputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    pub const fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Next value in `[0, LCG_RANGE)`
    #[inline]
    pub fn next_u15(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(MULTIPLIER).wrapping_add(INCREMENT);
        (self.state / 65_536) % LCG_RANGE
    }

    /// Next value in `[0, 1)`
    #[inline]
    pub fn next_unit(&mut self) -> f64 {
        f64::from(self.next_u15()) / f64::from(LCG_RANGE)
    }

    /// Next key in `[0, max_key)`
    ///
    /// Outputs are 15 bits wide, so only `min(max_key, LCG_RANGE)` distinct
    /// keys are ever produced.
    #[inline]
    pub fn next_key(&mut self, max_key: Key) -> Key {
        Key::from(self.next_u15()) % max_key
    }
}

/// Wall-clock seconds truncated to 32 bits
pub fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as u32)
        .unwrap_or(0)
}
