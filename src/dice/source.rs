//! Random sources backing a die.

use std::time::{SystemTime, UNIX_EPOCH};

use rand_core::{impls, OsRng, RngCore, SeedableRng};

/// Small deterministic generator (SplitMix64). Same seed, same sequence.
#[derive(Debug, Clone)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Seeded from the wall clock; used when the OS source is unavailable.
    pub fn from_time() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x9E37_79B9_7F4A_7C15);
        Self::new(nanos)
    }
}

impl RngCore for SplitMix64 {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for SplitMix64 {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::new(state)
    }
}

/// Non-deterministic source: the operating system, or a clock-seeded
/// generator when the OS cannot supply entropy.
#[derive(Debug, Clone)]
pub enum Entropy {
    Os,
    Fallback(SplitMix64),
}

impl Entropy {
    pub fn detect() -> Self {
        let mut sample = [0u8; 1];
        match OsRng.try_fill_bytes(&mut sample) {
            Ok(()) => Entropy::Os,
            Err(e) => {
                log::warn!("OS entropy unavailable ({e}); falling back to a clock-seeded generator");
                Entropy::Fallback(SplitMix64::from_time())
            }
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        match self {
            Entropy::Os => OsRng.next_u64(),
            Entropy::Fallback(rng) => rng.next_u64(),
        }
    }
}
