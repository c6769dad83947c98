//! Dice with 4, 6, 8, 10, 12 or 20 sides.
//!
//! A die rolls from operating-system entropy by default. Seeding it switches
//! to a deterministic generator so a sequence of rolls can be replayed;
//! `unseed` switches back.

mod source;

pub use source::{Entropy, SplitMix64};

/// Side counts a die can have.
pub const SUPPORTED_SIDES: [u32; 6] = [4, 6, 8, 10, 12, 20];

/// Sides of a die created with `Die::default`.
pub const DEFAULT_SIDES: u32 = 6;

#[derive(Debug, thiserror::Error)]
pub enum DiceError {
    #[error("die has 4, 6, 8, 10, 12 or 20 sides, not {0}")]
    UnsupportedSides(i64),

    #[error("unexpected argument")]
    UnexpectedArgument,

    #[error("expected one argument")]
    ExpectedOneArgument,

    #[error("argument must be an integer: {0:?}")]
    NotAnInteger(String),

    #[error("dice table unavailable")]
    Poisoned,
}

#[derive(Debug, Clone)]
pub struct Die {
    sides: u32,
    entropy: Entropy,
    seeded: Option<SplitMix64>,
}

impl Die {
    pub fn new(sides: u32) -> Result<Self, DiceError> {
        if !SUPPORTED_SIDES.contains(&sides) {
            return Err(DiceError::UnsupportedSides(i64::from(sides)));
        }
        Ok(Self {
            sides,
            entropy: Entropy::detect(),
            seeded: None,
        })
    }

    pub fn sides(&self) -> u32 {
        self.sides
    }

    pub fn is_seeded(&self) -> bool {
        self.seeded.is_some()
    }

    /// Roll once, yielding a value in `1..=sides`.
    pub fn roll(&mut self) -> u32 {
        let sides = u64::from(self.sides);
        // Reject the tail of the range that would bias low faces.
        let zone = u64::MAX - (u64::MAX % sides);
        loop {
            let v = self.next_u64();
            if v < zone {
                return (v % sides) as u32 + 1;
            }
        }
    }

    /// Switch to a deterministic sequence derived from `seed`.
    pub fn seed(&mut self, seed: i64) {
        self.seeded = Some(SplitMix64::new(seed as u64));
    }

    /// Return to the non-deterministic source.
    pub fn unseed(&mut self) {
        self.seeded = None;
    }

    fn next_u64(&mut self) -> u64 {
        use rand_core::RngCore;
        match self.seeded.as_mut() {
            Some(rng) => rng.next_u64(),
            None => self.entropy.next_u64(),
        }
    }
}

impl Default for Die {
    fn default() -> Self {
        Self {
            sides: DEFAULT_SIDES,
            entropy: Entropy::detect(),
            seeded: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rolls(die: &mut Die, n: usize) -> Vec<u32> {
        (0..n).map(|_| die.roll()).collect()
    }

    fn mean(values: &[u32]) -> f64 {
        values.iter().map(|&v| f64::from(v)).sum::<f64>() / values.len() as f64
    }

    #[test]
    fn unsupported_sides_rejected() {
        assert!(matches!(Die::new(7), Err(DiceError::UnsupportedSides(7))));
        assert!(matches!(Die::new(0), Err(DiceError::UnsupportedSides(0))));
    }

    #[test]
    fn default_is_d6() {
        assert_eq!(Die::default().sides(), DEFAULT_SIDES);
    }

    #[test]
    fn rolls_stay_in_range_and_average_out() {
        for sides in SUPPORTED_SIDES {
            let mut die = Die::new(sides).unwrap();
            let values = rolls(&mut die, 100_000);
            assert!(values.iter().all(|&v| (1..=sides).contains(&v)));
            let expected = (f64::from(sides) + 1.0) / 2.0;
            let got = mean(&values);
            assert!((got - expected).abs() < 0.1, "d{sides}: mean {got}, expected {expected}");
        }
    }

    #[test]
    fn same_seed_same_rolls() {
        let mut a = Die::new(6).unwrap();
        let mut b = Die::new(6).unwrap();
        a.seed(1);
        b.seed(1);
        assert_eq!(rolls(&mut a, 1000), rolls(&mut b, 1000));
        assert!(a.is_seeded());
    }

    #[test]
    fn unseeded_diverges_from_seeded() {
        let mut a = Die::new(20).unwrap();
        let mut b = Die::new(20).unwrap();
        a.seed(1);
        b.seed(1);
        b.unseed();
        assert!(!b.is_seeded());
        assert_ne!(rolls(&mut a, 1000), rolls(&mut b, 1000));
    }

    #[test]
    fn reseeding_restarts_sequence() {
        let mut die = Die::new(12).unwrap();
        die.seed(42);
        let first = rolls(&mut die, 50);
        die.seed(42);
        assert_eq!(rolls(&mut die, 50), first);
    }
}
