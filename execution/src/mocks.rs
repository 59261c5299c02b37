use crate::casino::{GameError, RandomnessSource};
use commonware_cryptography::{sha256::Sha256, Hasher};
use crapsline_types::Roll;
use std::collections::VecDeque;

/// Creates a deterministic 32-byte seed for testing
pub fn create_seed(index: u64) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(b"crapsline-seed");
    hasher.update(&index.to_be_bytes());
    hasher.finalize().0
}

/// Parses `(die1, die2)` pairs into rolls, panicking on invalid dice.
pub fn rolls(pairs: &[(u8, u8)]) -> Vec<Roll> {
    pairs
        .iter()
        .map(|(d1, d2)| Roll::new(*d1, *d2).expect("invalid die in test script"))
        .collect()
}

/// [RandomnessSource] that hands out a fixed script of rolls, regardless of series.
pub struct ScriptedDice {
    script: VecDeque<Roll>,
}

impl ScriptedDice {
    pub fn new(script: Vec<Roll>) -> Self {
        Self {
            script: script.into(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl RandomnessSource for ScriptedDice {
    fn next_roll(&mut self, series: u64, roll_number: u32) -> Result<Roll, GameError> {
        self.script.pop_front().ok_or_else(|| {
            GameError::RandomnessUnavailable(format!(
                "script exhausted at series {series} roll {roll_number}"
            ))
        })
    }
}
