//! Craps execution module.
//!
//! - `payout`: the canonical payout table
//! - `settle`: per-bet settlement against a single roll
//! - `phase`: come-out / point classification and transitions
//! - `series`: one shooter series (phase machine, progress, active bets)
//! - `table`: many independent series

pub mod logging;
pub mod payout;
pub mod phase;
pub mod series;
pub mod settle;
pub mod table;

use commonware_cryptography::sha256::Sha256;
use commonware_cryptography::Hasher;
use crapsline_types::{BetKind, Phase, ProgressError, Roll, RollError};
use thiserror::Error as ThisError;

/// Deterministic random number generator.
///
/// Uses SHA256 hash chains over a seed, series id and roll number, so publishing the seed
/// lets anyone recompute every roll.
#[derive(Clone)]
pub struct GameRng {
    state: [u8; 32],
    index: usize,
}

impl GameRng {
    /// Create a new RNG from a seed, series ID, and roll number.
    pub fn new(seed: &[u8; 32], series: u64, roll_number: u32) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(seed);
        hasher.update(&series.to_be_bytes());
        hasher.update(&roll_number.to_be_bytes());
        Self {
            state: hasher.finalize().0,
            index: 0,
        }
    }

    fn next_byte(&mut self) -> u8 {
        if self.index >= 32 {
            // Rehash to get more bytes
            let mut hasher = Sha256::new();
            hasher.update(&self.state);
            self.state = hasher.finalize().0;
            self.index = 0;
        }
        let result = self.state[self.index];
        self.index += 1;
        result
    }

    /// Get a random value in range [0, max).
    pub fn next_bounded(&mut self, max: u8) -> u8 {
        if max == 0 {
            return 0;
        }
        // Rejection sampling for unbiased distribution
        let limit = u8::MAX - (u8::MAX % max);
        loop {
            let value = self.next_byte();
            if value < limit {
                return value % max;
            }
        }
    }

    /// Roll a single die (1-6).
    pub fn roll_die(&mut self) -> u8 {
        self.next_bounded(6) + 1
    }
}

/// Supplies the dice for a series.
pub trait RandomnessSource {
    /// Returns the roll for `roll_number` (1-based, counted across the whole series).
    fn next_roll(&mut self, series: u64, roll_number: u32) -> Result<Roll, GameError>;
}

/// Reference [RandomnessSource] backed by [GameRng].
#[derive(Clone)]
pub struct HashDice {
    seed: [u8; 32],
}

impl HashDice {
    pub fn new(seed: [u8; 32]) -> Self {
        Self { seed }
    }
}

impl RandomnessSource for HashDice {
    fn next_roll(&mut self, series: u64, roll_number: u32) -> Result<Roll, GameError> {
        let mut rng = GameRng::new(&self.seed, series, roll_number);
        let die1 = rng.roll_die();
        let die2 = rng.roll_die();
        Ok(Roll::new(die1, die2)?)
    }
}

/// Error during craps execution.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum GameError {
    #[error("{kind} cannot be placed during {phase}")]
    InvalidBetForPhase { kind: BetKind, phase: Phase },
    #[error("unknown bet category")]
    UnknownBetCategory,
    #[error("malformed wager: {0}")]
    MalformedWager(String),
    #[error("payout arithmetic overflow")]
    ArithmeticOverflow,
    #[error("inconsistent progress state: {0}")]
    InconsistentProgressState(String),
    #[error("stake must be > 0")]
    InvalidStake,
    #[error("stake {stake} outside [{min}, {max}]")]
    StakeOutOfRange { stake: u64, min: u64, max: u64 },
    #[error("invalid target for {0}")]
    InvalidTarget(BetKind),
    #[error("series already holds {0} bets")]
    TooManyBets(usize),
    #[error("no matching contract bet for {0}")]
    NoContractBet(BetKind),
    #[error("unknown series {0}")]
    UnknownSeries(u64),
    #[error("series {0} has no shooter")]
    SeriesIdle(u64),
    #[error("series {0} has a shooter or active bets")]
    ShooterBusy(u64),
    #[error("invalid roll: {0}")]
    InvalidRoll(#[from] RollError),
    #[error("randomness unavailable: {0}")]
    RandomnessUnavailable(String),
}

impl From<ProgressError> for GameError {
    fn from(err: ProgressError) -> Self {
        GameError::InconsistentProgressState(err.to_string())
    }
}
