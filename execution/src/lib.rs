pub mod casino;
pub mod config;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

pub use casino::payout::PayoutTable;
pub use casino::phase::SevenOutPolicy;
pub use casino::series::{Series, TableRules};
pub use casino::settle::{settle, Decision, RollContext};
pub use casino::table::{SeriesHandle, Table};
pub use casino::{GameError, GameRng, HashDice, RandomnessSource};
pub use config::{Config, ConfigError, ValidatedConfig};
