pub mod craps;
pub use craps::{
    Bet, BetId, BetKind, Bonus, NextTarget, OddsBase, OddsSide, Phase, PhaseEvent, PlayerId,
    ProgressError, Roll, RollError, RollReport, Settlement, SettlementOutcome, ShooterProgress,
    Wager,
};
