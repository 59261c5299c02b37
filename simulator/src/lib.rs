//! Offline driver for the craps engine.
//!
//! Replays a recorded script of bets and rolls, or simulates seeded shooters with a fixed betting
//! strategy, and summarises the settlements.

use crapsline_execution::{GameError, HashDice, Table, TableRules};
use crapsline_types::craps::ParseBetKindError;
use crapsline_types::{
    BetKind, Phase, PhaseEvent, Roll, RollError, RollReport, SettlementOutcome, Wager,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum SimulatorError {
    #[error("game error: {0}")]
    Game(#[from] GameError),
    #[error(transparent)]
    BetKind(#[from] ParseBetKindError),
    #[error("invalid roll in script: {0}")]
    Roll(#[from] RollError),
}

/// A bet as written in a script or strategy.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ScriptBet {
    #[serde(default)]
    pub player: u64,
    /// Bet label, e.g. `pass_line`, `hardway:8`, `odds:pass:line`.
    pub kind: String,
    pub stake: u64,
    /// Come point for come odds.
    #[serde(default)]
    pub point: Option<u8>,
}

impl ScriptBet {
    pub fn wager(&self) -> Result<Wager, SimulatorError> {
        let kind: BetKind = self.kind.parse()?;
        let wager = Wager::new(self.player, kind, self.stake);
        Ok(match self.point {
            Some(point) => wager.at_point(point),
            None => wager,
        })
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Bet(ScriptBet),
    Roll([u8; 2]),
    /// Brings out the next shooter on an idle series.
    Shooter,
}

/// A recorded session for one series.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Script {
    pub steps: Vec<Step>,
}

/// Bets re-placed whenever the table accepts them.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Strategy {
    pub bets: Vec<ScriptBet>,
}

/// Aggregate results of a run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub rolls: u64,
    pub shooters: u64,
    pub bets_placed: u64,
    pub bets_rejected: u64,
    pub wagered: u64,
    pub wins: u64,
    pub losses: u64,
    pub pushes: u64,
    /// Winnings paid, excluding returned stakes.
    pub paid: u64,
    /// Stakes lost.
    pub collected: u64,
    #[serde(skip)]
    pub reports: Vec<RollReport>,
}

impl Summary {
    /// Player net result across the run.
    pub fn net(&self) -> i128 {
        self.paid as i128 - self.collected as i128
    }

    fn placed(&mut self, stake: u64) {
        self.bets_placed += 1;
        self.wagered = self.wagered.saturating_add(stake);
    }

    fn record(&mut self, report: RollReport) {
        self.rolls += 1;
        if report.event == PhaseEvent::SevenOut {
            self.shooters += 1;
        }
        for settlement in &report.settlements {
            match settlement.outcome {
                SettlementOutcome::Win(winnings) => {
                    self.wins += 1;
                    self.paid = self.paid.saturating_add(winnings);
                }
                SettlementOutcome::Loss => {
                    self.losses += 1;
                    self.collected = self.collected.saturating_add(settlement.stake);
                }
                SettlementOutcome::Push(_) => self.pushes += 1,
                SettlementOutcome::StillActive => {}
            }
        }
        self.reports.push(report);
    }
}

/// Replays `script` on a fresh series. Any rejected bet or roll aborts the replay.
pub fn replay(rules: TableRules, script: &Script) -> Result<Summary, SimulatorError> {
    let mut table = Table::new(rules);
    let handle = table.start_series();
    let mut summary = Summary::default();
    for step in &script.steps {
        match step {
            Step::Bet(bet) => {
                let wager = bet.wager()?;
                table.place_bet(handle, wager)?;
                summary.placed(wager.stake);
            }
            Step::Roll([die1, die2]) => {
                let roll = Roll::new(*die1, *die2)?;
                summary.record(table.apply_roll(handle, roll)?);
            }
            Step::Shooter => table.start_shooter(handle)?,
        }
    }
    info!(
        rolls = summary.rolls,
        bets = summary.bets_placed,
        net = %summary.net(),
        "replay complete"
    );
    Ok(summary)
}

/// Plays `shooters` seeded shooters, re-placing the strategy's bets whenever the table accepts
/// them. A player only holds one bet of each kind at a time.
pub fn simulate(
    rules: TableRules,
    seed: [u8; 32],
    shooters: u64,
    strategy: &Strategy,
) -> Result<Summary, SimulatorError> {
    let wagers = strategy
        .bets
        .iter()
        .map(ScriptBet::wager)
        .collect::<Result<Vec<_>, _>>()?;

    let mut table = Table::new(rules);
    let handle = table.start_series();
    let mut dice = HashDice::new(seed);
    let mut summary = Summary::default();
    while summary.shooters < shooters {
        if table.series(handle)?.phase() == Phase::Idle {
            table.start_shooter(handle)?;
        }
        for wager in &wagers {
            let held = table
                .active_bets(handle)?
                .iter()
                .any(|bet| bet.player == wager.player && bet.kind == wager.kind);
            if held {
                continue;
            }
            match table.place_bet(handle, *wager) {
                Ok(_) => summary.placed(wager.stake),
                Err(err @ GameError::InvalidBetForPhase { .. })
                | Err(err @ GameError::NoContractBet(_))
                | Err(err @ GameError::TooManyBets(_)) => {
                    debug!(kind = %wager.kind, error = %err, "strategy bet skipped");
                    summary.bets_rejected += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
        summary.record(table.roll(handle, &mut dice)?);
    }
    info!(
        shooters = summary.shooters,
        rolls = summary.rolls,
        wagered = summary.wagered,
        net = %summary.net(),
        "simulation complete"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crapsline_execution::mocks::create_seed;
    use crapsline_execution::SevenOutPolicy;

    const SCRIPT: &str = "
steps:
  - bet: { kind: pass_line, stake: 100 }
  - bet: { kind: fire, stake: 10 }
  - roll: [2, 2]
  - bet: { kind: 'odds:pass:line', stake: 100 }
  - roll: [1, 3]
  - bet: { kind: pass_line, stake: 100 }
  - roll: [3, 4]
  - bet: { kind: pass_line, stake: 100 }
  - roll: [3, 3]
  - roll: [6, 1]
";

    #[test]
    fn test_replay_script() {
        let script: Script = serde_yaml::from_str(SCRIPT).unwrap();
        let summary = replay(TableRules::default(), &script).unwrap();

        assert_eq!(summary.rolls, 5);
        assert_eq!(summary.shooters, 1);
        assert_eq!(summary.bets_placed, 5);
        assert_eq!(summary.wagered, 410);
        // Pass line on the 4, its odds, and the come-out natural.
        assert_eq!(summary.wins, 3);
        // Pass line on the 6 and the Fire bet at seven-out.
        assert_eq!(summary.losses, 2);
        assert_eq!(summary.paid, 400);
        assert_eq!(summary.collected, 110);
        assert_eq!(summary.net(), 290);
    }

    #[test]
    fn test_replay_rejects_bad_steps() {
        let script: Script = serde_yaml::from_str(
            "
steps:
  - roll: [2, 2]
  - bet: { kind: pass_line, stake: 100 }
",
        )
        .unwrap();
        assert!(matches!(
            replay(TableRules::default(), &script),
            Err(SimulatorError::Game(GameError::InvalidBetForPhase { .. }))
        ));

        let script: Script = serde_yaml::from_str("steps: [ { roll: [0, 3] } ]").unwrap();
        assert!(matches!(
            replay(TableRules::default(), &script),
            Err(SimulatorError::Roll(_))
        ));

        let script: Script =
            serde_yaml::from_str("steps: [ { bet: { kind: lottery, stake: 1 } } ]").unwrap();
        assert!(matches!(
            replay(TableRules::default(), &script),
            Err(SimulatorError::BetKind(_))
        ));
    }

    #[test]
    fn test_simulation_is_seeded() {
        let strategy: Strategy = serde_yaml::from_str(
            "
bets:
  - { kind: pass_line, stake: 10 }
  - { kind: 'odds:pass:line', stake: 20 }
  - { kind: field, stake: 5 }
  - { kind: small, stake: 1 }
",
        )
        .unwrap();
        let first = simulate(TableRules::default(), create_seed(5), 20, &strategy).unwrap();
        let second = simulate(TableRules::default(), create_seed(5), 20, &strategy).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.shooters, 20);
        assert!(first.rolls >= 20);
        assert!(first.bets_placed > 0);
        assert_eq!(first.reports.len() as u64, first.rolls);
    }

    #[test]
    fn test_idle_series_needs_shooter() {
        let rules = TableRules {
            after_seven_out: SevenOutPolicy::Idle,
            ..TableRules::default()
        };
        let script: Script = serde_yaml::from_str(
            "
steps:
  - roll: [4, 4]
  - roll: [3, 4]
  - shooter
  - bet: { kind: pass_line, stake: 10 }
  - roll: [5, 6]
",
        )
        .unwrap();
        let summary = replay(rules, &script).unwrap();
        assert_eq!(summary.shooters, 1);
        assert_eq!(summary.wins, 1);
        assert_eq!(summary.paid, 10);

        let strategy = Strategy {
            bets: vec![ScriptBet {
                player: 1,
                kind: "pass_line".to_string(),
                stake: 10,
                point: None,
            }],
        };
        let summary = simulate(rules, create_seed(9), 3, &strategy).unwrap();
        assert_eq!(summary.shooters, 3);
    }
}
