//! A single shooter series: the phase machine, the shooter's progress and the active bets.

use super::logging::{format_resolved, net_for_roll};
use super::payout::{winnings, PayoutTable};
use super::phase::{transition, SevenOutPolicy};
use super::settle::{settle, RollContext};
use super::GameError;
use crapsline_types::craps::MAX_SETTLEMENTS_PER_ROLL;
use crapsline_types::{
    Bet, BetId, BetKind, Bonus, OddsBase, OddsSide, Phase, PhaseEvent, Roll, RollReport,
    Settlement, ShooterProgress, Wager,
};
use tracing::{debug, info, warn};

/// Limits and policies applied to every series on a table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableRules {
    pub max_bets: usize,
    pub min_stake: u64,
    pub max_stake: u64,
    pub after_seven_out: SevenOutPolicy,
}

impl Default for TableRules {
    fn default() -> Self {
        Self {
            max_bets: 20,
            min_stake: 1,
            max_stake: u64::MAX,
            after_seven_out: SevenOutPolicy::NewShooter,
        }
    }
}

/// One series of rolls.
///
/// Rolls are applied atomically: every bet is settled and the next progress computed before
/// anything is written back, so a failed roll leaves the series exactly as it was.
#[derive(Clone, Debug)]
pub struct Series {
    id: u64,
    rules: TableRules,
    phase: Phase,
    point: Option<u8>,
    progress: ShooterProgress,
    shooter: u32,
    rolls: u32,
    next_bet: BetId,
    bets: Vec<Bet>,
}

impl Series {
    /// Creates an idle series.
    pub fn new(id: u64, rules: TableRules) -> Self {
        Self {
            id,
            rules,
            phase: Phase::Idle,
            point: None,
            progress: ShooterProgress::default(),
            shooter: 0,
            rolls: 0,
            next_bet: 0,
            bets: Vec::new(),
        }
    }

    /// Creates a series with its first shooter coming out.
    pub fn with_shooter(id: u64, rules: TableRules) -> Self {
        let mut series = Self::new(id, rules);
        series.begin_shooter();
        series
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn rules(&self) -> &TableRules {
        &self.rules
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn point(&self) -> Option<u8> {
        self.point
    }

    pub fn progress(&self) -> &ShooterProgress {
        &self.progress
    }

    /// Number of shooters that have come out in this series.
    pub fn shooter(&self) -> u32 {
        self.shooter
    }

    /// Rolls applied to this series across all shooters.
    pub fn rolls(&self) -> u32 {
        self.rolls
    }

    /// Active bets in placement order.
    pub fn active_bets(&self) -> &[Bet] {
        &self.bets
    }

    fn begin_shooter(&mut self) {
        self.shooter = self.shooter.saturating_add(1);
        self.phase = Phase::ComeOut;
        self.point = None;
        self.progress = ShooterProgress::default();
        info!(series = self.id, shooter = self.shooter, "shooter coming out");
    }

    /// Brings a new shooter out on an idle series.
    pub fn start_shooter(&mut self) -> Result<(), GameError> {
        if self.phase != Phase::Idle {
            return Err(GameError::ShooterBusy(self.id));
        }
        self.begin_shooter();
        Ok(())
    }

    /// Replaces the current shooter. Only allowed with no bets on the layout.
    pub fn rotate_shooter(&mut self) -> Result<(), GameError> {
        if !self.bets.is_empty() {
            return Err(GameError::ShooterBusy(self.id));
        }
        self.begin_shooter();
        Ok(())
    }

    /// Validates and places a bet, returning its id.
    pub fn place_bet(&mut self, wager: Wager) -> Result<BetId, GameError> {
        match self.check_wager(&wager) {
            Ok(point) => {
                let id = self.next_bet;
                self.next_bet = self
                    .next_bet
                    .checked_add(1)
                    .ok_or(GameError::ArithmeticOverflow)?;
                self.bets
                    .push(Bet::new(id, wager.player, wager.kind, wager.stake, point));
                debug!(
                    series = self.id,
                    bet = id,
                    player = wager.player,
                    kind = %wager.kind,
                    stake = wager.stake,
                    point = ?point,
                    "bet placed"
                );
                Ok(id)
            }
            Err(err) => {
                warn!(
                    series = self.id,
                    player = wager.player,
                    kind = %wager.kind,
                    stake = wager.stake,
                    phase = %self.phase,
                    error = %err,
                    "bet rejected"
                );
                Err(err)
            }
        }
    }

    /// Checks a wager against the series and returns the point the new bet carries.
    fn check_wager(&self, wager: &Wager) -> Result<Option<u8>, GameError> {
        if self.phase == Phase::Idle {
            return Err(GameError::SeriesIdle(self.id));
        }
        let kind = wager.kind;
        if !kind.is_valid() {
            return Err(GameError::InvalidTarget(kind));
        }
        if wager.stake == 0 {
            return Err(GameError::InvalidStake);
        }
        if wager.stake < self.rules.min_stake || wager.stake > self.rules.max_stake {
            return Err(GameError::StakeOutOfRange {
                stake: wager.stake,
                min: self.rules.min_stake,
                max: self.rules.max_stake,
            });
        }
        // Every stake must be payable at the kind's best tier, or a roll could never settle.
        let top = PayoutTable::max_multiplier(kind).ok_or(GameError::InvalidTarget(kind))?;
        winnings(wager.stake, top)?;
        let max_bets = self.rules.max_bets.min(MAX_SETTLEMENTS_PER_ROLL);
        if self.bets.len() >= max_bets {
            return Err(GameError::TooManyBets(max_bets));
        }

        let wrong_phase = || GameError::InvalidBetForPhase {
            kind,
            phase: self.phase,
        };
        match kind {
            BetKind::PassLine | BetKind::DontPass | BetKind::Bonus(Bonus::Muggsy) => {
                if self.phase != Phase::ComeOut {
                    return Err(wrong_phase());
                }
                Ok(None)
            }
            BetKind::Come | BetKind::DontCome => {
                if self.phase != Phase::Point {
                    return Err(wrong_phase());
                }
                Ok(None)
            }
            BetKind::Odds {
                side,
                base: OddsBase::Line,
            } => {
                if self.phase != Phase::Point {
                    return Err(wrong_phase());
                }
                let contract = match side {
                    OddsSide::Pass => BetKind::PassLine,
                    OddsSide::DontPass => BetKind::DontPass,
                };
                if !self.has_contract(wager, contract, None) {
                    return Err(GameError::NoContractBet(kind));
                }
                Ok(self.point)
            }
            BetKind::Odds {
                side,
                base: OddsBase::Come,
            } => {
                let point = wager.point.ok_or(GameError::InvalidTarget(kind))?;
                let contract = match side {
                    OddsSide::Pass => BetKind::Come,
                    OddsSide::DontPass => BetKind::DontCome,
                };
                if !self.has_contract(wager, contract, Some(point)) {
                    return Err(GameError::NoContractBet(kind));
                }
                Ok(Some(point))
            }
            BetKind::Bonus(bonus) if bonus.tracks_shooter() => {
                if self.progress.rolls() != 0 {
                    return Err(wrong_phase());
                }
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    /// True if the wager's player holds an active `contract` bet (on `point`, for come bets).
    fn has_contract(&self, wager: &Wager, contract: BetKind, point: Option<u8>) -> bool {
        self.bets.iter().any(|bet| {
            bet.active
                && bet.player == wager.player
                && bet.kind == contract
                && (point.is_none() || bet.point == point)
        })
    }

    /// Applies a roll: settles every active bet, advances progress and moves the phase.
    pub fn apply_roll(&mut self, roll: Roll) -> Result<RollReport, GameError> {
        match self.compute_roll(roll) {
            Ok(report) => Ok(report),
            Err(err) => {
                warn!(
                    series = self.id,
                    shooter = self.shooter,
                    roll = %roll,
                    phase = %self.phase,
                    error = %err,
                    "roll aborted"
                );
                Err(err)
            }
        }
    }

    fn compute_roll(&mut self, roll: Roll) -> Result<RollReport, GameError> {
        if self.phase == Phase::Idle {
            return Err(GameError::SeriesIdle(self.id));
        }
        if self.bets.len() > MAX_SETTLEMENTS_PER_ROLL {
            return Err(GameError::TooManyBets(MAX_SETTLEMENTS_PER_ROLL));
        }
        let roll_number = self
            .rolls
            .checked_add(1)
            .ok_or(GameError::ArithmeticOverflow)?;

        // Decide everything before committing anything
        let ctx = RollContext::new(roll, self.phase, self.point, &self.progress)?;
        let mut decisions = Vec::with_capacity(self.bets.len());
        for bet in &self.bets {
            decisions.push(settle(bet, &ctx)?);
        }
        let RollContext { event, after, .. } = ctx;
        let (phase, point) = transition(event, self.phase, self.point, self.rules.after_seven_out);

        let phase_before = self.phase;
        let point_before = self.point;
        let mut settlements = Vec::with_capacity(decisions.len());
        let mut remaining = Vec::with_capacity(decisions.len());
        for decision in decisions {
            let bet = decision.bet;
            debug!(
                series = self.id,
                shooter = self.shooter,
                roll_number,
                bet = bet.id,
                player = bet.player,
                kind = %bet.kind,
                stake = bet.stake,
                outcome = ?decision.outcome,
                "bet settled"
            );
            settlements.push(Settlement {
                bet_id: bet.id,
                player: bet.player,
                kind: bet.kind,
                stake: bet.stake,
                outcome: decision.outcome,
            });
            if !decision.outcome.is_terminal() {
                remaining.push(bet);
            }
        }

        // Commit
        self.rolls = roll_number;
        self.bets = remaining;
        self.phase = phase;
        self.point = point;
        self.progress = after;
        let report = RollReport {
            series: self.id,
            shooter: self.shooter,
            roll_number,
            roll,
            phase_before,
            point_before,
            phase,
            point,
            event,
            settlements,
        };

        if event != PhaseEvent::None {
            info!(
                series = self.id,
                shooter = self.shooter,
                roll_number,
                roll = %roll,
                phase_before = %phase_before,
                phase = %phase,
                point = ?point,
                event = ?event,
                resolved = %format_resolved(&report),
                net = net_for_roll(&report),
                "phase transition"
            );
        }
        if event.ends_shooter() {
            self.progress = ShooterProgress::default();
            if phase == Phase::ComeOut {
                self.begin_shooter();
            } else {
                info!(series = self.id, shooter = self.shooter, "series idle after seven-out");
            }
        }
        Ok(report)
    }
}
