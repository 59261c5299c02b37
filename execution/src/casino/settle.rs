//! Bet settlement.
//!
//! [settle] decides a single bet against a single roll. It reads only the bet and the
//! [RollContext] (the roll plus the phase, point and shooter progress in force before it), so it
//! can be evaluated for every active bet before anything is committed.

use super::payout::{winnings, PayoutTable};
use super::phase::classify;
use super::GameError;
use crapsline_types::craps::HARDWAY_NUMBERS;
use crapsline_types::{
    Bet, BetKind, Bonus, OddsBase, OddsSide, Phase, PhaseEvent, Roll, SettlementOutcome,
    ShooterProgress,
};

/// Everything a settlement may read about one roll.
pub struct RollContext<'a> {
    pub roll: Roll,
    pub phase: Phase,
    pub point: Option<u8>,
    pub event: PhaseEvent,
    /// Progress before the roll.
    pub before: &'a ShooterProgress,
    /// Progress after the roll (a seven-out does not reset it here).
    pub after: ShooterProgress,
}

impl<'a> RollContext<'a> {
    pub fn new(
        roll: Roll,
        phase: Phase,
        point: Option<u8>,
        before: &'a ShooterProgress,
    ) -> Result<Self, GameError> {
        let event = classify(phase, point, roll.total())?;
        let after = before.apply_roll(roll, point)?;
        Ok(Self {
            roll,
            phase,
            point,
            event,
            before,
            after,
        })
    }

    fn total(&self) -> u8 {
        self.roll.total()
    }

    /// True if a Pass Line bet won on this roll.
    fn pass_line_won(&self) -> bool {
        matches!(self.event, PhaseEvent::Natural | PhaseEvent::PointMade(_))
    }

    /// True if a Pass Line bet lost on this roll.
    fn pass_line_lost(&self) -> bool {
        matches!(self.event, PhaseEvent::Craps | PhaseEvent::SevenOut)
    }
}

/// Result of settling one bet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decision {
    pub outcome: SettlementOutcome,
    /// The bet as it should stay on the layout (only meaningful when still active).
    pub bet: Bet,
}

/// Intermediate verdict before money is computed.
enum Verdict {
    Win(u64),
    Loss,
    Push,
    Open,
    /// Still active, with updated per-bet state.
    Update(Bet),
}

/// Settles `bet` against the roll described by `ctx`.
pub fn settle(bet: &Bet, ctx: &RollContext<'_>) -> Result<Decision, GameError> {
    let verdict = match bet.kind {
        BetKind::PassLine => line(ctx.phase, ctx.point, ctx.total(), true),
        BetKind::DontPass => line(ctx.phase, ctx.point, ctx.total(), false),
        BetKind::Come => come(bet, ctx.total(), true),
        BetKind::DontCome => come(bet, ctx.total(), false),
        BetKind::Field => match PayoutTable::field(ctx.total()) {
            Some(multiplier) => Verdict::Win(multiplier),
            None => Verdict::Loss,
        },
        BetKind::Yes(n) => {
            if ctx.total() == n {
                Verdict::Win(multiplier(PayoutTable::yes(n), bet)?)
            } else if ctx.total() == 7 {
                Verdict::Loss
            } else {
                Verdict::Open
            }
        }
        BetKind::No(n) => {
            if ctx.total() == 7 {
                Verdict::Win(multiplier(PayoutTable::no(n), bet)?)
            } else if ctx.total() == n {
                Verdict::Loss
            } else {
                Verdict::Open
            }
        }
        BetKind::Hardway(n) => {
            if ctx.roll.is_hard(n) {
                Verdict::Win(multiplier(PayoutTable::hardway(n), bet)?)
            } else if ctx.roll.is_seven() || ctx.roll.is_easy(n) {
                Verdict::Loss
            } else {
                Verdict::Open
            }
        }
        BetKind::Odds { side, base } => odds(bet, ctx, side, base)?,
        BetKind::Bonus(bonus) => self::bonus(bet, ctx, bonus)?,
        BetKind::Next(target) => {
            if target.hits(ctx.total()) {
                Verdict::Win(multiplier(PayoutTable::next(target), bet)?)
            } else {
                Verdict::Loss
            }
        }
        BetKind::Repeater(n) => {
            let target = PayoutTable::repeater_target(n).ok_or(GameError::InvalidTarget(bet.kind))?;
            if ctx.total() == 7 {
                Verdict::Loss
            } else if ctx.total() == n {
                let hits = bet.hits.saturating_add(1);
                if hits >= target {
                    Verdict::Win(multiplier(PayoutTable::repeater(n), bet)?)
                } else {
                    Verdict::Update(Bet { hits, ..*bet })
                }
            } else {
                Verdict::Open
            }
        }
    };

    let decision = match verdict {
        Verdict::Win(multiplier) => Decision {
            outcome: SettlementOutcome::Win(winnings(bet.stake, multiplier)?),
            bet: Bet {
                active: false,
                ..*bet
            },
        },
        Verdict::Loss => Decision {
            outcome: SettlementOutcome::Loss,
            bet: Bet {
                active: false,
                ..*bet
            },
        },
        Verdict::Push => Decision {
            outcome: SettlementOutcome::Push(bet.stake),
            bet: Bet {
                active: false,
                ..*bet
            },
        },
        Verdict::Open => Decision {
            outcome: SettlementOutcome::StillActive,
            bet: *bet,
        },
        Verdict::Update(updated) => Decision {
            outcome: SettlementOutcome::StillActive,
            bet: updated,
        },
    };
    Ok(decision)
}

fn multiplier(value: Option<u64>, bet: &Bet) -> Result<u64, GameError> {
    value.ok_or(GameError::InvalidTarget(bet.kind))
}

/// Pass Line (`pass`) or Don't Pass against the main point.
fn line(phase: Phase, point: Option<u8>, total: u8, pass: bool) -> Verdict {
    match (phase, point) {
        (Phase::ComeOut, _) => come_out(total, pass),
        (Phase::Point, Some(p)) => point_roll(p, total, pass),
        _ => Verdict::Open,
    }
}

/// Line rules for a come-out style roll.
fn come_out(total: u8, pass: bool) -> Verdict {
    match (total, pass) {
        (7 | 11, true) | (2 | 3, false) => Verdict::Win(PayoutTable::LINE),
        (7 | 11, false) | (2 | 3 | 12, true) => Verdict::Loss,
        // Bar 12.
        (12, false) => Verdict::Push,
        _ => Verdict::Open,
    }
}

/// Line rules once a point is working.
fn point_roll(point: u8, total: u8, pass: bool) -> Verdict {
    if total == point {
        if pass {
            Verdict::Win(PayoutTable::LINE)
        } else {
            Verdict::Loss
        }
    } else if total == 7 {
        if pass {
            Verdict::Loss
        } else {
            Verdict::Win(PayoutTable::LINE)
        }
    } else {
        Verdict::Open
    }
}

/// Come / Don't Come: a personal come-out, then travel to the rolled point.
fn come(bet: &Bet, total: u8, pass: bool) -> Verdict {
    match bet.point {
        Some(point) => point_roll(point, total, pass),
        None => match come_out(total, pass) {
            Verdict::Open => Verdict::Update(Bet {
                point: Some(total),
                ..*bet
            }),
            verdict => verdict,
        },
    }
}

fn odds(
    bet: &Bet,
    ctx: &RollContext<'_>,
    side: OddsSide,
    base: OddsBase,
) -> Result<Verdict, GameError> {
    let point = bet.point.ok_or_else(|| {
        GameError::InconsistentProgressState(format!("bet {} has odds without a point", bet.id))
    })?;
    let total = ctx.total();
    if total != point && total != 7 {
        return Ok(Verdict::Open);
    }
    // Come odds are off on the come-out roll.
    if side == OddsSide::Pass && base == OddsBase::Come && ctx.phase == Phase::ComeOut {
        return Ok(Verdict::Push);
    }
    let won = match side {
        OddsSide::Pass => total == point,
        OddsSide::DontPass => total == 7,
    };
    if won {
        Ok(Verdict::Win(multiplier(PayoutTable::odds(side, point), bet)?))
    } else {
        Ok(Verdict::Loss)
    }
}

fn bonus(bet: &Bet, ctx: &RollContext<'_>, bonus: Bonus) -> Result<Verdict, GameError> {
    let seven_out = ctx.event == PhaseEvent::SevenOut;
    let verdict = match bonus {
        Bonus::Fire => {
            if ctx.after.distinct_points() == 6 && ctx.before.distinct_points() < 6 {
                Verdict::Win(multiplier(PayoutTable::fire(6), bet)?)
            } else if seven_out {
                settle_tier(PayoutTable::fire(ctx.before.distinct_points()))
            } else {
                Verdict::Open
            }
        }
        Bonus::RideTheLine => {
            if ctx.pass_line_won()
                && ctx.after.pass_line_streak() >= PayoutTable::RIDE_THE_LINE_TOP_STREAK
            {
                Verdict::Win(PayoutTable::RIDE_THE_LINE_TOP)
            } else if ctx.pass_line_lost() {
                settle_tier(PayoutTable::ride_the_line(ctx.before.pass_line_streak()))
            } else {
                Verdict::Open
            }
        }
        Bonus::HotRoller => {
            if seven_out {
                settle_tier(PayoutTable::hot_roller(ctx.before.points_made()))
            } else {
                Verdict::Open
            }
        }
        Bonus::DifferentDoubles => {
            if ctx.after.distinct_doubles() == 6 && ctx.before.distinct_doubles() < 6 {
                Verdict::Win(multiplier(PayoutTable::different_doubles(6), bet)?)
            } else if seven_out {
                settle_tier(PayoutTable::different_doubles(
                    ctx.before.distinct_doubles(),
                ))
            } else {
                Verdict::Open
            }
        }
        Bonus::Small => coverage(ctx.after.small_complete(), PayoutTable::SMALL, ctx.roll),
        Bonus::Tall => coverage(ctx.after.tall_complete(), PayoutTable::TALL, ctx.roll),
        Bonus::All => coverage(ctx.after.all_complete(), PayoutTable::ALL, ctx.roll),
        Bonus::Muggsy => match (ctx.phase, ctx.event) {
            (Phase::ComeOut, PhaseEvent::Natural) if ctx.roll.is_seven() => {
                Verdict::Win(PayoutTable::MUGGSY_COME_OUT_SEVEN)
            }
            (Phase::ComeOut, PhaseEvent::Natural | PhaseEvent::Craps) => Verdict::Loss,
            (Phase::Point, PhaseEvent::SevenOut) => Verdict::Win(PayoutTable::MUGGSY_SEVEN_OUT),
            (Phase::Point, PhaseEvent::PointMade(_)) => Verdict::Loss,
            _ => Verdict::Open,
        },
        Bonus::TwiceHard => {
            let total = ctx.total();
            if ctx.roll.is_seven() {
                Verdict::Loss
            } else if ctx.roll.is_double() && HARDWAY_NUMBERS.contains(&total) {
                if bet.point == Some(total) {
                    Verdict::Win(PayoutTable::TWICE_HARD)
                } else {
                    Verdict::Update(Bet {
                        point: Some(total),
                        ..*bet
                    })
                }
            } else if bet.point.is_some() {
                Verdict::Update(Bet {
                    point: None,
                    ..*bet
                })
            } else {
                Verdict::Open
            }
        }
        Bonus::Replay => {
            if seven_out {
                let best = ctx
                    .before
                    .made_points()
                    .filter_map(|p| PayoutTable::replay(p, ctx.before.times_made(p)))
                    .max();
                settle_tier(best)
            } else {
                Verdict::Open
            }
        }
    };
    Ok(verdict)
}

/// Win at the qualifying tier, or lose if nothing qualified.
fn settle_tier(multiplier: Option<u64>) -> Verdict {
    match multiplier {
        Some(multiplier) => Verdict::Win(multiplier),
        None => Verdict::Loss,
    }
}

/// Small / Tall / All: win once the range is covered, lose on any 7 before that.
fn coverage(complete: bool, multiplier: u64, roll: Roll) -> Verdict {
    if complete {
        Verdict::Win(multiplier)
    } else if roll.is_seven() {
        Verdict::Loss
    } else {
        Verdict::Open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roll(d1: u8, d2: u8) -> Roll {
        Roll::new(d1, d2).unwrap()
    }

    fn bet(kind: BetKind, stake: u64) -> Bet {
        Bet::new(0, 1, kind, stake, None)
    }

    fn decide(bet: &Bet, roll: Roll, phase: Phase, point: Option<u8>) -> SettlementOutcome {
        let progress = ShooterProgress::new();
        let ctx = RollContext::new(roll, phase, point, &progress).unwrap();
        settle(bet, &ctx).unwrap().outcome
    }

    #[test]
    fn test_pass_and_dont_pass_come_out() {
        let pass = bet(BetKind::PassLine, 100);
        let dont = bet(BetKind::DontPass, 100);
        let cases = [
            ((3, 4), SettlementOutcome::Win(100), SettlementOutcome::Loss),
            ((5, 6), SettlementOutcome::Win(100), SettlementOutcome::Loss),
            ((1, 1), SettlementOutcome::Loss, SettlementOutcome::Win(100)),
            ((1, 2), SettlementOutcome::Loss, SettlementOutcome::Win(100)),
            ((6, 6), SettlementOutcome::Loss, SettlementOutcome::Push(100)),
            (
                (2, 2),
                SettlementOutcome::StillActive,
                SettlementOutcome::StillActive,
            ),
        ];
        for ((d1, d2), pass_outcome, dont_outcome) in cases {
            let r = roll(d1, d2);
            assert_eq!(decide(&pass, r, Phase::ComeOut, None), pass_outcome);
            assert_eq!(decide(&dont, r, Phase::ComeOut, None), dont_outcome);
        }
    }

    #[test]
    fn test_line_during_point() {
        let pass = bet(BetKind::PassLine, 100);
        let dont = bet(BetKind::DontPass, 100);
        assert_eq!(
            decide(&pass, roll(4, 4), Phase::Point, Some(8)),
            SettlementOutcome::Win(100)
        );
        assert_eq!(
            decide(&dont, roll(4, 4), Phase::Point, Some(8)),
            SettlementOutcome::Loss
        );
        assert_eq!(
            decide(&pass, roll(3, 4), Phase::Point, Some(8)),
            SettlementOutcome::Loss
        );
        assert_eq!(
            decide(&dont, roll(3, 4), Phase::Point, Some(8)),
            SettlementOutcome::Win(100)
        );
        // 11 and 12 are no-decision once a point is up.
        assert_eq!(
            decide(&pass, roll(5, 6), Phase::Point, Some(8)),
            SettlementOutcome::StillActive
        );
        assert_eq!(
            decide(&dont, roll(6, 6), Phase::Point, Some(8)),
            SettlementOutcome::StillActive
        );
    }

    #[test]
    fn test_field_stake_100() {
        let field = bet(BetKind::Field, 100);
        let expected = |total: u8| match total {
            2 => SettlementOutcome::Win(200),
            12 => SettlementOutcome::Win(300),
            3 | 4 | 9 | 10 | 11 => SettlementOutcome::Win(100),
            _ => SettlementOutcome::Loss,
        };
        for d1 in 1..=6 {
            for d2 in 1..=6 {
                let r = roll(d1, d2);
                assert_eq!(
                    decide(&field, r, Phase::ComeOut, None),
                    expected(r.total())
                );
            }
        }
    }

    #[test]
    fn test_come_bet_travels() {
        let come = bet(BetKind::Come, 100);
        let progress = ShooterProgress::new();
        let ctx = RollContext::new(roll(2, 3), Phase::Point, Some(8), &progress).unwrap();
        let decision = settle(&come, &ctx).unwrap();
        assert_eq!(decision.outcome, SettlementOutcome::StillActive);
        assert_eq!(decision.bet.point, Some(5));

        // Travelled come bet wins on its own number, not the main point.
        let travelled = decision.bet;
        assert_eq!(
            decide(&travelled, roll(4, 1), Phase::Point, Some(8)),
            SettlementOutcome::Win(100)
        );
        assert_eq!(
            decide(&travelled, roll(4, 4), Phase::Point, Some(8)),
            SettlementOutcome::StillActive
        );
        assert_eq!(
            decide(&travelled, roll(4, 3), Phase::Point, Some(8)),
            SettlementOutcome::Loss
        );
    }

    #[test]
    fn test_come_bet_natural_on_seven_out() {
        let come = bet(BetKind::Come, 100);
        let dont_come = bet(BetKind::DontCome, 100);
        assert_eq!(
            decide(&come, roll(3, 4), Phase::Point, Some(6)),
            SettlementOutcome::Win(100)
        );
        assert_eq!(
            decide(&dont_come, roll(6, 6), Phase::Point, Some(6)),
            SettlementOutcome::Push(100)
        );
    }

    #[test]
    fn test_hardway() {
        let hard_eight = bet(BetKind::Hardway(8), 100);
        assert_eq!(
            decide(&hard_eight, roll(4, 4), Phase::Point, Some(6)),
            SettlementOutcome::Win(900)
        );
        assert_eq!(
            decide(&hard_eight, roll(5, 3), Phase::Point, Some(6)),
            SettlementOutcome::Loss
        );
        assert_eq!(
            decide(&hard_eight, roll(3, 4), Phase::Point, Some(6)),
            SettlementOutcome::Loss
        );
        assert_eq!(
            decide(&hard_eight, roll(3, 3), Phase::Point, Some(6)),
            SettlementOutcome::StillActive
        );
    }

    #[test]
    fn test_yes_and_no() {
        let yes = bet(BetKind::Yes(4), 100);
        let no = bet(BetKind::No(4), 100);
        assert_eq!(
            decide(&yes, roll(1, 3), Phase::Point, Some(6)),
            SettlementOutcome::Win(198)
        );
        assert_eq!(
            decide(&no, roll(1, 3), Phase::Point, Some(6)),
            SettlementOutcome::Loss
        );
        assert_eq!(
            decide(&yes, roll(2, 5), Phase::Point, Some(6)),
            SettlementOutcome::Loss
        );
        assert_eq!(
            decide(&no, roll(2, 5), Phase::Point, Some(6)),
            SettlementOutcome::Win(49)
        );
        assert_eq!(
            decide(&yes, roll(2, 6), Phase::Point, Some(6)),
            SettlementOutcome::StillActive
        );
    }

    #[test]
    fn test_line_odds() {
        let pass_odds = Bet::new(
            0,
            1,
            BetKind::Odds {
                side: OddsSide::Pass,
                base: OddsBase::Line,
            },
            100,
            Some(4),
        );
        let lay_odds = Bet::new(
            1,
            1,
            BetKind::Odds {
                side: OddsSide::DontPass,
                base: OddsBase::Line,
            },
            100,
            Some(4),
        );
        assert_eq!(
            decide(&pass_odds, roll(2, 2), Phase::Point, Some(4)),
            SettlementOutcome::Win(200)
        );
        assert_eq!(
            decide(&lay_odds, roll(2, 2), Phase::Point, Some(4)),
            SettlementOutcome::Loss
        );
        assert_eq!(
            decide(&pass_odds, roll(6, 1), Phase::Point, Some(4)),
            SettlementOutcome::Loss
        );
        assert_eq!(
            decide(&lay_odds, roll(6, 1), Phase::Point, Some(4)),
            SettlementOutcome::Win(50)
        );
    }

    #[test]
    fn test_come_odds_off_on_come_out() {
        let come_odds = Bet::new(
            0,
            1,
            BetKind::Odds {
                side: OddsSide::Pass,
                base: OddsBase::Come,
            },
            100,
            Some(9),
        );
        assert_eq!(
            decide(&come_odds, roll(4, 5), Phase::ComeOut, None),
            SettlementOutcome::Push(100)
        );
        assert_eq!(
            decide(&come_odds, roll(3, 4), Phase::ComeOut, None),
            SettlementOutcome::Push(100)
        );
        assert_eq!(
            decide(&come_odds, roll(4, 5), Phase::Point, Some(6)),
            SettlementOutcome::Win(150)
        );
    }

    #[test]
    fn test_next_bets() {
        let seven = bet(BetKind::Next(crapsline_types::NextTarget::AnySeven), 100);
        let eleven = bet(BetKind::Next(crapsline_types::NextTarget::Total(11)), 100);
        assert_eq!(
            decide(&seven, roll(1, 6), Phase::ComeOut, None),
            SettlementOutcome::Win(400)
        );
        assert_eq!(
            decide(&eleven, roll(5, 6), Phase::ComeOut, None),
            SettlementOutcome::Win(1683)
        );
        assert_eq!(
            decide(&eleven, roll(1, 6), Phase::ComeOut, None),
            SettlementOutcome::Loss
        );
    }

    #[test]
    fn test_repeater_counts_hits() {
        let mut repeater = bet(BetKind::Repeater(3), 10);
        let progress = ShooterProgress::new();
        for expected_hits in 1..3 {
            let ctx = RollContext::new(roll(1, 2), Phase::ComeOut, None, &progress).unwrap();
            let decision = settle(&repeater, &ctx).unwrap();
            assert_eq!(decision.outcome, SettlementOutcome::StillActive);
            assert_eq!(decision.bet.hits, expected_hits);
            repeater = decision.bet;
        }
        let ctx = RollContext::new(roll(2, 1), Phase::ComeOut, None, &progress).unwrap();
        assert_eq!(
            settle(&repeater, &ctx).unwrap().outcome,
            SettlementOutcome::Win(500)
        );
    }

    #[test]
    fn test_overflowing_win_is_an_error() {
        let hard = bet(BetKind::Hardway(4), u64::MAX / 2);
        let progress = ShooterProgress::new();
        let ctx = RollContext::new(roll(2, 2), Phase::Point, Some(6), &progress).unwrap();
        assert_eq!(settle(&hard, &ctx), Err(GameError::ArithmeticOverflow));
    }

    #[test]
    fn test_twice_hard_arms_and_disarms() {
        let twice = bet(BetKind::Bonus(Bonus::TwiceHard), 10);
        let progress = ShooterProgress::new();

        let ctx = RollContext::new(roll(3, 3), Phase::Point, Some(5), &progress).unwrap();
        let armed = settle(&twice, &ctx).unwrap().bet;
        assert_eq!(armed.point, Some(6));

        // A different non-seven roll disarms.
        let ctx = RollContext::new(roll(1, 3), Phase::Point, Some(5), &progress).unwrap();
        let disarmed = settle(&armed, &ctx).unwrap();
        assert_eq!(disarmed.outcome, SettlementOutcome::StillActive);
        assert_eq!(disarmed.bet.point, None);

        // The same hard number twice in a row wins.
        let ctx = RollContext::new(roll(3, 3), Phase::Point, Some(5), &progress).unwrap();
        assert_eq!(
            settle(&armed, &ctx).unwrap().outcome,
            SettlementOutcome::Win(500)
        );
    }

    #[test]
    fn test_muggsy() {
        let muggsy = bet(BetKind::Bonus(Bonus::Muggsy), 100);
        assert_eq!(
            decide(&muggsy, roll(3, 4), Phase::ComeOut, None),
            SettlementOutcome::Win(200)
        );
        assert_eq!(
            decide(&muggsy, roll(5, 6), Phase::ComeOut, None),
            SettlementOutcome::Loss
        );
        assert_eq!(
            decide(&muggsy, roll(2, 2), Phase::ComeOut, None),
            SettlementOutcome::StillActive
        );
        assert_eq!(
            decide(&muggsy, roll(3, 4), Phase::Point, Some(4)),
            SettlementOutcome::Win(300)
        );
        assert_eq!(
            decide(&muggsy, roll(1, 3), Phase::Point, Some(4)),
            SettlementOutcome::Loss
        );
    }
}
