//! Canonical payout table.
//!
//! Every multiplier is in hundredths of the stake (100 = 1:1) and describes winnings only; the
//! stake itself is returned on top.

use super::GameError;
use crapsline_types::craps::MULTIPLIER_BASIS;
use crapsline_types::{BetKind, Bonus, NextTarget, OddsSide};

/// Index of the symmetric pair a box number belongs to: 2/12, 3/11, 4/10, 5/9, 6/8.
fn pair(number: u8) -> Option<usize> {
    match number {
        2 | 12 => Some(0),
        3 | 11 => Some(1),
        4 | 10 => Some(2),
        5 | 9 => Some(3),
        6 | 8 => Some(4),
        _ => None,
    }
}

/// Static multiplier lookup for every bet family.
pub struct PayoutTable;

impl PayoutTable {
    /// Pass Line, Don't Pass, Come and Don't Come.
    pub const LINE: u64 = 100;

    // True odds less 1% of winnings, by pair.
    const YES: [u64; 5] = [594, 297, 198, 148, 118];
    const NO: [u64; 5] = [16, 33, 49, 66, 82];
    const NEXT_TOTAL: [u64; 5] = [3465, 1683, 1089, 792, 594];

    const REPEATER: [u64; 5] = [4000, 5000, 6500, 8000, 9000];
    const REPEATER_TARGET: [u8; 5] = [2, 3, 4, 5, 6];

    pub const NEXT_ANY_SEVEN: u64 = 400;
    pub const NEXT_ANY_CRAPS: u64 = 700;

    // Indexed by streak - 3 (3..=10); 11+ pays RIDE_THE_LINE_TOP.
    const RIDE_THE_LINE: [u64; 8] = [100, 200, 300, 500, 700, 1000, 2000, 5000];
    pub const RIDE_THE_LINE_TOP: u64 = 15000;
    pub const RIDE_THE_LINE_TOP_STREAK: u16 = 11;

    pub const SMALL: u64 = 3400;
    pub const TALL: u64 = 3400;
    pub const ALL: u64 = 17500;

    pub const MUGGSY_COME_OUT_SEVEN: u64 = 200;
    pub const MUGGSY_SEVEN_OUT: u64 = 300;

    pub const TWICE_HARD: u64 = 5000;

    pub fn field(total: u8) -> Option<u64> {
        match total {
            2 => Some(200),
            12 => Some(300),
            3 | 4 | 9 | 10 | 11 => Some(100),
            _ => None,
        }
    }

    pub fn yes(number: u8) -> Option<u64> {
        pair(number).map(|i| Self::YES[i])
    }

    pub fn no(number: u8) -> Option<u64> {
        pair(number).map(|i| Self::NO[i])
    }

    pub fn hardway(number: u8) -> Option<u64> {
        match number {
            4 | 10 => Some(700),
            6 | 8 => Some(900),
            _ => None,
        }
    }

    /// True odds behind a line or come bet on `point`.
    pub fn odds(side: OddsSide, point: u8) -> Option<u64> {
        match (side, point) {
            (OddsSide::Pass, 4 | 10) => Some(200),
            (OddsSide::Pass, 5 | 9) => Some(150),
            (OddsSide::Pass, 6 | 8) => Some(120),
            (OddsSide::DontPass, 4 | 10) => Some(50),
            (OddsSide::DontPass, 5 | 9) => Some(67),
            (OddsSide::DontPass, 6 | 8) => Some(83),
            _ => None,
        }
    }

    pub fn next(target: NextTarget) -> Option<u64> {
        match target {
            NextTarget::AnySeven => Some(Self::NEXT_ANY_SEVEN),
            NextTarget::AnyCraps => Some(Self::NEXT_ANY_CRAPS),
            NextTarget::Total(n) => pair(n).map(|i| Self::NEXT_TOTAL[i]),
        }
    }

    pub fn repeater(number: u8) -> Option<u64> {
        pair(number).map(|i| Self::REPEATER[i])
    }

    /// Hits on `number` a Repeater bet needs before a 7.
    pub fn repeater_target(number: u8) -> Option<u8> {
        pair(number).map(|i| Self::REPEATER_TARGET[i])
    }

    /// Fire pays on 4, 5 or 6 distinct points made.
    pub fn fire(distinct_points: usize) -> Option<u64> {
        match distinct_points {
            4 => Some(3900),
            5 => Some(24900),
            6 => Some(99900),
            _ => None,
        }
    }

    pub fn ride_the_line(streak: u16) -> Option<u64> {
        match streak {
            0..=2 => None,
            3..=10 => Some(Self::RIDE_THE_LINE[(streak - 3) as usize]),
            _ => Some(Self::RIDE_THE_LINE_TOP),
        }
    }

    pub fn hot_roller(points_made: u8) -> Option<u64> {
        match points_made {
            0 | 1 => None,
            2 => Some(200),
            3 => Some(400),
            4 => Some(900),
            5 => Some(1900),
            _ => Some(4900),
        }
    }

    pub fn different_doubles(distinct: usize) -> Option<u64> {
        match distinct {
            3 => Some(400),
            4 => Some(800),
            5 => Some(1500),
            6 => Some(10000),
            _ => None,
        }
    }

    /// Highest multiplier `kind` can ever pay, or `None` for an invalid number.
    pub fn max_multiplier(kind: BetKind) -> Option<u64> {
        match kind {
            BetKind::PassLine | BetKind::DontPass | BetKind::Come | BetKind::DontCome => {
                Some(Self::LINE)
            }
            BetKind::Field => Self::field(12),
            BetKind::Yes(n) => Self::yes(n),
            BetKind::No(n) => Self::no(n),
            BetKind::Hardway(n) => Self::hardway(n),
            BetKind::Odds { side, .. } => [4, 5, 6]
                .into_iter()
                .filter_map(|point| Self::odds(side, point))
                .max(),
            BetKind::Next(target) => Self::next(target),
            BetKind::Repeater(n) => Self::repeater(n),
            BetKind::Bonus(bonus) => match bonus {
                Bonus::Fire => Self::fire(6),
                Bonus::RideTheLine => Some(Self::RIDE_THE_LINE_TOP),
                Bonus::HotRoller => Self::hot_roller(u8::MAX),
                Bonus::DifferentDoubles => Self::different_doubles(6),
                Bonus::Small => Some(Self::SMALL),
                Bonus::Tall => Some(Self::TALL),
                Bonus::All => Some(Self::ALL),
                Bonus::Muggsy => Some(Self::MUGGSY_COME_OUT_SEVEN.max(Self::MUGGSY_SEVEN_OUT)),
                Bonus::TwiceHard => Some(Self::TWICE_HARD),
                Bonus::Replay => [4, 5, 6]
                    .into_iter()
                    .filter_map(|point| Self::replay(point, u8::MAX))
                    .max(),
            },
        }
    }

    /// Replay pays when a point was made at least three times.
    pub fn replay(point: u8, times_made: u8) -> Option<u64> {
        match (point, times_made) {
            (_, 0..=2) => None,
            (4 | 10, 3) => Some(12000),
            (4 | 10, _) => Some(100000),
            (5 | 9, 3) => Some(9500),
            (5 | 9, _) => Some(50000),
            (6 | 8, 3) => Some(7000),
            (6 | 8, _) => Some(10000),
            _ => None,
        }
    }
}

/// Winnings for `stake` at `multiplier` hundredths, rounded down.
///
/// Fails if the winnings, or the stake plus winnings, do not fit in a u64.
pub fn winnings(stake: u64, multiplier: u64) -> Result<u64, GameError> {
    let wide = (stake as u128) * (multiplier as u128) / (MULTIPLIER_BASIS as u128);
    let winnings = u64::try_from(wide).map_err(|_| GameError::ArithmeticOverflow)?;
    stake
        .checked_add(winnings)
        .ok_or(GameError::ArithmeticOverflow)?;
    Ok(winnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_payouts() {
        assert_eq!(PayoutTable::field(2), Some(200));
        assert_eq!(PayoutTable::field(12), Some(300));
        for total in [3, 4, 9, 10, 11] {
            assert_eq!(PayoutTable::field(total), Some(100));
        }
        for total in [5, 6, 7, 8] {
            assert_eq!(PayoutTable::field(total), None);
        }
    }

    #[test]
    fn test_symmetric_numbers_pay_alike() {
        for (low, high) in [(2, 12), (3, 11), (4, 10), (5, 9), (6, 8)] {
            assert_eq!(PayoutTable::yes(low), PayoutTable::yes(high));
            assert_eq!(PayoutTable::no(low), PayoutTable::no(high));
            assert_eq!(
                PayoutTable::next(NextTarget::Total(low)),
                PayoutTable::next(NextTarget::Total(high))
            );
            assert_eq!(PayoutTable::repeater(low), PayoutTable::repeater(high));
        }
        assert_eq!(PayoutTable::yes(7), None);
        assert_eq!(PayoutTable::repeater_target(7), None);
    }

    #[test]
    fn test_yes_is_true_odds_less_commission() {
        // 4 pays 2:1, less 1% of the winnings.
        assert_eq!(winnings(100, PayoutTable::yes(4).unwrap()).unwrap(), 198);
        // 6 pays 6:5 less 1%: 118.8 rounds down.
        assert_eq!(winnings(100, PayoutTable::yes(6).unwrap()).unwrap(), 118);
    }

    #[test]
    fn test_odds_true_odds() {
        assert_eq!(PayoutTable::odds(OddsSide::Pass, 4), Some(200));
        assert_eq!(PayoutTable::odds(OddsSide::Pass, 9), Some(150));
        assert_eq!(PayoutTable::odds(OddsSide::Pass, 8), Some(120));
        assert_eq!(PayoutTable::odds(OddsSide::DontPass, 10), Some(50));
        assert_eq!(PayoutTable::odds(OddsSide::DontPass, 5), Some(67));
        assert_eq!(PayoutTable::odds(OddsSide::DontPass, 6), Some(83));
        assert_eq!(PayoutTable::odds(OddsSide::Pass, 7), None);
    }

    #[test]
    fn test_progressive_tiers() {
        assert_eq!(PayoutTable::fire(3), None);
        assert_eq!(PayoutTable::fire(4), Some(3900));
        assert_eq!(PayoutTable::fire(6), Some(99900));

        assert_eq!(PayoutTable::ride_the_line(2), None);
        assert_eq!(PayoutTable::ride_the_line(3), Some(100));
        assert_eq!(PayoutTable::ride_the_line(10), Some(5000));
        assert_eq!(PayoutTable::ride_the_line(11), Some(15000));
        assert_eq!(PayoutTable::ride_the_line(40), Some(15000));

        assert_eq!(PayoutTable::hot_roller(1), None);
        assert_eq!(PayoutTable::hot_roller(2), Some(200));
        assert_eq!(PayoutTable::hot_roller(9), Some(4900));

        assert_eq!(PayoutTable::different_doubles(2), None);
        assert_eq!(PayoutTable::different_doubles(6), Some(10000));

        assert_eq!(PayoutTable::replay(4, 2), None);
        assert_eq!(PayoutTable::replay(4, 3), Some(12000));
        assert_eq!(PayoutTable::replay(10, 5), Some(100000));
        assert_eq!(PayoutTable::replay(8, 4), Some(10000));
        assert_eq!(PayoutTable::replay(7, 4), None);
    }

    #[test]
    fn test_max_multiplier() {
        assert_eq!(PayoutTable::max_multiplier(BetKind::PassLine), Some(100));
        assert_eq!(PayoutTable::max_multiplier(BetKind::Field), Some(300));
        assert_eq!(PayoutTable::max_multiplier(BetKind::Yes(2)), Some(594));
        assert_eq!(PayoutTable::max_multiplier(BetKind::Hardway(8)), Some(900));
        assert_eq!(PayoutTable::max_multiplier(BetKind::Hardway(5)), None);
        assert_eq!(
            PayoutTable::max_multiplier(BetKind::Odds {
                side: OddsSide::DontPass,
                base: crapsline_types::OddsBase::Come,
            }),
            Some(83)
        );
        assert_eq!(
            PayoutTable::max_multiplier(BetKind::Bonus(Bonus::Fire)),
            Some(99900)
        );
        assert_eq!(
            PayoutTable::max_multiplier(BetKind::Bonus(Bonus::HotRoller)),
            Some(4900)
        );
        assert_eq!(
            PayoutTable::max_multiplier(BetKind::Bonus(Bonus::Replay)),
            Some(100000)
        );
        assert_eq!(
            PayoutTable::max_multiplier(BetKind::Bonus(Bonus::Muggsy)),
            Some(300)
        );

        // Every payout a bet can see is bounded by its maximum.
        for point in [4, 5, 6, 8, 9, 10] {
            for times in 3..6 {
                assert!(
                    PayoutTable::replay(point, times).unwrap()
                        <= PayoutTable::max_multiplier(BetKind::Bonus(Bonus::Replay)).unwrap()
                );
            }
            assert!(
                PayoutTable::odds(OddsSide::Pass, point).unwrap()
                    <= PayoutTable::max_multiplier(BetKind::Odds {
                        side: OddsSide::Pass,
                        base: crapsline_types::OddsBase::Line,
                    })
                    .unwrap()
            );
        }
        for streak in 0..20 {
            if let Some(multiplier) = PayoutTable::ride_the_line(streak) {
                assert!(multiplier <= PayoutTable::RIDE_THE_LINE_TOP);
            }
        }
    }

    #[test]
    fn test_winnings_rounds_down() {
        assert_eq!(winnings(1, 150).unwrap(), 1);
        assert_eq!(winnings(3, 67).unwrap(), 2);
        assert_eq!(winnings(0, 99900).unwrap(), 0);
    }

    #[test]
    fn test_winnings_overflow() {
        // Winnings exceed u64.
        assert_eq!(
            winnings(u64::MAX, 99900),
            Err(GameError::ArithmeticOverflow)
        );
        // Winnings fit but stake + winnings does not.
        assert_eq!(winnings(u64::MAX, 100), Err(GameError::ArithmeticOverflow));
        // Largest stake whose 1:1 return still fits.
        assert_eq!(winnings(u64::MAX / 2, 100).unwrap(), u64::MAX / 2);
    }
}
