use super::{is_box_number, is_point, HARDWAY_NUMBERS};
use bytes::{Buf, BufMut};
use commonware_codec::{Error, FixedSize, Read, ReadExt, Write};
use std::{fmt, str::FromStr};
use thiserror::Error as ThisError;

/// Identifier of a bet within its series.
pub type BetId = u64;

/// Identifier of the player owning a bet.
pub type PlayerId = u64;

/// Which side of the line an odds bet backs.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OddsSide {
    /// Backs Pass Line or Come: the point before a 7.
    Pass = 0,
    /// Lays behind Don't Pass or Don't Come: a 7 before the point.
    DontPass = 1,
}

/// Which contract bet an odds bet sits behind.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OddsBase {
    /// The main point (Pass Line / Don't Pass).
    Line = 0,
    /// A travelled Come / Don't Come point.
    Come = 1,
}

/// Progressive and side bets that read shooter progress.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Bonus {
    Fire = 0,
    RideTheLine = 1,
    HotRoller = 2,
    DifferentDoubles = 3,
    Small = 4,
    Tall = 5,
    All = 6,
    Muggsy = 7,
    TwiceHard = 8,
    Replay = 9,
}

impl Bonus {
    pub const ALL: [Bonus; 10] = [
        Bonus::Fire,
        Bonus::RideTheLine,
        Bonus::HotRoller,
        Bonus::DifferentDoubles,
        Bonus::Small,
        Bonus::Tall,
        Bonus::All,
        Bonus::Muggsy,
        Bonus::TwiceHard,
        Bonus::Replay,
    ];

    fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    /// Bonus bets that accumulate over the whole shooter and must be placed before the first roll.
    pub fn tracks_shooter(&self) -> bool {
        !matches!(self, Bonus::Muggsy | Bonus::TwiceHard)
    }

    fn label(&self) -> &'static str {
        match self {
            Bonus::Fire => "fire",
            Bonus::RideTheLine => "ride_the_line",
            Bonus::HotRoller => "hot_roller",
            Bonus::DifferentDoubles => "different_doubles",
            Bonus::Small => "small",
            Bonus::Tall => "tall",
            Bonus::All => "all",
            Bonus::Muggsy => "muggsy",
            Bonus::TwiceHard => "twice_hard",
            Bonus::Replay => "replay",
        }
    }
}

/// Target of a one-roll proposition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NextTarget {
    AnySeven,
    /// 2, 3 or 12.
    AnyCraps,
    /// A specific total other than 7.
    Total(u8),
}

impl NextTarget {
    pub fn hits(&self, total: u8) -> bool {
        match self {
            NextTarget::AnySeven => total == 7,
            NextTarget::AnyCraps => matches!(total, 2 | 3 | 12),
            NextTarget::Total(n) => *n == total,
        }
    }
}

/// Every bet the table offers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BetKind {
    PassLine,
    DontPass,
    Come,
    DontCome,
    Field,
    /// Number before seven.
    Yes(u8),
    /// Seven before number.
    No(u8),
    Hardway(u8),
    Odds { side: OddsSide, base: OddsBase },
    Bonus(Bonus),
    Next(NextTarget),
    Repeater(u8),
}

impl BetKind {
    const TAG_PASS_LINE: u8 = 0;
    const TAG_DONT_PASS: u8 = 1;
    const TAG_COME: u8 = 2;
    const TAG_DONT_COME: u8 = 3;
    const TAG_FIELD: u8 = 4;
    const TAG_YES: u8 = 5;
    const TAG_NO: u8 = 6;
    const TAG_HARDWAY: u8 = 7;
    const TAG_ODDS: u8 = 8;
    const TAG_BONUS: u8 = 9;
    const TAG_NEXT: u8 = 10;
    const TAG_REPEATER: u8 = 11;

    /// Checks the number carried by the variant.
    pub fn is_valid(&self) -> bool {
        match self {
            BetKind::Yes(n) | BetKind::No(n) | BetKind::Repeater(n) => is_box_number(*n),
            BetKind::Hardway(n) => HARDWAY_NUMBERS.contains(n),
            BetKind::Next(NextTarget::Total(n)) => is_box_number(*n),
            _ => true,
        }
    }

    /// Pass Line, Don't Pass, Come and Don't Come.
    pub fn is_contract(&self) -> bool {
        matches!(
            self,
            BetKind::PassLine | BetKind::DontPass | BetKind::Come | BetKind::DontCome
        )
    }

    /// Bets decided by the very next roll regardless of outcome.
    pub fn is_one_roll(&self) -> bool {
        matches!(self, BetKind::Field | BetKind::Next(_))
    }

    fn tag(&self) -> u8 {
        match self {
            BetKind::PassLine => Self::TAG_PASS_LINE,
            BetKind::DontPass => Self::TAG_DONT_PASS,
            BetKind::Come => Self::TAG_COME,
            BetKind::DontCome => Self::TAG_DONT_COME,
            BetKind::Field => Self::TAG_FIELD,
            BetKind::Yes(_) => Self::TAG_YES,
            BetKind::No(_) => Self::TAG_NO,
            BetKind::Hardway(_) => Self::TAG_HARDWAY,
            BetKind::Odds { .. } => Self::TAG_ODDS,
            BetKind::Bonus(_) => Self::TAG_BONUS,
            BetKind::Next(_) => Self::TAG_NEXT,
            BetKind::Repeater(_) => Self::TAG_REPEATER,
        }
    }

    fn param(&self) -> u8 {
        match self {
            BetKind::Yes(n) | BetKind::No(n) | BetKind::Hardway(n) | BetKind::Repeater(n) => *n,
            BetKind::Odds { side, base } => ((*side as u8) << 1) | *base as u8,
            BetKind::Bonus(bonus) => *bonus as u8,
            BetKind::Next(NextTarget::AnyCraps) => 0,
            BetKind::Next(NextTarget::AnySeven) => 7,
            BetKind::Next(NextTarget::Total(n)) => *n,
            _ => 0,
        }
    }

    fn from_parts(tag: u8, param: u8) -> Result<Self, Error> {
        let kind = match tag {
            Self::TAG_PASS_LINE => BetKind::PassLine,
            Self::TAG_DONT_PASS => BetKind::DontPass,
            Self::TAG_COME => BetKind::Come,
            Self::TAG_DONT_COME => BetKind::DontCome,
            Self::TAG_FIELD => BetKind::Field,
            Self::TAG_YES => BetKind::Yes(param),
            Self::TAG_NO => BetKind::No(param),
            Self::TAG_HARDWAY => BetKind::Hardway(param),
            Self::TAG_ODDS => {
                let side = match param >> 1 {
                    0 => OddsSide::Pass,
                    1 => OddsSide::DontPass,
                    _ => return Err(Error::Invalid("BetKind", "invalid odds side")),
                };
                let base = if param & 1 == 0 {
                    OddsBase::Line
                } else {
                    OddsBase::Come
                };
                BetKind::Odds { side, base }
            }
            Self::TAG_BONUS => {
                BetKind::Bonus(Bonus::from_u8(param).ok_or(Error::InvalidEnum(param))?)
            }
            Self::TAG_NEXT => BetKind::Next(match param {
                0 => NextTarget::AnyCraps,
                7 => NextTarget::AnySeven,
                n => NextTarget::Total(n),
            }),
            Self::TAG_REPEATER => BetKind::Repeater(param),
            i => return Err(Error::InvalidEnum(i)),
        };
        if !kind.is_valid() {
            return Err(Error::Invalid("BetKind", "invalid number"));
        }
        // Fixed-number kinds carry no parameter.
        if kind.param() != param {
            return Err(Error::Invalid("BetKind", "unexpected parameter"));
        }
        Ok(kind)
    }
}

impl Write for BetKind {
    fn write(&self, writer: &mut impl BufMut) {
        self.tag().write(writer);
        self.param().write(writer);
    }
}

impl Read for BetKind {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let tag = u8::read(reader)?;
        let param = u8::read(reader)?;
        Self::from_parts(tag, param)
    }
}

impl FixedSize for BetKind {
    const SIZE: usize = 2;
}

impl fmt::Display for BetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BetKind::PassLine => f.write_str("pass_line"),
            BetKind::DontPass => f.write_str("dont_pass"),
            BetKind::Come => f.write_str("come"),
            BetKind::DontCome => f.write_str("dont_come"),
            BetKind::Field => f.write_str("field"),
            BetKind::Yes(n) => write!(f, "yes:{n}"),
            BetKind::No(n) => write!(f, "no:{n}"),
            BetKind::Hardway(n) => write!(f, "hardway:{n}"),
            BetKind::Odds { side, base } => {
                let side = match side {
                    OddsSide::Pass => "pass",
                    OddsSide::DontPass => "dont_pass",
                };
                let base = match base {
                    OddsBase::Line => "line",
                    OddsBase::Come => "come",
                };
                write!(f, "odds:{side}:{base}")
            }
            BetKind::Bonus(bonus) => f.write_str(bonus.label()),
            BetKind::Next(NextTarget::AnySeven) => f.write_str("next:any_seven"),
            BetKind::Next(NextTarget::AnyCraps) => f.write_str("next:any_craps"),
            BetKind::Next(NextTarget::Total(n)) => write!(f, "next:{n}"),
            BetKind::Repeater(n) => write!(f, "repeater:{n}"),
        }
    }
}

/// Error parsing a [BetKind] from its label.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("unknown bet kind: {0}")]
pub struct ParseBetKindError(pub String);

impl FromStr for BetKind {
    type Err = ParseBetKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseBetKindError(s.to_string());
        let mut parts = s.split(':');
        let head = parts.next().ok_or_else(err)?;
        let arg = parts.next();
        let extra = parts.next();
        let number = |arg: Option<&str>| -> Result<u8, ParseBetKindError> {
            arg.and_then(|a| a.parse::<u8>().ok()).ok_or_else(err)
        };

        let kind = match (head, arg) {
            ("pass_line", None) => BetKind::PassLine,
            ("dont_pass", None) => BetKind::DontPass,
            ("come", None) => BetKind::Come,
            ("dont_come", None) => BetKind::DontCome,
            ("field", None) => BetKind::Field,
            ("yes", arg) => BetKind::Yes(number(arg)?),
            ("no", arg) => BetKind::No(number(arg)?),
            ("hardway", arg) => BetKind::Hardway(number(arg)?),
            ("repeater", arg) => BetKind::Repeater(number(arg)?),
            ("next", Some("any_seven")) => BetKind::Next(NextTarget::AnySeven),
            ("next", Some("any_craps")) => BetKind::Next(NextTarget::AnyCraps),
            ("next", arg) => BetKind::Next(NextTarget::Total(number(arg)?)),
            ("odds", Some(side)) => {
                let side = match side {
                    "pass" => OddsSide::Pass,
                    "dont_pass" => OddsSide::DontPass,
                    _ => return Err(err()),
                };
                let base = match extra {
                    Some("line") => OddsBase::Line,
                    Some("come") => OddsBase::Come,
                    _ => return Err(err()),
                };
                return Ok(BetKind::Odds { side, base });
            }
            (label, None) => BetKind::Bonus(
                Bonus::ALL
                    .iter()
                    .copied()
                    .find(|b| b.label() == label)
                    .ok_or_else(err)?,
            ),
            _ => return Err(err()),
        };
        if extra.is_some() || !kind.is_valid() {
            return Err(err());
        }
        Ok(kind)
    }
}

/// Writes an optional point as a single byte (0 = none).
fn write_point(point: Option<u8>, writer: &mut impl BufMut) {
    point.unwrap_or(0).write(writer);
}

fn read_point(reader: &mut impl Buf, ty: &'static str) -> Result<Option<u8>, Error> {
    match u8::read(reader)? {
        0 => Ok(None),
        p if is_point(p) => Ok(Some(p)),
        _ => Err(Error::Invalid(ty, "invalid point")),
    }
}

/// A request to place a bet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Wager {
    pub player: PlayerId,
    pub kind: BetKind,
    pub stake: u64,
    /// The come point an odds bet sits behind (ignored for other kinds).
    pub point: Option<u8>,
}

impl Wager {
    pub fn new(player: PlayerId, kind: BetKind, stake: u64) -> Self {
        Self {
            player,
            kind,
            stake,
            point: None,
        }
    }

    pub fn at_point(mut self, point: u8) -> Self {
        self.point = Some(point);
        self
    }
}

impl Write for Wager {
    fn write(&self, writer: &mut impl BufMut) {
        self.player.write(writer);
        self.kind.write(writer);
        self.stake.write(writer);
        write_point(self.point, writer);
    }
}

impl Read for Wager {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            player: PlayerId::read(reader)?,
            kind: BetKind::read(reader)?,
            stake: u64::read(reader)?,
            point: read_point(reader, "Wager")?,
        })
    }
}

impl FixedSize for Wager {
    const SIZE: usize = u64::SIZE + BetKind::SIZE + u64::SIZE + u8::SIZE;
}

/// A bet on the layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bet {
    pub id: BetId,
    pub player: PlayerId,
    pub kind: BetKind,
    pub stake: u64,
    /// Point for odds, travelled point for come bets, armed number for Twice Hard.
    pub point: Option<u8>,
    /// Repeater hits counted since placement.
    pub hits: u8,
    pub active: bool,
}

impl Bet {
    pub fn new(id: BetId, player: PlayerId, kind: BetKind, stake: u64, point: Option<u8>) -> Self {
        Self {
            id,
            player,
            kind,
            stake,
            point,
            hits: 0,
            active: true,
        }
    }
}

impl Write for Bet {
    fn write(&self, writer: &mut impl BufMut) {
        self.id.write(writer);
        self.player.write(writer);
        self.kind.write(writer);
        self.stake.write(writer);
        write_point(self.point, writer);
        self.hits.write(writer);
        self.active.write(writer);
    }
}

impl Read for Bet {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            id: BetId::read(reader)?,
            player: PlayerId::read(reader)?,
            kind: BetKind::read(reader)?,
            stake: u64::read(reader)?,
            point: read_point(reader, "Bet")?,
            hits: u8::read(reader)?,
            active: bool::read(reader)?,
        })
    }
}

impl FixedSize for Bet {
    const SIZE: usize =
        u64::SIZE + u64::SIZE + BetKind::SIZE + u64::SIZE + u8::SIZE + u8::SIZE + bool::SIZE;
}
