use super::is_point;
use bytes::{Buf, BufMut};
use commonware_codec::{Error, FixedSize, Read, ReadExt, Write};
use std::fmt;
use thiserror::Error as ThisError;

/// Errors constructing a [Roll].
#[derive(Clone, Copy, Debug, PartialEq, Eq, ThisError)]
pub enum RollError {
    #[error("die value {0} is outside 1..=6")]
    DieOutOfRange(u8),
}

/// A single throw of two dice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Roll {
    die1: u8,
    die2: u8,
}

impl Roll {
    pub fn new(die1: u8, die2: u8) -> Result<Self, RollError> {
        for die in [die1, die2] {
            if !(1..=6).contains(&die) {
                return Err(RollError::DieOutOfRange(die));
            }
        }
        Ok(Self { die1, die2 })
    }

    pub fn die1(&self) -> u8 {
        self.die1
    }

    pub fn die2(&self) -> u8 {
        self.die2
    }

    pub fn total(&self) -> u8 {
        self.die1 + self.die2
    }

    pub fn is_double(&self) -> bool {
        self.die1 == self.die2
    }

    /// True if this roll is `number` made with a pair (e.g. hard 8 is 4+4).
    pub fn is_hard(&self, number: u8) -> bool {
        self.is_double() && self.total() == number
    }

    /// True if this roll is `number` made with unequal dice.
    pub fn is_easy(&self, number: u8) -> bool {
        !self.is_double() && self.total() == number
    }

    pub fn is_seven(&self) -> bool {
        self.total() == 7
    }
}

impl fmt::Display for Roll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}", self.die1, self.die2)
    }
}

impl Write for Roll {
    fn write(&self, writer: &mut impl BufMut) {
        self.die1.write(writer);
        self.die2.write(writer);
    }
}

impl Read for Roll {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let die1 = u8::read(reader)?;
        let die2 = u8::read(reader)?;
        Self::new(die1, die2).map_err(|_| Error::Invalid("Roll", "die out of range"))
    }
}

impl FixedSize for Roll {
    const SIZE: usize = 2;
}

/// Phase of a series.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// No shooter is active.
    Idle = 0,
    /// No point is established.
    ComeOut = 1,
    /// A point is established.
    Point = 2,
}

impl Phase {
    /// Checks that `point` agrees with this phase.
    pub fn accepts(&self, point: Option<u8>) -> bool {
        match (self, point) {
            (Phase::Point, Some(p)) => is_point(p),
            (Phase::Point, None) => false,
            (_, None) => true,
            (_, Some(_)) => false,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::ComeOut => "come_out",
            Phase::Point => "point",
        };
        f.write_str(name)
    }
}

impl Write for Phase {
    fn write(&self, writer: &mut impl BufMut) {
        (*self as u8).write(writer);
    }
}

impl Read for Phase {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let value = u8::read(reader)?;
        match value {
            0 => Ok(Self::Idle),
            1 => Ok(Self::ComeOut),
            2 => Ok(Self::Point),
            i => Err(Error::InvalidEnum(i)),
        }
    }
}

impl FixedSize for Phase {
    const SIZE: usize = 1;
}
