use super::{BetId, BetKind, PlayerId};
use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, FixedSize, Read, ReadExt, Write};

/// Decision for one bet on one roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettlementOutcome {
    /// Bet won. Value is the winnings, excluding the returned stake.
    Win(u64),
    Loss,
    /// Bet pushed. Value is the returned stake.
    Push(u64),
    /// Bet stays on the layout.
    StillActive,
}

impl SettlementOutcome {
    const TAG_WIN: u8 = 0;
    const TAG_LOSS: u8 = 1;
    const TAG_PUSH: u8 = 2;
    const TAG_STILL_ACTIVE: u8 = 3;

    /// True once the bet leaves the layout.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SettlementOutcome::StillActive)
    }

    /// Amount owed back to the player for a bet of `stake` (stake + winnings on a win).
    ///
    /// Returns `None` if the sum is not representable.
    pub fn credit(&self, stake: u64) -> Option<u64> {
        match self {
            SettlementOutcome::Win(winnings) => stake.checked_add(*winnings),
            SettlementOutcome::Push(returned) => Some(*returned),
            SettlementOutcome::Loss | SettlementOutcome::StillActive => Some(0),
        }
    }
}

impl Write for SettlementOutcome {
    fn write(&self, writer: &mut impl BufMut) {
        match self {
            SettlementOutcome::Win(amount) => {
                Self::TAG_WIN.write(writer);
                amount.write(writer);
            }
            SettlementOutcome::Loss => Self::TAG_LOSS.write(writer),
            SettlementOutcome::Push(amount) => {
                Self::TAG_PUSH.write(writer);
                amount.write(writer);
            }
            SettlementOutcome::StillActive => Self::TAG_STILL_ACTIVE.write(writer),
        }
    }
}

impl Read for SettlementOutcome {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        match u8::read(reader)? {
            Self::TAG_WIN => Ok(SettlementOutcome::Win(u64::read(reader)?)),
            Self::TAG_LOSS => Ok(SettlementOutcome::Loss),
            Self::TAG_PUSH => Ok(SettlementOutcome::Push(u64::read(reader)?)),
            Self::TAG_STILL_ACTIVE => Ok(SettlementOutcome::StillActive),
            i => Err(Error::InvalidEnum(i)),
        }
    }
}

impl EncodeSize for SettlementOutcome {
    fn encode_size(&self) -> usize {
        match self {
            SettlementOutcome::Win(_) | SettlementOutcome::Push(_) => u8::SIZE + u64::SIZE,
            SettlementOutcome::Loss | SettlementOutcome::StillActive => u8::SIZE,
        }
    }
}

/// Settlement record handed to accounting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub bet_id: BetId,
    pub player: PlayerId,
    pub kind: BetKind,
    pub stake: u64,
    pub outcome: SettlementOutcome,
}

impl Write for Settlement {
    fn write(&self, writer: &mut impl BufMut) {
        self.bet_id.write(writer);
        self.player.write(writer);
        self.kind.write(writer);
        self.stake.write(writer);
        self.outcome.write(writer);
    }
}

impl Read for Settlement {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            bet_id: BetId::read(reader)?,
            player: PlayerId::read(reader)?,
            kind: BetKind::read(reader)?,
            stake: u64::read(reader)?,
            outcome: SettlementOutcome::read(reader)?,
        })
    }
}

impl EncodeSize for Settlement {
    fn encode_size(&self) -> usize {
        self.bet_id.encode_size()
            + self.player.encode_size()
            + self.kind.encode_size()
            + self.stake.encode_size()
            + self.outcome.encode_size()
    }
}
