use super::{is_point, Phase, Roll, Settlement, MAX_SETTLEMENTS_PER_ROLL};
use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, FixedSize, Read, ReadExt, ReadRangeExt, Write};

/// How a roll moved the line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseEvent {
    /// The line is unchanged: a box number other than the point.
    None,
    /// Come-out 7 or 11.
    Natural,
    /// Come-out 2, 3 or 12.
    Craps,
    PointEstablished(u8),
    PointMade(u8),
    SevenOut,
}

impl PhaseEvent {
    const TAG_NONE: u8 = 0;
    const TAG_NATURAL: u8 = 1;
    const TAG_CRAPS: u8 = 2;
    const TAG_POINT_ESTABLISHED: u8 = 3;
    const TAG_POINT_MADE: u8 = 4;
    const TAG_SEVEN_OUT: u8 = 5;

    /// True if the shooter is done.
    pub fn ends_shooter(&self) -> bool {
        matches!(self, PhaseEvent::SevenOut)
    }
}

impl Write for PhaseEvent {
    fn write(&self, writer: &mut impl BufMut) {
        match self {
            PhaseEvent::None => Self::TAG_NONE.write(writer),
            PhaseEvent::Natural => Self::TAG_NATURAL.write(writer),
            PhaseEvent::Craps => Self::TAG_CRAPS.write(writer),
            PhaseEvent::PointEstablished(point) => {
                Self::TAG_POINT_ESTABLISHED.write(writer);
                point.write(writer);
            }
            PhaseEvent::PointMade(point) => {
                Self::TAG_POINT_MADE.write(writer);
                point.write(writer);
            }
            PhaseEvent::SevenOut => Self::TAG_SEVEN_OUT.write(writer),
        }
    }
}

impl Read for PhaseEvent {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        match u8::read(reader)? {
            Self::TAG_NONE => Ok(PhaseEvent::None),
            Self::TAG_NATURAL => Ok(PhaseEvent::Natural),
            Self::TAG_CRAPS => Ok(PhaseEvent::Craps),
            Self::TAG_POINT_ESTABLISHED => {
                Ok(PhaseEvent::PointEstablished(read_event_point(reader)?))
            }
            Self::TAG_POINT_MADE => Ok(PhaseEvent::PointMade(read_event_point(reader)?)),
            Self::TAG_SEVEN_OUT => Ok(PhaseEvent::SevenOut),
            i => Err(Error::InvalidEnum(i)),
        }
    }
}

fn read_event_point(reader: &mut impl Buf) -> Result<u8, Error> {
    let point = u8::read(reader)?;
    if !is_point(point) {
        return Err(Error::Invalid("PhaseEvent", "invalid point"));
    }
    Ok(point)
}

impl EncodeSize for PhaseEvent {
    fn encode_size(&self) -> usize {
        match self {
            PhaseEvent::PointEstablished(_) | PhaseEvent::PointMade(_) => u8::SIZE + u8::SIZE,
            _ => u8::SIZE,
        }
    }
}

/// Everything that happened on one roll of one series.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RollReport {
    pub series: u64,
    pub shooter: u32,
    /// 1-based roll number within the series (not reset between shooters).
    pub roll_number: u32,
    pub roll: Roll,
    pub phase_before: Phase,
    pub point_before: Option<u8>,
    pub phase: Phase,
    pub point: Option<u8>,
    pub event: PhaseEvent,
    /// One entry per bet that was active before the roll, in placement order.
    pub settlements: Vec<Settlement>,
}

impl RollReport {
    /// Sum of winnings across every winning settlement.
    pub fn total_winnings(&self) -> Option<u64> {
        self.settlements.iter().try_fold(0u64, |acc, s| match s.outcome {
            super::SettlementOutcome::Win(w) => acc.checked_add(w),
            _ => Some(acc),
        })
    }

    /// Settlements that took the bet off the layout.
    pub fn resolved(&self) -> impl Iterator<Item = &Settlement> {
        self.settlements.iter().filter(|s| s.outcome.is_terminal())
    }
}

fn write_point(point: Option<u8>, writer: &mut impl BufMut) {
    point.unwrap_or(0).write(writer);
}

fn read_point(reader: &mut impl Buf) -> Result<Option<u8>, Error> {
    match u8::read(reader)? {
        0 => Ok(None),
        p if is_point(p) => Ok(Some(p)),
        _ => Err(Error::Invalid("RollReport", "invalid point")),
    }
}

impl Write for RollReport {
    fn write(&self, writer: &mut impl BufMut) {
        self.series.write(writer);
        self.shooter.write(writer);
        self.roll_number.write(writer);
        self.roll.write(writer);
        self.phase_before.write(writer);
        write_point(self.point_before, writer);
        self.phase.write(writer);
        write_point(self.point, writer);
        self.event.write(writer);
        self.settlements.write(writer);
    }
}

impl Read for RollReport {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let series = u64::read(reader)?;
        let shooter = u32::read(reader)?;
        let roll_number = u32::read(reader)?;
        let roll = Roll::read(reader)?;
        let phase_before = Phase::read(reader)?;
        let point_before = read_point(reader)?;
        let phase = Phase::read(reader)?;
        let point = read_point(reader)?;
        if !phase_before.accepts(point_before) || !phase.accepts(point) {
            return Err(Error::Invalid("RollReport", "point disagrees with phase"));
        }
        let event = PhaseEvent::read(reader)?;
        let settlements = Vec::<Settlement>::read_range(reader, 0..=MAX_SETTLEMENTS_PER_ROLL)?;
        Ok(Self {
            series,
            shooter,
            roll_number,
            roll,
            phase_before,
            point_before,
            phase,
            point,
            event,
            settlements,
        })
    }
}

impl EncodeSize for RollReport {
    fn encode_size(&self) -> usize {
        self.series.encode_size()
            + self.shooter.encode_size()
            + self.roll_number.encode_size()
            + Roll::SIZE
            + Phase::SIZE
            + u8::SIZE
            + Phase::SIZE
            + u8::SIZE
            + self.event.encode_size()
            + self.settlements.encode_size()
    }
}
