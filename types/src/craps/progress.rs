use super::{point_index, total_index, Roll, POINTS, SMALL_TOTALS, TALL_TOTALS, TOTALS};
use bytes::{Buf, BufMut};
use commonware_codec::{Error, FixedSize, Read, ReadExt, Write};
use thiserror::Error as ThisError;

/// Invariant violations detected while advancing [ShooterProgress].
#[derive(Clone, Copy, Debug, PartialEq, Eq, ThisError)]
pub enum ProgressError {
    #[error("point {0} is not a point number")]
    InvalidPoint(u8),
}

/// Everything a shooter has accumulated since coming out for the first time.
///
/// Sets are kept as fixed arrays indexed by legal values ([POINTS] for points made, die faces
/// for doubles, totals 2..=12 for coverage and hits). Apart from the pass-line streak, which
/// drops to zero on any pass-line loss, every field only grows until the shooter is replaced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShooterProgress {
    points_made: u8,
    made_points: [bool; 6],
    point_counts: [u8; 6],
    doubles: [bool; 6],
    coverage: [bool; TOTALS],
    pass_line_streak: u16,
    hits: [u8; TOTALS],
    rolls: u32,
}

impl ShooterProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the progress after `roll`, thrown while `point` was established (`None` on a
    /// come-out roll).
    pub fn apply_roll(&self, roll: Roll, point: Option<u8>) -> Result<Self, ProgressError> {
        let mut next = self.clone();
        let total = roll.total();
        next.rolls = next.rolls.saturating_add(1);

        if let Some(idx) = total_index(total) {
            next.hits[idx] = next.hits[idx].saturating_add(1);
            if total != 7 {
                next.coverage[idx] = true;
            }
        }
        if roll.is_double() {
            next.doubles[(roll.die1() - 1) as usize] = true;
        }

        match point {
            None => match total {
                7 | 11 => next.pass_line_streak = next.pass_line_streak.saturating_add(1),
                2 | 3 | 12 => next.pass_line_streak = 0,
                _ => {}
            },
            Some(point) => {
                let idx = point_index(point).ok_or(ProgressError::InvalidPoint(point))?;
                if total == point {
                    next.points_made = next.points_made.saturating_add(1);
                    next.made_points[idx] = true;
                    next.point_counts[idx] = next.point_counts[idx].saturating_add(1);
                    next.pass_line_streak = next.pass_line_streak.saturating_add(1);
                } else if total == 7 {
                    next.pass_line_streak = 0;
                }
            }
        }
        Ok(next)
    }

    /// Rebuilds the current shooter's progress from an ordered roll history.
    ///
    /// Returns the progress and the point established after the last roll. A seven-out starts
    /// a fresh shooter.
    pub fn replay(
        rolls: impl IntoIterator<Item = Roll>,
    ) -> Result<(Self, Option<u8>), ProgressError> {
        let mut progress = Self::default();
        let mut point = None;
        for roll in rolls {
            let total = roll.total();
            match point {
                None => {
                    progress = progress.apply_roll(roll, None)?;
                    if super::is_point(total) {
                        point = Some(total);
                    }
                }
                Some(p) => {
                    if total == 7 {
                        progress = Self::default();
                        point = None;
                    } else {
                        progress = progress.apply_roll(roll, Some(p))?;
                        if total == p {
                            point = None;
                        }
                    }
                }
            }
        }
        Ok((progress, point))
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn rolls(&self) -> u32 {
        self.rolls
    }

    pub fn points_made(&self) -> u8 {
        self.points_made
    }

    /// Number of distinct point numbers made.
    pub fn distinct_points(&self) -> usize {
        self.made_points.iter().filter(|made| **made).count()
    }

    pub fn has_made_point(&self, point: u8) -> bool {
        point_index(point).is_some_and(|idx| self.made_points[idx])
    }

    /// Times `point` has been made by this shooter.
    pub fn times_made(&self, point: u8) -> u8 {
        point_index(point).map_or(0, |idx| self.point_counts[idx])
    }

    /// Point numbers made at least once, in [POINTS] order.
    pub fn made_points(&self) -> impl Iterator<Item = u8> + '_ {
        POINTS
            .iter()
            .zip(self.made_points.iter())
            .filter(|(_, made)| **made)
            .map(|(point, _)| *point)
    }

    pub fn distinct_doubles(&self) -> usize {
        self.doubles.iter().filter(|seen| **seen).count()
    }

    /// True if `face`-`face` has been rolled.
    pub fn has_double(&self, face: u8) -> bool {
        (1..=6).contains(&face) && self.doubles[(face - 1) as usize]
    }

    pub fn covers(&self, total: u8) -> bool {
        total_index(total).is_some_and(|idx| self.coverage[idx])
    }

    pub fn small_complete(&self) -> bool {
        SMALL_TOTALS.iter().all(|t| self.covers(*t))
    }

    pub fn tall_complete(&self) -> bool {
        TALL_TOTALS.iter().all(|t| self.covers(*t))
    }

    pub fn all_complete(&self) -> bool {
        self.small_complete() && self.tall_complete()
    }

    pub fn pass_line_streak(&self) -> u16 {
        self.pass_line_streak
    }

    /// Times `total` has been rolled by this shooter.
    pub fn hits(&self, total: u8) -> u8 {
        total_index(total).map_or(0, |idx| self.hits[idx])
    }

    /// True if every set and counter in `earlier` is contained in `self` (the streak excepted).
    pub fn extends(&self, earlier: &ShooterProgress) -> bool {
        fn superset(now: &[bool], then: &[bool]) -> bool {
            now.iter().zip(then).all(|(now, then)| *now || !*then)
        }
        fn grown(now: &[u8], then: &[u8]) -> bool {
            now.iter().zip(then).all(|(now, then)| now >= then)
        }
        self.points_made >= earlier.points_made
            && self.rolls >= earlier.rolls
            && superset(&self.made_points, &earlier.made_points)
            && superset(&self.doubles, &earlier.doubles)
            && superset(&self.coverage, &earlier.coverage)
            && grown(&self.point_counts, &earlier.point_counts)
            && grown(&self.hits, &earlier.hits)
    }
}

fn pack(flags: &[bool]) -> u16 {
    flags
        .iter()
        .enumerate()
        .fold(0u16, |mask, (i, set)| if *set { mask | (1 << i) } else { mask })
}

fn unpack<const N: usize>(mask: u16) -> Result<[bool; N], Error> {
    if mask >> N != 0 {
        return Err(Error::Invalid("ShooterProgress", "mask bit out of range"));
    }
    let mut flags = [false; N];
    for (i, flag) in flags.iter_mut().enumerate() {
        *flag = mask & (1 << i) != 0;
    }
    Ok(flags)
}

impl Write for ShooterProgress {
    fn write(&self, writer: &mut impl BufMut) {
        self.points_made.write(writer);
        (pack(&self.made_points) as u8).write(writer);
        for count in &self.point_counts {
            count.write(writer);
        }
        (pack(&self.doubles) as u8).write(writer);
        pack(&self.coverage).write(writer);
        self.pass_line_streak.write(writer);
        for hits in &self.hits {
            hits.write(writer);
        }
        self.rolls.write(writer);
    }
}

impl Read for ShooterProgress {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let points_made = u8::read(reader)?;
        let made_points = unpack::<6>(u8::read(reader)? as u16)?;
        let mut point_counts = [0u8; 6];
        for count in point_counts.iter_mut() {
            *count = u8::read(reader)?;
        }
        let doubles = unpack::<6>(u8::read(reader)? as u16)?;
        let coverage = unpack::<TOTALS>(u16::read(reader)?)?;
        let pass_line_streak = u16::read(reader)?;
        let mut hits = [0u8; TOTALS];
        for count in hits.iter_mut() {
            *count = u8::read(reader)?;
        }
        let rolls = u32::read(reader)?;

        // 7 never counts toward coverage.
        if total_index(7).is_some_and(|idx| coverage[idx]) {
            return Err(Error::Invalid("ShooterProgress", "seven in coverage"));
        }
        if made_points
            .iter()
            .zip(point_counts.iter())
            .any(|(made, count)| *made != (*count > 0))
        {
            return Err(Error::Invalid("ShooterProgress", "point set disagrees with counts"));
        }
        if (points_made as usize) < made_points.iter().filter(|m| **m).count() {
            return Err(Error::Invalid("ShooterProgress", "fewer points than distinct points"));
        }

        Ok(Self {
            points_made,
            made_points,
            point_counts,
            doubles,
            coverage,
            pass_line_streak,
            hits,
            rolls,
        })
    }
}

impl FixedSize for ShooterProgress {
    const SIZE: usize = u8::SIZE
        + u8::SIZE
        + 6 * u8::SIZE
        + u8::SIZE
        + u16::SIZE
        + u16::SIZE
        + TOTALS * u8::SIZE
        + u32::SIZE;
}
