//! Many independent series behind one set of rules.

use super::series::{Series, TableRules};
use super::{GameError, RandomnessSource};
use commonware_codec::{DecodeExt, Error as CodecError};
use crapsline_types::{Bet, BetId, Roll, RollReport, ShooterProgress, Wager};
#[cfg(feature = "parallel")]
use rayon::{prelude::*, ThreadPool};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Handle to a series on a [Table].
pub type SeriesHandle = u64;

/// Owns every live series. Series never share state, so batches can be processed in parallel.
pub struct Table {
    rules: TableRules,
    next_series: SeriesHandle,
    series: BTreeMap<SeriesHandle, Series>,
}

impl Table {
    pub fn new(rules: TableRules) -> Self {
        Self {
            rules,
            next_series: 0,
            series: BTreeMap::new(),
        }
    }

    pub fn rules(&self) -> &TableRules {
        &self.rules
    }

    /// Opens a series with its first shooter coming out.
    pub fn start_series(&mut self) -> SeriesHandle {
        let handle = self.next_series;
        self.next_series += 1;
        self.series
            .insert(handle, Series::with_shooter(handle, self.rules));
        info!(series = handle, "series started");
        handle
    }

    pub fn series(&self, handle: SeriesHandle) -> Result<&Series, GameError> {
        self.series
            .get(&handle)
            .ok_or(GameError::UnknownSeries(handle))
    }

    fn series_mut(&mut self, handle: SeriesHandle) -> Result<&mut Series, GameError> {
        self.series
            .get_mut(&handle)
            .ok_or(GameError::UnknownSeries(handle))
    }

    pub fn place_bet(&mut self, handle: SeriesHandle, wager: Wager) -> Result<BetId, GameError> {
        self.series_mut(handle)?.place_bet(wager)
    }

    /// Places a bet from its wire encoding.
    ///
    /// Unknown bet families and bonuses are [GameError::UnknownBetCategory]; any other decode
    /// failure (truncation, bad number, bad point) is [GameError::MalformedWager].
    pub fn place_encoded_bet(
        &mut self,
        handle: SeriesHandle,
        encoded: &[u8],
    ) -> Result<BetId, GameError> {
        let wager = Wager::decode(encoded).map_err(|err| {
            warn!(series = handle, error = %err, "undecodable wager");
            match err {
                CodecError::InvalidEnum(_) => GameError::UnknownBetCategory,
                err => GameError::MalformedWager(err.to_string()),
            }
        })?;
        self.place_bet(handle, wager)
    }

    pub fn apply_roll(
        &mut self,
        handle: SeriesHandle,
        roll: Roll,
    ) -> Result<RollReport, GameError> {
        self.series_mut(handle)?.apply_roll(roll)
    }

    /// Draws the next roll for a series from `source` and applies it.
    pub fn roll(
        &mut self,
        handle: SeriesHandle,
        source: &mut impl RandomnessSource,
    ) -> Result<RollReport, GameError> {
        let series = self.series_mut(handle)?;
        let roll_number = series
            .rolls()
            .checked_add(1)
            .ok_or(GameError::ArithmeticOverflow)?;
        let roll = source.next_roll(handle, roll_number)?;
        series.apply_roll(roll)
    }

    /// Snapshot of the current shooter's progress.
    pub fn progress(&self, handle: SeriesHandle) -> Result<ShooterProgress, GameError> {
        Ok(self.series(handle)?.progress().clone())
    }

    pub fn active_bets(&self, handle: SeriesHandle) -> Result<&[Bet], GameError> {
        Ok(self.series(handle)?.active_bets())
    }

    pub fn start_shooter(&mut self, handle: SeriesHandle) -> Result<(), GameError> {
        self.series_mut(handle)?.start_shooter()
    }

    pub fn rotate_shooter(&mut self, handle: SeriesHandle) -> Result<(), GameError> {
        self.series_mut(handle)?.rotate_shooter()
    }

    /// Closes a series with no bets on the layout and returns its final progress.
    pub fn end_series(&mut self, handle: SeriesHandle) -> Result<ShooterProgress, GameError> {
        let series = self.series(handle)?;
        if !series.active_bets().is_empty() {
            return Err(GameError::ShooterBusy(handle));
        }
        let series = self
            .series
            .remove(&handle)
            .ok_or(GameError::UnknownSeries(handle))?;
        info!(
            series = handle,
            shooters = series.shooter(),
            rolls = series.rolls(),
            "series ended"
        );
        Ok(series.progress().clone())
    }

    /// Applies a batch of rolls spanning many series.
    ///
    /// Rolls for the same series are applied in batch order. Results are returned in batch
    /// order; a failed roll does not stop later rolls.
    pub fn apply_rolls(
        &mut self,
        #[cfg(feature = "parallel")] pool: &ThreadPool,
        batch: &[(SeriesHandle, Roll)],
    ) -> Vec<Result<RollReport, GameError>> {
        let mut grouped: BTreeMap<SeriesHandle, Vec<(usize, Roll)>> = BTreeMap::new();
        for (index, (handle, roll)) in batch.iter().enumerate() {
            grouped.entry(*handle).or_default().push((index, *roll));
        }

        let mut work = Vec::with_capacity(grouped.len());
        for (handle, series) in self.series.iter_mut() {
            if let Some(rolls) = grouped.remove(handle) {
                work.push((series, rolls));
            }
        }

        let process = |(series, rolls): (&mut Series, Vec<(usize, Roll)>)| {
            rolls
                .into_iter()
                .map(|(index, roll)| (index, series.apply_roll(roll)))
                .collect::<Vec<_>>()
        };
        #[cfg(feature = "parallel")]
        let outputs: Vec<Vec<_>> = pool.install(|| work.into_par_iter().map(process).collect());
        #[cfg(not(feature = "parallel"))]
        let outputs: Vec<Vec<_>> = work.into_iter().map(process).collect();

        let mut results: Vec<Option<Result<RollReport, GameError>>> =
            (0..batch.len()).map(|_| None).collect();
        for (index, result) in outputs.into_iter().flatten() {
            results[index] = Some(result);
        }
        // Whatever is left named an unknown series
        for (handle, rolls) in grouped {
            for (index, _) in rolls {
                results[index] = Some(Err(GameError::UnknownSeries(handle)));
            }
        }
        results
            .into_iter()
            .zip(batch)
            .map(|(result, (handle, _))| {
                result.unwrap_or(Err(GameError::UnknownSeries(*handle)))
            })
            .collect()
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new(TableRules::default())
    }
}
