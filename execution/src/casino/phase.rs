//! Come-out / point state machine.

use super::GameError;
use crapsline_types::craps::is_point;
use crapsline_types::{Phase, PhaseEvent};
use serde::{Deserialize, Serialize};

/// What a series does after a seven-out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SevenOutPolicy {
    /// A new shooter comes out immediately.
    #[default]
    NewShooter,
    /// The series waits for an explicit shooter start.
    Idle,
}

/// Classifies `total` against the phase and point in force before the roll.
pub fn classify(phase: Phase, point: Option<u8>, total: u8) -> Result<PhaseEvent, GameError> {
    match (phase, point) {
        (Phase::ComeOut, None) => Ok(match total {
            7 | 11 => PhaseEvent::Natural,
            2 | 3 | 12 => PhaseEvent::Craps,
            n if is_point(n) => PhaseEvent::PointEstablished(n),
            n => {
                return Err(GameError::InconsistentProgressState(format!(
                    "impossible total {n}"
                )))
            }
        }),
        (Phase::Point, Some(p)) if is_point(p) => Ok(if total == p {
            PhaseEvent::PointMade(p)
        } else if total == 7 {
            PhaseEvent::SevenOut
        } else {
            PhaseEvent::None
        }),
        (phase, point) => Err(GameError::InconsistentProgressState(format!(
            "phase {phase} with point {point:?}"
        ))),
    }
}

/// Phase and point after `event`.
pub fn transition(
    event: PhaseEvent,
    phase: Phase,
    point: Option<u8>,
    policy: SevenOutPolicy,
) -> (Phase, Option<u8>) {
    match event {
        PhaseEvent::PointEstablished(p) => (Phase::Point, Some(p)),
        PhaseEvent::PointMade(_) => (Phase::ComeOut, None),
        PhaseEvent::SevenOut => match policy {
            SevenOutPolicy::NewShooter => (Phase::ComeOut, None),
            SevenOutPolicy::Idle => (Phase::Idle, None),
        },
        PhaseEvent::Natural | PhaseEvent::Craps | PhaseEvent::None => (phase, point),
    }
}
