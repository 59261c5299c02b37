//! Compact text renderings of roll reports for structured log fields.

use crapsline_types::{RollReport, Settlement, SettlementOutcome};
use std::fmt::Write;

pub fn clamp_i64(value: i128) -> i64 {
    value.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

/// Net result of a settlement for the player: winnings on a win, minus the stake on a loss.
pub fn net_result(settlement: &Settlement) -> i64 {
    match settlement.outcome {
        SettlementOutcome::Win(winnings) => clamp_i64(winnings as i128),
        SettlementOutcome::Loss => clamp_i64(-(settlement.stake as i128)),
        SettlementOutcome::Push(_) | SettlementOutcome::StillActive => 0,
    }
}

pub fn push_resolved_entry(out: &mut String, settlement: &Settlement) {
    if !out.is_empty() {
        out.push(',');
    }
    let _ = write!(
        out,
        r#"{{"bet":{},"kind":"{}","net":{}}}"#,
        settlement.bet_id,
        settlement.kind,
        net_result(settlement)
    );
}

/// JSON array of every bet the roll took off the layout.
pub fn format_resolved(report: &RollReport) -> String {
    let mut out = String::new();
    for settlement in report.resolved() {
        push_resolved_entry(&mut out, settlement);
    }
    format!("[{out}]")
}

/// Sum of [net_result] over the roll.
pub fn net_for_roll(report: &RollReport) -> i64 {
    let total: i128 = report
        .settlements
        .iter()
        .map(|s| net_result(s) as i128)
        .sum();
    clamp_i64(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crapsline_types::{BetKind, Bonus, Phase, PhaseEvent, Roll};

    fn settlement(bet_id: u64, kind: BetKind, outcome: SettlementOutcome) -> Settlement {
        Settlement {
            bet_id,
            player: 1,
            kind,
            stake: 100,
            outcome,
        }
    }

    #[test]
    fn test_format_resolved() {
        let report = RollReport {
            series: 0,
            shooter: 1,
            roll_number: 1,
            roll: Roll::new(3, 4).unwrap(),
            phase_before: Phase::ComeOut,
            point_before: None,
            phase: Phase::ComeOut,
            point: None,
            event: PhaseEvent::Natural,
            settlements: vec![
                settlement(0, BetKind::PassLine, SettlementOutcome::Win(100)),
                settlement(1, BetKind::DontPass, SettlementOutcome::Loss),
                settlement(2, BetKind::Bonus(Bonus::Fire), SettlementOutcome::StillActive),
            ],
        };
        assert_eq!(
            format_resolved(&report),
            r#"[{"bet":0,"kind":"pass_line","net":100},{"bet":1,"kind":"dont_pass","net":-100}]"#
        );
        assert_eq!(net_for_roll(&report), 0);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp_i64(i128::MAX), i64::MAX);
        assert_eq!(clamp_i64(-5), -5);
    }
}
