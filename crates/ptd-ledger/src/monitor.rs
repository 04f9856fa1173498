//! Stop-loss / target monitor.
//!
//! [`scan`] walks the open positions, marks each with the caller-supplied
//! price source and force-closes every position whose mark breaches its
//! stop-loss or target. Positions with no usable mark fall back to their
//! average price, which can never trigger (the thresholds are strict on the
//! wrong side of the average by construction of a sane order).
//!
//! The scan is a pure function of the account and the marks: running it twice
//! with unchanged marks closes nothing the second time, because every
//! triggered position was already removed by the first pass.

use chrono::{DateTime, Utc};

use crate::account::Account;
use crate::types::Position;

/// Whether a marked price breaches a position's exit thresholds.
///
/// A threshold of 0 is disabled. Stop-loss wins when both thresholds would
/// fire on the same mark.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TriggerState {
    None,
    StopLossHit,
    TargetHit,
}

impl TriggerState {
    pub fn is_triggered(&self) -> bool {
        !matches!(self, TriggerState::None)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerState::None => "-",
            TriggerState::StopLossHit => "SL HIT",
            TriggerState::TargetHit => "TARGET HIT",
        }
    }
}

/// Evaluate a position's thresholds against a marked price.
pub fn trigger_state(pos: &Position, price_micros: i64) -> TriggerState {
    if pos.stop_loss_micros > 0 && price_micros <= pos.stop_loss_micros {
        TriggerState::StopLossHit
    } else if pos.target_micros > 0 && price_micros >= pos.target_micros {
        TriggerState::TargetHit
    } else {
        TriggerState::None
    }
}

/// One forced close performed by a scan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AutoExit {
    pub symbol: String,
    pub qty: i64,
    pub price_micros: i64,
    pub net_pnl_micros: i64,
    pub trigger: TriggerState,
}

/// What one scan pass did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Positions closed this pass, in symbol order.
    pub exits: Vec<AutoExit>,
    /// Symbols whose mark source returned nothing (marked at average price).
    pub unmarked: Vec<String>,
}

impl ScanReport {
    pub fn closed(&self) -> usize {
        self.exits.len()
    }
}

/// Scan every open position and auto-exit the triggered ones in full.
///
/// `marks` maps a symbol to its latest price in micros; `None` marks the
/// position at its own average price instead (and records the symbol in
/// [`ScanReport::unmarked`]). Triggered positions close at the marked price
/// through the same settlement path as a manual exit, journaled as
/// `AUTO-EXIT`.
pub fn scan<F>(account: &mut Account, now: DateTime<Utc>, marks: F) -> ScanReport
where
    F: Fn(&str) -> Option<i64>,
{
    // Decide first, mutate after: the decision pass only needs a shared
    // borrow, and BTreeMap iteration keeps the exit order deterministic.
    let mut decisions: Vec<(String, i64, i64, TriggerState)> = Vec::new();
    let mut unmarked = Vec::new();
    for (symbol, pos) in account.positions() {
        let mark = match marks(symbol) {
            Some(px) if px > 0 => px,
            _ => {
                unmarked.push(symbol.clone());
                pos.avg_price_micros
            }
        };
        let trigger = trigger_state(pos, mark);
        if trigger.is_triggered() {
            decisions.push((symbol.clone(), pos.qty, mark, trigger));
        }
    }

    let mut exits = Vec::with_capacity(decisions.len());
    for (symbol, qty, mark, trigger) in decisions {
        // The position was present during the decision pass and nothing has
        // touched the account since, so the close can only fail if the mark
        // itself is unusable; skip rather than poison the whole scan.
        if let Ok(out) = account.auto_exit(&symbol, mark, now) {
            exits.push(AutoExit {
                symbol,
                qty,
                price_micros: mark,
                net_pnl_micros: out.net_pnl_micros,
                trigger,
            });
        }
    }

    ScanReport { exits, unmarked }
}
