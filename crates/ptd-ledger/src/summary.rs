//! Read-only account summary projection.
//!
//! [`summarize`] folds the open positions and cash into one snapshot using a
//! caller-supplied mark source. It never mutates the account; a symbol with
//! no mark is valued at its average price, which shows the position as flat
//! rather than hiding it.

use crate::account::Account;
use crate::fees::clamp_i128;
use crate::monitor::{trigger_state, TriggerState};
use crate::types::Side;

/// One open position, marked to the latest price.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PositionRow {
    pub symbol: String,
    pub qty: i64,
    pub avg_price_micros: i64,
    /// Mark used for valuation (average price when no quote was available).
    pub ltp_micros: i64,
    /// `qty × ltp`.
    pub current_value_micros: i64,
    /// Unrealized PnL net of the estimated sell-side cost of closing the
    /// whole position at the mark, under the position's product mode.
    pub post_tax_net_pnl_micros: i64,
    /// Threshold status at the mark (informational; nothing is closed here).
    pub trigger: TriggerState,
}

/// Snapshot of one account marked against a price source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountSummary {
    pub cash_micros: i64,
    pub realized_pnl_micros: i64,
    /// Total cost basis of the open positions.
    pub invested_micros: i64,
    /// Total marked value of the open positions.
    pub current_value_micros: i64,
    /// `current_value − invested`, before closing costs.
    pub unrealized_pnl_micros: i64,
    /// `cash + current_value`.
    pub net_worth_micros: i64,
    /// Per-position detail in symbol order.
    pub rows: Vec<PositionRow>,
}

/// Mark every open position and fold the account into an [`AccountSummary`].
pub fn summarize<F>(account: &Account, marks: F) -> AccountSummary
where
    F: Fn(&str) -> Option<i64>,
{
    let schedule = account.fee_schedule();
    let mut invested: i128 = 0;
    let mut current: i128 = 0;
    let mut rows = Vec::with_capacity(account.positions().len());

    for (symbol, pos) in account.positions() {
        let ltp = match marks(symbol) {
            Some(px) if px > 0 => px,
            _ => pos.avg_price_micros,
        };
        let cost_basis = (pos.qty as i128) * (pos.avg_price_micros as i128);
        let value = (pos.qty as i128) * (ltp as i128);
        let exit_fee = schedule.estimate_cost(clamp_i128(value), Side::Sell, pos.mode);
        let post_tax = clamp_i128(value - exit_fee as i128 - cost_basis);

        invested += cost_basis;
        current += value;
        rows.push(PositionRow {
            symbol: symbol.clone(),
            qty: pos.qty,
            avg_price_micros: pos.avg_price_micros,
            ltp_micros: ltp,
            current_value_micros: clamp_i128(value),
            post_tax_net_pnl_micros: post_tax,
            trigger: trigger_state(pos, ltp),
        });
    }

    let cash = account.cash_micros();
    AccountSummary {
        cash_micros: cash,
        realized_pnl_micros: account.realized_pnl_micros(),
        invested_micros: clamp_i128(invested),
        current_value_micros: clamp_i128(current),
        unrealized_pnl_micros: clamp_i128(current - invested),
        net_worth_micros: clamp_i128(cash as i128 + current),
        rows,
    }
}
