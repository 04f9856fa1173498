use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// BUY or SELL for a single order leg.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

/// Product mode for an equity order.
///
/// Delivery implies holding past the session; Intraday implies same-session
/// close-out. The mode picked on the *first* buy sticks for the position's
/// lifetime and governs the fee schedule applied to every later sell/exit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductMode {
    Delivery,
    Intraday,
}

impl ProductMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductMode::Delivery => "Delivery",
            ProductMode::Intraday => "Intraday",
        }
    }
}

/// An open position for one symbol (at most one per symbol; repeated buys
/// consolidate into it via quantity-weighted average price).
///
/// Invariants while present in the open set:
/// - `qty > 0`
/// - `avg_price_micros > 0`
/// - `stop_loss_micros` / `target_micros` of 0 mean "disabled"
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub symbol: String,
    pub qty: i64,
    pub avg_price_micros: i64,
    pub mode: ProductMode,
    pub stop_loss_micros: i64,
    pub target_micros: i64,
}

impl Position {
    /// Notional cost basis (`qty × avg_price`) in micros.
    pub fn cost_basis_micros(&self) -> i64 {
        crate::fees::clamp_i128((self.qty as i128) * (self.avg_price_micros as i128))
    }
}

/// How a journaled trade was initiated.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeAction {
    /// Explicit partial/full sell with a quantity.
    Sell,
    /// Manual full exit of the position.
    Exit,
    /// Forced full exit from a stop-loss/target trigger.
    AutoExit,
}

impl TradeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeAction::Sell => "SELL",
            TradeAction::Exit => "EXIT",
            TradeAction::AutoExit => "AUTO-EXIT",
        }
    }
}

/// Immutable journal record appended on every completed sell/exit.
///
/// `qty` is `None` for full exits: the whole position went, so the row
/// carries no explicit quantity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub symbol: String,
    pub action: TradeAction,
    pub qty: Option<i64>,
    pub price_micros: i64,
    pub net_pnl_micros: i64,
    pub ts: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_basis_is_qty_times_avg() {
        let p = Position {
            symbol: "TCS.NS".to_string(),
            qty: 15,
            avg_price_micros: 3_200 * crate::MICROS_SCALE,
            mode: ProductMode::Delivery,
            stop_loss_micros: 0,
            target_micros: 0,
        };
        assert_eq!(p.cost_basis_micros(), 48_000 * crate::MICROS_SCALE);
    }

    #[test]
    fn trade_action_labels() {
        assert_eq!(TradeAction::Sell.as_str(), "SELL");
        assert_eq!(TradeAction::Exit.as_str(), "EXIT");
        assert_eq!(TradeAction::AutoExit.as_str(), "AUTO-EXIT");
    }

    #[test]
    fn trade_record_round_trips_through_serde() {
        let rec = TradeRecord {
            symbol: "INFY.NS".to_string(),
            action: TradeAction::Sell,
            qty: Some(5),
            price_micros: 1_500 * crate::MICROS_SCALE,
            net_pnl_micros: -42,
            ts: Utc::now(),
        };
        let json = serde_json::to_string(&rec).unwrap();
        let back: TradeRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(rec, back);
    }
}
