//! Transaction cost model.
//!
//! Estimates the all-in cost of a simulated equity trade: brokerage, the
//! securities transaction tax, exchange and regulatory charges, stamp duty
//! and consumption tax on the service components. The figures are
//! illustrative, not authoritative.
//!
//! # Determinism
//! - All rates are integer parts-per-1e8, so every schedule constant is exact.
//! - Computation uses i128 internally and clamps to i64 at return.
//! - Components round *up* to the next micro, which keeps the total
//!   monotonically non-decreasing in turnover and strictly positive for any
//!   positive turnover (every side/mode combination has at least one
//!   positive-rate component).

use serde::{Deserialize, Serialize};

use crate::types::{ProductMode, Side};

/// Fee rates are expressed in parts-per-1e8 (1 = 0.000001%).
pub const RATE_SCALE: i64 = 100_000_000;

/// Schedule of fee rates and caps.
///
/// `Default` carries the reference schedule. All values are configuration
/// constants; nothing here is looked up at runtime.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Intraday brokerage rate (Delivery brokerage is zero).
    pub brokerage_rate_e8: i64,
    /// Flat cap on intraday brokerage, in micros.
    pub brokerage_cap_micros: i64,
    /// Securities transaction tax, Delivery, both sides.
    pub stt_delivery_e8: i64,
    /// Securities transaction tax, Intraday, sells only.
    pub stt_intraday_sell_e8: i64,
    /// Exchange transaction charge, all trades.
    pub exchange_txn_e8: i64,
    /// Regulatory (SEBI) charge, all trades.
    pub sebi_e8: i64,
    /// Stamp duty, buys only.
    pub stamp_duty_buy_e8: i64,
    /// Consumption tax (GST) on brokerage + exchange + SEBI charges.
    pub gst_e8: i64,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            brokerage_rate_e8: 30_000,      // 0.03%, capped
            brokerage_cap_micros: 20 * crate::MICROS_SCALE,
            stt_delivery_e8: 100_000,       // 0.1%
            stt_intraday_sell_e8: 25_000,   // 0.025%
            exchange_txn_e8: 3_450,         // 0.00345%
            sebi_e8: 100,                   // 0.0001%
            stamp_duty_buy_e8: 3_000,       // 0.003%
            gst_e8: 18_000_000,             // 18%
        }
    }
}

impl FeeSchedule {
    /// Total transaction cost in micros for a trade of `turnover_micros`.
    ///
    /// Pure and total on well-formed input (`turnover_micros >= 0`); never
    /// returns a negative cost.
    pub fn estimate_cost(&self, turnover_micros: i64, side: Side, mode: ProductMode) -> i64 {
        debug_assert!(turnover_micros >= 0, "turnover must be >= 0");
        if turnover_micros <= 0 {
            return 0;
        }

        let brokerage = match mode {
            ProductMode::Intraday => mul_rate_ceil(turnover_micros as i128, self.brokerage_rate_e8)
                .min(self.brokerage_cap_micros as i128),
            ProductMode::Delivery => 0,
        };

        let stt = match (mode, side) {
            (ProductMode::Delivery, _) => {
                mul_rate_ceil(turnover_micros as i128, self.stt_delivery_e8)
            }
            (ProductMode::Intraday, Side::Sell) => {
                mul_rate_ceil(turnover_micros as i128, self.stt_intraday_sell_e8)
            }
            (ProductMode::Intraday, Side::Buy) => 0,
        };

        let exchange = mul_rate_ceil(turnover_micros as i128, self.exchange_txn_e8);
        let sebi = mul_rate_ceil(turnover_micros as i128, self.sebi_e8);

        let stamp = match side {
            Side::Buy => mul_rate_ceil(turnover_micros as i128, self.stamp_duty_buy_e8),
            Side::Sell => 0,
        };

        // GST applies to the service components only, not to the taxes.
        let gst = mul_rate_ceil(brokerage + exchange + sebi, self.gst_e8);

        clamp_i128(brokerage + stt + exchange + sebi + stamp + gst)
    }
}

/// `ceil(amount × rate / RATE_SCALE)` over non-negative inputs.
fn mul_rate_ceil(amount_micros: i128, rate_e8: i64) -> i128 {
    debug_assert!(amount_micros >= 0 && rate_e8 >= 0);
    if amount_micros == 0 || rate_e8 == 0 {
        return 0;
    }
    let scale = RATE_SCALE as i128;
    (amount_micros * rate_e8 as i128 + scale - 1) / scale
}

pub(crate) fn clamp_i128(x: i128) -> i64 {
    if x > i64::MAX as i128 {
        i64::MAX
    } else if x < i64::MIN as i128 {
        i64::MIN
    } else {
        x as i64
    }
}
