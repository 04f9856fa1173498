//! ptd-ledger
//!
//! Paper-trading ledger engine:
//! - Fee schedule (brokerage, STT, exchange/SEBI charges, stamp duty, GST)
//! - Account aggregate: cash, consolidated positions, realized PnL
//! - Append-only trade journal (sells/exits only)
//! - Stop-loss / target monitor with full auto-exit
//! - Read-only account summary projection
//! - Pure deterministic logic (no IO, no clocks; timestamps are passed in)

mod fees;
mod journal;
mod types;

pub mod account;
pub mod monitor;
pub mod summary;

pub use account::{Account, BuyOutcome, LedgerError, SellOutcome};
pub use fees::{FeeSchedule, RATE_SCALE};
pub use journal::TradeJournal;
pub use monitor::{scan, trigger_state, AutoExit, ScanReport, TriggerState};
pub use summary::{summarize, AccountSummary, PositionRow};
pub use types::{Position, ProductMode, Side, TradeAction, TradeRecord};

/// Price/cash scale: micros (1e-6 of a rupee).
pub const MICROS_SCALE: i64 = 1_000_000;
