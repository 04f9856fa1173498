//! The session account aggregate.
//!
//! `Account` owns cash, the open-position set and the trade journal for one
//! paper-trading session. It is an explicit value passed to every operation
//! (no ambient state), so independent sessions can exist side by side and be
//! tested in isolation.
//!
//! # Atomicity
//! Every operation validates fully before mutating. On error the account is
//! **not** mutated: either the whole buy/sell sequence commits, or none of it
//! does.
//!
//! # Determinism
//! No IO, no clocks, no randomness. Operations that journal take the
//! timestamp as an argument.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::fees::{clamp_i128, FeeSchedule};
use crate::journal::TradeJournal;
use crate::types::{Position, ProductMode, Side, TradeAction, TradeRecord};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// All ways a ledger operation can be rejected.
///
/// Every variant is recoverable: the operation is refused and the account is
/// left unchanged. There is no fatal error class in the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Buy cost (turnover + fees) exceeds the available cash balance.
    InsufficientFunds {
        required_micros: i64,
        available_micros: i64,
    },
    /// Sell quantity exceeds the held quantity.
    InsufficientQuantity { requested: i64, held: i64 },
    /// No open position exists for the symbol.
    NoPosition { symbol: String },
    /// Order quantity must be strictly positive.
    NonPositiveQty { qty: i64 },
    /// Fill price must be strictly positive.
    NonPositivePrice { price_micros: i64 },
    /// Symbol must be non-empty.
    EmptySymbol,
}

impl std::fmt::Display for LedgerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InsufficientFunds {
                required_micros,
                available_micros,
            } => write!(
                f,
                "insufficient funds: need {required_micros} micros, have {available_micros}"
            ),
            Self::InsufficientQuantity { requested, held } => {
                write!(f, "insufficient quantity: requested {requested}, held {held}")
            }
            Self::NoPosition { symbol } => write!(f, "no open position for {symbol}"),
            Self::NonPositiveQty { qty } => {
                write!(f, "ledger invariant: qty must be > 0, got {qty}")
            }
            Self::NonPositivePrice { price_micros } => {
                write!(f, "ledger invariant: price_micros must be > 0, got {price_micros}")
            }
            Self::EmptySymbol => write!(f, "ledger invariant: symbol must not be empty"),
        }
    }
}

impl std::error::Error for LedgerError {}

// ---------------------------------------------------------------------------
// Operation outcomes
// ---------------------------------------------------------------------------

/// What a successful buy cost and produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuyOutcome {
    pub turnover_micros: i64,
    pub fee_micros: i64,
    /// Cash debited: turnover + fee.
    pub total_micros: i64,
    /// Position quantity after consolidation.
    pub qty_after: i64,
    /// Volume-weighted average price after consolidation.
    pub avg_price_micros_after: i64,
}

/// What a successful sell/exit returned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SellOutcome {
    pub turnover_micros: i64,
    pub fee_micros: i64,
    /// Cash credited: turnover − fee.
    pub proceeds_micros: i64,
    /// Proceeds minus pre-sale cost basis for the sold quantity.
    pub net_pnl_micros: i64,
    /// Quantity still held afterwards (0 means the position was removed).
    pub remaining_qty: i64,
}

// ---------------------------------------------------------------------------
// Account
// ---------------------------------------------------------------------------

/// One paper-trading session's state: cash, open positions, journal.
#[derive(Clone, Debug)]
pub struct Account {
    initial_cash_micros: i64,
    cash_micros: i64,
    realized_pnl_micros: i64,
    positions: BTreeMap<String, Position>,
    journal: TradeJournal,
    schedule: FeeSchedule,
}

impl Account {
    /// Create a session account with the given starting balance and the
    /// default fee schedule.
    pub fn new(initial_cash_micros: i64) -> Self {
        Self::with_schedule(initial_cash_micros, FeeSchedule::default())
    }

    pub fn with_schedule(initial_cash_micros: i64, schedule: FeeSchedule) -> Self {
        debug_assert!(initial_cash_micros >= 0);
        Self {
            initial_cash_micros,
            cash_micros: initial_cash_micros,
            realized_pnl_micros: 0,
            positions: BTreeMap::new(),
            journal: TradeJournal::new(),
            schedule,
        }
    }

    // -----------------------------------------------------------------------
    // Read surface
    // -----------------------------------------------------------------------

    pub fn cash_micros(&self) -> i64 {
        self.cash_micros
    }

    pub fn realized_pnl_micros(&self) -> i64 {
        self.realized_pnl_micros
    }

    /// Open positions keyed by symbol (deterministic iteration order).
    pub fn positions(&self) -> &BTreeMap<String, Position> {
        &self.positions
    }

    pub fn position(&self, symbol: &str) -> Option<&Position> {
        self.positions.get(symbol)
    }

    pub fn journal(&self) -> &TradeJournal {
        &self.journal
    }

    pub fn fee_schedule(&self) -> &FeeSchedule {
        &self.schedule
    }

    /// `true` if no open positions exist.
    pub fn is_flat(&self) -> bool {
        self.positions.is_empty()
    }

    // -----------------------------------------------------------------------
    // Write surface
    // -----------------------------------------------------------------------

    /// Restore the starting balance and clear positions and journal.
    pub fn reset(&mut self) {
        self.cash_micros = self.initial_cash_micros;
        self.realized_pnl_micros = 0;
        self.positions.clear();
        self.journal.clear();
    }

    /// Buy `qty` at `price_micros`, consolidating into any existing position.
    ///
    /// Cash is debited by turnover + fee. A new position takes the given
    /// mode/stop-loss/target; an existing position keeps its original mode
    /// but has stop-loss and target **overwritten** by this call's values.
    /// Buys are not journaled.
    ///
    /// # Errors
    /// [`LedgerError::InsufficientFunds`] when turnover + fee exceeds cash;
    /// validation errors for non-positive qty/price or an empty symbol. The
    /// account is untouched on error.
    pub fn buy(
        &mut self,
        symbol: &str,
        qty: i64,
        price_micros: i64,
        mode: ProductMode,
        stop_loss_micros: i64,
        target_micros: i64,
    ) -> Result<BuyOutcome, LedgerError> {
        validate_order(symbol, qty, price_micros)?;

        let turnover = clamp_i128((qty as i128) * (price_micros as i128));
        let fee = self.schedule.estimate_cost(turnover, Side::Buy, mode);
        let total = clamp_i128(turnover as i128 + fee as i128);
        if total > self.cash_micros {
            return Err(LedgerError::InsufficientFunds {
                required_micros: total,
                available_micros: self.cash_micros,
            });
        }

        self.cash_micros -= total;

        let entry = self.positions.entry(symbol.to_string());
        let pos = entry.or_insert_with(|| Position {
            symbol: symbol.to_string(),
            qty: 0,
            avg_price_micros: 0,
            mode,
            stop_loss_micros,
            target_micros,
        });

        if pos.qty == 0 {
            pos.qty = qty;
            pos.avg_price_micros = price_micros;
        } else {
            // Quantity-weighted average; the original mode is kept as-is.
            let blended = ((pos.qty as i128) * (pos.avg_price_micros as i128)
                + (qty as i128) * (price_micros as i128))
                / ((pos.qty + qty) as i128);
            pos.qty += qty;
            pos.avg_price_micros = clamp_i128(blended);
        }
        pos.stop_loss_micros = stop_loss_micros;
        pos.target_micros = target_micros;

        Ok(BuyOutcome {
            turnover_micros: turnover,
            fee_micros: fee,
            total_micros: total,
            qty_after: pos.qty,
            avg_price_micros_after: pos.avg_price_micros,
        })
    }

    /// Sell `qty` at `price_micros` out of the open position for `symbol`.
    ///
    /// Proceeds (turnover − sell-side fee, under the position's original
    /// mode) are credited to cash; net PnL against the pre-sale average
    /// price accumulates into realized PnL; the position is removed when its
    /// quantity reaches zero. Journals a `Sell` record.
    ///
    /// # Errors
    /// [`LedgerError::NoPosition`] / [`LedgerError::InsufficientQuantity`],
    /// plus the same validation errors as [`Account::buy`]. The account is
    /// untouched on error.
    pub fn sell(
        &mut self,
        symbol: &str,
        qty: i64,
        price_micros: i64,
        now: DateTime<Utc>,
    ) -> Result<SellOutcome, LedgerError> {
        validate_order(symbol, qty, price_micros)?;
        self.close_quantity(symbol, Some(qty), price_micros, TradeAction::Sell, now)
    }

    /// Sell the entire held quantity, journaled as a manual `Exit`.
    pub fn exit(
        &mut self,
        symbol: &str,
        price_micros: i64,
        now: DateTime<Utc>,
    ) -> Result<SellOutcome, LedgerError> {
        if price_micros <= 0 {
            return Err(LedgerError::NonPositivePrice { price_micros });
        }
        self.close_quantity(symbol, None, price_micros, TradeAction::Exit, now)
    }

    /// Full exit initiated by the risk monitor; journaled as `AutoExit`.
    pub(crate) fn auto_exit(
        &mut self,
        symbol: &str,
        price_micros: i64,
        now: DateTime<Utc>,
    ) -> Result<SellOutcome, LedgerError> {
        self.close_quantity(symbol, None, price_micros, TradeAction::AutoExit, now)
    }

    /// Shared sell/exit path. `qty = None` means "everything held".
    fn close_quantity(
        &mut self,
        symbol: &str,
        qty: Option<i64>,
        price_micros: i64,
        action: TradeAction,
        now: DateTime<Utc>,
    ) -> Result<SellOutcome, LedgerError> {
        let pos = self
            .positions
            .get_mut(symbol)
            .ok_or_else(|| LedgerError::NoPosition {
                symbol: symbol.to_string(),
            })?;

        let full_exit = qty.is_none();
        let qty = qty.unwrap_or(pos.qty);
        if qty > pos.qty {
            return Err(LedgerError::InsufficientQuantity {
                requested: qty,
                held: pos.qty,
            });
        }

        let turnover = clamp_i128((qty as i128) * (price_micros as i128));
        let fee = self.schedule.estimate_cost(turnover, Side::Sell, pos.mode);
        let proceeds = clamp_i128(turnover as i128 - fee as i128);
        // Cost basis uses the pre-sale average price; a partial sale leaves
        // the average price unchanged.
        let cost_basis = (qty as i128) * (pos.avg_price_micros as i128);
        let net_pnl = clamp_i128(proceeds as i128 - cost_basis);

        pos.qty -= qty;
        let remaining_qty = pos.qty;

        self.cash_micros = self.cash_micros.saturating_add(proceeds);
        self.realized_pnl_micros = self.realized_pnl_micros.saturating_add(net_pnl);
        if remaining_qty == 0 {
            self.positions.remove(symbol);
        }

        self.journal.append(TradeRecord {
            symbol: symbol.to_string(),
            action,
            qty: if full_exit { None } else { Some(qty) },
            price_micros,
            net_pnl_micros: net_pnl,
            ts: now,
        });

        Ok(SellOutcome {
            turnover_micros: turnover,
            fee_micros: fee,
            proceeds_micros: proceeds,
            net_pnl_micros: net_pnl,
            remaining_qty,
        })
    }
}

fn validate_order(symbol: &str, qty: i64, price_micros: i64) -> Result<(), LedgerError> {
    if symbol.trim().is_empty() {
        return Err(LedgerError::EmptySymbol);
    }
    if qty <= 0 {
        return Err(LedgerError::NonPositiveQty { qty });
    }
    if price_micros <= 0 {
        return Err(LedgerError::NonPositivePrice { price_micros });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
