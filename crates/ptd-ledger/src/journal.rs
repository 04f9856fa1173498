//! Append-only trade journal.
//!
//! One record per completed sell/exit/auto-exit. Buys never journal.
//! Records are never mutated or removed after append; ordering is append
//! order. The journal is cleared only by a full account reset.

use crate::types::TradeRecord;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TradeJournal {
    records: Vec<TradeRecord>,
}

impl TradeJournal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chronological view of every journaled trade.
    pub fn records(&self) -> &[TradeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub(crate) fn append(&mut self, record: TradeRecord) {
        self.records.push(record);
    }

    pub(crate) fn clear(&mut self) {
        self.records.clear();
    }
}
