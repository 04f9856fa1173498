//! Plain-text rendering for the terminal session.
//!
//! All money formatting goes through [`fmt_inr`] so every table agrees on
//! rounding (nearest paisa) and grouping.

use ptd_ledger::{AccountSummary, TradeJournal};
use ptd_quotes::Fundamentals;

/// Format micros as rupees with thousands grouping, rounded to the paisa.
pub fn fmt_inr(micros: i64) -> String {
    let sign = if micros < 0 { "-" } else { "" };
    let paise_total = (micros.unsigned_abs() + 5_000) / 10_000;
    let rupees = paise_total / 100;
    let paise = paise_total % 100;
    format!("{sign}₹{}.{paise:02}", group_thousands(rupees))
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Signed PnL with an explicit `+` on gains.
pub fn fmt_pnl(micros: i64) -> String {
    if micros > 0 {
        format!("+{}", fmt_inr(micros))
    } else {
        fmt_inr(micros)
    }
}

pub fn render_summary(s: &AccountSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "net worth {}  cash {}  invested {}\n",
        fmt_inr(s.net_worth_micros),
        fmt_inr(s.cash_micros),
        fmt_inr(s.invested_micros),
    ));
    out.push_str(&format!(
        "realized {}  unrealized {}\n",
        fmt_pnl(s.realized_pnl_micros),
        fmt_pnl(s.unrealized_pnl_micros),
    ));

    if s.rows.is_empty() {
        out.push_str("no open positions\n");
        return out;
    }

    out.push_str(&format!(
        "{:<14} {:>6} {:>14} {:>14} {:>16} {:>16} {:>10}\n",
        "SYMBOL", "QTY", "AVG", "LTP", "VALUE", "NET P&L", "STATUS"
    ));
    for row in &s.rows {
        out.push_str(&format!(
            "{:<14} {:>6} {:>14} {:>14} {:>16} {:>16} {:>10}\n",
            row.symbol,
            row.qty,
            fmt_inr(row.avg_price_micros),
            fmt_inr(row.ltp_micros),
            fmt_inr(row.current_value_micros),
            fmt_pnl(row.post_tax_net_pnl_micros),
            row.trigger.as_str(),
        ));
    }
    out
}

pub fn render_journal(journal: &TradeJournal) -> String {
    if journal.is_empty() {
        return "no trades yet\n".to_string();
    }
    let mut out = format!(
        "{:<20} {:<14} {:>10} {:>6} {:>14} {:>16}\n",
        "TIME", "SYMBOL", "ACTION", "QTY", "PRICE", "NET P&L"
    );
    for rec in journal.records() {
        let qty = rec.qty.map_or_else(|| "-".to_string(), |q| q.to_string());
        out.push_str(&format!(
            "{:<20} {:<14} {:>10} {:>6} {:>14} {:>16}\n",
            rec.ts.format("%Y-%m-%d %H:%M:%S"),
            rec.symbol,
            rec.action.as_str(),
            qty,
            fmt_inr(rec.price_micros),
            fmt_pnl(rec.net_pnl_micros),
        ));
    }
    out
}

/// Watchlist table from prefetched marks (`None` = quote unavailable).
pub fn render_watchlist(rows: &[(String, Option<i64>)]) -> String {
    if rows.is_empty() {
        return "watchlist is empty\n".to_string();
    }
    let mut out = format!("{:<14} {:>14}\n", "SYMBOL", "LTP");
    for (symbol, price) in rows {
        let ltp = price.map_or_else(|| "-".to_string(), fmt_inr);
        out.push_str(&format!("{symbol:<14} {ltp:>14}\n"));
    }
    out
}

pub fn render_fundamentals(f: &Fundamentals) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}\n",
        f.long_name.as_deref().unwrap_or(&f.symbol)
    ));
    let mut line = |label: &str, value: Option<String>| {
        if let Some(v) = value {
            out.push_str(&format!("{label:<18} {v}\n"));
        }
    };
    line("market cap", f.market_cap.map(|v| format!("₹{}", group_thousands(v.unsigned_abs()))));
    line("previous close", f.previous_close_micros.map(fmt_inr));
    line("52w high", f.fifty_two_week_high_micros.map(fmt_inr));
    line("52w low", f.fifty_two_week_low_micros.map(fmt_inr));
    line("volume", f.volume.map(|v| group_thousands(v.unsigned_abs())));
    line("trailing P/E", f.trailing_pe.map(|v| format!("{v:.2}")));
    line("price/book", f.price_to_book.map(|v| format!("{v:.2}")));
    line("ROE", f.return_on_equity.map(|v| format!("{:.2}%", v * 100.0)));
    line("profit margin", f.profit_margin.map(|v| format!("{:.2}%", v * 100.0)));
    line("debt/equity", f.debt_to_equity.map(|v| format!("{v:.2}")));
    if let Some(summary) = &f.business_summary {
        out.push('\n');
        out.push_str(summary);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inr_formatting_rounds_to_the_paisa() {
        assert_eq!(fmt_inr(0), "₹0.00");
        assert_eq!(fmt_inr(1_234_567_890), "₹1,234.57");
        assert_eq!(fmt_inr(-50_000_000), "-₹50.00");
        assert_eq!(fmt_inr(1_000_000_000_000), "₹1,000,000.00");
        // 4,999 micros rounds down, 5,000 rounds up.
        assert_eq!(fmt_inr(4_999), "₹0.00");
        assert_eq!(fmt_inr(5_000), "₹0.01");
    }

    #[test]
    fn pnl_gains_carry_an_explicit_plus() {
        assert_eq!(fmt_pnl(1_000_000), "+₹1.00");
        assert_eq!(fmt_pnl(-1_000_000), "-₹1.00");
        assert_eq!(fmt_pnl(0), "₹0.00");
    }

    #[test]
    fn empty_watchlist_renders_a_hint() {
        assert_eq!(render_watchlist(&[]), "watchlist is empty\n");
    }

    #[test]
    fn watchlist_marks_unpriced_symbols() {
        let rows = vec![
            ("TCS.NS".to_string(), Some(3_245 * 1_000_000)),
            ("GHOST.NS".to_string(), None),
        ];
        let out = render_watchlist(&rows);
        assert!(out.contains("₹3,245.00"));
        assert!(out.contains("GHOST.NS"));
        assert!(out.lines().last().unwrap().trim().ends_with('-'));
    }
}
