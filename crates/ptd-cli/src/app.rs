//! Interactive session wiring.
//!
//! `Session` owns the account, the quote source and the watchlist, and is the
//! only layer that touches IO: it resolves quotes into a mark table, feeds
//! the pure ledger operations, and renders their outcomes. Quote failures
//! degrade per symbol (avg-price fallback in marks, `-` in tables); only the
//! instrument being traded must be priceable.

use std::collections::{BTreeMap, BTreeSet};
use std::io::{BufRead, Write};

use anyhow::{anyhow, bail, Context, Result};
use chrono::Utc;
use tracing::{debug, warn};

use ptd_ledger::{scan, summarize, Account, ProductMode};
use ptd_quotes::{normalize, parse_price_micros, QuoteSource};

use crate::hours::{market_status, status_line};
use crate::render;

const HELP: &str = "\
commands:
  buy SYMBOL QTY [PRICE] [intraday] [sl=PRICE] [tgt=PRICE]
  sell SYMBOL QTY [PRICE]
  exit SYMBOL [PRICE]
  scan                 run the stop-loss/target monitor
  summary              account summary and open positions
  journal              trade history
  watch [SYMBOL]       show the watchlist, or add a symbol to it
  quote SYMBOL         latest price
  reset                restore the starting balance
  help
  quit
";

/// What a handled command asks the loop to do next.
enum Step {
    Continue(String),
    Quit,
}

pub struct Session {
    account: Account,
    quotes: Box<dyn QuoteSource>,
    watchlist: BTreeSet<String>,
    offline: bool,
}

impl Session {
    pub fn new(initial_cash_micros: i64, quotes: Box<dyn QuoteSource>, offline: bool) -> Self {
        Self {
            account: Account::new(initial_cash_micros),
            quotes,
            watchlist: BTreeSet::new(),
            offline,
        }
    }

    /// Seed the watchlist without pricing (used for `--watch` flags; bad
    /// symbols simply render as unpriced).
    pub fn watch_unchecked(&mut self, symbol: &str) {
        self.watchlist.insert(normalize(symbol));
    }

    /// Read-eval-print loop over the given streams until `quit`/EOF.
    pub async fn run(&mut self, input: impl BufRead, mut output: impl Write) -> Result<()> {
        writeln!(output, "{}", status_line(Utc::now()))?;
        writeln!(output, "paper funds: {}", render::fmt_inr(self.account.cash_micros()))?;
        writeln!(output, "type 'help' for commands")?;

        for line in input.lines() {
            let line = line.context("stdin read failed")?;
            write!(output, "> ")?;
            match self.dispatch(&line).await {
                Ok(Step::Quit) => break,
                Ok(Step::Continue(text)) => write!(output, "{text}")?,
                Err(e) => writeln!(output, "error: {e:#}")?,
            }
            output.flush()?;
        }
        Ok(())
    }

    async fn dispatch(&mut self, line: &str) -> Result<Step> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let text = match tokens.as_slice() {
            [] => String::new(),
            ["help"] => HELP.to_string(),
            ["quit"] | ["q"] | ["exit"] => return Ok(Step::Quit),
            ["buy", rest @ ..] => self.handle_buy(rest).await?,
            ["sell", symbol, qty] => self.handle_sell(symbol, qty, None).await?,
            ["sell", symbol, qty, price] => self.handle_sell(symbol, qty, Some(price)).await?,
            ["exit", symbol] => self.handle_exit(symbol, None).await?,
            ["exit", symbol, price] => self.handle_exit(symbol, Some(price)).await?,
            ["scan"] => self.handle_scan().await?,
            ["summary"] => self.handle_summary().await?,
            ["journal"] => render::render_journal(self.account.journal()),
            ["watch"] => self.handle_watchlist().await?,
            ["watch", symbol] => self.handle_watch_add(symbol).await?,
            ["quote", symbol] => self.handle_quote(symbol).await?,
            ["reset"] => {
                self.account.reset();
                format!(
                    "account reset; paper funds {}\n",
                    render::fmt_inr(self.account.cash_micros())
                )
            }
            _ => bail!("unrecognized command (try 'help'): {line}"),
        };
        Ok(Step::Continue(text))
    }

    // -----------------------------------------------------------------------
    // Trading
    // -----------------------------------------------------------------------

    async fn handle_buy(&mut self, args: &[&str]) -> Result<String> {
        let (&symbol, &qty, rest) = match args {
            [s, q, rest @ ..] => (s, q, rest),
            _ => bail!("usage: buy SYMBOL QTY [PRICE] [intraday] [sl=PRICE] [tgt=PRICE]"),
        };
        self.require_tradable()?;

        let symbol = normalize(symbol);
        let qty: i64 = qty.parse().context("quantity must be an integer")?;

        let mut price_micros: Option<i64> = None;
        let mut mode = ProductMode::Delivery;
        let mut stop_loss_micros = 0;
        let mut target_micros = 0;
        for arg in rest {
            if let Some(v) = arg.strip_prefix("sl=") {
                stop_loss_micros = parse_price_micros(v)?;
            } else if let Some(v) = arg.strip_prefix("tgt=") {
                target_micros = parse_price_micros(v)?;
            } else if arg.eq_ignore_ascii_case("intraday") {
                mode = ProductMode::Intraday;
            } else if arg.eq_ignore_ascii_case("delivery") {
                mode = ProductMode::Delivery;
            } else if price_micros.is_none() {
                price_micros = Some(parse_price_micros(arg)?);
            } else {
                bail!("unrecognized buy argument: {arg}");
            }
        }
        let price_micros = match price_micros {
            Some(px) => px,
            None => self.price(&symbol).await?,
        };

        let out = self
            .account
            .buy(&symbol, qty, price_micros, mode, stop_loss_micros, target_micros)?;
        debug!(%symbol, qty, price_micros, "buy filled");
        Ok(format!(
            "bought {qty} {symbol} @ {} ({}), fees {}, cash {}\n",
            render::fmt_inr(price_micros),
            mode.as_str(),
            render::fmt_inr(out.fee_micros),
            render::fmt_inr(self.account.cash_micros()),
        ))
    }

    async fn handle_sell(&mut self, symbol: &str, qty: &str, price: Option<&str>) -> Result<String> {
        self.require_tradable()?;
        let symbol = normalize(symbol);
        let qty: i64 = qty.parse().context("quantity must be an integer")?;
        let price_micros = match price {
            Some(p) => parse_price_micros(p)?,
            None => self.price(&symbol).await?,
        };

        let out = self.account.sell(&symbol, qty, price_micros, Utc::now())?;
        Ok(format!(
            "sold {qty} {symbol} @ {}, net P&L {}, cash {}\n",
            render::fmt_inr(price_micros),
            render::fmt_pnl(out.net_pnl_micros),
            render::fmt_inr(self.account.cash_micros()),
        ))
    }

    async fn handle_exit(&mut self, symbol: &str, price: Option<&str>) -> Result<String> {
        self.require_tradable()?;
        let symbol = normalize(symbol);
        let price_micros = match price {
            Some(p) => parse_price_micros(p)?,
            None => self.price(&symbol).await?,
        };

        let out = self.account.exit(&symbol, price_micros, Utc::now())?;
        Ok(format!(
            "exited {symbol} @ {}, net P&L {}, cash {}\n",
            render::fmt_inr(price_micros),
            render::fmt_pnl(out.net_pnl_micros),
            render::fmt_inr(self.account.cash_micros()),
        ))
    }

    // -----------------------------------------------------------------------
    // Views
    // -----------------------------------------------------------------------

    async fn handle_scan(&mut self) -> Result<String> {
        let marks = self.mark_table(self.position_symbols()).await;
        let report = scan(&mut self.account, Utc::now(), |s| marks.get(s).copied());

        if report.closed() == 0 {
            return Ok("no stop-loss/target triggers\n".to_string());
        }
        let mut out = String::new();
        for exit in &report.exits {
            out.push_str(&format!(
                "{}: {} closed {} @ {}, net P&L {}\n",
                exit.trigger.as_str(),
                exit.symbol,
                exit.qty,
                render::fmt_inr(exit.price_micros),
                render::fmt_pnl(exit.net_pnl_micros),
            ));
        }
        Ok(out)
    }

    async fn handle_summary(&mut self) -> Result<String> {
        let marks = self.mark_table(self.position_symbols()).await;
        let summary = summarize(&self.account, |s| marks.get(s).copied());
        Ok(render::render_summary(&summary))
    }

    async fn handle_watchlist(&mut self) -> Result<String> {
        let symbols: Vec<String> = self.watchlist.iter().cloned().collect();
        let marks = self.mark_table(symbols.clone()).await;
        let rows: Vec<(String, Option<i64>)> = symbols
            .into_iter()
            .map(|s| {
                let px = marks.get(&s).copied();
                (s, px)
            })
            .collect();
        Ok(render::render_watchlist(&rows))
    }

    async fn handle_watch_add(&mut self, symbol: &str) -> Result<String> {
        let symbol = normalize(symbol);
        // A symbol that cannot be priced is rejected rather than silently
        // sitting in the list forever.
        let price_micros = self
            .price(&symbol)
            .await
            .map_err(|e| anyhow!("invalid symbol {symbol}: {e}"))?;
        self.watchlist.insert(symbol.clone());
        Ok(format!(
            "watching {symbol} (LTP {})\n",
            render::fmt_inr(price_micros)
        ))
    }

    async fn handle_quote(&mut self, symbol: &str) -> Result<String> {
        let symbol = normalize(symbol);
        let price_micros = self.price(&symbol).await?;
        Ok(format!("{symbol}: {}\n", render::fmt_inr(price_micros)))
    }

    // -----------------------------------------------------------------------
    // Quote plumbing
    // -----------------------------------------------------------------------

    async fn price(&self, symbol: &str) -> Result<i64> {
        self.quotes
            .last_price(symbol)
            .await
            .with_context(|| format!("could not price {symbol} via {}", self.quotes.source_name()))
    }

    /// Fetch marks for `symbols`; failures are logged and left out so the
    /// ledger falls back to average price for that symbol.
    async fn mark_table(&self, symbols: Vec<String>) -> BTreeMap<String, i64> {
        let mut marks = BTreeMap::new();
        for symbol in symbols {
            match self.quotes.last_price(&symbol).await {
                Ok(px) => {
                    marks.insert(symbol, px);
                }
                Err(e) => warn!(%symbol, error = %e, "quote unavailable, marking at avg price"),
            }
        }
        marks
    }

    fn position_symbols(&self) -> Vec<String> {
        self.account.positions().keys().cloned().collect()
    }

    fn require_tradable(&self) -> Result<()> {
        if self.offline || market_status(Utc::now()).is_open() {
            Ok(())
        } else {
            bail!("market is closed (NSE 09:15-15:30 IST); use --offline for simulated fills")
        }
    }
}
