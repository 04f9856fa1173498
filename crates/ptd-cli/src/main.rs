//! ptd entry point.
//!
//! Thin shell: parses arguments, sets up tracing, builds the quote stack and
//! hands off to `app::Session`. All command handling lives in `app.rs`.

use anyhow::Result;
use clap::{Parser, Subcommand};
use chrono::Utc;

use ptd_quotes::{
    normalize, parse_price_micros, FixedQuoteSource, QuoteCache, QuoteSource, YahooQuoteSource,
};

mod app;
mod hours;
mod render;

#[derive(Parser)]
#[command(name = "ptd")]
#[command(about = "Paper-trading terminal for NSE equities", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive paper-trading session
    Session {
        /// Starting paper funds in rupees
        #[arg(long, default_value = "1000000")]
        cash: String,

        /// Symbols to seed the watchlist with
        #[arg(long = "watch")]
        watch: Vec<String>,

        /// Use fixed reference prices and skip the market-hours gate
        #[arg(long, default_value_t = false)]
        offline: bool,
    },

    /// Print the latest price for a symbol
    Quote { symbol: String },

    /// Print company fundamentals for a symbol
    Fundamentals { symbol: String },

    /// Print NSE market-hours status
    Hours,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Dev convenience; production injects env vars directly.
    let _ = dotenvy::from_filename(".env.local");
    init_tracing();

    let cli = Cli::parse();
    match cli.cmd {
        Commands::Session {
            cash,
            watch,
            offline,
        } => {
            let initial_cash_micros = parse_price_micros(&cash)?;
            let quotes: Box<dyn QuoteSource> = if offline {
                Box::new(FixedQuoteSource::with_reference_prices())
            } else {
                Box::new(QuoteCache::new(YahooQuoteSource::new()))
            };

            let mut session = app::Session::new(initial_cash_micros, quotes, offline);
            for symbol in &watch {
                session.watch_unchecked(symbol);
            }
            let stdin = std::io::stdin();
            session.run(stdin.lock(), std::io::stdout()).await?;
        }

        Commands::Quote { symbol } => {
            let symbol = normalize(&symbol);
            let source = YahooQuoteSource::new();
            let price_micros = source.last_price(&symbol).await?;
            println!("{symbol}: {}", render::fmt_inr(price_micros));
        }

        Commands::Fundamentals { symbol } => {
            let symbol = normalize(&symbol);
            let source = YahooQuoteSource::new();
            let f = source.fundamentals(&symbol).await?;
            print!("{}", render::render_fundamentals(&f));
        }

        Commands::Hours => {
            println!("{}", hours::status_line(Utc::now()));
        }
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
