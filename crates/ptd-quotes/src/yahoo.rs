//! Yahoo Finance quote provider.
//!
//! Last price comes from the chart endpoint (`/v8/finance/chart/{symbol}`):
//! the meta `regularMarketPrice` when present, otherwise the last non-null
//! close in the chart payload. Fundamentals come from `quoteSummary`. Both
//! payloads are navigated as `serde_json::Value`: Yahoo omits fields freely
//! and a rigid struct would reject otherwise-usable responses.

use std::time::Duration;

use serde_json::Value;

use crate::price::micros_from_quote;
use crate::source::{Fundamentals, QuoteError, QuoteSource};

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Yahoo-backed [`QuoteSource`].
#[derive(Debug, Clone)]
pub struct YahooQuoteSource {
    http: reqwest::Client,
    base_url: String,
}

impl YahooQuoteSource {
    pub fn new() -> Self {
        Self::new_with_base_url(DEFAULT_BASE_URL.to_string())
    }

    /// Point the provider at a different host (test injection).
    pub fn new_with_base_url(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, QuoteError> {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), path);
        let resp = self
            .http
            .get(url)
            .query(query)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| QuoteError::Transport(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(QuoteError::NotFound(path.to_string()));
        }
        if !status.is_success() {
            return Err(QuoteError::Transport(format!(
                "http status {} for {path}",
                status.as_u16()
            )));
        }
        resp.json()
            .await
            .map_err(|e| QuoteError::Decode(e.to_string()))
    }
}

impl Default for YahooQuoteSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl QuoteSource for YahooQuoteSource {
    fn source_name(&self) -> &'static str {
        "yahoo"
    }

    async fn last_price(&self, symbol: &str) -> Result<i64, QuoteError> {
        let body = self
            .get_json(
                &format!("/v8/finance/chart/{symbol}"),
                &[("interval", "1d"), ("range", "1d")],
            )
            .await?;

        if let Some(err) = body.pointer("/chart/error").filter(|v| !v.is_null()) {
            return Err(QuoteError::NotFound(format!("{symbol}: {err}")));
        }

        let meta_price = body
            .pointer("/chart/result/0/meta/regularMarketPrice")
            .and_then(Value::as_f64)
            .and_then(micros_from_quote);
        if let Some(px) = meta_price {
            return Ok(px);
        }

        // Fall back to the last usable close of the requested range.
        body.pointer("/chart/result/0/indicators/quote/0/close")
            .and_then(Value::as_array)
            .and_then(|closes| {
                closes
                    .iter()
                    .rev()
                    .find_map(|v| v.as_f64().and_then(micros_from_quote))
            })
            .ok_or_else(|| QuoteError::NotFound(symbol.to_string()))
    }

    async fn fundamentals(&self, symbol: &str) -> Result<Fundamentals, QuoteError> {
        let body = self
            .get_json(
                &format!("/v10/finance/quoteSummary/{symbol}"),
                &[(
                    "modules",
                    "price,summaryDetail,defaultKeyStatistics,financialData,assetProfile",
                )],
            )
            .await?;

        let result = body
            .pointer("/quoteSummary/result/0")
            .filter(|v| !v.is_null())
            .ok_or_else(|| QuoteError::NotFound(symbol.to_string()))?;

        Ok(Fundamentals {
            symbol: symbol.to_string(),
            long_name: result
                .pointer("/price/longName")
                .and_then(Value::as_str)
                .map(str::to_string),
            market_cap: raw_f64(result, "/price/marketCap").map(|v| v as i64),
            previous_close_micros: raw_f64(result, "/summaryDetail/previousClose")
                .and_then(micros_from_quote),
            fifty_two_week_high_micros: raw_f64(result, "/summaryDetail/fiftyTwoWeekHigh")
                .and_then(micros_from_quote),
            fifty_two_week_low_micros: raw_f64(result, "/summaryDetail/fiftyTwoWeekLow")
                .and_then(micros_from_quote),
            volume: result
                .pointer("/summaryDetail/volume/raw")
                .and_then(Value::as_i64),
            trailing_pe: raw_f64(result, "/summaryDetail/trailingPE"),
            price_to_book: raw_f64(result, "/defaultKeyStatistics/priceToBook"),
            return_on_equity: raw_f64(result, "/financialData/returnOnEquity"),
            profit_margin: raw_f64(result, "/financialData/profitMargins"),
            debt_to_equity: raw_f64(result, "/financialData/debtToEquity"),
            business_summary: result
                .pointer("/assetProfile/longBusinessSummary")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }
}

/// Yahoo wraps numbers as `{"raw": 1.23, "fmt": "1.23"}`.
fn raw_f64(v: &Value, pointer: &str) -> Option<f64> {
    v.pointer(&format!("{pointer}/raw")).and_then(Value::as_f64)
}

// -----------------
// Tests (no network)
// -----------------

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn chart_body(meta_price: Option<f64>, closes: &[Option<f64>]) -> Value {
        let mut meta = json!({"currency": "INR", "symbol": "TCS.NS"});
        if let Some(px) = meta_price {
            meta["regularMarketPrice"] = json!(px);
        }
        json!({
            "chart": {
                "result": [{
                    "meta": meta,
                    "indicators": {"quote": [{"close": closes}]}
                }],
                "error": null
            }
        })
    }

    #[tokio::test]
    async fn last_price_uses_meta_regular_market_price() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v8/finance/chart/TCS.NS");
            then.status(200).json_body(chart_body(Some(3245.7), &[]));
        });

        let source = YahooQuoteSource::new_with_base_url(server.base_url());
        assert_eq!(source.last_price("TCS.NS").await.unwrap(), 3_245_700_000);
    }

    #[tokio::test]
    async fn last_price_falls_back_to_last_non_null_close() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v8/finance/chart/TCS.NS");
            then.status(200)
                .json_body(chart_body(None, &[Some(3200.0), Some(3210.5), None]));
        });

        let source = YahooQuoteSource::new_with_base_url(server.base_url());
        assert_eq!(source.last_price("TCS.NS").await.unwrap(), 3_210_500_000);
    }

    #[tokio::test]
    async fn chart_error_maps_to_not_found() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v8/finance/chart/NOPE.NS");
            then.status(200).json_body(json!({
                "chart": {"result": null, "error": {"code": "Not Found"}}
            }));
        });

        let source = YahooQuoteSource::new_with_base_url(server.base_url());
        let err = source.last_price("NOPE.NS").await.unwrap_err();
        assert!(matches!(err, QuoteError::NotFound(_)), "{err}");
    }

    #[tokio::test]
    async fn http_404_maps_to_not_found_and_5xx_to_transport() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v8/finance/chart/GONE.NS");
            then.status(404);
        });
        server.mock(|when, then| {
            when.method(GET).path("/v8/finance/chart/FLAKY.NS");
            then.status(503);
        });

        let source = YahooQuoteSource::new_with_base_url(server.base_url());
        assert!(matches!(
            source.last_price("GONE.NS").await.unwrap_err(),
            QuoteError::NotFound(_)
        ));
        assert!(matches!(
            source.last_price("FLAKY.NS").await.unwrap_err(),
            QuoteError::Transport(_)
        ));
    }

    #[tokio::test]
    async fn malformed_payload_maps_to_decode() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v8/finance/chart/TCS.NS");
            then.status(200).body("not json at all");
        });

        let source = YahooQuoteSource::new_with_base_url(server.base_url());
        assert!(matches!(
            source.last_price("TCS.NS").await.unwrap_err(),
            QuoteError::Decode(_)
        ));
    }

    #[tokio::test]
    async fn fundamentals_map_raw_fields_and_tolerate_gaps() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v10/finance/quoteSummary/TCS.NS");
            then.status(200).json_body(json!({
                "quoteSummary": {
                    "result": [{
                        "price": {"longName": "Tata Consultancy Services Limited",
                                  "marketCap": {"raw": 1.2e13}},
                        "summaryDetail": {
                            "previousClose": {"raw": 3240.1},
                            "trailingPE": {"raw": 29.4},
                            "volume": {"raw": 1850000}
                        },
                        "financialData": {"returnOnEquity": {"raw": 0.45}}
                    }],
                    "error": null
                }
            }));
        });

        let source = YahooQuoteSource::new_with_base_url(server.base_url());
        let f = source.fundamentals("TCS.NS").await.unwrap();
        assert_eq!(
            f.long_name.as_deref(),
            Some("Tata Consultancy Services Limited")
        );
        assert_eq!(f.market_cap, Some(12_000_000_000_000));
        assert_eq!(f.previous_close_micros, Some(3_240_100_000));
        assert_eq!(f.trailing_pe, Some(29.4));
        assert_eq!(f.volume, Some(1_850_000));
        assert_eq!(f.return_on_equity, Some(0.45));
        // Modules Yahoo omitted stay empty rather than failing the lookup.
        assert_eq!(f.price_to_book, None);
        assert_eq!(f.business_summary, None);
    }

    #[tokio::test]
    async fn empty_quote_summary_result_is_not_found() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v10/finance/quoteSummary/NOPE.NS");
            then.status(200)
                .json_body(json!({"quoteSummary": {"result": [], "error": null}}));
        });

        let source = YahooQuoteSource::new_with_base_url(server.base_url());
        assert!(matches!(
            source.fundamentals("NOPE.NS").await.unwrap_err(),
            QuoteError::NotFound(_)
        ));
    }
}
