//! NSE trading-hours check.
//!
//! Pure over a passed-in instant so it is testable; the regular session is
//! 09:15–15:30 IST on weekdays. Exchange holidays are not modeled.

use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use chrono_tz::Asia::Kolkata;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarketStatus {
    Open,
    Closed,
}

impl MarketStatus {
    pub fn is_open(&self) -> bool {
        matches!(self, MarketStatus::Open)
    }
}

const OPEN_MINUTE: u32 = 9 * 60 + 15;
const CLOSE_MINUTE: u32 = 15 * 60 + 30;

/// Regular-session status at `now`.
pub fn market_status(now: DateTime<Utc>) -> MarketStatus {
    let ist = now.with_timezone(&Kolkata);
    match ist.weekday() {
        Weekday::Sat | Weekday::Sun => return MarketStatus::Closed,
        _ => {}
    }
    let minute = ist.hour() * 60 + ist.minute();
    if (OPEN_MINUTE..=CLOSE_MINUTE).contains(&minute) {
        MarketStatus::Open
    } else {
        MarketStatus::Closed
    }
}

/// One-line banner for the session header and the `hours` command.
pub fn status_line(now: DateTime<Utc>) -> String {
    let ist = now.with_timezone(&Kolkata);
    let state = match market_status(now) {
        MarketStatus::Open => "OPEN",
        MarketStatus::Closed => "CLOSED",
    };
    format!(
        "NSE {} | {} IST | regular session 09:15-15:30",
        state,
        ist.format("%a %H:%M"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ist(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Kolkata
            .with_ymd_and_hms(y, mo, d, h, mi, 0)
            .single()
            .map(|t| t.with_timezone(&Utc))
            .unwrap()
    }

    #[test]
    fn open_during_a_weekday_session() {
        // 2026-08-26 is a Wednesday.
        assert_eq!(market_status(ist(2026, 8, 26, 10, 0)), MarketStatus::Open);
        assert_eq!(market_status(ist(2026, 8, 26, 9, 15)), MarketStatus::Open);
        assert_eq!(market_status(ist(2026, 8, 26, 15, 30)), MarketStatus::Open);
    }

    #[test]
    fn closed_outside_session_minutes() {
        assert_eq!(market_status(ist(2026, 8, 26, 9, 14)), MarketStatus::Closed);
        assert_eq!(market_status(ist(2026, 8, 26, 15, 31)), MarketStatus::Closed);
        assert_eq!(market_status(ist(2026, 8, 26, 2, 0)), MarketStatus::Closed);
    }

    #[test]
    fn closed_on_weekends() {
        // 2026-08-29/30 are Saturday/Sunday.
        assert_eq!(market_status(ist(2026, 8, 29, 10, 0)), MarketStatus::Closed);
        assert_eq!(market_status(ist(2026, 8, 30, 10, 0)), MarketStatus::Closed);
    }

    #[test]
    fn boundary_is_evaluated_in_ist_not_utc() {
        // 04:30 UTC == 10:00 IST, inside the session.
        let utc = Utc.with_ymd_and_hms(2026, 8, 26, 4, 30, 0).single().unwrap();
        assert_eq!(market_status(utc), MarketStatus::Open);
    }

    #[test]
    fn status_line_names_the_state() {
        assert!(status_line(ist(2026, 8, 26, 10, 0)).starts_with("NSE OPEN"));
        assert!(status_line(ist(2026, 8, 29, 10, 0)).starts_with("NSE CLOSED"));
    }
}
