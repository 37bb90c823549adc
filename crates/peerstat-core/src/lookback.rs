// ── Lookback window ──

use tracing::warn;

/// Milliseconds in one day.
pub const DAY_MS: i64 = 86_400_000;

/// How many days before "now" the report window starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lookback {
    days: i64,
}

impl Lookback {
    pub fn from_days(days: i64) -> Self {
        Self { days }
    }

    /// Parse a typed answer. Anything that is not an integer becomes zero
    /// days; the run continues with a window ending now.
    pub fn parse_lenient(input: &str) -> Self {
        let input = input.trim();
        match input.parse::<i64>() {
            Ok(days) => Self::from_days(days),
            Err(e) => {
                warn!(input, error = %e, "lookback is not a whole number of days, using 0");
                Self::default()
            }
        }
    }

    pub fn days(self) -> i64 {
        self.days
    }

    /// The `from` value of the query: negative milliseconds relative to now.
    pub fn offset_ms(self) -> i64 {
        self.days.saturating_mul(-DAY_MS)
    }
}
