// Local time formatting for departures and the board clock
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

const SHORT_FORMAT: &str = "%H:%M";
const CLOCK_FORMAT: &str = "%H:%M:%S";

#[derive(Debug, Clone, Copy)]
pub struct TimeFormatter {
    tz: Tz,
}

impl TimeFormatter {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Departure time, e.g. `07:12`.
    pub fn short(&self, time: DateTime<Utc>) -> String {
        time.with_timezone(&self.tz).format(SHORT_FORMAT).to_string()
    }

    pub fn clock(&self, time: DateTime<Utc>) -> String {
        time.with_timezone(&self.tz).format(CLOCK_FORMAT).to_string()
    }
}

impl Default for TimeFormatter {
    fn default() -> Self {
        Self::new(chrono_tz::Europe::Helsinki)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_formats_in_local_time() {
        let formatter = TimeFormatter::default();

        // Summer time, UTC+3
        let summer = Utc.with_ymd_and_hms(2026, 7, 1, 4, 5, 9).unwrap();
        assert_eq!(formatter.short(summer), "07:05");
        assert_eq!(formatter.clock(summer), "07:05:09");

        // Winter time, UTC+2
        let winter = Utc.with_ymd_and_hms(2026, 12, 1, 22, 30, 0).unwrap();
        assert_eq!(formatter.short(winter), "00:30");
    }

    #[test]
    fn test_custom_zone() {
        let formatter = TimeFormatter::new(chrono_tz::UTC);
        let time = Utc.with_ymd_and_hms(2026, 10, 16, 7, 12, 0).unwrap();
        assert_eq!(formatter.short(time), "07:12");
    }
}
