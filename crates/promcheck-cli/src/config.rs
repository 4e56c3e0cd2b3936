use chrono::{DateTime, Duration, Local, NaiveDateTime, TimeZone, Utc};
use clap::Parser;
use promcheck_common::duration::parse_duration;
use std::time::Duration as StdDuration;

/// Largest allowed replay window; bigger queries can stall the server.
pub const MAX_WINDOW: StdDuration = StdDuration::from_secs(4 * 3600);

/// How far back the replay start may reach.
pub const MAX_LOOKBACK_DAYS: i64 = 90;

/// Default range-query resolution step.
pub const DEFAULT_STEP: &str = "1m";

const TARGET_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Replay Prometheus alerting rules against historical data.
///
/// Queries each rule's expression over a window around the target time and
/// reports which series would have been SILENT, PENDING, or FIRING.
#[derive(Parser, Debug)]
#[command(name = "promcheck", version)]
pub struct Cli {
    /// Path to the alerting rule file (YAML)
    #[arg(long, default_value = "alert.yaml")]
    pub file: String,

    /// Prometheus API URL
    #[arg(long, default_value = "http://localhost:9090")]
    pub url: String,

    /// Target timestamp ('YYYY-MM-DD HH:MM', local time). Defaults to now.
    #[arg(long)]
    pub at: Option<String>,

    /// Time window around the target (the replay covers target ± window)
    #[arg(long, default_value = "30m")]
    pub window: String,

    /// Query resolution step
    #[arg(long, default_value = DEFAULT_STEP)]
    pub step: String,

    /// Output format: text, json, or yaml
    #[arg(long, default_value = "text")]
    pub output: String,
}

impl Cli {
    pub fn step_duration(&self) -> Result<StdDuration, ConfigError> {
        parse_duration(&self.step).ok_or_else(|| ConfigError::InvalidStep(self.step.clone()))
    }
}

/// Startup validation errors. Unlike a rule's malformed `for` (absorbed by
/// the engine), these abort the run before any query is issued.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid window '{0}', expected a duration like 30m or 1h")]
    InvalidWindow(String),

    #[error("window {0} exceeds the maximum allowed 4h")]
    WindowTooLarge(String),

    #[error("invalid target time '{0}', expected 'YYYY-MM-DD HH:MM'")]
    InvalidTarget(String),

    #[error("replay start {0} is older than the {MAX_LOOKBACK_DAYS}-day lookback limit")]
    LookbackTooFar(String),

    #[error("invalid step '{0}', expected a duration like 1m or 30s")]
    InvalidStep(String),
}

/// The resolved `[target - window, target + window]` query range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// True when no `--at` was given and the target is "now".
    pub realtime: bool,
}

impl ReplayWindow {
    pub fn resolve(
        at: Option<&str>,
        window: &str,
        now: DateTime<Utc>,
    ) -> Result<Self, ConfigError> {
        let window_d =
            parse_duration(window).ok_or_else(|| ConfigError::InvalidWindow(window.to_string()))?;
        if window_d > MAX_WINDOW {
            return Err(ConfigError::WindowTooLarge(window.to_string()));
        }
        let half = Duration::from_std(window_d)
            .map_err(|_| ConfigError::InvalidWindow(window.to_string()))?;

        let (target, realtime) = match at {
            None => (now, true),
            Some(s) => {
                let naive = NaiveDateTime::parse_from_str(s, TARGET_TIME_FORMAT)
                    .map_err(|_| ConfigError::InvalidTarget(s.to_string()))?;
                let local = Local
                    .from_local_datetime(&naive)
                    .single()
                    .ok_or_else(|| ConfigError::InvalidTarget(s.to_string()))?;
                (local.with_timezone(&Utc), false)
            }
        };

        let start = target - half;
        let end = target + half;

        let lookback_limit = now - Duration::days(MAX_LOOKBACK_DAYS);
        if start < lookback_limit {
            return Err(ConfigError::LookbackTooFar(
                start.format("%Y-%m-%d").to_string(),
            ));
        }

        Ok(Self {
            start,
            end,
            realtime,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn realtime_window_centers_on_now() {
        let window = ReplayWindow::resolve(None, "30m", now()).unwrap();
        assert!(window.realtime);
        assert_eq!(window.start, now() - Duration::minutes(30));
        assert_eq!(window.end, now() + Duration::minutes(30));
    }

    #[test]
    fn explicit_target_spans_twice_the_window() {
        let near_target = Utc.with_ymd_and_hms(2023, 11, 12, 0, 0, 0).unwrap();
        let window =
            ReplayWindow::resolve(Some("2023-11-10 14:30"), "1h", near_target).unwrap();
        assert!(!window.realtime);
        assert_eq!(window.end - window.start, Duration::hours(2));
    }

    #[test]
    fn window_cap_is_four_hours() {
        assert!(matches!(
            ReplayWindow::resolve(None, "5h", now()),
            Err(ConfigError::WindowTooLarge(_))
        ));
        // The boundary itself is allowed.
        assert!(ReplayWindow::resolve(None, "4h", now()).is_ok());
    }

    #[test]
    fn invalid_window_is_rejected() {
        assert!(matches!(
            ReplayWindow::resolve(None, "banana", now()),
            Err(ConfigError::InvalidWindow(_))
        ));
    }

    #[test]
    fn invalid_target_is_rejected() {
        assert!(matches!(
            ReplayWindow::resolve(Some("tomorrow-ish"), "30m", now()),
            Err(ConfigError::InvalidTarget(_))
        ));
    }

    #[test]
    fn lookback_limit_blocks_old_targets() {
        let real_now = Utc::now();
        let four_months_ago = real_now - Duration::days(120);
        let at = four_months_ago
            .with_timezone(&Local)
            .format(TARGET_TIME_FORMAT)
            .to_string();

        assert!(matches!(
            ReplayWindow::resolve(Some(&at), "30m", real_now),
            Err(ConfigError::LookbackTooFar(_))
        ));
    }
}
