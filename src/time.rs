//! Wall-clock helpers shared by the IAMAT handler (time skew) and the
//! log file sink (timestamp prefix).

use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time as fractional seconds since the Unix epoch.
pub fn now_epoch_seconds() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}

/// Render a signed decimal with an explicit leading `+` when `value >= 0`,
/// matching the wire format for `time_skew` (spec.md §3).
pub fn format_signed(value: f64) -> String {
    if value >= 0.0 {
        format!("+{value}")
    } else {
        format!("{value}")
    }
}
