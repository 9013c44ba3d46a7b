//! Display formatting for timers and cooldowns.
//!
//! All countdown-style strings shown by the app go through this module so
//! timer cards, cooldown badges and stat readouts stay consistent.

/// Format a running timer's remaining milliseconds.
///
/// - Under an hour: `M:SS`
/// - An hour or more: `H:MM:SS`
/// - Zero or negative: `0:00`
///
/// # Examples
/// ```
/// use grimoire_types::formatting::format_countdown;
/// assert_eq!(format_countdown(125_000), "2:05");
/// assert_eq!(format_countdown(59_000), "0:59");
/// assert_eq!(format_countdown(3_725_000), "1:02:05");
/// assert_eq!(format_countdown(-500), "0:00");
/// ```
pub fn format_countdown(ms: i64) -> String {
    let total = ms.max(0) / 1000;
    let hours = total / 3600;
    let mins = (total % 3600) / 60;
    let secs = total % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, mins, secs)
    } else {
        format!("{}:{:02}", mins, secs)
    }
}

/// Format remaining cooldown milliseconds as a coarse badge readout.
///
/// Always shows both units (`"0h 45m"` under an hour); `"ready"` at or
/// below zero.
///
/// # Examples
/// ```
/// use grimoire_types::formatting::format_cooldown;
/// assert_eq!(format_cooldown(5 * 3_600_000 + 30 * 60_000), "5h 30m");
/// assert_eq!(format_cooldown(45 * 60_000), "0h 45m");
/// assert_eq!(format_cooldown(0), "ready");
/// ```
pub fn format_cooldown(ms: i64) -> String {
    if ms <= 0 {
        return "ready".to_string();
    }
    let hours = ms / 3_600_000;
    let mins = (ms % 3_600_000) / 60_000;
    format!("{}h {}m", hours, mins)
}
