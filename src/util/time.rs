//! Duration parsing and formatting for `--timeout` and the config file.

use std::time::Duration;

/// Parse a duration such as `90`, `30s`, `5m`, `1h` or `1m30s`.
///
/// A bare number is read as seconds. Units may be combined, largest first
/// by convention though any order is accepted. Zero is rejected because a
/// zero timeout would cancel every request immediately.
///
/// # Errors
///
/// Returns a message describing the problem when the input is malformed.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let s = input.trim();
    if s.is_empty() {
        return Err("empty duration".to_string());
    }

    if let Ok(secs) = s.parse::<u64>() {
        return nonzero(Duration::from_secs(secs), input);
    }

    let mut total = Duration::ZERO;
    let mut digits = String::new();
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }

        let mut unit = String::from(c);
        while let Some(&next) = chars.peek() {
            if next.is_ascii_alphabetic() {
                unit.push(next);
                chars.next();
            } else {
                break;
            }
        }

        if digits.is_empty() {
            return Err(format!("missing number before '{unit}' in '{input}'"));
        }
        let value: u64 = digits
            .parse()
            .map_err(|_| format!("number too large in '{input}'"))?;
        digits.clear();

        let part = match unit.as_str() {
            "ms" => Duration::from_millis(value),
            "s" => Duration::from_secs(value),
            "m" => Duration::from_secs(value.saturating_mul(60)),
            "h" => Duration::from_secs(value.saturating_mul(3600)),
            other => return Err(format!("unknown unit '{other}' in '{input}' (use ms, s, m, h)")),
        };
        total = total.saturating_add(part);
    }

    if !digits.is_empty() {
        return Err(format!("missing unit after '{digits}' in '{input}'"));
    }

    nonzero(total, input)
}

fn nonzero(duration: Duration, input: &str) -> Result<Duration, String> {
    if duration.is_zero() {
        Err(format!("duration '{input}' must be greater than zero"))
    } else {
        Ok(duration)
    }
}

/// Format a duration compactly (`5m`, `1m30s`, `250ms`).
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs == 0 {
        return format!("{}ms", duration.as_millis());
    }

    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{hours}h"));
    }
    if minutes > 0 {
        out.push_str(&format!("{minutes}m"));
    }
    if seconds > 0 {
        out.push_str(&format!("{seconds}s"));
    }
    out
}
