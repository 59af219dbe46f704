use chrono::{DateTime, Utc};

/// Format `dt` relative to `now` (e.g., "3 days ago")
pub fn format_relative(dt: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = now.signed_duration_since(dt).num_seconds();

    let units = [
        (365 * 24 * 60 * 60, "year", "years"),
        (30 * 24 * 60 * 60, "month", "months"),
        (7 * 24 * 60 * 60, "week", "weeks"),
        (24 * 60 * 60, "day", "days"),
        (60 * 60, "hour", "hours"),
        (60, "min", "mins"),
    ];

    for (unit_secs, singular, plural) in units {
        if secs >= unit_secs {
            let count = secs / unit_secs;
            let label = if count == 1 { singular } else { plural };
            return format!("{} {} ago", count, label);
        }
    }

    "just now".to_string()
}

/// Short form for the commit log: "3d", "5h", or "Jan 05" past a month
pub fn format_relative_short(dt: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = now.signed_duration_since(dt).num_seconds();

    if secs >= 30 * 24 * 60 * 60 {
        return dt.format("%b %d").to_string();
    }

    let units = [
        (7 * 24 * 60 * 60, "w"),
        (24 * 60 * 60, "d"),
        (60 * 60, "h"),
        (60, "m"),
    ];

    for (unit_secs, suffix) in units {
        if secs >= unit_secs {
            return format!("{}{}", secs / unit_secs, suffix);
        }
    }

    "now".to_string()
}
