use std::time::Duration;
use time::macros::format_description;
use time::OffsetDateTime;

/// Format a duration as "1h 02m 03s", "2m 03s" or "3.21s"
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{}h {:02}m {:02}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {:02}s", minutes, seconds)
    } else {
        format!("{:.2}s", elapsed.as_secs_f64())
    }
}

/// Current UTC wall-clock time as HH:MM:SS
pub fn clock_time() -> String {
    OffsetDateTime::now_utc()
        .format(format_description!("[hour]:[minute]:[second]"))
        .unwrap_or_else(|_| "??:??:??".to_string())
}

/// Render a tag list the way every view prints it: `["NLP", "ML"]`
pub fn format_tags(tags: &[String]) -> String {
    format!("{:?}", tags)
}
