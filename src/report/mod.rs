pub mod sink;
pub mod stats;

use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::models::SessionSnapshot;

const REPORT_TITLE: &str = "Classroom Observation Report";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render a finished session as a plain-text report. Pure: identical
/// snapshot and generation time produce identical text. The caller supplies
/// `generated_at` so the footer timestamp stays distinct from the session's
/// end time.
pub fn generate_report(snapshot: &SessionSnapshot, generated_at: DateTime<Utc>) -> String {
    let total = stats::total_seconds(&snapshot.mode_durations);
    let mut out = String::new();

    let _ = writeln!(out, "{}", REPORT_TITLE);
    let _ = writeln!(out, "{}", "=".repeat(REPORT_TITLE.len()));
    let _ = writeln!(out, "Subject: {}", snapshot.subject);
    let _ = writeln!(
        out,
        "Started: {}",
        snapshot.started_at.format(TIMESTAMP_FORMAT)
    );
    let _ = writeln!(
        out,
        "Ended:   {}",
        snapshot.stopped_at.format(TIMESTAMP_FORMAT)
    );
    let _ = writeln!(out, "Timed total: {}", format_minutes_seconds(total));
    let _ = writeln!(out);

    let _ = writeln!(out, "[Teaching modes]");
    for (mode, secs) in snapshot.mode_durations.iter() {
        let percent = stats::percent_of(mode, &snapshot.mode_durations);
        let _ = writeln!(
            out,
            "- {}: {} ({:.1}%)",
            mode.label(),
            format_minutes_seconds(secs),
            percent
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "[Teaching actions]");
    let counts = stats::action_counts(&snapshot.entries);
    for (action, count) in counts.iter() {
        let _ = writeln!(out, "- {}: {}", action.label(), count);
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "[Chronological log]");
    for entry in &snapshot.entries {
        let _ = write!(
            out,
            "[{}] {} {} {}",
            format_clock(entry.relative_secs),
            entry.timestamp.format(TIMESTAMP_FORMAT),
            entry.kind.tag(),
            entry.label
        );
        match &entry.value {
            Some(value) => {
                let _ = writeln!(out, ": {}", value);
            }
            None => {
                let _ = writeln!(out);
            }
        }
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Generated at {}", generated_at.format(TIMESTAMP_FORMAT));
    out
}

/// `MM:SS`, zero-padded, minutes allowed past 99 for long sessions.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn format_minutes_seconds(secs: u64) -> String {
    format!("{}m {}s", secs / 60, secs % 60)
}
