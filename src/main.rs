use anyhow::Result;
use chrono::Utc;
use log::warn;
use tokio::io::{AsyncBufReadExt, BufReader};

use obslog::report::sink::{suggested_filename, FileSink, ReportSink};
use obslog::{
    generate_report, EngagementLevel, SessionController, SessionSnapshot, TeachingAction,
    TeachingMode,
};

const HELP: &str = "\
commands:
  start                begin a session (stop first if one is running)
  stop                 end the session and print the report
  subject <name>       set the subject (inactive sessions only)
  mode <name>          lecture | discussion | practice | digital
  action <name>        encourage | correct | openq | closedq | walk
  engage <level>       low | mid | high
  note <text>          append a free-text note
  feed                 show the most recent log entries
  save <dir>           write the last report to a directory
  help                 this text
  quit";

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let controller = SessionController::new();
    let mut last_snapshot: Option<SessionSnapshot> = None;

    println!("obslog — classroom observation logger (type 'help')");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, rest) = match line.split_once(' ') {
            Some((c, r)) => (c, r.trim()),
            None => (line, ""),
        };

        match command {
            "" => {}
            "help" => println!("{}", HELP),
            "quit" | "exit" => break,
            "start" | "stop" => {
                let wants_start = command == "start";
                if wants_start == controller.is_active().await {
                    println!(
                        "session is already {}",
                        if wants_start { "running" } else { "stopped" }
                    );
                    continue;
                }
                match controller.toggle_session().await {
                    None => println!("session started"),
                    Some(snapshot) => {
                        let report = generate_report(&snapshot, Utc::now());
                        println!("{}", report);
                        last_snapshot = Some(snapshot);
                    }
                }
            }
            "subject" => {
                controller.set_subject(rest).await;
                if controller.is_active().await {
                    println!("subject is locked while a session is running");
                }
            }
            "mode" => match parse_mode(rest) {
                Some(mode) => controller.select_mode(mode).await,
                None => println!("unknown mode '{}'", rest),
            },
            "action" => match parse_action(rest) {
                Some(action) => controller.log_action(action).await,
                None => println!("unknown action '{}'", rest),
            },
            "engage" => match parse_engagement(rest) {
                Some(level) => controller.set_engagement(level).await,
                None => println!("unknown level '{}'", rest),
            },
            "note" => controller.submit_note(rest).await,
            "feed" => {
                for entry in controller.recent_entries(10).await {
                    println!(
                        "[{:02}:{:02}] {}{}",
                        entry.relative_secs / 60,
                        entry.relative_secs % 60,
                        entry.label,
                        entry
                            .value
                            .as_deref()
                            .map(|v| format!(": {}", v))
                            .unwrap_or_default()
                    );
                }
            }
            "save" => match &last_snapshot {
                Some(snapshot) => {
                    let report = generate_report(snapshot, Utc::now());
                    let filename =
                        suggested_filename(&snapshot.subject, snapshot.stopped_at.date_naive());
                    let dir = if rest.is_empty() { "." } else { rest };
                    let mut sink = FileSink::new(dir);
                    match sink.deliver(&report, &filename) {
                        Ok(()) => println!("saved {}", filename),
                        Err(err) => warn!("save failed: {:#}", err),
                    }
                }
                None => println!("no finished session to save"),
            },
            other => println!("unknown command '{}' (try 'help')", other),
        }

        if controller.remind_engagement().await {
            println!("* five minutes without a log entry — consider rating engagement *");
        }
    }

    Ok(())
}

fn parse_mode(name: &str) -> Option<TeachingMode> {
    match name.to_ascii_lowercase().as_str() {
        "lecture" => Some(TeachingMode::Lecture),
        "discussion" => Some(TeachingMode::Discussion),
        "practice" => Some(TeachingMode::Practice),
        "digital" => Some(TeachingMode::Digital),
        _ => None,
    }
}

fn parse_action(name: &str) -> Option<TeachingAction> {
    match name.to_ascii_lowercase().as_str() {
        "encourage" => Some(TeachingAction::Encourage),
        "correct" => Some(TeachingAction::Correct),
        "openq" => Some(TeachingAction::OpenQuestion),
        "closedq" => Some(TeachingAction::ClosedQuestion),
        "walk" => Some(TeachingAction::Walk),
        _ => None,
    }
}

fn parse_engagement(name: &str) -> Option<EngagementLevel> {
    match name.to_ascii_lowercase().as_str() {
        "low" => Some(EngagementLevel::Low),
        "mid" => Some(EngagementLevel::Mid),
        "high" => Some(EngagementLevel::High),
        _ => None,
    }
}
