use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use log::info;
use uuid::Uuid;

use crate::models::{
    EngagementLevel, EntryKind, ModeDurations, ObservationEntry, SessionSnapshot, TeachingAction,
    TeachingMode,
};

/// Activity gap after which the observer is nudged to re-rate engagement.
pub const INACTIVITY_THRESHOLD: Duration = Duration::from_secs(300);

pub const ENTER_MODE_LABEL: &str = "Enter mode";
pub const EXIT_MODE_LABEL: &str = "Exit mode";
pub const NOTE_LABEL: &str = "Field note";
pub const ENGAGEMENT_LABEL: &str = "Student engagement";

/// The mutable session aggregate. All observation rules live here as plain
/// synchronous methods; the controller drives them from user input and
/// timer ticks. Invalid operations are silent no-ops rather than errors,
/// so an observer is never interrupted mid-class.
#[derive(Debug)]
pub struct SessionState {
    pub active: bool,
    pub subject: String,
    pub started_at: Option<DateTime<Utc>>,
    pub stopped_at: Option<DateTime<Utc>>,
    /// Whole seconds since start, advanced once per ticker fire.
    pub relative_secs: u64,
    pub current_mode: TeachingMode,
    pub engagement: EngagementLevel,
    pub mode_durations: ModeDurations,
    entries: Vec<ObservationEntry>,
    last_activity: Instant,
    pub remind_engagement: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            active: false,
            subject: String::new(),
            started_at: None,
            stopped_at: None,
            relative_secs: 0,
            current_mode: TeachingMode::None,
            engagement: EngagementLevel::default(),
            mode_durations: ModeDurations::new(),
            entries: Vec::new(),
            last_activity: Instant::now(),
            remind_engagement: false,
        }
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[ObservationEntry] {
        &self.entries
    }

    /// Most-recent-first view for the live feed. Presentation-only
    /// reordering of the same append-ordered log.
    pub fn recent_entries(&self, limit: usize) -> Vec<ObservationEntry> {
        self.entries.iter().rev().take(limit).cloned().collect()
    }

    /// Begin a new session, discarding whatever the previous one left
    /// behind. No-op if one is already running.
    pub fn start(&mut self, now: DateTime<Utc>) {
        if self.active {
            return;
        }
        self.active = true;
        self.started_at = Some(now);
        self.stopped_at = None;
        self.relative_secs = 0;
        self.current_mode = TeachingMode::None;
        self.engagement = EngagementLevel::default();
        self.mode_durations = ModeDurations::new();
        self.entries.clear();
        self.last_activity = Instant::now();
        self.remind_engagement = false;
        info!("session started for subject '{}'", self.subject);
    }

    /// End the session and freeze its contents into a snapshot. Current
    /// mode and engagement are deliberately left as-is; they stop accruing
    /// but stay visible until the next start resets them. Returns `None`
    /// if no session is running.
    pub fn stop(&mut self, now: DateTime<Utc>) -> Option<SessionSnapshot> {
        if !self.active {
            return None;
        }
        self.active = false;
        self.stopped_at = Some(now);
        info!(
            "session stopped after {}s with {} log entries",
            self.relative_secs,
            self.entries.len()
        );
        Some(SessionSnapshot {
            subject: self.subject.clone(),
            started_at: self.started_at.unwrap_or(now),
            stopped_at: now,
            entries: self.entries.clone(),
            mode_durations: self.mode_durations.clone(),
        })
    }

    /// One second of session time. Attributes the second to the active
    /// mode, or to nothing while the mode is `None`.
    pub fn tick(&mut self) {
        if !self.active {
            return;
        }
        self.relative_secs += 1;
        self.mode_durations.increment(self.current_mode);
    }

    /// Mode selection per the observation workflow: re-selecting the active
    /// mode pauses it (back to `None`); selecting a different one switches
    /// to it directly, with no intermediate pause.
    pub fn select_mode(&mut self, requested: TeachingMode) {
        if !self.active || requested == TeachingMode::None {
            return;
        }
        if self.current_mode == requested {
            self.current_mode = TeachingMode::None;
            self.append(
                EntryKind::ModeChange,
                EXIT_MODE_LABEL.to_string(),
                Some(requested.label().to_string()),
            );
        } else {
            self.current_mode = requested;
            self.append(
                EntryKind::ModeChange,
                ENTER_MODE_LABEL.to_string(),
                Some(requested.label().to_string()),
            );
        }
    }

    pub fn log_action(&mut self, action: TeachingAction) {
        if !self.active {
            return;
        }
        self.append(EntryKind::Action, action.label().to_string(), None);
    }

    pub fn set_engagement(&mut self, level: EngagementLevel) {
        if !self.active {
            return;
        }
        self.engagement = level;
        self.append(
            EntryKind::Engagement,
            ENGAGEMENT_LABEL.to_string(),
            Some(level.label().to_string()),
        );
    }

    /// Record a free-text note. Whitespace-only input is rejected without
    /// touching the log.
    pub fn submit_note(&mut self, text: &str) {
        if !self.active {
            return;
        }
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return;
        }
        self.append(EntryKind::Note, NOTE_LABEL.to_string(), Some(trimmed.to_string()));
    }

    /// Subject is locked for the duration of a session.
    pub fn set_subject(&mut self, name: &str) {
        if self.active {
            return;
        }
        self.subject = name.to_string();
    }

    /// Raise the engagement reminder when the observer has logged nothing
    /// for too long. Advisory only; never touches session data.
    pub fn check_inactivity(&mut self) {
        if self.active && self.last_activity.elapsed() > INACTIVITY_THRESHOLD {
            self.remind_engagement = true;
        }
    }

    fn append(&mut self, kind: EntryKind, label: String, value: Option<String>) {
        // Any logged event counts as observer activity.
        self.last_activity = Instant::now();
        self.remind_engagement = false;
        self.entries.push(ObservationEntry {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            relative_secs: self.relative_secs,
            kind,
            label,
            value,
        });
    }

    #[cfg(test)]
    pub(crate) fn backdate_activity(&mut self, by: Duration) {
        self.last_activity = Instant::now() - by;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(subject: &str) -> SessionState {
        let mut state = SessionState::new();
        state.set_subject(subject);
        state.start(Utc::now());
        state
    }

    fn tick_n(state: &mut SessionState, n: u64) {
        for _ in 0..n {
            state.tick();
        }
    }

    #[test]
    fn worked_example_math_session() {
        let mut state = started("Math");
        state.select_mode(TeachingMode::Lecture);
        tick_n(&mut state, 65);
        state.select_mode(TeachingMode::Discussion);
        tick_n(&mut state, 30);
        state.log_action(TeachingAction::Encourage);
        let snapshot = state.stop(Utc::now()).expect("session was active");

        assert_eq!(snapshot.mode_durations.get(TeachingMode::Lecture), 65);
        assert_eq!(snapshot.mode_durations.get(TeachingMode::Discussion), 30);
        assert_eq!(snapshot.mode_durations.get(TeachingMode::Practice), 0);
        assert_eq!(snapshot.mode_durations.get(TeachingMode::Digital), 0);
        assert_eq!(snapshot.mode_durations.total(), 95);

        assert_eq!(snapshot.entries.len(), 3);
        assert_eq!(snapshot.entries[0].kind, EntryKind::ModeChange);
        assert_eq!(snapshot.entries[1].kind, EntryKind::ModeChange);
        assert_eq!(snapshot.entries[2].kind, EntryKind::Action);
        assert_eq!(snapshot.entries[2].label, TeachingAction::Encourage.label());
    }

    #[test]
    fn reselecting_active_mode_pauses_it() {
        let mut state = started("Math");
        state.select_mode(TeachingMode::Lecture);
        tick_n(&mut state, 5);
        state.select_mode(TeachingMode::Lecture);
        tick_n(&mut state, 5);

        assert_eq!(state.current_mode, TeachingMode::None);
        assert_eq!(state.mode_durations.get(TeachingMode::Lecture), 5);
        assert_eq!(state.mode_durations.total(), 5);
        assert_eq!(state.entries()[1].label, EXIT_MODE_LABEL);
        assert_eq!(
            state.entries()[1].value.as_deref(),
            Some(TeachingMode::Lecture.label())
        );
    }

    #[test]
    fn mode_switch_is_a_direct_edge() {
        let mut state = started("Math");
        state.select_mode(TeachingMode::Lecture);
        state.select_mode(TeachingMode::Practice);

        assert_eq!(state.current_mode, TeachingMode::Practice);
        // Two "enter" entries, no intermediate exit.
        let labels: Vec<_> = state.entries().iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec![ENTER_MODE_LABEL, ENTER_MODE_LABEL]);
    }

    #[test]
    fn ticks_with_no_mode_attribute_nothing() {
        let mut state = started("Math");
        tick_n(&mut state, 10);
        state.select_mode(TeachingMode::Digital);
        tick_n(&mut state, 4);

        assert_eq!(state.relative_secs, 14);
        assert_eq!(state.mode_durations.total(), 4);
        // Duration conservation: attributed time never exceeds elapsed time.
        assert!(state.mode_durations.total() <= state.relative_secs);
    }

    #[test]
    fn operations_before_start_are_no_ops() {
        let mut state = SessionState::new();
        state.log_action(TeachingAction::Walk);
        state.select_mode(TeachingMode::Lecture);
        state.set_engagement(EngagementLevel::High);
        state.submit_note("unsanctioned");
        state.tick();

        assert!(state.entries().is_empty());
        assert_eq!(state.current_mode, TeachingMode::None);
        assert_eq!(state.relative_secs, 0);
        assert_eq!(state.engagement, EngagementLevel::Mid);
    }

    #[test]
    fn blank_note_is_rejected() {
        let mut state = started("Math");
        state.submit_note("   ");
        assert!(state.entries().is_empty());

        state.submit_note("  pacing felt rushed  ");
        assert_eq!(state.entries().len(), 1);
        assert_eq!(
            state.entries()[0].value.as_deref(),
            Some("pacing felt rushed")
        );
    }

    #[test]
    fn subject_is_locked_while_active() {
        let mut state = started("Math");
        state.set_subject("Art");
        assert_eq!(state.subject, "Math");

        state.stop(Utc::now());
        state.set_subject("Art");
        assert_eq!(state.subject, "Art");
    }

    #[test]
    fn relative_time_is_monotonic_across_the_log() {
        let mut state = started("Science");
        state.select_mode(TeachingMode::Lecture);
        tick_n(&mut state, 3);
        state.log_action(TeachingAction::OpenQuestion);
        tick_n(&mut state, 7);
        state.submit_note("good follow-up");
        state.set_engagement(EngagementLevel::High);
        tick_n(&mut state, 2);
        state.log_action(TeachingAction::Walk);

        let times: Vec<_> = state.entries().iter().map(|e| e.relative_secs).collect();
        assert!(times.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn engagement_changes_keep_history_in_the_log() {
        let mut state = started("English");
        state.set_engagement(EngagementLevel::Low);
        state.set_engagement(EngagementLevel::High);

        assert_eq!(state.engagement, EngagementLevel::High);
        let values: Vec<_> = state
            .entries()
            .iter()
            .filter(|e| e.kind == EntryKind::Engagement)
            .map(|e| e.value.clone().unwrap())
            .collect();
        assert_eq!(values, vec!["Low", "High"]);
    }

    #[test]
    fn start_resets_previous_session_state() {
        let mut state = started("Math");
        state.select_mode(TeachingMode::Lecture);
        tick_n(&mut state, 30);
        state.stop(Utc::now());

        // Mode and engagement persist after stop but no longer accrue.
        assert_eq!(state.current_mode, TeachingMode::Lecture);
        state.tick();
        assert_eq!(state.relative_secs, 30);

        state.start(Utc::now());
        assert_eq!(state.relative_secs, 0);
        assert_eq!(state.current_mode, TeachingMode::None);
        assert_eq!(state.mode_durations.total(), 0);
        assert!(state.entries().is_empty());
        assert!(state.stopped_at.is_none());
    }

    #[test]
    fn stop_while_inactive_yields_no_snapshot() {
        let mut state = SessionState::new();
        assert!(state.stop(Utc::now()).is_none());
    }

    #[test]
    fn inactivity_raises_reminder_and_any_append_clears_it() {
        let mut state = started("Math");
        state.backdate_activity(INACTIVITY_THRESHOLD + Duration::from_secs(1));
        state.check_inactivity();
        assert!(state.remind_engagement);

        state.log_action(TeachingAction::Encourage);
        assert!(!state.remind_engagement);
        state.check_inactivity();
        assert!(!state.remind_engagement);
    }

    #[test]
    fn inactivity_reminder_only_while_active() {
        let mut state = SessionState::new();
        state.backdate_activity(INACTIVITY_THRESHOLD + Duration::from_secs(1));
        state.check_inactivity();
        assert!(!state.remind_engagement);
    }

    #[test]
    fn recent_entries_reverses_append_order() {
        let mut state = started("Math");
        state.log_action(TeachingAction::Encourage);
        state.log_action(TeachingAction::Correct);
        state.log_action(TeachingAction::Walk);

        let recent = state.recent_entries(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].label, TeachingAction::Walk.label());
        assert_eq!(recent[1].label, TeachingAction::Correct.label());
        // Underlying log untouched.
        assert_eq!(state.entries()[0].label, TeachingAction::Encourage.label());
    }
}
