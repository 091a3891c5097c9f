use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Teaching mode currently being timed. Exactly one is active at any
/// instant; `None` means time is deliberately unattributed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TeachingMode {
    None,
    Lecture,
    Discussion,
    Practice,
    Digital,
}

impl Default for TeachingMode {
    fn default() -> Self {
        TeachingMode::None
    }
}

impl TeachingMode {
    /// The timed modes, in declaration order. `None` is excluded: it never
    /// accrues duration and never appears in statistics.
    pub const ALL_TIMED: [TeachingMode; 4] = [
        TeachingMode::Lecture,
        TeachingMode::Discussion,
        TeachingMode::Practice,
        TeachingMode::Digital,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TeachingMode::None => "None",
            TeachingMode::Lecture => "Lecture",
            TeachingMode::Discussion => "Discussion",
            TeachingMode::Practice => "Practice",
            TeachingMode::Digital => "Digital",
        }
    }

    fn slot(&self) -> Option<usize> {
        match self {
            TeachingMode::None => None,
            TeachingMode::Lecture => Some(0),
            TeachingMode::Discussion => Some(1),
            TeachingMode::Practice => Some(2),
            TeachingMode::Digital => Some(3),
        }
    }
}

/// Instantaneous, repeatable teaching behavior the observer can log.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TeachingAction {
    Encourage,
    Correct,
    OpenQuestion,
    ClosedQuestion,
    Walk,
}

impl TeachingAction {
    pub const ALL: [TeachingAction; 5] = [
        TeachingAction::Encourage,
        TeachingAction::Correct,
        TeachingAction::OpenQuestion,
        TeachingAction::ClosedQuestion,
        TeachingAction::Walk,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TeachingAction::Encourage => "Encourage",
            TeachingAction::Correct => "Correct",
            TeachingAction::OpenQuestion => "Open question",
            TeachingAction::ClosedQuestion => "Closed question",
            TeachingAction::Walk => "Walk",
        }
    }

    fn slot(&self) -> usize {
        match self {
            TeachingAction::Encourage => 0,
            TeachingAction::Correct => 1,
            TeachingAction::OpenQuestion => 2,
            TeachingAction::ClosedQuestion => 3,
            TeachingAction::Walk => 4,
        }
    }
}

/// Occurrence count per teaching action. Fixed-size and indexed by the
/// action enum, so every action is structurally present even at zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActionCounts {
    counts: [u64; TeachingAction::ALL.len()],
}

impl ActionCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, action: TeachingAction) -> u64 {
        self.counts[action.slot()]
    }

    pub fn increment(&mut self, action: TeachingAction) {
        self.counts[action.slot()] += 1;
    }

    /// Actions with their counts, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (TeachingAction, u64)> + '_ {
        TeachingAction::ALL
            .iter()
            .map(move |&action| (action, self.get(action)))
    }
}

/// Observer's most recent rating of student attentiveness.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum EngagementLevel {
    Low,
    Mid,
    High,
}

impl Default for EngagementLevel {
    fn default() -> Self {
        EngagementLevel::Mid
    }
}

impl EngagementLevel {
    pub fn label(&self) -> &'static str {
        match self {
            EngagementLevel::Low => "Low",
            EngagementLevel::Mid => "Mid",
            EngagementLevel::High => "High",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum EntryKind {
    ModeChange,
    Action,
    Note,
    Engagement,
}

impl EntryKind {
    /// Short fixed-width tag used in the report's log table.
    pub fn tag(&self) -> &'static str {
        match self {
            EntryKind::ModeChange => "MODE",
            EntryKind::Action => "ACT ",
            EntryKind::Note => "NOTE",
            EntryKind::Engagement => "ENGM",
        }
    }
}

/// One immutable line of the observation log. Created once on append,
/// never edited or deleted; log order is append order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    /// Whole seconds since session start at the moment of appending.
    pub relative_secs: u64,
    pub kind: EntryKind,
    pub label: String,
    pub value: Option<String>,
}

/// Accumulated seconds per timed mode. Fixed-size and indexed by the mode
/// enum, so every mode is structurally present even at zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ModeDurations {
    secs: [u64; TeachingMode::ALL_TIMED.len()],
}

impl ModeDurations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, mode: TeachingMode) -> u64 {
        mode.slot().map(|i| self.secs[i]).unwrap_or(0)
    }

    /// Attribute one second to `mode`. Attributing to `None` is a no-op:
    /// those seconds are an observation gap and count toward nothing.
    pub fn increment(&mut self, mode: TeachingMode) {
        if let Some(i) = mode.slot() {
            self.secs[i] += 1;
        }
    }

    pub fn total(&self) -> u64 {
        self.secs.iter().sum()
    }

    /// Modes with their accumulated seconds, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (TeachingMode, u64)> + '_ {
        TeachingMode::ALL_TIMED
            .iter()
            .map(move |&mode| (mode, self.get(mode)))
    }
}
