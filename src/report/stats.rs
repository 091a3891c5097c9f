use crate::models::{
    ActionCounts, EntryKind, ModeDurations, ObservationEntry, TeachingAction, TeachingMode,
};

/// Seconds attributed to any mode. Seconds spent with no mode selected are
/// observation gaps and are not part of this total.
pub fn total_seconds(durations: &ModeDurations) -> u64 {
    durations.total()
}

/// Share of attributed time spent in `mode`, as a percentage. Defined as 0
/// when nothing was attributed at all, so an all-gap session never divides
/// by zero.
pub fn percent_of(mode: TeachingMode, durations: &ModeDurations) -> f64 {
    let total = durations.total();
    if total == 0 {
        return 0.0;
    }
    durations.get(mode) as f64 / total as f64 * 100.0
}

/// Occurrences of each teaching action in the log. The result is keyed by
/// the action enum itself, so every defined action is present — zero
/// counts included — as a structural guarantee rather than a convention.
/// Action entries carry the action's display label, which is how they are
/// matched back to the enum.
pub fn action_counts(entries: &[ObservationEntry]) -> ActionCounts {
    let mut counts = ActionCounts::new();
    for entry in entries {
        if entry.kind != EntryKind::Action {
            continue;
        }
        if let Some(action) = TeachingAction::ALL
            .iter()
            .find(|action| action.label() == entry.label)
        {
            counts.increment(*action);
        }
    }
    counts
}

/// Count for one specific action, for live per-button tallies.
pub fn action_count(action: TeachingAction, entries: &[ObservationEntry]) -> u64 {
    entries
        .iter()
        .filter(|e| e.kind == EntryKind::Action && e.label == action.label())
        .count() as u64
}
