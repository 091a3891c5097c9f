mod observation;
mod session;

pub use observation::{
    ActionCounts, EngagementLevel, EntryKind, ModeDurations, ObservationEntry, TeachingAction,
    TeachingMode,
};
pub use session::SessionSnapshot;
