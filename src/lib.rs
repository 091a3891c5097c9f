//! Live classroom-observation logging.
//!
//! One observer, one session at a time: a ticking session clock attributes
//! seconds to the active teaching mode, discrete observations append to an
//! ordered log, and stopping the session freezes everything into a snapshot
//! that the report layer renders as plain text.

pub mod models;
pub mod report;
pub mod session;

pub use models::{
    ActionCounts, EngagementLevel, EntryKind, ModeDurations, ObservationEntry, SessionSnapshot,
    TeachingAction, TeachingMode,
};
pub use report::{generate_report, sink::ReportSink};
pub use session::SessionController;
