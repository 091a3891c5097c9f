use std::{sync::Arc, time::Duration};

use chrono::Utc;
use log::info;
use tokio::{sync::Mutex, task::JoinHandle, time};

use crate::models::{
    EngagementLevel, ObservationEntry, SessionSnapshot, TeachingAction, TeachingMode,
};
use crate::session::state::SessionState;

const TICK_INTERVAL: Duration = Duration::from_secs(1);
const INACTIVITY_CHECK_INTERVAL: Duration = Duration::from_secs(10);

/// Orchestrates the session lifecycle: owns the mutable [`SessionState`]
/// and the two periodic tasks that drive it (the 1-second session clock
/// and the 10-second inactivity check). Both tasks are torn down on stop;
/// a tick that fires after stop finds the session inactive and exits.
#[derive(Clone)]
pub struct SessionController {
    state: Arc<Mutex<SessionState>>,
    ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
    inactivity_watcher: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl SessionController {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState::new())),
            ticker: Arc::new(Mutex::new(None)),
            inactivity_watcher: Arc::new(Mutex::new(None)),
        }
    }

    /// Start if inactive, stop if active. Returns the finished session's
    /// snapshot when this call stopped one.
    pub async fn toggle_session(&self) -> Option<SessionSnapshot> {
        let was_active = { self.state.lock().await.active };
        if was_active {
            self.stop().await
        } else {
            self.start().await;
            None
        }
    }

    async fn start(&self) {
        {
            let mut state = self.state.lock().await;
            if state.active {
                return;
            }
            state.start(Utc::now());
        }
        self.spawn_ticker().await;
        self.spawn_inactivity_watcher().await;
    }

    async fn stop(&self) -> Option<SessionSnapshot> {
        let snapshot = {
            let mut state = self.state.lock().await;
            state.stop(Utc::now())
        };
        self.cancel_tasks().await;
        snapshot
    }

    pub async fn is_active(&self) -> bool {
        self.state.lock().await.active
    }

    pub async fn select_mode(&self, mode: TeachingMode) {
        self.state.lock().await.select_mode(mode);
    }

    pub async fn log_action(&self, action: TeachingAction) {
        self.state.lock().await.log_action(action);
    }

    pub async fn set_engagement(&self, level: EngagementLevel) {
        self.state.lock().await.set_engagement(level);
    }

    pub async fn submit_note(&self, text: &str) {
        self.state.lock().await.submit_note(text);
    }

    pub async fn set_subject(&self, name: &str) {
        self.state.lock().await.set_subject(name);
    }

    pub async fn current_mode(&self) -> TeachingMode {
        self.state.lock().await.current_mode
    }

    pub async fn engagement(&self) -> EngagementLevel {
        self.state.lock().await.engagement
    }

    pub async fn relative_secs(&self) -> u64 {
        self.state.lock().await.relative_secs
    }

    pub async fn remind_engagement(&self) -> bool {
        self.state.lock().await.remind_engagement
    }

    pub async fn mode_duration(&self, mode: TeachingMode) -> u64 {
        self.state.lock().await.mode_durations.get(mode)
    }

    pub async fn entry_count(&self) -> usize {
        self.state.lock().await.entries().len()
    }

    /// Most-recent-first slice of the log for the live feed.
    pub async fn recent_entries(&self, limit: usize) -> Vec<ObservationEntry> {
        self.state.lock().await.recent_entries(limit)
    }

    async fn spawn_ticker(&self) {
        let mut guard = self.ticker.lock().await;
        if let Some(handle) = guard.take() {
            handle.abort();
        }

        let state = self.state.clone();
        let handle = tokio::spawn(async move {
            let mut interval = time::interval(TICK_INTERVAL);
            // The immediate first fire would count a phantom second.
            interval.tick().await;
            loop {
                interval.tick().await;
                let mut state = state.lock().await;
                if !state.active {
                    break;
                }
                state.tick();
            }
        });

        *guard = Some(handle);
        info!("session ticker started");
    }

    async fn spawn_inactivity_watcher(&self) {
        let mut guard = self.inactivity_watcher.lock().await;
        if let Some(handle) = guard.take() {
            handle.abort();
        }

        let state = self.state.clone();
        let handle = tokio::spawn(async move {
            let mut interval = time::interval(INACTIVITY_CHECK_INTERVAL);
            interval.tick().await;
            loop {
                interval.tick().await;
                let mut state = state.lock().await;
                if !state.active {
                    break;
                }
                state.check_inactivity();
            }
        });

        *guard = Some(handle);
    }

    async fn cancel_tasks(&self) {
        if let Some(handle) = self.ticker.lock().await.take() {
            handle.abort();
        }
        if let Some(handle) = self.inactivity_watcher.lock().await.take() {
            handle.abort();
        }
    }
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new()
    }
}
