mod controller;
mod state;

pub use controller::SessionController;
pub use state::{SessionState, INACTIVITY_THRESHOLD};
