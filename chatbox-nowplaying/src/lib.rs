pub mod config;
pub mod error;
pub mod logging;
pub mod media_events;
pub mod media_listener;
pub mod osc;
pub mod poll_loop;
pub mod position_tracker;
pub mod render;
pub mod session;
pub mod templates;

use std::time::Duration;

/// Time between two polls of the media session. The position tracker
/// extrapolates by exactly this much when the player reports a stale position.
pub const POLL_INTERVAL: Duration = Duration::from_millis(1500);
