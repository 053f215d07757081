use crate::POLL_INTERVAL;

/// Keeps the shown playback position moving between the coarse updates some
/// players give. While the reported value repeats, the displayed value is
/// advanced by one poll interval per call; any change in the reported value
/// replaces the extrapolation outright.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PositionTracker {
    last_reported_ms: Option<u64>,
    displayed_ms: Option<u64>,
}

impl PositionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, reported_ms: u64) -> u64 {
        let displayed = match (self.last_reported_ms, self.displayed_ms) {
            (Some(last), Some(displayed)) if last == reported_ms => {
                displayed.saturating_add(POLL_INTERVAL.as_millis() as u64)
            }
            _ => {
                self.last_reported_ms = Some(reported_ms);
                reported_ms
            }
        };

        self.displayed_ms = Some(displayed);
        displayed
    }

    /// Forgets the previous track so the next report is taken as-is.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn displayed_ms(&self) -> Option<u64> {
        self.displayed_ms
    }

    pub fn last_reported_ms(&self) -> Option<u64> {
        self.last_reported_ms
    }
}
