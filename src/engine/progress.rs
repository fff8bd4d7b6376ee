//! Progress reporting for long running walks.
//!
//! Progress is advisory. Observers may be called any number of times,
//! always on the walking task, with percentages that never decrease.

use serde::{Deserialize, Serialize};

/// Stage of a run a progress event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressPhase {
    /// Paging through album summaries.
    Albums,
    /// Expanding albums into songs.
    Songs,
    /// Building the report.
    Wrap,
    /// Run finished.
    Complete,
}

impl ProgressPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressPhase::Albums => "albums",
            ProgressPhase::Songs => "songs",
            ProgressPhase::Wrap => "wrap",
            ProgressPhase::Complete => "complete",
        }
    }
}

/// A single progress notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// 0 to 100.
    pub percent: u8,
    pub message: String,
    pub phase: ProgressPhase,
}

/// Receives progress events synchronously.
pub trait ProgressObserver {
    fn on_progress(&mut self, event: &ProgressEvent);
}

impl<F> ProgressObserver for F
where
    F: FnMut(&ProgressEvent),
{
    fn on_progress(&mut self, event: &ProgressEvent) {
        self(event)
    }
}

/// Observer that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&mut self, _event: &ProgressEvent) {}
}

/// Wraps an observer and keeps the reported percentage monotone.
pub struct ProgressTracker<'a> {
    observer: &'a mut dyn ProgressObserver,
    last: u8,
}

impl<'a> ProgressTracker<'a> {
    pub fn new(observer: &'a mut dyn ProgressObserver) -> Self {
        Self { observer, last: 0 }
    }

    /// Emit an event. Values above 100 are clamped and values below the
    /// last emitted percentage are raised to it.
    pub fn report(&mut self, percent: f64, message: impl Into<String>, phase: ProgressPhase) {
        let percent = if percent.is_finite() {
            percent.clamp(0.0, 100.0) as u8
        } else {
            self.last
        };
        self.last = self.last.max(percent);
        let event = ProgressEvent {
            percent: self.last,
            message: message.into(),
            phase,
        };
        self.observer.on_progress(&event);
    }

    /// Last percentage handed to the observer.
    pub fn last_percent(&self) -> u8 {
        self.last
    }
}
