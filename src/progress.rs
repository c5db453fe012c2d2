//! Observer trait for submission events, and the advisory progress ticker.
//!
//! Inject an [`Arc<dyn SubmissionObserver>`] via
//! [`crate::config::ClientConfigBuilder::observer`] to receive every state
//! transition and progress value as the controller produces them.
//!
//! # Advisory progress
//!
//! The conversion service answers a single opaque request; it has no progress
//! channel. While the request is outstanding the controller therefore plays a
//! fixed sequence of milestones (default 20 → 50 → 80 %) with a short fixed
//! delay between them. The numbers say nothing about bytes transferred. A
//! transport that can report real upload progress may replace the ticker.
//!
//! # Example
//!
//! ```rust
//! use pdf2podcast::{ClientConfig, SubmissionObserver, SubmissionState};
//! use std::sync::{Arc, Mutex};
//!
//! #[derive(Default)]
//! struct Recorder {
//!     states: Mutex<Vec<SubmissionState>>,
//! }
//!
//! impl SubmissionObserver for Recorder {
//!     fn on_state_change(&self, _from: SubmissionState, to: SubmissionState) {
//!         self.states.lock().unwrap().push(to);
//!     }
//! }
//!
//! let config = ClientConfig::builder()
//!     .observer(Arc::new(Recorder::default()) as Arc<dyn SubmissionObserver>)
//!     .build()
//!     .unwrap();
//! ```

use crate::submission::{SkipReason, SubmissionState};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Called by the controller as a submission moves through its states.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Implementations must be `Send + Sync`; they are
/// invoked from whichever task drives the controller.
pub trait SubmissionObserver: Send + Sync {
    /// Called after every applied transition.
    fn on_state_change(&self, from: SubmissionState, to: SubmissionState) {
        let _ = (from, to);
    }

    /// Called for each advisory progress value (0–100).
    fn on_progress(&self, percent: u8) {
        let _ = percent;
    }

    /// Called when `submit()` was a no-op.
    fn on_submit_skipped(&self, reason: SkipReason) {
        let _ = reason;
    }
}

/// A no-op implementation for callers that don't need events.
pub struct NoopObserver;

impl SubmissionObserver for NoopObserver {}

/// Convenience alias matching the type stored in [`crate::config::ClientConfig`].
pub type ObserverRef = Arc<dyn SubmissionObserver>;

/// Play the advisory milestones, calling `report` for each one.
///
/// Resolves once the last milestone has been reported; callers race it
/// against the real request and drop it when the request finishes first.
pub fn advisory_progress<F>(
    milestones: Vec<u8>,
    delay: Duration,
    mut report: F,
) -> impl Future<Output = ()>
where
    F: FnMut(u8),
{
    async move {
        for percent in milestones {
            tokio::time::sleep(delay).await;
            report(percent);
        }
    }
}
