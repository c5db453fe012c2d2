//! Submission controller: owns the workflow and the single-flight guard.
//!
//! ## Ownership
//!
//! The controller owns the one [`Submission`] record behind a mutex and is
//! its only writer. The guard reads configuration, the projector receives
//! copies of what it needs, and callers read through [`snapshot`]. Locks are
//! never held across an `.await`, so the only suspension point of a
//! submission is the request itself (raced by the cosmetic progress ticker).
//!
//! ## Single flight
//!
//! `submit()` checks and claims the record (`→ Uploading`) before its first
//! `.await`. A second call that runs while the first is outstanding sees an
//! in-flight state and returns [`SubmitOutcome::Skipped`] without touching
//! the record or the surface. Nothing is queued and nothing is cancelled.
//!
//! [`snapshot`]: SubmissionController::snapshot

use crate::clipboard::ClipboardSink;
use crate::config::ClientConfig;
use crate::error::{ConversionError, Pdf2PodcastError, SelectionError};
use crate::output::{ConversionResult, ResultView};
use crate::player::Playback;
use crate::progress::advisory_progress;
use crate::projector::{CopyOutcome, NullSurface, ResultProjector, Surface};
use crate::selection::{PdfFile, Selection, SelectionGuard};
use crate::service::{ConversionService, HttpConversionService};
use crate::submission::{SkipReason, Submission, SubmissionState};
use std::convert::Infallible;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, error, info, warn};

/// What a call to [`SubmissionController::submit`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// No request was issued.
    Skipped(SkipReason),
    Succeeded(ConversionResult),
    Failed(ConversionError),
}

impl SubmitOutcome {
    /// Collapse into a `Result` for callers without a surface.
    pub fn into_result(self) -> Result<ConversionResult, Pdf2PodcastError> {
        match self {
            SubmitOutcome::Succeeded(result) => Ok(result),
            SubmitOutcome::Failed(e) => Err(e.into()),
            SubmitOutcome::Skipped(reason) => Err(Pdf2PodcastError::NotSubmitted(reason.to_string())),
        }
    }
}

/// Drives one [`Submission`] from selection to a terminal outcome.
pub struct SubmissionController<S = NullSurface> {
    config: ClientConfig,
    guard: SelectionGuard,
    service: Arc<dyn ConversionService>,
    submission: Mutex<Submission>,
    projector: Mutex<ResultProjector<S>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl SubmissionController<NullSurface> {
    /// Controller with the HTTP service and no rendering surface.
    pub fn headless(config: ClientConfig) -> Result<Self, Pdf2PodcastError> {
        Self::with_http(config, NullSurface)
    }
}

impl<S: Surface> SubmissionController<S> {
    pub fn new(config: ClientConfig, service: Arc<dyn ConversionService>, surface: S) -> Self {
        let projector = ResultProjector::new(surface, config.base_url.clone());
        Self {
            guard: SelectionGuard::new(config.max_file_size),
            config,
            service,
            submission: Mutex::new(Submission::default()),
            projector: Mutex::new(projector),
        }
    }

    /// Controller talking to the configured service over HTTP.
    pub fn with_http(config: ClientConfig, surface: S) -> Result<Self, Pdf2PodcastError> {
        let service = HttpConversionService::new(&config)?;
        Ok(Self::new(config, Arc::new(service), surface))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// A copy of the current submission record.
    pub fn snapshot(&self) -> Submission {
        lock(&self.submission).clone()
    }

    pub fn state(&self) -> SubmissionState {
        lock(&self.submission).state()
    }

    /// The last successful result, kept across later failures.
    pub fn last_result(&self) -> Option<ResultView> {
        lock(&self.projector).last_result().cloned()
    }

    /// A player for the last successful result's audio, stepping by the
    /// configured seek step.
    pub fn playback(&self) -> Option<Playback> {
        self.last_result()
            .map(|view| view.playback(self.config.seek_step_secs))
    }

    /// Read the surface (e.g. to inspect a recorder in tests).
    pub fn with_surface<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(lock(&self.projector).surface())
    }

    pub fn into_surface(self) -> S {
        self.projector
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .into_surface()
    }

    /// Offer a picked or dropped file.
    ///
    /// Accepted files replace the current selection (`→ Selected`). Rejected
    /// ones clear it (`→ Idle`) and disable submission. While a request is
    /// outstanding the selection is still replaced, for the next submission,
    /// but the in-flight state is left alone.
    pub fn select(&self, candidate: Option<PdfFile>) -> Result<(), SelectionError> {
        let verdict = self.guard.check(candidate);

        let (transition, in_flight, result) = {
            let mut sub = lock(&self.submission);
            let in_flight = sub.state().is_in_flight();
            match verdict {
                Selection::Accepted(file) => {
                    info!("Selected {} ({} bytes)", file.name, file.size());
                    let name = file.name.clone();
                    sub.set_file(Some(file));
                    let transition = if in_flight {
                        debug!("Request outstanding; {} will be used for the next submission", name);
                        None
                    } else {
                        self.advance(&mut sub, SubmissionState::Selected)
                    };
                    (transition, in_flight, Ok(name))
                }
                Selection::Rejected(reason) => {
                    info!("Rejected selection: {}", reason);
                    sub.set_file(None);
                    let transition = if in_flight || sub.state() == SubmissionState::Idle {
                        None
                    } else {
                        self.advance(&mut sub, SubmissionState::Idle)
                    };
                    (transition, in_flight, Err(reason))
                }
            }
        };

        if let Some((from, to)) = transition {
            self.notify_transition(from, to);
        }

        let mut projector = lock(&self.projector);
        match result {
            Ok(name) => {
                if !in_flight {
                    projector.show_accepted(&name);
                }
                Ok(())
            }
            Err(reason) => {
                projector.show_rejected(&reason);
                Err(reason)
            }
        }
    }

    /// Submit the selected file, unless a request is already outstanding.
    ///
    /// Every failure is converted into a terminal `Failed` state; this never
    /// returns an error to the caller beyond the outcome value.
    pub async fn submit(&self) -> SubmitOutcome {
        let (file, from) = {
            let mut sub = lock(&self.submission);
            if sub.state().is_in_flight() {
                drop(sub);
                return self.skip(SkipReason::InFlight);
            }
            let Some(file) = sub.file().cloned() else {
                drop(sub);
                return self.skip(SkipReason::NothingSelected);
            };
            match self.advance(&mut sub, SubmissionState::Uploading) {
                Some((from, _)) => (file, from),
                None => {
                    drop(sub);
                    return self.skip(SkipReason::NothingSelected);
                }
            }
        };
        self.notify_transition(from, SubmissionState::Uploading);
        lock(&self.projector).show_started();

        info!("Submitting {} ({} bytes)", file.name, file.size());
        let file_name = file.name.clone();

        // The request owns its copy of the file from here on.
        let request = self.service.convert(file);
        self.advance_and_notify(SubmissionState::Processing);

        let ticker = async {
            advisory_progress(
                self.config.progress_milestones.clone(),
                self.config.milestone_delay(),
                |percent| self.report_progress(percent),
            )
            .await;
            std::future::pending::<Infallible>().await
        };
        let outcome = tokio::select! {
            result = request => result,
            never = ticker => match never {},
        };

        let (transition, still_selected) = {
            let mut sub = lock(&self.submission);
            let transition = match &outcome {
                Ok(_) => {
                    sub.set_progress(100);
                    self.advance(&mut sub, SubmissionState::Succeeded)
                }
                Err(e) => match sub.fail(e.clone()) {
                    Ok(from) => Some((from, SubmissionState::Failed)),
                    Err(invalid) => {
                        error!("{}", invalid);
                        None
                    }
                },
            };
            (transition, sub.file().is_some())
        };
        if let Some((from, to)) = transition {
            self.notify_transition(from, to);
        }

        lock(&self.projector).project(&file_name, outcome.as_ref(), still_selected);

        match outcome {
            Ok(result) => {
                info!("Converted {}: audio at {}", file_name, result.audio_url);
                SubmitOutcome::Succeeded(result)
            }
            Err(e) => {
                warn!("Conversion of {} failed: {:?}", file_name, e);
                SubmitOutcome::Failed(e)
            }
        }
    }

    /// Copy the last summary to `clipboard` with timed "Copied!" feedback.
    ///
    /// Resolves after the feedback interval when the copy succeeded. Has no
    /// effect on the submission.
    pub async fn copy_summary(&self, clipboard: &dyn ClipboardSink) -> CopyOutcome {
        let outcome = lock(&self.projector).copy_summary(clipboard);
        if outcome == CopyOutcome::Copied {
            tokio::time::sleep(self.config.copy_feedback()).await;
            lock(&self.projector).reset_copy_indicator();
        }
        outcome
    }

    // ── Internal helpers ─────────────────────────────────────────────────

    fn skip(&self, reason: SkipReason) -> SubmitOutcome {
        debug!("Submit ignored: {}", reason);
        if let Some(ref observer) = self.config.observer {
            observer.on_submit_skipped(reason);
        }
        SubmitOutcome::Skipped(reason)
    }

    /// Apply a transition, logging (not applying) an illegal one.
    fn advance(
        &self,
        sub: &mut Submission,
        next: SubmissionState,
    ) -> Option<(SubmissionState, SubmissionState)> {
        match sub.advance(next) {
            Ok(from) => {
                debug!("Submission {} → {}", from, next);
                Some((from, next))
            }
            Err(invalid) => {
                error!("{}", invalid);
                None
            }
        }
    }

    fn advance_and_notify(&self, next: SubmissionState) {
        let transition = self.advance(&mut lock(&self.submission), next);
        if let Some((from, to)) = transition {
            self.notify_transition(from, to);
        }
    }

    fn notify_transition(&self, from: SubmissionState, to: SubmissionState) {
        if let Some(ref observer) = self.config.observer {
            observer.on_state_change(from, to);
        }
    }

    fn report_progress(&self, percent: u8) {
        {
            let mut sub = lock(&self.submission);
            if sub.state() != SubmissionState::Processing {
                return;
            }
            sub.set_progress(percent);
        }
        lock(&self.projector).show_progress(percent);
        if let Some(ref observer) = self.config.observer {
            observer.on_progress(percent);
        }
    }
}
