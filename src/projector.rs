//! Result projector: turn workflow outcomes into what the user sees.
//!
//! Everything visible goes through the [`Surface`] trait: a status line, a
//! progress indicator, the results panel, the enabled state of the primary
//! action and the copy button's label. The controller and the guard never
//! touch a surface directly, so both are testable with [`NullSurface`].
//!
//! The projector keeps the last good [`ResultView`]. A later failure only
//! changes the status line; the previous summary and audio stay readable.

use crate::clipboard::ClipboardSink;
use crate::error::{ConversionError, SelectionError};
use crate::output::{ConversionResult, ResultView};
use reqwest::Url;
use serde::Serialize;
use tracing::{debug, warn};

/// Tone of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

/// The single line reflecting the latest outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusLine {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusLine {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
        }
    }
}

/// Label state of the copy-summary button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyIndicator {
    Ready,
    Copied,
}

/// Result of a copy-summary request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied,
    /// No successful result has been rendered yet.
    NothingToCopy,
    /// The clipboard refused; nothing else changed.
    Failed(String),
}

/// A rendering target. Terminal, GUI and test recorders implement this.
pub trait Surface: Send {
    fn show_status(&mut self, status: &StatusLine);

    /// `Some(percent)` shows the indicator, `None` hides it.
    fn show_progress(&mut self, percent: Option<u8>);

    /// Reveal the results panel with this content.
    fn show_result(&mut self, view: &ResultView);

    /// Enable or disable the primary "convert" action.
    fn set_submit_enabled(&mut self, enabled: bool) {
        let _ = enabled;
    }

    fn show_copy_indicator(&mut self, indicator: CopyIndicator) {
        let _ = indicator;
    }
}

/// A surface that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSurface;

impl Surface for NullSurface {
    fn show_status(&mut self, _status: &StatusLine) {}
    fn show_progress(&mut self, _percent: Option<u8>) {}
    fn show_result(&mut self, _view: &ResultView) {}
}

/// Maps selections and terminal outcomes onto a [`Surface`].
pub struct ResultProjector<S> {
    surface: S,
    base_url: Url,
    last_result: Option<ResultView>,
}

impl<S: Surface> ResultProjector<S> {
    /// `base_url` resolves relative audio references into download targets.
    pub fn new(surface: S, base_url: Url) -> Self {
        Self {
            surface,
            base_url,
            last_result: None,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// The most recent successful result, if any.
    pub fn last_result(&self) -> Option<&ResultView> {
        self.last_result.as_ref()
    }

    pub fn show_accepted(&mut self, file_name: &str) {
        self.surface
            .show_status(&StatusLine::info(format!("Selected {file_name}")));
        self.surface.set_submit_enabled(true);
    }

    pub fn show_rejected(&mut self, reason: &SelectionError) {
        self.surface
            .show_status(&StatusLine::error(reason.user_message()));
        self.surface.set_submit_enabled(false);
    }

    pub fn show_started(&mut self) {
        self.surface
            .show_status(&StatusLine::info("Processing your PDF..."));
        self.surface.set_submit_enabled(false);
        self.surface.show_progress(Some(0));
    }

    pub fn show_progress(&mut self, percent: u8) {
        self.surface.show_progress(Some(percent));
    }

    /// Render a terminal outcome for the file that was submitted.
    ///
    /// `submit_enabled` is whether a file is still selected afterwards.
    pub fn project(
        &mut self,
        file_name: &str,
        outcome: Result<&ConversionResult, &ConversionError>,
        submit_enabled: bool,
    ) {
        match outcome {
            Ok(result) => {
                let download_url = self.base_url.join(&result.audio_url).ok();
                if download_url.is_none() {
                    warn!("Audio reference '{}' cannot be resolved", result.audio_url);
                }
                let view = ResultView::new(result, download_url);
                debug!(
                    "Rendering result for {}: {} words, {} chars",
                    file_name, view.stats.words, view.stats.characters
                );
                self.surface.show_progress(Some(100));
                self.surface.show_result(&view);
                self.surface.show_status(&StatusLine::success(
                    "Success! Your PDF has been converted to a podcast.",
                ));
                self.last_result = Some(view);
            }
            Err(error) => {
                self.surface.show_progress(None);
                self.surface
                    .show_status(&StatusLine::error(format!("Error: {}", error.message())));
            }
        }
        self.surface.set_submit_enabled(submit_enabled);
    }

    /// Copy the current summary and switch the button to "Copied!".
    ///
    /// Reverting the label is the caller's job; see
    /// [`crate::SubmissionController::copy_summary`].
    pub fn copy_summary(&mut self, clipboard: &dyn ClipboardSink) -> CopyOutcome {
        let Some(view) = self.last_result.as_ref() else {
            return CopyOutcome::NothingToCopy;
        };
        match clipboard.set_text(&view.summary) {
            Ok(()) => {
                self.surface.show_copy_indicator(CopyIndicator::Copied);
                self.surface
                    .show_status(&StatusLine::success("Summary copied to clipboard!"));
                CopyOutcome::Copied
            }
            Err(e) => {
                warn!("Copy to clipboard failed: {}", e);
                CopyOutcome::Failed(e.to_string())
            }
        }
    }

    pub fn reset_copy_indicator(&mut self) {
        self.surface.show_copy_indicator(CopyIndicator::Ready);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClipboardError;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        statuses: Vec<StatusLine>,
        progress: Vec<Option<u8>>,
        results: Vec<ResultView>,
        enabled: Option<bool>,
        indicator: Option<CopyIndicator>,
    }

    impl Surface for Recorder {
        fn show_status(&mut self, status: &StatusLine) {
            self.statuses.push(status.clone());
        }
        fn show_progress(&mut self, percent: Option<u8>) {
            self.progress.push(percent);
        }
        fn show_result(&mut self, view: &ResultView) {
            self.results.push(view.clone());
        }
        fn set_submit_enabled(&mut self, enabled: bool) {
            self.enabled = Some(enabled);
        }
        fn show_copy_indicator(&mut self, indicator: CopyIndicator) {
            self.indicator = Some(indicator);
        }
    }

    #[derive(Default)]
    struct MemoryClipboard(Mutex<Option<String>>);

    impl ClipboardSink for MemoryClipboard {
        fn set_text(&self, text: &str) -> Result<(), ClipboardError> {
            *self.0.lock().unwrap() = Some(text.to_string());
            Ok(())
        }
    }

    struct DeniedClipboard;

    impl ClipboardSink for DeniedClipboard {
        fn set_text(&self, _text: &str) -> Result<(), ClipboardError> {
            Err(ClipboardError("permission denied".into()))
        }
    }

    fn projector() -> ResultProjector<Recorder> {
        ResultProjector::new(
            Recorder::default(),
            Url::parse("http://localhost:5000").unwrap(),
        )
    }

    fn hello() -> ConversionResult {
        ConversionResult {
            summary: "Hello world".into(),
            audio_url: "https://x/a.mp3".into(),
        }
    }

    #[test]
    fn success_renders_counts_and_audio() {
        let mut p = projector();
        p.project("doc.pdf", Ok(&hello()), true);

        let view = p.last_result().unwrap();
        assert_eq!(view.stats.words, 2);
        assert_eq!(view.stats.characters, 11);
        assert_eq!(view.audio_url, "https://x/a.mp3");
        assert_eq!(view.download_url.as_ref().unwrap().as_str(), "https://x/a.mp3");

        let s = p.surface();
        assert_eq!(s.results.len(), 1);
        assert_eq!(s.statuses.last().unwrap().kind, StatusKind::Success);
        assert_eq!(s.progress.last(), Some(&Some(100)));
        assert_eq!(s.enabled, Some(true));
    }

    #[test]
    fn failure_keeps_previous_result() {
        let mut p = projector();
        p.project("doc.pdf", Ok(&hello()), true);
        p.project(
            "doc.pdf",
            Err(&ConversionError::Service {
                status: 500,
                message: "bad pdf".into(),
            }),
            true,
        );

        assert_eq!(p.last_result().unwrap().summary, "Hello world");
        let s = p.surface();
        assert_eq!(s.results.len(), 1, "failure must not re-render results");
        let last = s.statuses.last().unwrap();
        assert_eq!(last.kind, StatusKind::Error);
        assert!(last.text.contains("bad pdf"));
        assert_eq!(s.progress.last(), Some(&None));
    }

    #[test]
    fn rejection_disables_submit() {
        let mut p = projector();
        p.show_accepted("a.pdf");
        assert_eq!(p.surface().enabled, Some(true));
        p.show_rejected(&SelectionError::InvalidType {
            mime_type: "text/plain".into(),
        });
        assert_eq!(p.surface().enabled, Some(false));
        assert_eq!(
            p.surface().statuses.last().unwrap().text,
            "Please upload a valid PDF file."
        );
    }

    #[test]
    fn copy_requires_a_result() {
        let mut p = projector();
        let clip = MemoryClipboard::default();
        assert_eq!(p.copy_summary(&clip), CopyOutcome::NothingToCopy);
        assert!(clip.0.lock().unwrap().is_none());
    }

    #[test]
    fn copy_duplicates_summary_and_flags_button() {
        let mut p = projector();
        p.project("doc.pdf", Ok(&hello()), true);
        let clip = MemoryClipboard::default();
        assert_eq!(p.copy_summary(&clip), CopyOutcome::Copied);
        assert_eq!(clip.0.lock().unwrap().as_deref(), Some("Hello world"));
        assert_eq!(p.surface().indicator, Some(CopyIndicator::Copied));

        p.reset_copy_indicator();
        assert_eq!(p.surface().indicator, Some(CopyIndicator::Ready));
    }

    #[test]
    fn clipboard_failure_is_silent() {
        let mut p = projector();
        p.project("doc.pdf", Ok(&hello()), true);
        let before = p.surface().statuses.len();
        assert!(matches!(
            p.copy_summary(&DeniedClipboard),
            CopyOutcome::Failed(_)
        ));
        assert_eq!(p.surface().statuses.len(), before);
        assert_eq!(p.surface().indicator, None);
    }
}
