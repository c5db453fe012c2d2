//! The submission record and its state machine.
//!
//! ```text
//!            accept                submit              dispatched
//!   Idle ───────────▶ Selected ───────────▶ Uploading ───────────▶ Processing
//!    ▲  ◀── reject ──   ▲  ▲                                          │
//!    │                  │  └──── accept ────┐                 ok / err│
//!    │                  │                   │                         ▼
//!    └──── reject ──── Succeeded | Failed ◀─┴──────────────────────────┘
//!                          │        ▲
//!                          └────────┘ submit again (→ Uploading)
//! ```
//!
//! [`Submission::advance`] is the only way to change the state and refuses
//! anything not drawn above, so a skipped or reordered step is caught at the
//! point it would happen.

use crate::error::ConversionError;
use crate::selection::PdfFile;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Where a submission is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SubmissionState {
    #[default]
    Idle,
    Selected,
    Uploading,
    Processing,
    Succeeded,
    Failed,
}

impl SubmissionState {
    /// `Uploading` or `Processing`: a request is outstanding.
    pub fn is_in_flight(self) -> bool {
        matches!(self, SubmissionState::Uploading | SubmissionState::Processing)
    }

    /// `Succeeded` or `Failed`.
    pub fn is_terminal(self) -> bool {
        matches!(self, SubmissionState::Succeeded | SubmissionState::Failed)
    }

    /// Whether `self → next` is an edge of the workflow.
    pub fn can_advance_to(self, next: SubmissionState) -> bool {
        use SubmissionState::*;
        match (self, next) {
            (Idle, Selected) => true,
            (Selected, Selected | Idle | Uploading) => true,
            (Uploading, Processing) => true,
            (Processing, Succeeded | Failed) => true,
            (Succeeded | Failed, Selected | Idle | Uploading) => true,
            _ => false,
        }
    }
}

impl fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SubmissionState::Idle => "idle",
            SubmissionState::Selected => "selected",
            SubmissionState::Uploading => "uploading",
            SubmissionState::Processing => "processing",
            SubmissionState::Succeeded => "succeeded",
            SubmissionState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// An attempted transition that is not an edge of the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("illegal submission transition {from} → {to}")]
pub struct InvalidTransition {
    pub from: SubmissionState,
    pub to: SubmissionState,
}

/// Why `submit()` did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// Another request is outstanding.
    InFlight,
    /// No accepted file is selected.
    NothingSelected,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::InFlight => f.write_str("a submission is already in progress"),
            SkipReason::NothingSelected => f.write_str("no PDF file is selected"),
        }
    }
}

/// The single unit of work tracked by the controller.
///
/// Readers get clones via [`crate::SubmissionController::snapshot`]; only the
/// controller mutates the live record.
#[derive(Debug, Clone, Default)]
pub struct Submission {
    file: Option<PdfFile>,
    state: SubmissionState,
    progress_percent: u8,
    error: Option<ConversionError>,
}

impl Submission {
    pub fn file(&self) -> Option<&PdfFile> {
        self.file.as_ref()
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    /// Advisory progress, 0–100.
    pub fn progress_percent(&self) -> u8 {
        self.progress_percent
    }

    /// Present only in `Failed`.
    pub fn error(&self) -> Option<&ConversionError> {
        self.error.as_ref()
    }

    /// Move to `next`, returning the previous state.
    ///
    /// Leaving `Failed` drops the error; entering `Uploading` resets progress.
    pub(crate) fn advance(
        &mut self,
        next: SubmissionState,
    ) -> Result<SubmissionState, InvalidTransition> {
        let from = self.state;
        if !from.can_advance_to(next) {
            return Err(InvalidTransition { from, to: next });
        }
        self.state = next;
        if next != SubmissionState::Failed {
            self.error = None;
        }
        if next == SubmissionState::Uploading {
            self.progress_percent = 0;
        }
        Ok(from)
    }

    pub(crate) fn set_file(&mut self, file: Option<PdfFile>) {
        self.file = file;
    }

    pub(crate) fn set_progress(&mut self, percent: u8) {
        self.progress_percent = percent.min(100);
    }

    pub(crate) fn fail(&mut self, error: ConversionError) -> Result<SubmissionState, InvalidTransition> {
        let from = self.advance(SubmissionState::Failed)?;
        self.error = Some(error);
        Ok(from)
    }
}
