//! Error types for the pdf2podcast library.
//!
//! Three error types reflect three distinct failure modes:
//!
//! * [`SelectionError`]: a candidate file was refused before it entered the
//!   workflow (missing, not a PDF, too large). Recovered locally: the user
//!   picks another file.
//!
//! * [`ConversionError`]: a submission reached the network stage and did not
//!   produce a result. Never propagated out of the controller: it becomes the
//!   `error` of a `Failed` submission and the status line of the surface.
//!
//! * [`Pdf2PodcastError`]: **Fatal** for the caller: bad configuration, an
//!   unreadable input file, an output that could not be written. Returned as
//!   `Err(Pdf2PodcastError)` from the top-level `convert*` functions.

use std::path::PathBuf;
use thiserror::Error;

/// Why a candidate file was not accepted into the workflow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// Nothing was picked or dropped.
    #[error("no file")]
    NoFile,

    /// The declared media type is not exactly `application/pdf`.
    #[error("invalid type")]
    InvalidType { mime_type: String },

    /// The file exceeds the configured size ceiling.
    #[error("too large")]
    TooLarge { size: u64, limit: u64 },
}

impl SelectionError {
    /// The status line shown to the user for this rejection.
    pub fn user_message(&self) -> String {
        match self {
            SelectionError::NoFile => "Please select a PDF file.".to_string(),
            SelectionError::InvalidType { .. } => "Please upload a valid PDF file.".to_string(),
            SelectionError::TooLarge { limit, .. } => format!(
                "File size too large. Please upload a file smaller than {}.",
                human_size(*limit)
            ),
        }
    }
}

/// `bytes` in the largest binary unit it reaches, floored to one decimal
/// (`50MB`, `1.5MB`, `512KB`, `100 bytes`).
fn human_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * KIB;
    let (unit, name) = match bytes {
        b if b >= MIB => (MIB, "MB"),
        b if b >= KIB => (KIB, "KB"),
        b => return format!("{} bytes", b),
    };
    let tenths = bytes * 10 / unit;
    if tenths % 10 == 0 {
        format!("{}{}", tenths / 10, name)
    } else {
        format!("{}.{}{}", tenths / 10, tenths % 10, name)
    }
}

/// A submission that did not produce a [`crate::ConversionResult`].
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum ConversionError {
    /// The request never reached the service, or the response never arrived
    /// (DNS, connection refused/reset, timeout, body read failure).
    #[error("Could not reach the conversion service. Check your connection and try again.")]
    Transport { detail: String },

    /// The service answered with a non-success status.
    #[error("{message}")]
    Service { status: u16, message: String },

    /// The service answered 2xx but the body is not `{summary, audioUrl}`.
    #[error("The conversion service returned an unreadable response.")]
    MalformedResponse { status: u16, detail: String },
}

impl ConversionError {
    /// Human-readable message for the status line.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Generic fallback used when a failure body carries no usable message.
    pub fn generic_status_message(status: u16) -> String {
        format!("Server error (HTTP {status})")
    }
}

/// All fatal errors returned by the pdf2podcast library.
///
/// Submission failures use [`ConversionError`] and are stored on the
/// submission rather than propagated here, except by the one-shot
/// [`crate::convert_file`] helper which has no surface to report them on.
#[derive(Debug, Error)]
pub enum Pdf2PodcastError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file was refused by the selection guard.
    #[error("File '{path}' was rejected: {reason}")]
    Rejected {
        path: PathBuf,
        #[source]
        reason: SelectionError,
    },

    // ── Submission errors ─────────────────────────────────────────────────
    /// The submission ended in `Failed`.
    #[error("Conversion failed: {0}")]
    Conversion(#[from] ConversionError),

    /// Another submission was already in flight, or nothing was selected.
    #[error("Submission was not started: {0}")]
    NotSubmitted(String),

    // ── Audio download errors ─────────────────────────────────────────────
    /// The audio resource could not be fetched.
    #[error("Failed to download audio from '{url}': {reason}")]
    DownloadFailed { url: String, reason: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write an output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Clipboard access failed (no display server, permission denied, …).
#[derive(Debug, Error)]
#[error("Clipboard unavailable: {0}")]
pub struct ClipboardError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_reasons_are_short() {
        assert_eq!(SelectionError::NoFile.to_string(), "no file");
        assert_eq!(
            SelectionError::InvalidType {
                mime_type: "text/plain".into()
            }
            .to_string(),
            "invalid type"
        );
        assert_eq!(
            SelectionError::TooLarge {
                size: 60,
                limit: 50
            }
            .to_string(),
            "too large"
        );
    }

    #[test]
    fn too_large_user_message_names_limit() {
        let e = SelectionError::TooLarge {
            size: 60 * 1024 * 1024,
            limit: 50 * 1024 * 1024,
        };
        assert_eq!(
            e.user_message(),
            "File size too large. Please upload a file smaller than 50MB."
        );
    }

    #[test]
    fn limits_below_or_between_megabytes_stay_readable() {
        let message = |limit: u64| SelectionError::TooLarge { size: u64::MAX, limit }.user_message();
        assert!(message(3 * 1024 * 1024 / 2).ends_with("smaller than 1.5MB."));
        assert!(message(512 * 1024).ends_with("smaller than 512KB."));
        assert!(message(1536).ends_with("smaller than 1.5KB."));
        assert!(message(100).ends_with("smaller than 100 bytes."));
        // Floored, so the ceiling shown never exceeds the real one.
        assert!(message(1024 * 1024 + 1023 * 1024).ends_with("smaller than 1.9MB."));
    }

    #[test]
    fn service_error_displays_server_message() {
        let e = ConversionError::Service {
            status: 500,
            message: "bad pdf".into(),
        };
        assert_eq!(e.message(), "bad pdf");
    }

    #[test]
    fn transport_error_hides_detail() {
        let e = ConversionError::Transport {
            detail: "connection refused (os error 111)".into(),
        };
        assert!(!e.message().is_empty());
        assert!(!e.message().contains("os error"));
    }

    #[test]
    fn generic_status_message_mentions_code() {
        assert_eq!(
            ConversionError::generic_status_message(502),
            "Server error (HTTP 502)"
        );
    }

    #[test]
    fn conversion_error_converts_to_fatal() {
        let e: Pdf2PodcastError = ConversionError::MalformedResponse {
            status: 200,
            detail: "missing field `summary`".into(),
        }
        .into();
        assert!(e.to_string().starts_with("Conversion failed"));
    }
}
