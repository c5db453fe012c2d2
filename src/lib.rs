//! # pdf2podcast
//!
//! Submit a PDF to a PDF-to-podcast conversion service and consume the
//! result: a text summary and a playable audio file.
//!
//! The service does the heavy lifting (text extraction, summarisation,
//! speech synthesis). This crate is the client side of that exchange: it
//! decides which files may be sent, guarantees at most one request is in
//! flight, and turns every possible answer, including no answer, into
//! something a user can read.
//!
//! ## Workflow
//!
//! ```text
//! pick / drop
//!  │
//!  ├─ 1. Guard       present? application/pdf? under the size ceiling?
//!  ├─ 2. Select      Idle ─▶ Selected
//!  ├─ 3. Submit      Selected ─▶ Uploading ─▶ Processing   (single flight)
//!  ├─ 4. Respond     multipart POST ─▶ {summary, audioUrl} | {error}
//!  └─ 5. Project     Succeeded | Failed ─▶ status line, results panel
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2podcast::{ClientConfig, PdfFile, SubmissionController, SubmitOutcome};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::builder()
//!         .base_url("http://localhost:5000")
//!         .build()?;
//!     let controller = SubmissionController::headless(config)?;
//!
//!     controller.select(Some(PdfFile::from_path("paper.pdf").await?))?;
//!     match controller.submit().await {
//!         SubmitOutcome::Succeeded(result) => println!("{}", result.summary),
//!         SubmitOutcome::Failed(e) => eprintln!("{}", e.message()),
//!         SubmitOutcome::Skipped(reason) => eprintln!("not submitted: {reason}"),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2podcast` binary (clap + anyhow + tracing-subscriber + indicatif) |
//! | `clipboard` | via `cli` | [`SystemClipboard`] backed by `arboard` |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdf2podcast = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod clipboard;
pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod output;
pub mod player;
pub mod progress;
pub mod projector;
pub mod selection;
pub mod service;
pub mod submission;

// ── Re-exports ───────────────────────────────────────────────────────────

#[cfg(feature = "clipboard")]
pub use clipboard::SystemClipboard;
pub use clipboard::ClipboardSink;
pub use config::{ClientConfig, ClientConfigBuilder, DEFAULT_MAX_FILE_SIZE, PDF_MIME_TYPE};
pub use controller::{SubmissionController, SubmitOutcome};
pub use convert::{convert_file, convert_pdf, convert_sync, download_audio, write_summary};
pub use error::{ClipboardError, ConversionError, Pdf2PodcastError, SelectionError};
pub use output::{ConversionResult, ResultView, TextStats};
pub use player::Playback;
pub use progress::{NoopObserver, ObserverRef, SubmissionObserver};
pub use projector::{
    CopyIndicator, CopyOutcome, NullSurface, ResultProjector, StatusKind, StatusLine, Surface,
};
pub use selection::{PdfFile, Selection, SelectionGuard};
pub use service::{ConversionService, HttpConversionService};
pub use submission::{InvalidTransition, SkipReason, Submission, SubmissionState};
