//! One-shot conversion entry points.
//!
//! These wrap a headless [`SubmissionController`]: select the file, submit
//! it once, and turn the outcome into a `Result`. Use the controller directly
//! when a surface should follow the workflow, or when the same process will
//! submit more than once.

use crate::config::ClientConfig;
use crate::controller::SubmissionController;
use crate::error::Pdf2PodcastError;
use crate::output::ConversionResult;
use crate::selection::PdfFile;
use crate::service::HttpConversionService;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Convert a local PDF file into a summary and an audio reference.
///
/// This is the primary entry point for the library.
///
/// # Errors
/// - File not found / permission denied
/// - File rejected by the selection guard (not a PDF, too large)
/// - The submission ended in `Failed` ([`Pdf2PodcastError::Conversion`])
///
/// # Example
/// ```rust,no_run
/// use pdf2podcast::{convert_file, ClientConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = ClientConfig::builder()
///         .base_url("http://localhost:5000")
///         .build()?;
///     let result = convert_file("paper.pdf", &config).await?;
///     println!("{}", result.summary);
///     eprintln!("audio: {}", result.audio_url);
///     Ok(())
/// }
/// ```
pub async fn convert_file(
    path: impl AsRef<Path>,
    config: &ClientConfig,
) -> Result<ConversionResult, Pdf2PodcastError> {
    let path = path.as_ref();
    let file = PdfFile::from_path(path).await?;
    convert_pdf(file, config).await.map_err(|e| match e {
        Pdf2PodcastError::Rejected { reason, .. } => Pdf2PodcastError::Rejected {
            path: path.to_path_buf(),
            reason,
        },
        other => other,
    })
}

/// Convert an in-memory file.
///
/// The file goes through the same selection guard as a picked file, so its
/// declared `mime_type` must be `application/pdf`.
pub async fn convert_pdf(
    file: PdfFile,
    config: &ClientConfig,
) -> Result<ConversionResult, Pdf2PodcastError> {
    let start = Instant::now();
    let name = file.name.clone();
    let controller = SubmissionController::headless(config.clone())?;

    controller
        .select(Some(file))
        .map_err(|reason| Pdf2PodcastError::Rejected {
            path: name.clone().into(),
            reason,
        })?;
    let result = controller.submit().await.into_result()?;

    info!(
        "Converted {} in {}ms",
        name,
        start.elapsed().as_millis()
    );
    Ok(result)
}

/// Synchronous wrapper around [`convert_file`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(
    path: impl AsRef<Path>,
    config: &ClientConfig,
) -> Result<ConversionResult, Pdf2PodcastError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Pdf2PodcastError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert_file(path, config))
}

/// Download the audio of `result` to `dest`, resolving a relative
/// `audioUrl` against the configured base URL.
pub async fn download_audio(
    result: &ConversionResult,
    dest: impl AsRef<Path>,
    config: &ClientConfig,
) -> Result<u64, Pdf2PodcastError> {
    let url = config
        .resolve_audio_url(&result.audio_url)
        .ok_or_else(|| Pdf2PodcastError::DownloadFailed {
            url: result.audio_url.clone(),
            reason: "not a valid URL or path".into(),
        })?;
    HttpConversionService::new(config)?
        .download_audio(&url, dest.as_ref())
        .await
}

/// Write the summary text to `path` using atomic write (temp file + rename).
pub async fn write_summary(
    result: &ConversionResult,
    path: impl AsRef<Path>,
) -> Result<(), Pdf2PodcastError> {
    let mut contents = result.summary.clone();
    if !contents.ends_with('\n') {
        contents.push('\n');
    }
    write_atomically(path.as_ref(), "tmp", contents.as_bytes()).await
}

/// `dest` with `.{suffix}` appended to its full file name.
fn temp_path(dest: &Path, suffix: &str) -> PathBuf {
    let mut name = dest.as_os_str().to_owned();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

/// Write `contents` to a sibling temp file, then rename it over `dest`.
///
/// `dest` ends up either complete or untouched; the temp file is removed
/// when the write or the rename fails.
pub(crate) async fn write_atomically(
    dest: &Path,
    suffix: &str,
    contents: &[u8],
) -> Result<(), Pdf2PodcastError> {
    let write_err = |source: std::io::Error| Pdf2PodcastError::OutputWriteFailed {
        path: dest.to_path_buf(),
        source,
    };

    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }
    let tmp_path = temp_path(dest, suffix);
    let written = match tokio::fs::write(&tmp_path, contents).await {
        Ok(()) => tokio::fs::rename(&tmp_path, dest).await,
        Err(e) => Err(e),
    };
    if let Err(source) = written {
        if let Err(e) = tokio::fs::remove_file(&tmp_path).await {
            debug!("Could not remove {}: {}", tmp_path.display(), e);
        }
        return Err(write_err(source));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn non_pdf_is_rejected_before_any_request() {
        // Nothing listens on port 9; a request would surface as Conversion.
        let config = ClientConfig::builder()
            .base_url("http://127.0.0.1:9")
            .build()
            .unwrap();
        let file = PdfFile::new("notes.txt", "text/plain", b"hi".to_vec());
        let err = convert_pdf(file, &config).await.unwrap_err();
        assert!(matches!(err, Pdf2PodcastError::Rejected { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn missing_file_is_reported() {
        let err = convert_file("/no/such/file.pdf", &ClientConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Pdf2PodcastError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn rejected_file_reports_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("image.png");
        std::fs::write(&path, b"\x89PNG").unwrap();

        match convert_file(&path, &ClientConfig::default()).await {
            Err(Pdf2PodcastError::Rejected { path: p, .. }) => assert_eq!(p, path),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn summary_written_with_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/summary.txt");
        let result = ConversionResult {
            summary: "Hello world".into(),
            audio_url: "a.mp3".into(),
        };
        write_summary(&result, &path).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Hello world\n");
        assert!(!dir.path().join("out/summary.txt.tmp").exists());
    }

    #[test]
    fn temp_names_keep_the_full_file_name() {
        let md = temp_path(Path::new("out/a.md"), "tmp");
        let txt = temp_path(Path::new("out/a.txt"), "tmp");
        assert_eq!(md, Path::new("out/a.md.tmp"));
        assert_eq!(txt, Path::new("out/a.txt.tmp"));
        assert_ne!(md, txt);
    }

    #[tokio::test]
    async fn summaries_with_shared_stem_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let result = ConversionResult {
            summary: "Hello world".into(),
            audio_url: "a.mp3".into(),
        };
        // A leftover temp file of one target must not be taken for the other's.
        std::fs::write(dir.path().join("a.txt.tmp"), b"stale").unwrap();

        write_summary(&result, dir.path().join("a.md")).await.unwrap();

        assert_eq!(std::fs::read(dir.path().join("a.txt.tmp")).unwrap(), b"stale");
        assert!(!dir.path().join("a.md.tmp").exists());
    }

    #[tokio::test]
    async fn failed_rename_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // A directory in the way makes the final rename fail.
        let path = dir.path().join("summary.txt");
        std::fs::create_dir(&path).unwrap();
        let result = ConversionResult {
            summary: "Hello world".into(),
            audio_url: "a.mp3".into(),
        };

        let err = write_summary(&result, &path).await.unwrap_err();

        assert!(
            matches!(err, Pdf2PodcastError::OutputWriteFailed { path: ref p, .. } if *p == path),
            "got {err:?}"
        );
        assert!(!dir.path().join("summary.txt.tmp").exists());
    }

    #[test]
    fn blocking_wrapper_rejects_non_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"plain text").unwrap();
        // Nothing listens on port 9; a request would surface as Conversion.
        let config = ClientConfig::builder()
            .base_url("http://127.0.0.1:9")
            .build()
            .unwrap();

        match convert_sync(&path, &config) {
            Err(Pdf2PodcastError::Rejected { path: p, .. }) => assert_eq!(p, path),
            other => panic!("unexpected {other:?}"),
        }
    }
}
