//! Selection guard: decide whether a candidate file may enter the workflow.
//!
//! The guard is pure: it inspects the declared metadata of a [`PdfFile`] and
//! returns a verdict. Clearing or replacing the current selection is the
//! controller's job (see [`crate::SubmissionController::select`]).
//!
//! The declared media type is trusted the way a browser trusts `File.type`;
//! the bytes are not sniffed. [`PdfFile::from_path`] derives that declared
//! type from the file extension, which is what a file picker reports.

use crate::config::PDF_MIME_TYPE;
use crate::error::{Pdf2PodcastError, SelectionError};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A candidate file: name, declared media type, size and contents.
///
/// Like a browser `File`, the size is known up front while the contents of
/// a file opened with [`PdfFile::from_path`] stay on disk until
/// [`PdfFile::load`] is called for the upload. The guard never reads them.
#[derive(Clone, PartialEq, Eq)]
pub struct PdfFile {
    pub name: String,
    pub mime_type: String,
    size: u64,
    contents: Contents,
}

#[derive(Clone, PartialEq, Eq)]
enum Contents {
    Memory(Vec<u8>),
    Disk(PathBuf),
}

impl fmt::Debug for PdfFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PdfFile")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.size)
            .finish()
    }
}

impl PdfFile {
    /// An in-memory file.
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size: bytes.len() as u64,
            contents: Contents::Memory(bytes),
        }
    }

    /// Size in bytes, as declared when the file was picked.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Describe a local file, declaring its media type from the extension.
    ///
    /// Only metadata is read here. Unknown extensions are declared as
    /// `application/octet-stream` so the guard rejects them as `InvalidType`
    /// rather than failing here.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, Pdf2PodcastError> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| open_error(path, &e))?;
        if !metadata.is_file() {
            return Err(Pdf2PodcastError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let mime_type = mime_guess::from_path(path)
            .first_raw()
            .unwrap_or("application/octet-stream")
            .to_string();
        let name = file_name(path);

        debug!("Opened {} ({} bytes, {})", name, metadata.len(), mime_type);
        Ok(Self {
            name,
            mime_type,
            size: metadata.len(),
            contents: Contents::Disk(path.to_path_buf()),
        })
    }

    /// The file contents, read from disk if they are not in memory yet.
    pub async fn load(self) -> Result<Vec<u8>, Pdf2PodcastError> {
        match self.contents {
            Contents::Memory(bytes) => Ok(bytes),
            Contents::Disk(path) => tokio::fs::read(&path)
                .await
                .map_err(|e| open_error(&path, &e)),
        }
    }
}

fn open_error(path: &Path, err: &std::io::Error) -> Pdf2PodcastError {
    match err.kind() {
        std::io::ErrorKind::PermissionDenied => Pdf2PodcastError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => Pdf2PodcastError::FileNotFound {
            path: path.to_path_buf(),
        },
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// The guard's verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Accepted(PdfFile),
    Rejected(SelectionError),
}

/// Validates candidate files before they become the pending submission.
#[derive(Debug, Clone, Copy)]
pub struct SelectionGuard {
    max_file_size: Option<u64>,
}

impl SelectionGuard {
    pub fn new(max_file_size: Option<u64>) -> Self {
        Self { max_file_size }
    }

    /// Apply the rules in order: present, declared PDF, within the ceiling.
    pub fn check(&self, candidate: Option<PdfFile>) -> Selection {
        let Some(file) = candidate else {
            return Selection::Rejected(SelectionError::NoFile);
        };

        if file.mime_type != PDF_MIME_TYPE {
            return Selection::Rejected(SelectionError::InvalidType {
                mime_type: file.mime_type,
            });
        }

        if let Some(limit) = self.max_file_size {
            if file.size() > limit {
                return Selection::Rejected(SelectionError::TooLarge {
                    size: file.size(),
                    limit,
                });
            }
        }

        Selection::Accepted(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn pdf(size: usize) -> PdfFile {
        PdfFile::new("doc.pdf", PDF_MIME_TYPE, vec![b'%'; size])
    }

    #[test]
    fn missing_file_is_rejected() {
        let guard = SelectionGuard::new(None);
        assert_eq!(guard.check(None), Selection::Rejected(SelectionError::NoFile));
    }

    #[test]
    fn non_pdf_types_are_rejected() {
        let guard = SelectionGuard::new(None);
        for mime in ["text/plain", "application/x-pdf", "APPLICATION/PDF", "", "image/png"] {
            let file = PdfFile::new("doc.pdf", mime, b"%PDF-1.4".to_vec());
            assert!(
                matches!(
                    guard.check(Some(file)),
                    Selection::Rejected(SelectionError::InvalidType { .. })
                ),
                "{mime:?} should be rejected"
            );
        }
    }

    #[test]
    fn type_is_checked_before_size() {
        let guard = SelectionGuard::new(Some(1));
        let file = PdfFile::new("a.txt", "text/plain", vec![0; 10]);
        assert!(matches!(
            guard.check(Some(file)),
            Selection::Rejected(SelectionError::InvalidType { .. })
        ));
    }

    #[test]
    fn size_ceiling_is_inclusive() {
        let guard = SelectionGuard::new(Some(100));
        assert!(matches!(guard.check(Some(pdf(100))), Selection::Accepted(_)));
        assert_eq!(
            guard.check(Some(pdf(101))),
            Selection::Rejected(SelectionError::TooLarge {
                size: 101,
                limit: 100
            })
        );
    }

    #[test]
    fn disabled_ceiling_accepts_anything() {
        let guard = SelectionGuard::new(None);
        assert!(matches!(guard.check(Some(pdf(4096))), Selection::Accepted(_)));
    }

    #[tokio::test]
    async fn from_path_declares_type_from_extension() {
        let dir = tempfile::tempdir().unwrap();
        let pdf_path = dir.path().join("report.pdf");
        std::fs::File::create(&pdf_path)
            .unwrap()
            .write_all(b"%PDF-1.7\n")
            .unwrap();
        let txt_path = dir.path().join("notes.txt");
        std::fs::write(&txt_path, b"hello").unwrap();

        let pdf = PdfFile::from_path(&pdf_path).await.unwrap();
        assert_eq!(pdf.name, "report.pdf");
        assert_eq!(pdf.mime_type, PDF_MIME_TYPE);
        assert_eq!(pdf.size(), 9);

        let txt = PdfFile::from_path(&txt_path).await.unwrap();
        assert_eq!(txt.mime_type, "text/plain");

        assert_eq!(pdf.load().await.unwrap(), b"%PDF-1.7\n");
    }

    #[tokio::test]
    async fn oversize_file_is_rejected_without_reading_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.pdf");
        // Sparse: 300 MiB of metadata, no data blocks.
        std::fs::File::create(&path)
            .unwrap()
            .set_len(300 * 1024 * 1024)
            .unwrap();

        let file = PdfFile::from_path(&path).await.unwrap();
        assert_eq!(file.size(), 300 * 1024 * 1024);
        assert!(matches!(file.contents, Contents::Disk(_)));

        let guard = SelectionGuard::new(Some(1024 * 1024));
        assert_eq!(
            guard.check(Some(file)),
            Selection::Rejected(SelectionError::TooLarge {
                size: 300 * 1024 * 1024,
                limit: 1024 * 1024
            })
        );
    }

    #[tokio::test]
    async fn load_reports_file_removed_after_selection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.pdf");
        std::fs::write(&path, b"%PDF").unwrap();
        let file = PdfFile::from_path(&path).await.unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(
            file.load().await,
            Err(Pdf2PodcastError::FileNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn directory_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            PdfFile::from_path(dir.path()).await,
            Err(Pdf2PodcastError::FileNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn from_path_reports_missing_file() {
        let err = PdfFile::from_path("/definitely/not/here.pdf").await;
        assert!(matches!(err, Err(Pdf2PodcastError::FileNotFound { .. })));
    }

    #[test]
    fn debug_omits_contents() {
        let dbg = format!("{:?}", pdf(3));
        assert!(dbg.contains("size: 3"), "got: {dbg}");
    }
}
