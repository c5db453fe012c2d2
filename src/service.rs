//! The conversion service: one multipart `POST`, one JSON answer.
//!
//! [`ConversionService`] is the seam between the controller and the network.
//! [`HttpConversionService`] is the real implementation; tests substitute
//! their own to count requests or hold a request open.
//!
//! ## Response classification
//!
//! | Response | Result |
//! |----------|--------|
//! | 2xx + `{summary, audioUrl}` | `Ok(ConversionResult)` |
//! | 2xx + anything else | `MalformedResponse` |
//! | non-2xx + `{error: "…"}` | `Service` with that message |
//! | non-2xx + other body | `Service` with `"Server error (HTTP n)"` |
//! | send/receive failure | `Transport` |

use crate::config::{ClientConfig, PDF_MIME_TYPE};
use crate::convert::write_atomically;
use crate::error::{ConversionError, Pdf2PodcastError};
use crate::output::ConversionResult;
use crate::selection::PdfFile;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Url;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Sends one file for conversion and reports the outcome.
#[async_trait]
pub trait ConversionService: Send + Sync {
    async fn convert(&self, file: PdfFile) -> Result<ConversionResult, ConversionError>;
}

/// [`ConversionService`] over HTTP via `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpConversionService {
    client: reqwest::Client,
    endpoint: Url,
    field_name: String,
}

/// Failure body shape: `{ "error": "…" }`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

impl HttpConversionService {
    pub fn new(config: &ClientConfig) -> Result<Self, Pdf2PodcastError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| Pdf2PodcastError::Internal(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint_url()?,
            field_name: config.field_name.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Fetch the audio behind `url` and write it to `dest`.
    ///
    /// Uses atomic write (temp file + rename) so an interrupted download never
    /// leaves a truncated file at `dest`. Returns the number of bytes written.
    pub async fn download_audio(&self, url: &Url, dest: &Path) -> Result<u64, Pdf2PodcastError> {
        info!("Downloading audio from: {}", url);
        let failed = |reason: String| Pdf2PodcastError::DownloadFailed {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| failed(e.to_string()))?;
        if !response.status().is_success() {
            return Err(failed(format!("HTTP {}", response.status())));
        }
        let bytes = response.bytes().await.map_err(|e| failed(e.to_string()))?;

        write_atomically(dest, "part", &bytes).await?;

        info!("Saved {} bytes to: {}", bytes.len(), dest.display());
        Ok(bytes.len() as u64)
    }
}

#[async_trait]
impl ConversionService for HttpConversionService {
    async fn convert(&self, file: PdfFile) -> Result<ConversionResult, ConversionError> {
        let size = file.size();
        let name = file.name.clone();
        // A file that vanished since it was picked never reaches the service.
        let bytes = file.load().await.map_err(|e| {
            warn!("Could not read {} for upload: {}", name, e);
            ConversionError::Transport {
                detail: e.to_string(),
            }
        })?;
        let part = Part::bytes(bytes)
            .file_name(name)
            .mime_str(PDF_MIME_TYPE)
            .map_err(|e| ConversionError::Transport {
                detail: e.to_string(),
            })?;
        let form = Form::new().part(self.field_name.clone(), part);

        debug!("POST {} ({} bytes as '{}')", self.endpoint, size, self.field_name);
        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                warn!("Request to {} failed: {}", self.endpoint, e);
                ConversionError::Transport {
                    detail: e.to_string(),
                }
            })?;

        let status = response.status();
        debug!("Response status: {}", status);
        let body = response.text().await.map_err(|e| ConversionError::Transport {
            detail: format!("reading response body: {e}"),
        })?;

        classify_response(status.as_u16(), &body)
    }
}

/// Map a status code and body text onto the outcome table above.
pub fn classify_response(status: u16, body: &str) -> Result<ConversionResult, ConversionError> {
    if (200..300).contains(&status) {
        return serde_json::from_str::<ConversionResult>(body).map_err(|e| {
            ConversionError::MalformedResponse {
                status,
                detail: e.to_string(),
            }
        });
    }

    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| ConversionError::generic_status_message(status));
    Err(ConversionError::Service { status, message })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_body_parses() {
        let r = classify_response(200, r#"{"summary":"Hello world","audioUrl":"https://x/a.mp3"}"#)
            .unwrap();
        assert_eq!(r.summary, "Hello world");
        assert_eq!(r.audio_url, "https://x/a.mp3");
    }

    #[test]
    fn success_status_with_bad_body_is_malformed() {
        for body in ["", "<html>oops</html>", r#"{"summary":"x"}"#, "[]"] {
            assert!(
                matches!(
                    classify_response(200, body),
                    Err(ConversionError::MalformedResponse { status: 200, .. })
                ),
                "body {body:?}"
            );
        }
    }

    #[test]
    fn structured_failure_uses_server_message() {
        assert_eq!(
            classify_response(500, r#"{"error":"bad pdf"}"#),
            Err(ConversionError::Service {
                status: 500,
                message: "bad pdf".into()
            })
        );
    }

    #[test]
    fn unstructured_failure_falls_back_to_status() {
        for body in ["Internal Server Error", "", r#"{"error":""}"#, r#"{"detail":"x"}"#, r#"{"error":null}"#] {
            match classify_response(500, body) {
                Err(ConversionError::Service { status, message }) => {
                    assert_eq!(status, 500);
                    assert_eq!(message, "Server error (HTTP 500)", "body {body:?}");
                }
                other => panic!("unexpected {other:?} for {body:?}"),
            }
        }
    }

    #[test]
    fn new_builds_endpoint_from_config() {
        let config = ClientConfig::builder()
            .base_url("https://svc.example")
            .endpoint("/convert")
            .build()
            .unwrap();
        let svc = HttpConversionService::new(&config).unwrap();
        assert_eq!(svc.endpoint().as_str(), "https://svc.example/convert");
    }
}
