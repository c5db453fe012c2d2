//! Configuration types for the submission workflow.
//!
//! All client behaviour is controlled through [`ClientConfig`], built via its
//! [`ClientConfigBuilder`]. The only value a real deployment must set is the
//! base URL of the conversion service; everything else has a default that
//! matches the service's published contract. [`ClientConfigBuilder::build`]
//! validates the combination once.

use crate::error::Pdf2PodcastError;
use crate::progress::ObserverRef;
use reqwest::Url;
use std::fmt;
use std::time::Duration;

/// MIME type every accepted file must declare.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Default upload ceiling: 50 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Configuration for a [`crate::SubmissionController`].
///
/// Built via [`ClientConfig::builder()`] or using [`ClientConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf2podcast::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .base_url("https://podcasts.example.com")
///     .max_file_size(Some(20 * 1024 * 1024))
///     .build()
///     .unwrap();
/// assert_eq!(
///     config.endpoint_url().unwrap().as_str(),
///     "https://podcasts.example.com/api/process-pdf"
/// );
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL of the conversion service. Default: `http://127.0.0.1:5000`.
    ///
    /// Relative `audioUrl` values in responses are resolved against it.
    pub base_url: Url,

    /// Path of the conversion endpoint, appended to `base_url`.
    /// Default: `/api/process-pdf`.
    pub endpoint: String,

    /// Name of the multipart field carrying the PDF bytes. Default: `pdfFile`.
    pub field_name: String,

    /// Upload ceiling in bytes. `None` disables the size check.
    /// Default: 50 MiB.
    pub max_file_size: Option<u64>,

    /// Advisory progress milestones shown while the request is outstanding.
    /// Default: `[20, 50, 80]`.
    ///
    /// The service offers no progress channel, so these are purely cosmetic
    /// steps; the bar jumps to 100 only when a result arrives.
    pub progress_milestones: Vec<u8>,

    /// Delay between advisory milestones in milliseconds. Default: 400.
    pub milestone_delay_ms: u64,

    /// Whole-request timeout in seconds. Default: `None` (the transport's
    /// own failure signalling decides).
    pub request_timeout_secs: Option<u64>,

    /// How long the "Copied!" confirmation stays visible. Default: 2000 ms.
    pub copy_feedback_ms: u64,

    /// Seek step for the audio player in seconds. Default: 10.
    pub seek_step_secs: u64,

    /// Optional observer notified of every state transition and advisory
    /// progress value.
    pub observer: Option<ObserverRef>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse("http://127.0.0.1:5000").expect("static URL is valid"),
            endpoint: "/api/process-pdf".to_string(),
            field_name: "pdfFile".to_string(),
            max_file_size: Some(DEFAULT_MAX_FILE_SIZE),
            progress_milestones: vec![20, 50, 80],
            milestone_delay_ms: 400,
            request_timeout_secs: None,
            copy_feedback_ms: 2000,
            seek_step_secs: 10,
            observer: None,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url.as_str())
            .field("endpoint", &self.endpoint)
            .field("field_name", &self.field_name)
            .field("max_file_size", &self.max_file_size)
            .field("progress_milestones", &self.progress_milestones)
            .field("milestone_delay_ms", &self.milestone_delay_ms)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("copy_feedback_ms", &self.copy_feedback_ms)
            .field("seek_step_secs", &self.seek_step_secs)
            .field(
                "observer",
                &self.observer.as_ref().map(|_| "<dyn SubmissionObserver>"),
            )
            .finish()
    }
}

impl ClientConfig {
    /// Create a new builder for `ClientConfig`.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: Self::default(),
            base_url: None,
        }
    }

    /// Full URL of the conversion endpoint.
    ///
    /// The endpoint is appended to the base URL's path, so a service mounted
    /// under a prefix (`https://host/tools`) keeps that prefix.
    pub fn endpoint_url(&self) -> Result<Url, Pdf2PodcastError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}{}", self.endpoint)).map_err(|e| {
            Pdf2PodcastError::InvalidConfig(format!(
                "endpoint '{}' does not form a valid URL: {e}",
                self.endpoint
            ))
        })
    }

    /// Resolve an `audioUrl` from a response against the base URL.
    ///
    /// Absolute URLs are returned unchanged; paths such as
    /// `/uploads/podcast.mp3` resolve the way a browser page served from the
    /// base URL would resolve them.
    pub fn resolve_audio_url(&self, audio_url: &str) -> Option<Url> {
        self.base_url.join(audio_url).ok()
    }

    pub fn milestone_delay(&self) -> Duration {
        Duration::from_millis(self.milestone_delay_ms)
    }

    pub fn copy_feedback(&self) -> Duration {
        Duration::from_millis(self.copy_feedback_ms)
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
    base_url: Option<String>,
}

impl ClientConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn endpoint(mut self, path: impl Into<String>) -> Self {
        self.config.endpoint = path.into();
        self
    }

    pub fn field_name(mut self, name: impl Into<String>) -> Self {
        self.config.field_name = name.into();
        self
    }

    pub fn max_file_size(mut self, bytes: Option<u64>) -> Self {
        self.config.max_file_size = bytes;
        self
    }

    pub fn progress_milestones(mut self, milestones: Vec<u8>) -> Self {
        self.config.progress_milestones = milestones;
        self
    }

    pub fn milestone_delay_ms(mut self, ms: u64) -> Self {
        self.config.milestone_delay_ms = ms;
        self
    }

    pub fn request_timeout_secs(mut self, secs: Option<u64>) -> Self {
        self.config.request_timeout_secs = secs.filter(|s| *s > 0);
        self
    }

    pub fn copy_feedback_ms(mut self, ms: u64) -> Self {
        self.config.copy_feedback_ms = ms;
        self
    }

    pub fn seek_step_secs(mut self, secs: u64) -> Self {
        self.config.seek_step_secs = secs.max(1);
        self
    }

    pub fn observer(mut self, observer: ObserverRef) -> Self {
        self.config.observer = Some(observer);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(mut self) -> Result<ClientConfig, Pdf2PodcastError> {
        if let Some(raw) = self.base_url.take() {
            let url = Url::parse(raw.trim()).map_err(|e| {
                Pdf2PodcastError::InvalidConfig(format!("base URL '{raw}' is invalid: {e}"))
            })?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(Pdf2PodcastError::InvalidConfig(format!(
                    "base URL must be http or https, got '{}'",
                    url.scheme()
                )));
            }
            self.config.base_url = url;
        }

        let c = &self.config;
        if !c.endpoint.starts_with('/') {
            return Err(Pdf2PodcastError::InvalidConfig(format!(
                "endpoint must start with '/', got '{}'",
                c.endpoint
            )));
        }
        if c.field_name.trim().is_empty() {
            return Err(Pdf2PodcastError::InvalidConfig(
                "multipart field name must not be empty".into(),
            ));
        }
        if c.max_file_size == Some(0) {
            return Err(Pdf2PodcastError::InvalidConfig(
                "max file size must be ≥ 1 byte (use None to disable)".into(),
            ));
        }
        let increasing = c.progress_milestones.windows(2).all(|w| w[0] < w[1]);
        let in_range = c.progress_milestones.iter().all(|p| (1..=99).contains(p));
        if !increasing || !in_range {
            return Err(Pdf2PodcastError::InvalidConfig(format!(
                "progress milestones must be strictly increasing within 1–99, got {:?}",
                c.progress_milestones
            )));
        }
        self.config.endpoint_url()?;
        Ok(self.config)
    }
}
