//! Output types: what the service returns and what the projector renders.

use crate::player::Playback;
use reqwest::Url;
use serde::{Deserialize, Serialize};

/// The service's success payload: `{ "summary": …, "audioUrl": … }`.
///
/// Immutable once received; unknown fields in the body are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub summary: String,
    #[serde(rename = "audioUrl")]
    pub audio_url: String,
}

/// Word and character counts of a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextStats {
    /// Tokens separated by runs of whitespace.
    pub words: usize,
    /// Unicode scalar values, whitespace included.
    pub characters: usize,
}

impl TextStats {
    pub fn of(text: &str) -> Self {
        Self {
            words: text.split_whitespace().count(),
            characters: text.chars().count(),
        }
    }
}

/// A rendered success: everything the results surface displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultView {
    /// Copyable summary text.
    pub summary: String,
    pub stats: TextStats,
    /// Playable media reference, exactly as the service returned it.
    pub audio_url: String,
    /// Download target: `audio_url` resolved against the service base URL.
    /// `None` when the reference cannot be resolved.
    #[serde(serialize_with = "serialize_url")]
    pub download_url: Option<Url>,
}

impl ResultView {
    pub fn new(result: &ConversionResult, download_url: Option<Url>) -> Self {
        Self {
            summary: result.summary.clone(),
            stats: TextStats::of(&result.summary),
            audio_url: result.audio_url.clone(),
            download_url,
        }
    }

    /// A paused player for the audio, fed the reference verbatim.
    pub fn playback(&self, seek_step_secs: u64) -> Playback {
        Playback::new(self.audio_url.clone(), seek_step_secs)
    }
}

fn serialize_url<S: serde::Serializer>(url: &Option<Url>, s: S) -> Result<S::Ok, S::Error> {
    match url {
        Some(u) => s.serialize_some(u.as_str()),
        None => s.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_names() {
        let r: ConversionResult =
            serde_json::from_str(r#"{"summary":"Hello world","audioUrl":"https://x/a.mp3","extra":1}"#)
                .unwrap();
        assert_eq!(r.summary, "Hello world");
        assert_eq!(r.audio_url, "https://x/a.mp3");
    }

    #[test]
    fn missing_field_is_an_error() {
        assert!(serde_json::from_str::<ConversionResult>(r#"{"summary":"x"}"#).is_err());
        assert!(serde_json::from_str::<ConversionResult>(r#"{"summary":1,"audioUrl":"a"}"#).is_err());
    }

    #[test]
    fn counts_words_on_whitespace_runs() {
        assert_eq!(
            TextStats::of("Hello world"),
            TextStats {
                words: 2,
                characters: 11
            }
        );
        assert_eq!(TextStats::of("  a \n\t b   c ").words, 3);
        assert_eq!(TextStats::of("").words, 0);
        assert_eq!(TextStats::of("   ").words, 0);
    }

    #[test]
    fn counts_characters_not_bytes() {
        assert_eq!(TextStats::of("café").characters, 4);
    }

    #[test]
    fn view_keeps_audio_reference_verbatim() {
        let r = ConversionResult {
            summary: "Hello world".into(),
            audio_url: "/uploads/podcast.mp3".into(),
        };
        let base = Url::parse("http://localhost:5000").unwrap();
        let view = ResultView::new(&r, base.join(&r.audio_url).ok());
        assert_eq!(view.audio_url, "/uploads/podcast.mp3");
        assert_eq!(
            view.download_url.as_ref().map(Url::as_str),
            Some("http://localhost:5000/uploads/podcast.mp3")
        );

        let player = view.playback(10);
        assert_eq!(player.source(), "/uploads/podcast.mp3");
        assert!(!player.is_playing());

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["download_url"], "http://localhost:5000/uploads/podcast.mp3");
        assert_eq!(json["stats"]["words"], 2);
    }
}
