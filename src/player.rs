//! Playback model for the returned audio reference.
//!
//! Holds transport state only (source, position, play/pause); decoding and
//! output belong to whatever media surface plays `source`. Seeking is clamped
//! to `[0, duration]` once the duration is known.

use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playback {
    source: String,
    position: Duration,
    duration: Option<Duration>,
    playing: bool,
    seek_step: Duration,
}

impl Playback {
    /// A paused player at position zero. `seek_step_secs` is the ± jump.
    pub fn new(source: impl Into<String>, seek_step_secs: u64) -> Self {
        Self {
            source: source.into(),
            position: Duration::ZERO,
            duration: None,
            playing: false,
            seek_step: Duration::from_secs(seek_step_secs.max(1)),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn position(&self) -> Duration {
        self.position
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Distance covered by one `seek_forward`/`seek_backward`.
    pub fn seek_step(&self) -> Duration {
        self.seek_step
    }

    /// Record the duration once the media surface has loaded metadata.
    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = Some(duration);
        self.position = self.clamp(self.position);
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    pub fn toggle(&mut self) {
        self.playing = !self.playing;
    }

    pub fn seek_to(&mut self, position: Duration) {
        self.position = self.clamp(position);
    }

    pub fn seek_forward(&mut self) {
        self.seek_to(self.position.saturating_add(self.seek_step));
    }

    pub fn seek_backward(&mut self) {
        self.seek_to(self.position.saturating_sub(self.seek_step));
    }

    /// Advance the position by elapsed wall time while playing. Stops at
    /// the end.
    pub fn tick(&mut self, elapsed: Duration) {
        if !self.playing {
            return;
        }
        self.seek_to(self.position.saturating_add(elapsed));
        if Some(self.position) == self.duration {
            self.playing = false;
        }
    }

    fn clamp(&self, position: Duration) -> Duration {
        match self.duration {
            Some(d) => position.min(d),
            None => position,
        }
    }
}
