//! Clipboard access for the "copy summary" action.
//!
//! Copying is a side channel: it never touches the submission, and a failure
//! (no display server, permission denied) is reported to the caller who is
//! expected to log it and move on.

use crate::error::ClipboardError;

/// Something that can hold a copy of the summary text.
pub trait ClipboardSink: Send + Sync {
    fn set_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// The operating-system clipboard, via `arboard`.
///
/// On Linux (X11 and Wayland) the owning process serves the clipboard
/// contents, so they disappear when it exits. A long-running front end can
/// use [`SystemClipboard::new`]. A process that exits right after copying
/// should use [`SystemClipboard::until_replaced`]: `set_text` then blocks
/// until a clipboard manager or another program takes over the contents.
/// Elsewhere both behave the same.
#[cfg(feature = "clipboard")]
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard {
    hold_until_replaced: bool,
}

#[cfg(feature = "clipboard")]
impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard that keeps ownership of the copied text until it is
    /// replaced. Blocks the calling thread on Linux.
    pub fn until_replaced() -> Self {
        Self {
            hold_until_replaced: true,
        }
    }

    pub fn holds_until_replaced(&self) -> bool {
        self.hold_until_replaced
    }
}

#[cfg(feature = "clipboard")]
impl ClipboardSink for SystemClipboard {
    fn set_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|err| ClipboardError(err.to_string()))?;

        #[cfg(target_os = "linux")]
        {
            use arboard::SetExtLinux;
            if self.hold_until_replaced {
                return clipboard
                    .set()
                    .wait()
                    .text(text.to_owned())
                    .map_err(|err| ClipboardError(err.to_string()));
            }
        }

        clipboard
            .set_text(text.to_owned())
            .map_err(|err| ClipboardError(err.to_string()))
    }
}

#[cfg(all(test, feature = "clipboard"))]
mod tests {
    use super::*;

    #[test]
    fn default_clipboard_does_not_block() {
        assert!(!SystemClipboard::new().holds_until_replaced());
        assert!(!SystemClipboard::default().holds_until_replaced());
    }

    #[test]
    fn exiting_callers_can_hold_the_selection() {
        assert!(SystemClipboard::until_replaced().holds_until_replaced());
    }
}
