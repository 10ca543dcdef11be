//! Copy-to-clipboard buttons
//!
//! Times are offsets on the caller's clock (the same clock the motion engine
//! samples), so feedback can be driven and tested without sleeping.

use std::time::Duration;

use tracing::{debug, warn};

use crate::{Error, Result};

pub const COPY_LABEL: &str = "Copy";
pub const COPIED_LABEL: &str = "Copied!";
pub const FAILED_LABEL: &str = "Failed";

/// Anything text can be copied to
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<()>;
}

/// The operating system clipboard
///
/// The connection is opened on first use and kept for later copies; some
/// platforms drop the contents once the owning handle goes away.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        let clipboard = match self.inner.take() {
            Some(clipboard) => clipboard,
            None => arboard::Clipboard::new().map_err(|e| Error::Clipboard(e.to_string()))?,
        };
        self.inner
            .insert(clipboard)
            .set_text(text.to_string())
            .map_err(|e| Error::Clipboard(e.to_string()))
    }
}

/// In-memory clipboard, optionally refusing every write
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    pub contents: Option<String>,
    pub fail: bool,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            contents: None,
            fail: true,
        }
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        if self.fail {
            return Err(Error::Clipboard("clipboard unavailable".to_string()));
        }
        self.contents = Some(text.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyState {
    Ready,
    Copied { until: Duration },
    Failed { until: Duration },
}

/// How a copy button should be drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyStyle {
    Normal,
    Success,
    Error,
}

/// A button that copies a fixed payload and briefly reports the outcome
#[derive(Debug, Clone)]
pub struct CopyButton {
    label: String,
    payload: String,
    feedback: Duration,
    state: CopyState,
}

impl CopyButton {
    pub fn new(payload: impl Into<String>, feedback: Duration) -> Self {
        Self::with_label(COPY_LABEL, payload, feedback)
    }

    pub fn with_label(label: impl Into<String>, payload: impl Into<String>, feedback: Duration) -> Self {
        Self {
            label: label.into(),
            payload: payload.into(),
            feedback,
            state: CopyState::Ready,
        }
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn state(&self) -> CopyState {
        self.state
    }

    /// Copy the payload at `now`
    ///
    /// Pressing again during feedback restarts the feedback window.
    pub fn press(&mut self, clipboard: &mut dyn Clipboard, now: Duration) -> Result<()> {
        let until = now + self.feedback;
        match clipboard.write_text(&self.payload) {
            Ok(()) => {
                debug!(payload = %self.payload, "Copied to clipboard");
                self.state = CopyState::Copied { until };
                Ok(())
            }
            Err(e) => {
                warn!("Copy failed: {}", e);
                self.state = CopyState::Failed { until };
                Err(e)
            }
        }
    }

    /// Revert to the ready state once the feedback window is over
    ///
    /// A successful copy reverts to the button's own label; a failed one
    /// reverts to plain "Copy". Returns `true` if the state changed.
    pub fn tick(&mut self, now: Duration) -> bool {
        match self.state {
            CopyState::Copied { until } if now >= until => {
                self.state = CopyState::Ready;
                true
            }
            CopyState::Failed { until } if now >= until => {
                self.label = COPY_LABEL.to_string();
                self.state = CopyState::Ready;
                true
            }
            _ => false,
        }
    }

    pub fn label(&self) -> &str {
        match self.state {
            CopyState::Ready => &self.label,
            CopyState::Copied { .. } => COPIED_LABEL,
            CopyState::Failed { .. } => FAILED_LABEL,
        }
    }

    pub fn style(&self) -> CopyStyle {
        match self.state {
            CopyState::Ready => CopyStyle::Normal,
            CopyState::Copied { .. } => CopyStyle::Success,
            CopyState::Failed { .. } => CopyStyle::Error,
        }
    }

    pub fn is_showing_feedback(&self) -> bool {
        self.state != CopyState::Ready
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_copy_shows_feedback_then_reverts() {
        let mut clipboard = MemoryClipboard::new();
        let mut button = CopyButton::new("pip install pyward-cli", ms(2000));
        assert_eq!(button.label(), "Copy");

        button.press(&mut clipboard, ms(500)).unwrap();
        assert_eq!(clipboard.contents.as_deref(), Some("pip install pyward-cli"));
        assert_eq!(button.label(), "Copied!");
        assert_eq!(button.style(), CopyStyle::Success);

        assert!(!button.tick(ms(2499)));
        assert_eq!(button.label(), "Copied!");
        assert!(button.tick(ms(2500)));
        assert_eq!(button.label(), "Copy");
        assert_eq!(button.style(), CopyStyle::Normal);
    }

    #[test]
    fn test_failed_copy_reports_and_reverts_to_copy() {
        let mut clipboard = MemoryClipboard::failing();
        let mut button = CopyButton::with_label("Copy command", "pyward -s demo.py", ms(2000));

        let err = button.press(&mut clipboard, ms(0)).unwrap_err();
        assert!(matches!(err, Error::Clipboard(_)));
        assert_eq!(button.label(), "Failed");
        assert_eq!(button.style(), CopyStyle::Error);

        assert!(button.tick(ms(2000)));
        assert_eq!(button.label(), "Copy");
        assert_eq!(button.style(), CopyStyle::Normal);
    }

    #[test]
    fn test_successful_copy_keeps_custom_label() {
        let mut clipboard = MemoryClipboard::new();
        let mut button = CopyButton::with_label("Copy command", "pyward -s demo.py", ms(2000));

        button.press(&mut clipboard, ms(0)).unwrap();
        assert!(button.tick(ms(2000)));
        assert_eq!(button.label(), "Copy command");
    }

    #[test]
    fn test_press_during_feedback_restarts_window() {
        let mut clipboard = MemoryClipboard::new();
        let mut button = CopyButton::new("pyward demo.py", ms(2000));

        button.press(&mut clipboard, ms(0)).unwrap();
        button.press(&mut clipboard, ms(1500)).unwrap();
        assert!(!button.tick(ms(2000)));
        assert!(button.is_showing_feedback());
        assert!(button.tick(ms(3500)));
        // never reverts to "Copied!" as its own label
        assert_eq!(button.label(), "Copy");
    }
}
