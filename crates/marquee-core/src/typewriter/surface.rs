use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use thiserror::Error;
use uuid::Uuid;

/// Identity of a display surface, used to find the run currently typing into it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(Uuid);

impl SurfaceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SurfaceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("surface {0} is detached")]
    Detached(SurfaceId),

    #[error("write failed: {0}")]
    Write(String),
}

/// A sink that visibly renders text
///
/// The typewriter only ever writes: it clears the surface with `replace("")`
/// and then appends one character per tick.
pub trait TextSurface: Send + Sync {
    fn id(&self) -> SurfaceId;

    /// Replace all visible content
    fn replace(&self, text: &str) -> Result<(), SurfaceError>;

    /// Append a single character to the visible content
    fn append(&self, ch: char) -> Result<(), SurfaceError>;
}

pub type SharedSurface = Arc<dyn TextSurface>;

/// In-memory text surface shared between the writer and whoever renders it
///
/// Clones share the same content, so the UI keeps one clone for drawing and
/// hands another to the typewriter.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    id: SurfaceId,
    content: Arc<RwLock<String>>,
    attached: Arc<AtomicBool>,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBuffer {
    pub fn new() -> Self {
        Self {
            id: SurfaceId::new(),
            content: Arc::new(RwLock::new(String::new())),
            attached: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Wrap this buffer as a surface the sequencer can own
    pub fn shared(&self) -> SharedSurface {
        Arc::new(self.clone())
    }

    /// Snapshot of the current content
    pub fn text(&self) -> String {
        self.content
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn char_count(&self) -> usize {
        self.content
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .chars()
            .count()
    }

    /// Mark the surface as removed; every later write fails
    pub fn detach(&self) {
        self.attached.store(false, Ordering::Release);
    }

    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::Acquire)
    }

    fn ensure_attached(&self) -> Result<(), SurfaceError> {
        if self.is_attached() {
            Ok(())
        } else {
            Err(SurfaceError::Detached(self.id))
        }
    }
}

impl TextSurface for TextBuffer {
    fn id(&self) -> SurfaceId {
        self.id
    }

    fn replace(&self, text: &str) -> Result<(), SurfaceError> {
        self.ensure_attached()?;
        let mut content = self.content.write().unwrap_or_else(PoisonError::into_inner);
        content.clear();
        content.push_str(text);
        Ok(())
    }

    fn append(&self, ch: char) -> Result<(), SurfaceError> {
        self.ensure_attached()?;
        self.content
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(ch);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_content() {
        let buffer = TextBuffer::new();
        let surface = buffer.shared();

        surface.replace("pip").unwrap();
        surface.append(' ').unwrap();
        assert_eq!(buffer.text(), "pip ");
        assert_eq!(surface.id(), buffer.id());
    }

    #[test]
    fn test_detached_rejects_writes() {
        let buffer = TextBuffer::new();
        buffer.replace("kept").unwrap();
        buffer.detach();

        assert_eq!(buffer.append('x'), Err(SurfaceError::Detached(buffer.id())));
        assert!(buffer.replace("").is_err());
        assert_eq!(buffer.text(), "kept");
    }

    #[test]
    fn test_char_count_is_not_byte_count() {
        let buffer = TextBuffer::new();
        buffer.replace("héllo✓").unwrap();
        assert_eq!(buffer.char_count(), 6);
    }
}
