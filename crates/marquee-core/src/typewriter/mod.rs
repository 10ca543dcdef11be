//! Typewriter effect: reveal a string into a text surface one character
//! per tick.
//!
//! - `surface` - write-only text sinks the sequencer types into
//! - `state` - pure cursor/prefix bookkeeping
//! - `sequencer` - timer-driven runs with per-surface cancellation
//! - `activation` - delayed start, the way the hero line kicks off after load
//!
//! # Usage
//!
//! ```ignore
//! use marquee_core::typewriter::{TextBuffer, Typewriter};
//!
//! let buffer = TextBuffer::new();
//! let typewriter = Typewriter::new();
//! let mut handle = typewriter.start(Some(buffer.shared()), "abc", Duration::from_millis(80))?;
//! handle.finished().await;
//! assert_eq!(buffer.text(), "abc");
//! ```

mod activation;
mod sequencer;
mod state;
mod surface;

pub use activation::{activate_after, Activation};
pub use sequencer::{Phase, Typewriter, TypewriterHandle, DEFAULT_DELAY};
pub use state::TypewriterState;
pub use surface::{SharedSurface, SurfaceError, SurfaceId, TextBuffer, TextSurface};
