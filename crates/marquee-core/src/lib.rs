pub mod clipboard;
pub mod config;
pub mod error;
pub mod motion;
pub mod page;
pub mod typewriter;

pub use config::{AppConfig, EasingType, ScrollConfig};
pub use error::{Error, Result};
pub use typewriter::{Phase, TextBuffer, TextSurface, Typewriter, TypewriterHandle};
