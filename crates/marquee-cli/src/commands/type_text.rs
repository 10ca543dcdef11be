use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;

use marquee_core::typewriter::{activate_after, SurfaceError, SurfaceId, TextSurface};
use marquee_core::{Phase, Typewriter};

/// The current terminal line as a text surface
struct StdoutLine {
    id: SurfaceId,
    out: Mutex<io::Stdout>,
}

impl StdoutLine {
    fn new() -> Self {
        Self {
            id: SurfaceId::new(),
            out: Mutex::new(io::stdout()),
        }
    }

    fn write(&self, f: impl FnOnce(&mut io::Stdout) -> io::Result<()>) -> Result<(), SurfaceError> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| SurfaceError::Write("stdout lock poisoned".to_string()))?;
        f(&mut out)
            .and_then(|_| out.flush())
            .map_err(|e| SurfaceError::Write(e.to_string()))
    }
}

impl TextSurface for StdoutLine {
    fn id(&self) -> SurfaceId {
        self.id
    }

    fn replace(&self, text: &str) -> Result<(), SurfaceError> {
        self.write(|out| write!(out, "\r\x1b[2K{}", text))
    }

    fn append(&self, ch: char) -> Result<(), SurfaceError> {
        self.write(|out| write!(out, "{}", ch))
    }
}

/// Type `text` onto the terminal line and wait until it is done
pub async fn run(text: &str, speed: Duration, delay: Duration) -> Result<()> {
    let typewriter = Typewriter::new();
    let line = Arc::new(StdoutLine::new());

    let activation = activate_after(&typewriter, Some(line), text, speed, delay)?;
    let phase = match activation.started().await? {
        Some(mut handle) => handle.finished().await,
        None => Phase::Idle,
    };
    println!();

    if phase != Phase::Complete {
        anyhow::bail!("typing stopped before the end of the text");
    }
    Ok(())
}
