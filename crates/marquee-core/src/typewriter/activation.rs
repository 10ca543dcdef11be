use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::sequencer::{Phase, Typewriter, TypewriterHandle};
use super::surface::SharedSurface;
use crate::{Error, Result};

/// A typewriter start waiting out its activation delay
pub struct Activation {
    cancel: CancellationToken,
    run_rx: watch::Receiver<Option<TypewriterHandle>>,
    task: JoinHandle<Option<TypewriterHandle>>,
}

impl Activation {
    /// Give up on starting; has no effect once typing has begun
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_pending(&self) -> bool {
        !self.task.is_finished()
    }

    /// Phase of the started run; `None` until typing has begun
    pub fn phase(&self) -> Option<Phase> {
        self.run_rx.borrow().as_ref().map(TypewriterHandle::phase)
    }

    /// Wait for the activation delay to pass
    ///
    /// Yields the run handle, or `None` if the activation was cancelled or
    /// the start itself failed.
    pub async fn started(self) -> Result<Option<TypewriterHandle>> {
        self.task
            .await
            .map_err(|e| Error::Other(format!("activation task join error: {}", e)))
    }
}

/// Start `typewriter` on `surface` after `start_delay`
///
/// A missing surface is reported right away rather than after the delay.
pub fn activate_after(
    typewriter: &Typewriter,
    surface: Option<SharedSurface>,
    text: impl Into<String>,
    speed: Duration,
    start_delay: Duration,
) -> Result<Activation> {
    let surface = surface.ok_or(Error::MissingTarget)?;
    if speed.is_zero() {
        return Err(Error::InvalidDelay);
    }

    let typewriter = typewriter.clone();
    let text = text.into();
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    let (run_tx, run_rx) = watch::channel(None);

    let task = tokio::spawn(async move {
        tokio::select! {
            biased;
            _ = token.cancelled() => return None,
            _ = tokio::time::sleep(start_delay) => {}
        }

        info!("Activating typewriter: {:?}", text);
        match typewriter.start(Some(surface), &text, speed) {
            Ok(handle) => {
                run_tx.send_replace(Some(handle.clone()));
                Some(handle)
            }
            Err(e) => {
                warn!("Typewriter activation failed: {}", e);
                None
            }
        }
    });

    Ok(Activation {
        cancel,
        run_rx,
        task,
    })
}
