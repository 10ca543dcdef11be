use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::state::TypewriterState;
use super::surface::{SharedSurface, SurfaceId};
use crate::{Error, Result};

/// Inter-character delay used when the caller has no preference
pub const DEFAULT_DELAY: Duration = Duration::from_millis(100);

/// Lifecycle of a single typewriter run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Not typing: never started, cancelled, superseded or aborted by a
    /// failed write
    Idle,
    /// A tick is scheduled
    Running,
    /// Every character has been revealed; nothing else will be scheduled
    Complete,
}

/// The run currently allowed to write into a surface
struct ActiveRun {
    generation: u64,
    cancel: CancellationToken,
}

#[derive(Default)]
struct Registry {
    runs: Mutex<HashMap<SurfaceId, ActiveRun>>,
    next_generation: AtomicU64,
}

impl Registry {
    fn lock(&self) -> MutexGuard<'_, HashMap<SurfaceId, ActiveRun>> {
        self.runs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Drop the entry for `id` if it still belongs to `generation`
    fn release(&self, id: SurfaceId, generation: u64) {
        let mut runs = self.lock();
        if runs.get(&id).is_some_and(|run| run.generation == generation) {
            runs.remove(&id);
        }
    }
}

/// Reveals text into surfaces one character per tick
///
/// At most one run types into a given surface: starting a new run cancels the
/// previous one before the surface is cleared. Runs on different surfaces are
/// independent. Clones share the same registry of active runs.
#[derive(Clone, Default)]
pub struct Typewriter {
    registry: Arc<Registry>,
}

impl Typewriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start typing `text` into `surface`, one character every `delay`
    ///
    /// The surface is cleared before this returns. The first character
    /// appears one `delay` later. Must be called from within a tokio runtime.
    pub fn start(
        &self,
        surface: Option<SharedSurface>,
        text: &str,
        delay: Duration,
    ) -> Result<TypewriterHandle> {
        let surface = surface.ok_or(Error::MissingTarget)?;
        if delay.is_zero() {
            return Err(Error::InvalidDelay);
        }
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| Error::Other(format!("typewriter needs a tokio runtime: {}", e)))?;

        let id = surface.id();
        let generation = self.registry.next_generation.fetch_add(1, Ordering::Relaxed) + 1;
        let state = TypewriterState::new(text);
        let (phase_tx, phase_rx) = watch::channel(Phase::Idle);
        let progress = Arc::new(AtomicUsize::new(0));
        let cancel = CancellationToken::new();

        let handle = TypewriterHandle {
            registry: Arc::clone(&self.registry),
            surface_id: id,
            generation,
            cancel: cancel.clone(),
            phase_rx,
            progress: Arc::clone(&progress),
            total: state.len(),
        };

        {
            let mut runs = self.registry.lock();
            if let Some(previous) = runs.remove(&id) {
                debug!(surface = %id, generation = previous.generation, "Cancelling previous typewriter run");
                previous.cancel.cancel();
            }

            surface.replace("")?;

            if state.is_complete() {
                phase_tx.send_replace(Phase::Complete);
                debug!(surface = %id, "Typewriter started with empty text, nothing to type");
                return Ok(handle);
            }

            runs.insert(
                id,
                ActiveRun {
                    generation,
                    cancel: cancel.clone(),
                },
            );
            phase_tx.send_replace(Phase::Running);
        }

        debug!(
            surface = %id,
            generation,
            chars = state.len(),
            delay_ms = delay.as_millis() as u64,
            "Typewriter started"
        );

        runtime.spawn(run_sequence(RunContext {
            registry: Arc::clone(&self.registry),
            surface,
            state,
            delay,
            generation,
            cancel,
            phase_tx,
            progress,
        }));

        Ok(handle)
    }

    /// Start with the default 100ms delay
    pub fn start_with_defaults(
        &self,
        surface: Option<SharedSurface>,
        text: &str,
    ) -> Result<TypewriterHandle> {
        self.start(surface, text, DEFAULT_DELAY)
    }

    /// Cancel whatever is typing into `surface_id`
    ///
    /// Returns `false` when nothing was running there. Content already
    /// revealed stays on the surface.
    pub fn cancel(&self, surface_id: SurfaceId) -> bool {
        match self.registry.lock().remove(&surface_id) {
            Some(run) => {
                run.cancel.cancel();
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self, surface_id: SurfaceId) -> bool {
        self.registry.lock().contains_key(&surface_id)
    }

    /// Number of surfaces currently being typed into
    pub fn active_count(&self) -> usize {
        self.registry.lock().len()
    }
}

/// Caller-side view of one run
#[derive(Clone)]
pub struct TypewriterHandle {
    registry: Arc<Registry>,
    surface_id: SurfaceId,
    generation: u64,
    cancel: CancellationToken,
    phase_rx: watch::Receiver<Phase>,
    progress: Arc<AtomicUsize>,
    total: usize,
}

impl TypewriterHandle {
    pub fn surface_id(&self) -> SurfaceId {
        self.surface_id
    }

    pub fn phase(&self) -> Phase {
        *self.phase_rx.borrow()
    }

    pub fn is_running(&self) -> bool {
        self.phase() == Phase::Running
    }

    /// Characters revealed by this run so far
    pub fn revealed_count(&self) -> usize {
        self.progress.load(Ordering::Acquire)
    }

    /// Characters this run will reveal in total
    pub fn total(&self) -> usize {
        self.total
    }

    /// Stop this run; a newer run on the same surface is left alone
    pub fn cancel(&self) {
        self.registry.release(self.surface_id, self.generation);
        self.cancel.cancel();
    }

    /// Wait until the run leaves `Running` and return where it ended up
    pub async fn finished(&mut self) -> Phase {
        // An error means the task is gone; its last phase is still readable
        let _ = self.phase_rx.wait_for(|phase| *phase != Phase::Running).await;
        self.phase()
    }
}

struct RunContext {
    registry: Arc<Registry>,
    surface: SharedSurface,
    state: TypewriterState,
    delay: Duration,
    generation: u64,
    cancel: CancellationToken,
    phase_tx: watch::Sender<Phase>,
    progress: Arc<AtomicUsize>,
}

enum Step {
    Continue,
    Complete,
    Superseded,
    Failed,
}

impl RunContext {
    /// Reveal one character
    ///
    /// The registry lock is held across the ownership check and the write so a
    /// concurrent `start` on the same surface cannot clear it in between.
    fn step(&mut self) -> Step {
        let id = self.surface.id();
        let mut runs = self.registry.lock();

        let owned = runs
            .get(&id)
            .is_some_and(|run| run.generation == self.generation);
        if !owned || self.cancel.is_cancelled() {
            return Step::Superseded;
        }

        let Some(ch) = self.state.next_char() else {
            runs.remove(&id);
            return Step::Complete;
        };

        if let Err(e) = self.surface.append(ch) {
            warn!(surface = %id, generation = self.generation, "Typewriter aborted: {}", e);
            runs.remove(&id);
            return Step::Failed;
        }
        self.progress.store(self.state.cursor(), Ordering::Release);

        if self.state.is_complete() {
            runs.remove(&id);
            Step::Complete
        } else {
            Step::Continue
        }
    }
}

async fn run_sequence(mut ctx: RunContext) {
    let id = ctx.surface.id();

    loop {
        tokio::select! {
            biased;
            _ = ctx.cancel.cancelled() => {
                debug!(surface = %id, generation = ctx.generation, "Typewriter cancelled");
                ctx.phase_tx.send_replace(Phase::Idle);
                return;
            }
            _ = tokio::time::sleep(ctx.delay) => {}
        }

        match ctx.step() {
            Step::Continue => {}
            Step::Complete => {
                debug!(surface = %id, generation = ctx.generation, "Typewriter complete");
                ctx.phase_tx.send_replace(Phase::Complete);
                return;
            }
            Step::Superseded | Step::Failed => {
                ctx.phase_tx.send_replace(Phase::Idle);
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typewriter::{SurfaceError, TextBuffer, TextSurface};
    use tokio::time::{sleep_until, Instant};

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[tokio::test(start_paused = true)]
    async fn test_reveals_abc_at_80ms_intervals() {
        let buffer = TextBuffer::new();
        buffer.replace("stale").unwrap();
        let typewriter = Typewriter::new();
        let t0 = Instant::now();

        let mut handle = typewriter.start(Some(buffer.shared()), "abc", ms(80)).unwrap();
        assert_eq!(buffer.text(), "");
        assert_eq!(handle.phase(), Phase::Running);

        sleep_until(t0 + ms(40)).await;
        assert_eq!(buffer.text(), "");
        sleep_until(t0 + ms(120)).await;
        assert_eq!(buffer.text(), "a");
        sleep_until(t0 + ms(200)).await;
        assert_eq!(buffer.text(), "ab");
        sleep_until(t0 + ms(280)).await;
        assert_eq!(buffer.text(), "abc");

        assert_eq!(handle.finished().await, Phase::Complete);
        assert_eq!(handle.revealed_count(), 3);
        assert_eq!(typewriter.active_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_tick_shows_a_prefix() {
        let text = "pip install pyward-cli";
        let delay = 25;
        let buffer = TextBuffer::new();
        let typewriter = Typewriter::new();
        let t0 = Instant::now();

        let handle = typewriter.start(Some(buffer.shared()), text, ms(delay)).unwrap();

        for k in 0..=text.len() as u64 {
            sleep_until(t0 + ms(k * delay + delay / 2)).await;
            assert_eq!(buffer.text(), &text[..k as usize], "after {} ticks", k);
        }
        assert_eq!(handle.phase(), Phase::Complete);
    }

    #[tokio::test(start_paused = true)]
    async fn test_complete_is_stable() {
        let buffer = TextBuffer::new();
        let typewriter = Typewriter::new();

        let mut handle = typewriter.start(Some(buffer.shared()), "done", ms(10)).unwrap();
        assert_eq!(handle.finished().await, Phase::Complete);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(buffer.text(), "done");
        assert_eq!(handle.phase(), Phase::Complete);
        assert!(!typewriter.is_running(buffer.id()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_text_completes_without_ticks() {
        let buffer = TextBuffer::new();
        buffer.replace("old").unwrap();
        let typewriter = Typewriter::new();

        let handle = typewriter.start(Some(buffer.shared()), "", ms(80)).unwrap();
        assert_eq!(buffer.text(), "");
        assert_eq!(handle.phase(), Phase::Complete);
        assert_eq!(handle.total(), 0);
        assert_eq!(typewriter.active_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_surface_schedules_nothing() {
        let typewriter = Typewriter::new();
        let err = typewriter.start(None, "abc", ms(80)).err();
        assert!(matches!(err, Some(Error::MissingTarget)));
        assert_eq!(typewriter.active_count(), 0);
    }

    #[tokio::test]
    async fn test_zero_delay_rejected_before_clearing() {
        let buffer = TextBuffer::new();
        buffer.replace("keep").unwrap();
        let typewriter = Typewriter::new();

        let err = typewriter.start(Some(buffer.shared()), "abc", Duration::ZERO).err();
        assert!(matches!(err, Some(Error::InvalidDelay)));
        assert_eq!(buffer.text(), "keep");
    }

    #[test]
    fn test_start_outside_runtime_is_an_error() {
        let buffer = TextBuffer::new();
        let typewriter = Typewriter::new();
        let err = typewriter.start(Some(buffer.shared()), "abc", ms(80)).err();
        assert!(matches!(err, Some(Error::Other(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_cancels_previous_run() {
        let buffer = TextBuffer::new();
        let typewriter = Typewriter::new();
        let t0 = Instant::now();

        let mut first = typewriter.start(Some(buffer.shared()), "aaaa", ms(50)).unwrap();
        sleep_until(t0 + ms(125)).await;
        assert_eq!(buffer.text(), "aa");

        let mut second = typewriter.start(Some(buffer.shared()), "bbb", ms(50)).unwrap();
        assert_eq!(buffer.text(), "");
        assert_eq!(first.finished().await, Phase::Idle);

        let t1 = Instant::now();
        for k in 0..=3u64 {
            sleep_until(t1 + ms(k * 50 + 25)).await;
            let text = buffer.text();
            assert!(!text.contains('a'), "old text leaked: {:?}", text);
            assert_eq!(text, "b".repeat(k as usize));
        }

        assert_eq!(second.finished().await, Phase::Complete);
        assert_eq!(first.revealed_count(), 2);
        assert_eq!(typewriter.active_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_handle_cancel_leaves_new_run() {
        let buffer = TextBuffer::new();
        let typewriter = Typewriter::new();

        let first = typewriter.start(Some(buffer.shared()), "old", ms(20)).unwrap();
        let mut second = typewriter.start(Some(buffer.shared()), "new", ms(20)).unwrap();
        first.cancel();

        assert_eq!(second.finished().await, Phase::Complete);
        assert_eq!(buffer.text(), "new");
    }

    #[tokio::test(start_paused = true)]
    async fn test_detached_surface_aborts_to_idle() {
        let buffer = TextBuffer::new();
        let typewriter = Typewriter::new();
        let t0 = Instant::now();

        let mut handle = typewriter.start(Some(buffer.shared()), "abcdef", ms(10)).unwrap();
        sleep_until(t0 + ms(35)).await;
        buffer.detach();

        assert_eq!(handle.finished().await, Phase::Idle);
        assert_eq!(buffer.text(), "abc");
        assert_eq!(typewriter.active_count(), 0);
    }

    #[tokio::test]
    async fn test_detached_surface_fails_start() {
        let buffer = TextBuffer::new();
        buffer.detach();
        let typewriter = Typewriter::new();

        let err = typewriter.start(Some(buffer.shared()), "abc", ms(10)).err();
        assert!(matches!(
            err,
            Some(Error::Surface(SurfaceError::Detached(_)))
        ));
        assert_eq!(typewriter.active_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_freezes_content() {
        let buffer = TextBuffer::new();
        let typewriter = Typewriter::new();
        let t0 = Instant::now();

        let mut handle = typewriter.start(Some(buffer.shared()), "abcdef", ms(10)).unwrap();
        sleep_until(t0 + ms(25)).await;
        assert!(typewriter.cancel(buffer.id()));
        assert!(!typewriter.cancel(buffer.id()));

        assert_eq!(handle.finished().await, Phase::Idle);
        tokio::time::sleep(ms(100)).await;
        assert_eq!(buffer.text(), "ab");
    }

    #[tokio::test(start_paused = true)]
    async fn test_independent_surfaces_run_together() {
        let hero = TextBuffer::new();
        let footer = TextBuffer::new();
        let typewriter = Typewriter::new();

        let mut a = typewriter.start(Some(hero.shared()), "hero", ms(10)).unwrap();
        let mut b = typewriter.start(Some(footer.shared()), "footer", ms(15)).unwrap();
        assert_eq!(typewriter.active_count(), 2);

        assert_eq!(a.finished().await, Phase::Complete);
        assert_eq!(b.finished().await, Phase::Complete);
        assert_eq!(hero.text(), "hero");
        assert_eq!(footer.text(), "footer");
    }

    #[tokio::test(start_paused = true)]
    async fn test_default_delay_is_100ms() {
        let buffer = TextBuffer::new();
        let typewriter = Typewriter::new();
        let t0 = Instant::now();

        let _handle = typewriter.start_with_defaults(Some(buffer.shared()), "xy").unwrap();
        sleep_until(t0 + ms(150)).await;
        assert_eq!(buffer.text(), "x");
        sleep_until(t0 + ms(250)).await;
        assert_eq!(buffer.text(), "xy");
    }
}
