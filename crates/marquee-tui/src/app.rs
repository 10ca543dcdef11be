use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use marquee_core::clipboard::{Clipboard, CopyButton, SystemClipboard};
use marquee_core::motion::landing::{hover_transition, targets, HOVER_SCALE};
use marquee_core::motion::{LandingMotion, Props, Transition};
use marquee_core::page::{BlockKind, FocusTarget, NavbarStyle, Page};
use marquee_core::typewriter::{activate_after, Activation, TextSurface, TypewriterHandle};
use marquee_core::{AppConfig, Phase, TextBuffer, Typewriter};
use tracing::{debug, info, warn};

use crate::scroll::ScrollAnimator;
use crate::theme::Theme;

/// Rows taken by the fixed navbar (links plus its bottom edge)
pub const NAVBAR_HEIGHT: u16 = 2;
/// Rows taken by the status bar
pub const STATUS_HEIGHT: u16 = 1;
/// Blank columns on each side of the page content
pub const PAGE_MARGIN: u16 = 2;

const CURSOR_BLINK: Duration = Duration::from_millis(530);

/// Application state
pub struct App {
    pub config: Arc<AppConfig>,
    pub theme: Theme,
    pub page: Page,
    pub motion: LandingMotion,
    pub scroll: ScrollAnimator,
    pub typewriter: Typewriter,
    /// Surface the hero typewriter types into; the page widget draws it
    pub typewriter_line: TextBuffer,
    activation: Option<Activation>,
    /// Run started directly by a restart
    run: Option<TypewriterHandle>,
    pub copy_buttons: HashMap<FocusTarget, CopyButton>,
    pub focus_targets: Vec<FocusTarget>,
    /// Index into `focus_targets`
    pub focused: Option<usize>,
    hover: HashMap<FocusTarget, Transition>,
    clipboard: Box<dyn Clipboard>,
    /// Origin of the motion clock
    started: Instant,
    last_frame: Instant,
    pub viewport_width: u16,
    /// Rows available to the page between navbar and status bar
    pub viewport_height: u16,
    /// Scroll-scrubbed effects were dropped for a narrow terminal
    pub mobile: bool,
    /// Pending key for multi-key sequences (e.g., 'gg')
    pub pending_key: Option<char>,
    pub status_message: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self::with_clipboard(config, Box::new(SystemClipboard::new()), Instant::now())
    }

    /// Build the app around a given clipboard, with the motion clock
    /// starting at `started`
    pub fn with_clipboard(
        config: Arc<AppConfig>,
        clipboard: Box<dyn Clipboard>,
        started: Instant,
    ) -> Self {
        let mut page = Page::landing();
        page.set_typewriter_text(&config.typewriter.text);

        let mut motion = LandingMotion::for_page(|class| page.bounds_of(class));
        if config.ui.reduced_motion {
            motion = motion.reduced();
        }

        let feedback = config.ui.copy_feedback();
        let copy_buttons = page
            .focus_targets()
            .into_iter()
            .filter_map(|target| {
                let FocusTarget::Copy { section, block } = target else {
                    return None;
                };
                let payload = match &page.block(section, block)?.kind {
                    BlockKind::Typewriter { .. } => page.typewriter_text().to_string(),
                    _ => page.block(section, block)?.copy_payload()?.to_string(),
                };
                Some((target, CopyButton::new(payload, feedback)))
            })
            .collect();

        Self {
            theme: Theme::default(),
            scroll: ScrollAnimator::new(config.ui.scroll.clone()),
            motion,
            typewriter: Typewriter::new(),
            typewriter_line: TextBuffer::new(),
            activation: None,
            run: None,
            copy_buttons,
            focus_targets: page.focus_targets(),
            focused: None,
            hover: HashMap::new(),
            clipboard,
            started,
            last_frame: started,
            viewport_width: page.width(),
            viewport_height: 0,
            mobile: false,
            pending_key: None,
            status_message: None,
            should_quit: false,
            page,
            config,
        }
    }

    /// Time on the motion clock
    pub fn clock(&self, at: Instant) -> Duration {
        at.saturating_duration_since(self.started)
    }

    /// Schedule the hero typewriter after the configured start delay
    ///
    /// Must be called from within a tokio runtime.
    pub fn activate(&mut self) -> marquee_core::Result<()> {
        if let Some(previous) = self.activation.take() {
            previous.cancel();
        }
        let settings = &self.config.typewriter;
        self.activation = Some(activate_after(
            &self.typewriter,
            Some(self.typewriter_line.shared()),
            self.page.typewriter_text(),
            settings.speed(),
            settings.start_delay(),
        )?);
        Ok(())
    }

    /// Type the hero line again from an empty surface, right away
    pub fn restart_typewriter(&mut self) -> marquee_core::Result<()> {
        if let Some(activation) = self.activation.take() {
            activation.cancel();
        }
        self.run = Some(self.typewriter.start(
            Some(self.typewriter_line.shared()),
            self.page.typewriter_text(),
            self.config.typewriter.speed(),
        )?);
        info!("Typewriter restarted");
        Ok(())
    }

    /// Phase of the newest hero run; `Idle` while the activation is pending
    pub fn typewriter_phase(&self) -> Phase {
        self.activation
            .as_ref()
            .and_then(Activation::phase)
            .or_else(|| self.run.as_ref().map(TypewriterHandle::phase))
            .unwrap_or(Phase::Idle)
    }

    /// Blinking cursor after the typed text
    pub fn cursor_visible(&self, at: Instant) -> bool {
        (self.clock(at).as_millis() / CURSOR_BLINK.as_millis()) % 2 == 0
    }

    /// Stop the typewriter; called on quit
    pub fn shutdown(&mut self) {
        if let Some(activation) = self.activation.take() {
            activation.cancel();
        }
        self.typewriter.cancel(self.typewriter_line.id());
    }

    /// Terminal size changed; `width` and `height` are the full terminal
    pub fn resize(&mut self, width: u16, height: u16) {
        self.viewport_width = width;
        self.viewport_height = height.saturating_sub(NAVBAR_HEIGHT + STATUS_HEIGHT);

        if self.page.layout(width.saturating_sub(2 * PAGE_MARGIN)) {
            debug!(width, "Page layout changed");
        }
        let page = &self.page;
        self.motion.refresh(|class| page.bounds_of(class));

        if self.motion.apply_viewport(width, self.config.ui.mobile_breakpoint) {
            info!(width, "Narrow terminal, scroll-scrubbed animations disabled");
            self.mobile = true;
        }
    }

    pub fn max_scroll(&self) -> u16 {
        self.page.max_scroll(self.viewport_height)
    }

    pub fn current_scroll(&self) -> u16 {
        self.scroll.current_scroll()
    }

    pub fn navbar_style(&self) -> NavbarStyle {
        NavbarStyle::for_scroll(self.current_scroll(), self.config.ui.navbar_threshold)
    }

    /// Advance scrolling, triggers and copy feedback to `at`
    pub fn tick(&mut self, at: Instant) {
        let max_scroll = self.max_scroll();
        let scroll = self.scroll.update(max_scroll, at);

        let now = self.clock(at);
        let dt = at.saturating_duration_since(self.last_frame);
        self.last_frame = at;

        self.motion
            .update(scroll as f64, self.viewport_height as f64, now, dt);

        for button in self.copy_buttons.values_mut() {
            button.tick(now);
        }
    }

    /// Whether the next frame should come at the animation frame rate
    pub fn needs_fast_update(&self, at: Instant) -> bool {
        let now = self.clock(at);
        self.scroll.needs_update()
            || self.motion.is_animating(now)
            || self.typewriter.is_running(self.typewriter_line.id())
            || self.hover.values().any(|t| !t.is_settled(now))
            || self.feature_icons_visible()
    }

    fn feature_icons_visible(&self) -> bool {
        if self.motion.is_reduced() {
            return false;
        }
        let top = self.current_scroll() as f64;
        let bottom = top + self.viewport_height as f64;
        self.page
            .bounds_of(targets::FEATURE_CARD)
            .iter()
            .any(|b| b.top < bottom && b.top + b.height > top)
    }

    pub fn props(&self, class: &str, index: usize, at: Instant) -> Props {
        self.motion.props(class, index, self.clock(at))
    }

    pub fn scroll_down(&mut self) {
        let max = self.max_scroll();
        self.scroll.scroll_down(max);
    }

    pub fn scroll_up(&mut self) {
        let max = self.max_scroll();
        self.scroll.scroll_up(max);
    }

    pub fn scroll_half_page_down(&mut self) {
        let max = self.max_scroll();
        self.scroll.scroll_half_page_down(self.viewport_height, max);
    }

    pub fn scroll_half_page_up(&mut self) {
        let max = self.max_scroll();
        self.scroll.scroll_half_page_up(self.viewport_height, max);
    }

    pub fn jump_to_top(&mut self, at: Instant) {
        self.scroll_to(0, at);
    }

    pub fn jump_to_bottom(&mut self, at: Instant) {
        self.scroll_to(self.max_scroll(), at);
    }

    fn scroll_to(&mut self, row: u16, at: Instant) {
        let max = self.max_scroll();
        if self.config.ui.reduced_motion {
            self.scroll.set_scroll(row.min(max));
        } else {
            self.scroll.scroll_to(row, max, at);
        }
    }

    /// Smooth-scroll to an in-page anchor such as `#install`
    ///
    /// Unknown anchors leave the scroll position alone and return `false`.
    pub fn jump_to_anchor(&mut self, anchor: &str, at: Instant) -> bool {
        let max = self.max_scroll();
        match self
            .page
            .anchor_target(anchor, self.config.ui.navbar_offset, max)
        {
            Some(row) => {
                debug!(anchor, row, "Jumping to anchor");
                self.scroll_to(row, at);
                true
            }
            None => {
                debug!(anchor, "Unknown anchor");
                false
            }
        }
    }

    pub fn jump_to_nav_link(&mut self, index: usize, at: Instant) -> bool {
        match self.page.nav.get(index) {
            Some(link) => {
                let href = link.href.clone();
                self.jump_to_anchor(&href, at)
            }
            None => false,
        }
    }

    pub fn focused_target(&self) -> Option<FocusTarget> {
        self.focused.and_then(|i| self.focus_targets.get(i).copied())
    }

    pub fn focus_next(&mut self, at: Instant) {
        let next = match self.focused {
            Some(i) => (i + 1) % self.focus_targets.len().max(1),
            None => 0,
        };
        self.set_focus(Some(next), at);
    }

    pub fn focus_prev(&mut self, at: Instant) {
        let len = self.focus_targets.len().max(1);
        let prev = match self.focused {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.set_focus(Some(prev), at);
    }

    pub fn clear_focus(&mut self, at: Instant) {
        self.set_focus(None, at);
    }

    fn set_focus(&mut self, index: Option<usize>, at: Instant) {
        let now = self.clock(at);
        if let Some(previous) = self.focused_target() {
            self.hover
                .entry(previous)
                .or_insert_with(hover_transition)
                .retarget(1.0, now);
        }

        self.focused = index.filter(|i| *i < self.focus_targets.len());

        if let Some(target) = self.focused_target() {
            self.hover
                .entry(target)
                .or_insert_with(hover_transition)
                .retarget(HOVER_SCALE, now);
            self.reveal(target, at);
        }
    }

    /// Scroll a focused page element into view
    fn reveal(&mut self, target: FocusTarget, at: Instant) {
        let Some(row) = self.page.focus_row(target) else {
            return;
        };
        let top = self.scroll.target_scroll();
        let bottom = top + self.viewport_height;
        if row < top || row + 1 >= bottom {
            let offset = self.config.ui.navbar_offset;
            self.scroll_to(row.saturating_sub(offset), at);
        }
    }

    /// Button scale for hover feedback
    pub fn hover_scale(&self, target: FocusTarget, at: Instant) -> f64 {
        if self.config.ui.reduced_motion {
            return 1.0;
        }
        self.hover
            .get(&target)
            .map(|t| t.value_at(self.clock(at)))
            .unwrap_or(1.0)
    }

    /// Activate whatever has focus: copy, follow an anchor or open a link
    pub fn activate_focused(&mut self, at: Instant) {
        let Some(target) = self.focused_target() else {
            return;
        };

        match target {
            FocusTarget::Nav(index) => {
                self.jump_to_nav_link(index, at);
            }
            FocusTarget::Button { section, block, index } => {
                let href = match self.page.block(section, block).map(|b| &b.kind) {
                    Some(BlockKind::Buttons(buttons)) => buttons.get(index).map(|b| b.href.clone()),
                    _ => None,
                };
                if let Some(href) = href {
                    self.follow(&href, at);
                }
            }
            FocusTarget::Copy { .. } => self.copy(target, at),
        }
    }

    fn follow(&mut self, href: &str, at: Instant) {
        if href.starts_with('#') {
            self.jump_to_anchor(href, at);
            return;
        }
        match open::that(href) {
            Ok(()) => self.set_status(format!("Opened {}", href)),
            Err(e) => {
                warn!("Failed to open {}: {}", href, e);
                self.set_status(format!("Could not open {}", href));
            }
        }
    }

    /// Press the copy button of `target`
    pub fn copy(&mut self, target: FocusTarget, at: Instant) {
        let now = self.clock(at);
        let Some(button) = self.copy_buttons.get_mut(&target) else {
            return;
        };
        let result = button.press(self.clipboard.as_mut(), now);
        let payload = button.payload().to_string();
        match result {
            Ok(()) => self.set_status(format!("Copied: {}", payload)),
            Err(e) => self.set_status(format!("Copy failed: {}", e)),
        }
    }

    pub fn copy_button(&self, target: FocusTarget) -> Option<&CopyButton> {
        self.copy_buttons.get(&target)
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn clear_pending_key(&mut self) {
        self.pending_key = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_core::clipboard::{CopyState, MemoryClipboard};

    fn config() -> AppConfig {
        let mut config = AppConfig::default();
        config.ui.scroll.smooth_enabled = false;
        config
    }

    fn app_with(config: AppConfig, clipboard: MemoryClipboard, t0: Instant) -> App {
        let mut app = App::with_clipboard(Arc::new(config), Box::new(clipboard), t0);
        app.resize(100, 30);
        app
    }

    #[test]
    fn test_resize_sets_page_viewport() {
        let t0 = Instant::now();
        let app = app_with(config(), MemoryClipboard::new(), t0);
        assert_eq!(app.viewport_height, 30 - NAVBAR_HEIGHT - STATUS_HEIGHT);
        assert_eq!(app.max_scroll(), app.page.total_height() - app.viewport_height);
        assert!(!app.mobile);
    }

    #[test]
    fn test_narrow_terminal_prunes_scrub_once() {
        let t0 = Instant::now();
        let mut app = app_with(config(), MemoryClipboard::new(), t0);
        app.resize(60, 30);
        assert!(app.mobile);
        assert!(app.motion.triggers().scrub(targets::HERO).is_none());
        app.resize(120, 30);
        assert!(app.mobile);
    }

    #[test]
    fn test_nav_link_jumps_below_navbar() {
        let t0 = Instant::now();
        let mut app = app_with(config(), MemoryClipboard::new(), t0);

        assert!(app.jump_to_nav_link(1, t0));
        app.tick(t0);
        let install = app.page.sections.iter().position(|s| s.anchor == "install").unwrap();
        let expected = app.page.section_top(install).unwrap() - app.config.ui.navbar_offset;
        assert_eq!(app.current_scroll(), expected.min(app.max_scroll()));
        assert_eq!(app.navbar_style(), NavbarStyle::Scrolled);

        assert!(!app.jump_to_anchor("#nowhere", t0));
        assert_eq!(app.current_scroll(), expected.min(app.max_scroll()));
    }

    #[test]
    fn test_copy_focused_command() {
        let t0 = Instant::now();
        let mut app = app_with(config(), MemoryClipboard::new(), t0);

        // navbar links come first, then the hero copy button
        let nav = app.page.nav.len();
        for _ in 0..=nav {
            app.focus_next(t0);
        }
        let target = app.focused_target().unwrap();
        assert!(matches!(target, FocusTarget::Copy { .. }));

        app.activate_focused(t0);
        let button = app.copy_button(target).unwrap();
        assert_eq!(button.label(), "Copied!");
        assert_eq!(app.status_message.as_deref(), Some("Copied: pip install pyward-cli"));

        app.tick(t0 + Duration::from_millis(2000));
        assert_eq!(app.copy_button(target).unwrap().state(), CopyState::Ready);
    }

    #[test]
    fn test_failed_copy_reports_in_status() {
        let t0 = Instant::now();
        let mut app = app_with(config(), MemoryClipboard::failing(), t0);
        let target = app
            .focus_targets
            .iter()
            .copied()
            .find(|t| matches!(t, FocusTarget::Copy { .. }))
            .unwrap();

        app.copy(target, t0);
        assert_eq!(app.copy_button(target).unwrap().label(), "Failed");
        assert!(app.status_message.as_deref().unwrap().starts_with("Copy failed"));
    }

    #[test]
    fn test_focus_wraps_and_hover_scales() {
        let t0 = Instant::now();
        let mut app = app_with(config(), MemoryClipboard::new(), t0);

        app.focus_prev(t0);
        assert_eq!(app.focused, Some(app.focus_targets.len() - 1));
        app.focus_next(t0);
        assert_eq!(app.focused, Some(0));

        let target = app.focused_target().unwrap();
        let later = t0 + Duration::from_millis(400);
        assert!((app.hover_scale(target, later) - HOVER_SCALE).abs() < 0.001);

        app.clear_focus(later);
        assert!(app.focused_target().is_none());
        let settled = later + Duration::from_millis(400);
        assert!((app.hover_scale(target, settled) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_reduced_motion_keeps_everything_at_rest() {
        let t0 = Instant::now();
        let mut config = config();
        config.ui.reduced_motion = true;
        let app = app_with(config, MemoryClipboard::new(), t0);

        assert_eq!(app.props(targets::HERO_TITLE, 0, t0), Props::REST);
        assert!(!app.needs_fast_update(t0));
    }

    #[test]
    fn test_copy_payload_follows_configured_text() {
        let t0 = Instant::now();
        let mut config = config();
        config.typewriter.text = "pip install pyward-cli==0.4".to_string();
        let app = app_with(config, MemoryClipboard::new(), t0);
        assert!(app
            .copy_buttons
            .values()
            .any(|b| b.payload() == "pip install pyward-cli==0.4"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_types_from_empty_line() {
        let t0 = Instant::now();
        let mut app = app_with(config(), MemoryClipboard::new(), t0);

        app.activate().unwrap();
        tokio::time::sleep(Duration::from_millis(1000 + 80 * 3 + 10)).await;
        assert_eq!(app.typewriter_line.text(), "pip");
        assert_eq!(app.typewriter_phase(), Phase::Running);

        app.restart_typewriter().unwrap();
        assert_eq!(app.typewriter_line.text(), "");
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(app.typewriter_line.text(), "pip install pyward-cli");
        assert_eq!(app.typewriter_phase(), Phase::Complete);
        assert_eq!(app.typewriter.active_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_phase_follows_run_not_line_text() {
        let t0 = Instant::now();
        let mut config = config();
        config.typewriter.text = String::new();
        let mut app = app_with(config, MemoryClipboard::new(), t0);

        app.activate().unwrap();
        assert_eq!(app.typewriter_phase(), Phase::Idle);

        // nothing to type: the run completes with the line still empty
        tokio::time::sleep(Duration::from_millis(1010)).await;
        assert_eq!(app.typewriter_line.text(), "");
        assert_eq!(app.typewriter_phase(), Phase::Complete);

        app.restart_typewriter().unwrap();
        assert_eq!(app.typewriter_phase(), Phase::Complete);
    }
}
