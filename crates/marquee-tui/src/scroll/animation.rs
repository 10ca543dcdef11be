//! Scroll position controller
//!
//! Key presses queue a delta; `update` folds the queued delta into a new
//! animation target and advances the eased position. Anchor jumps call
//! `scroll_to` directly, like `window.scrollTo({ behavior: "smooth" })`.

use std::time::{Duration, Instant};

use marquee_core::motion::timing::{lerp_u16, progress_at};

use super::config::{EasingType, ScrollConfig, ScrollConfigExt};

#[derive(Debug, Clone)]
struct ActiveAnimation {
    start: Instant,
    from: u16,
    to: u16,
    duration: Duration,
    easing: EasingType,
}

impl ActiveAnimation {
    fn position_at(&self, now: Instant) -> (u16, bool) {
        let elapsed = now.saturating_duration_since(self.start);
        if elapsed >= self.duration {
            return (self.to, true);
        }
        let t = self.easing.apply(progress_at(elapsed, self.duration));
        (lerp_u16(self.from, self.to, t), false)
    }
}

/// Smooth scroll state for the page viewport
#[derive(Debug, Clone, Default)]
pub struct ScrollAnimator {
    animation: Option<ActiveAnimation>,
    config: ScrollConfig,
    current_scroll: u16,
    /// Deltas queued since the last update, applied together
    pending_delta: i32,
}

impl ScrollAnimator {
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn with_defaults() -> Self {
        Self::default()
    }

    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Animation running or a delta waiting for the next update
    #[inline]
    pub fn needs_update(&self) -> bool {
        self.animation.is_some() || self.pending_delta != 0
    }

    /// Where the viewport is headed
    pub fn target_scroll(&self) -> u16 {
        self.animation
            .as_ref()
            .map(|a| a.to)
            .unwrap_or(self.current_scroll)
    }

    #[inline]
    pub fn current_scroll(&self) -> u16 {
        self.current_scroll
    }

    /// Jump without animating
    pub fn set_scroll(&mut self, scroll: u16) {
        self.animation = None;
        self.current_scroll = scroll;
        self.pending_delta = 0;
    }

    /// Animate from the current position to `target`
    pub fn scroll_to(&mut self, target: u16, max_scroll: u16, now: Instant) {
        let target = target.min(max_scroll);
        self.pending_delta = 0;

        if !self.config.is_smooth() || self.current_scroll == target {
            self.set_scroll(target);
            return;
        }

        self.animation = Some(ActiveAnimation {
            start: now,
            from: self.current_scroll,
            to: target,
            duration: self.config.animation_duration(),
            easing: self.config.easing,
        });
    }

    /// Queue a relative scroll (positive is down)
    pub fn scroll_by(&mut self, delta: i32, max_scroll: u16) {
        if !self.config.is_smooth() {
            let scroll = (self.current_scroll as i32 + delta).clamp(0, max_scroll as i32);
            self.set_scroll(scroll as u16);
            return;
        }
        self.pending_delta += delta;
    }

    fn line_step(&self) -> i32 {
        if self.config.is_smooth() {
            1
        } else {
            self.config.scroll_lines.max(1) as i32
        }
    }

    pub fn scroll_down(&mut self, max_scroll: u16) {
        self.scroll_by(self.line_step(), max_scroll);
    }

    pub fn scroll_up(&mut self, max_scroll: u16) {
        self.scroll_by(-self.line_step(), max_scroll);
    }

    pub fn scroll_half_page_down(&mut self, viewport_height: u16, max_scroll: u16) {
        self.scroll_by((viewport_height / 2).max(1) as i32, max_scroll);
    }

    pub fn scroll_half_page_up(&mut self, viewport_height: u16, max_scroll: u16) {
        self.scroll_by(-((viewport_height / 2).max(1) as i32), max_scroll);
    }

    /// Advance to `now` and return the scroll position to draw
    pub fn update(&mut self, max_scroll: u16, now: Instant) -> u16 {
        if self.pending_delta != 0 {
            let target = (self.target_scroll() as i32 + self.pending_delta)
                .clamp(0, max_scroll as i32) as u16;
            self.pending_delta = 0;
            if target != self.current_scroll {
                self.animation = Some(ActiveAnimation {
                    start: now,
                    from: self.current_scroll,
                    to: target,
                    duration: self.config.animation_duration(),
                    easing: self.config.easing,
                });
            } else {
                self.animation = None;
            }
        }

        if let Some(anim) = &self.animation {
            let (position, done) = anim.position_at(now);
            self.current_scroll = position.min(max_scroll);
            if done {
                self.animation = None;
            }
        }

        // the page may have shrunk under us
        self.current_scroll = self.current_scroll.min(max_scroll);
        self.current_scroll
    }

    /// Stop where the viewport is now
    pub fn cancel(&mut self) {
        self.animation = None;
        self.pending_delta = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn smooth(duration_ms: u64) -> ScrollConfig {
        ScrollConfig {
            smooth_enabled: true,
            animation_duration_ms: duration_ms,
            easing: EasingType::Linear,
            ..Default::default()
        }
    }

    #[test]
    fn test_instant_scroll_when_disabled() {
        let config = ScrollConfig {
            smooth_enabled: false,
            scroll_lines: 3,
            ..Default::default()
        };
        let mut animator = ScrollAnimator::new(config);

        animator.scroll_to(100, 200, Instant::now());
        assert_eq!(animator.current_scroll(), 100);
        assert!(!animator.is_animating());

        animator.scroll_down(200);
        assert_eq!(animator.current_scroll(), 103);
    }

    #[test]
    fn test_anchor_jump_eases_to_target() {
        let mut animator = ScrollAnimator::new(smooth(100));
        let t0 = Instant::now();

        animator.scroll_to(40, 200, t0);
        assert!(animator.is_animating());
        assert_eq!(animator.target_scroll(), 40);

        assert_eq!(animator.update(200, t0 + Duration::from_millis(50)), 20);
        assert_eq!(animator.update(200, t0 + Duration::from_millis(100)), 40);
        assert!(!animator.is_animating());
    }

    #[test]
    fn test_scroll_by_batching() {
        let mut animator = ScrollAnimator::new(smooth(100));

        animator.scroll_by(10, 200);
        animator.scroll_by(10, 200);
        animator.scroll_by(10, 200);
        assert!(animator.needs_update());

        animator.update(200, Instant::now());
        assert_eq!(animator.target_scroll(), 30);
    }

    #[test]
    fn test_scroll_clamps_to_max() {
        let mut animator = ScrollAnimator::with_defaults();
        let t0 = Instant::now();
        animator.set_scroll(50);
        animator.scroll_to(300, 100, t0);
        assert_eq!(animator.target_scroll(), 100);

        // page shrank below the current position
        animator.update(100, t0 + Duration::from_secs(1));
        assert_eq!(animator.update(20, t0 + Duration::from_secs(1)), 20);
    }

    #[test]
    fn test_scrolling_up_at_top_is_a_no_op() {
        let mut animator = ScrollAnimator::new(smooth(100));
        animator.scroll_up(200);
        assert_eq!(animator.update(200, Instant::now()), 0);
        assert!(!animator.is_animating());
    }
}
