//! Animation plan for the landing page
//!
//! Targets are named after the page element classes. Offsets are in CSS
//! pixels; the renderer decides how many pixels a terminal cell is worth.

use std::time::Duration;

use super::easing::EasingType;
use super::timeline::{Position, Timeline};
use super::timing::secs;
use super::trigger::{BatchTrigger, Bounds, EnterTrigger, ScrubTrigger, TriggerLine, TriggerSet};
use super::tween::{Props, PropsPatch, Repeat, Transition, Tween};

pub mod targets {
    pub const HERO: &str = "hero";
    pub const HERO_BADGE: &str = "hero-badge";
    pub const HERO_TITLE: &str = "hero-title";
    pub const HERO_SUBTITLE: &str = "hero-subtitle";
    pub const TYPEWRITER: &str = "typewriter-container";
    pub const HERO_BUTTONS: &str = "hero-buttons";
    pub const CODE_WINDOW: &str = "code-window";
    pub const FEATURE_CARD: &str = "feature-card";
    pub const FEATURE_ICON: &str = "feature-icon";
    pub const STEP: &str = "step";
    pub const USAGE_CARD: &str = "usage-card";
    pub const CONTRIBUTE_SECTION: &str = "contribute-section";
    pub const CONTRIBUTE_TITLE: &str = "contribute-title";
    pub const CONTRIBUTE_TEXT: &str = "contribute-text";
    pub const CONTRIBUTE_STAT: &str = "stat";
    pub const CONTRIBUTE_BUTTON: &str = "contribute-button";
}

use targets::*;

/// Scale of a hovered (focused) button
pub const HOVER_SCALE: f64 = 1.05;

fn fade_up(y: f64, duration: f64) -> Tween {
    Tween::from_props(PropsPatch::new().opacity(0.0).y(y), secs(duration))
}

/// Hero entrance, played once from page load
pub fn hero_timeline() -> Timeline {
    Timeline::new()
        .add(HERO_BADGE, fade_up(20.0, 0.8).delay(secs(0.2)), Position::Sequential)
        .add(HERO_TITLE, fade_up(30.0, 0.8), Position::Relative(-0.6))
        .add(HERO_SUBTITLE, fade_up(20.0, 0.8), Position::Relative(-0.6))
        .add(TYPEWRITER, fade_up(20.0, 0.8), Position::Relative(-0.4))
        .add(HERO_BUTTONS, fade_up(20.0, 0.8), Position::Relative(-0.4))
        .add(
            CODE_WINDOW,
            Tween::from_props(PropsPatch::new().opacity(0.0).scale(0.9), secs(1.0))
                .ease(EasingType::BackOut),
            Position::Relative(-0.6),
        )
}

/// Contribute section entrance, played when the section scrolls into view
pub fn contribute_timeline(stats: usize, buttons: usize) -> Timeline {
    Timeline::new()
        .add(CONTRIBUTE_TITLE, fade_up(30.0, 0.8), Position::Sequential)
        .add(CONTRIBUTE_TEXT, fade_up(20.0, 0.8), Position::Relative(-0.6))
        .add_group(
            CONTRIBUTE_STAT,
            stats,
            fade_up(20.0, 0.6).stagger(secs(0.1)),
            Position::Relative(-0.4),
        )
        .add_group(
            CONTRIBUTE_BUTTON,
            buttons,
            Tween::from_props(PropsPatch::new().opacity(0.0).x(30.0), secs(0.6))
                .stagger(secs(0.1)),
            Position::Relative(-0.4),
        )
}

/// Scroll-triggered reveals for the card grids
pub fn reveal_batches() -> Vec<BatchTrigger> {
    vec![
        BatchTrigger::new(
            FEATURE_CARD,
            TriggerLine::new(0.0, 0.8),
            fade_up(50.0, 0.8)
                .stagger(secs(0.2))
                .ease(EasingType::Power2Out),
        ),
        BatchTrigger::new(
            STEP,
            TriggerLine::new(0.0, 0.8),
            Tween::from_props(PropsPatch::new().opacity(0.0).x(-50.0), secs(0.8))
                .stagger(secs(0.3))
                .ease(EasingType::Power2Out),
        ),
        BatchTrigger::new(
            USAGE_CARD,
            TriggerLine::new(0.0, 0.85),
            fade_up(30.0, 0.6)
                .stagger(secs(0.15))
                .ease(EasingType::Power2Out),
        ),
    ]
}

/// Endless bob of the feature icons
pub fn float_tween() -> Tween {
    Tween::to_props(PropsPatch::new().y(-10.0), secs(2.0))
        .ease(EasingType::Power2InOut)
        .repeat(Repeat::Forever)
        .yoyo(true)
        .stagger(secs(0.3))
}

/// Scale transition for hovering a button on and off
pub fn hover_transition() -> Transition {
    Transition::settled(1.0, secs(0.3), EasingType::Power2Out)
}

/// Code window tilt for a scroll progress: (rotation_y, rotation_x) in degrees
pub fn code_window_rotation(progress: f64) -> (f64, f64) {
    let rotation = progress * 10.0 - 5.0;
    (rotation, rotation * 0.5)
}

/// Hero background shift as a percentage of its own height
pub fn parallax_percent(progress: f64) -> f64 {
    -50.0 * progress
}

fn scroll_triggers() -> TriggerSet {
    let mut set = TriggerSet::new();
    for batch in reveal_batches() {
        set = set.with_batch(batch);
    }
    set.with_scrub(ScrubTrigger::new(
        HERO,
        TriggerLine::new(0.0, 1.0),
        TriggerLine::new(1.0, 0.0),
        None,
    ))
    .with_scrub(ScrubTrigger::new(
        CODE_WINDOW,
        TriggerLine::new(0.0, 0.8),
        TriggerLine::new(1.0, 0.2),
        Some(secs(1.0)),
    ))
    .with_enter(EnterTrigger::new(CONTRIBUTE_SECTION, TriggerLine::new(0.0, 0.8)))
}

/// Everything animated on the landing page, sampled from one clock
#[derive(Debug, Clone)]
pub struct LandingMotion {
    hero: Timeline,
    contribute: Timeline,
    triggers: TriggerSet,
    float: Tween,
    reduced: bool,
}

impl LandingMotion {
    /// Build the plan for a page, reading element positions from `bounds_of`
    pub fn for_page<F>(bounds_of: F) -> Self
    where
        F: Fn(&str) -> Vec<Bounds>,
    {
        let stats = bounds_of(CONTRIBUTE_STAT).len();
        let buttons = bounds_of(CONTRIBUTE_BUTTON).len();

        let mut triggers = scroll_triggers();
        triggers.refresh(&bounds_of);

        Self {
            hero: hero_timeline(),
            contribute: contribute_timeline(stats, buttons),
            triggers,
            float: float_tween(),
            reduced: false,
        }
    }

    /// Same plan, but every element sits at rest
    pub fn reduced(mut self) -> Self {
        self.reduced = true;
        self
    }

    pub fn is_reduced(&self) -> bool {
        self.reduced
    }

    pub fn triggers(&self) -> &TriggerSet {
        &self.triggers
    }

    pub fn hero(&self) -> &Timeline {
        &self.hero
    }

    /// Re-read element positions after a layout change
    pub fn refresh<F>(&mut self, bounds_of: F)
    where
        F: Fn(&str) -> Vec<Bounds>,
    {
        self.triggers.refresh(bounds_of);
    }

    /// Drop scroll-scrubbed effects on narrow viewports
    ///
    /// Returns `true` if anything was pruned. Pruning is permanent for the
    /// lifetime of this plan, even if the viewport grows again.
    pub fn apply_viewport(&mut self, width: u16, breakpoint: u16) -> bool {
        if width < breakpoint {
            self.triggers.prune_scrubbed() > 0
        } else {
            false
        }
    }

    pub fn update(&mut self, scroll: f64, viewport_height: f64, now: Duration, dt: Duration) {
        if self.reduced {
            return;
        }
        self.triggers.update(scroll, viewport_height, now, dt);
    }

    /// Properties of element `index` of `target` at `now`
    pub fn props(&self, target: &str, index: usize, now: Duration) -> Props {
        if self.reduced {
            return Props::REST;
        }

        match target {
            CODE_WINDOW => {
                let mut props = self
                    .hero
                    .props_for(target, index, now)
                    .unwrap_or(Props::REST);
                let (rotation_y, rotation_x) = self.code_window_tilt();
                props.rotation_y = rotation_y;
                props.rotation_x = rotation_x;
                props
            }
            FEATURE_ICON => self.float.sample(now, index),
            CONTRIBUTE_TITLE | CONTRIBUTE_TEXT | CONTRIBUTE_STAT | CONTRIBUTE_BUTTON => {
                // held at the first frame until the section scrolls into view
                let elapsed = self
                    .triggers
                    .enter(CONTRIBUTE_SECTION)
                    .and_then(|t| t.elapsed(now))
                    .unwrap_or(Duration::ZERO);
                self.contribute
                    .props_for(target, index, elapsed)
                    .unwrap_or(Props::REST)
            }
            _ => {
                if let Some(props) = self.hero.props_for(target, index, now) {
                    return props;
                }
                match self.triggers.batch(target) {
                    Some(batch) => batch.props(index, now),
                    None => Props::REST,
                }
            }
        }
    }

    /// Code window tilt from its scrub trigger; flat once pruned
    pub fn code_window_tilt(&self) -> (f64, f64) {
        match self.triggers.scrub(CODE_WINDOW) {
            Some(scrub) => code_window_rotation(scrub.progress()),
            None => (0.0, 0.0),
        }
    }

    /// Hero background shift in percent of its height; zero once pruned
    pub fn hero_parallax(&self) -> f64 {
        if self.reduced {
            return 0.0;
        }
        self.triggers
            .scrub(HERO)
            .map(|scrub| parallax_percent(scrub.progress()))
            .unwrap_or(0.0)
    }

    /// Whether a finite animation is still playing
    ///
    /// The endless icon float is ignored so the UI can drop to its idle
    /// frame rate.
    pub fn is_animating(&self, now: Duration) -> bool {
        if self.reduced {
            return false;
        }
        let contribute_running = self
            .triggers
            .enter(CONTRIBUTE_SECTION)
            .and_then(|t| t.elapsed(now))
            .is_some_and(|elapsed| !self.contribute.is_complete(elapsed));

        !self.hero.is_complete(now)
            || contribute_running
            || self.triggers.batches().any(|b| b.is_animating(now))
    }
}
