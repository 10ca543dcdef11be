use std::time::Duration;

use super::easing::EasingType;
use super::timing::{lerp, progress_at};

/// Visual properties an animation can drive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Props {
    pub opacity: f64,
    pub x: f64,
    pub y: f64,
    pub scale: f64,
    pub rotation_x: f64,
    pub rotation_y: f64,
}

impl Props {
    /// Where every element settles once its animation is done
    pub const REST: Props = Props {
        opacity: 1.0,
        x: 0.0,
        y: 0.0,
        scale: 1.0,
        rotation_x: 0.0,
        rotation_y: 0.0,
    };

    pub fn lerp(&self, to: &Props, t: f64) -> Props {
        Props {
            opacity: lerp(self.opacity, to.opacity, t),
            x: lerp(self.x, to.x, t),
            y: lerp(self.y, to.y, t),
            scale: lerp(self.scale, to.scale, t),
            rotation_x: lerp(self.rotation_x, to.rotation_x, t),
            rotation_y: lerp(self.rotation_y, to.rotation_y, t),
        }
    }

    /// Opacity high enough to be worth drawing
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.opacity > 0.05
    }
}

impl Default for Props {
    fn default() -> Self {
        Self::REST
    }
}

/// A partial set of properties; unset fields keep the base value
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PropsPatch {
    pub opacity: Option<f64>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub scale: Option<f64>,
    pub rotation_x: Option<f64>,
    pub rotation_y: Option<f64>,
}

impl PropsPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opacity(mut self, v: f64) -> Self {
        self.opacity = Some(v);
        self
    }

    pub fn x(mut self, v: f64) -> Self {
        self.x = Some(v);
        self
    }

    pub fn y(mut self, v: f64) -> Self {
        self.y = Some(v);
        self
    }

    pub fn scale(mut self, v: f64) -> Self {
        self.scale = Some(v);
        self
    }

    pub fn rotation_x(mut self, v: f64) -> Self {
        self.rotation_x = Some(v);
        self
    }

    pub fn rotation_y(mut self, v: f64) -> Self {
        self.rotation_y = Some(v);
        self
    }

    pub fn apply_to(&self, base: Props) -> Props {
        Props {
            opacity: self.opacity.unwrap_or(base.opacity),
            x: self.x.unwrap_or(base.x),
            y: self.y.unwrap_or(base.y),
            scale: self.scale.unwrap_or(base.scale),
            rotation_x: self.rotation_x.unwrap_or(base.rotation_x),
            rotation_y: self.rotation_y.unwrap_or(base.rotation_y),
        }
    }
}

/// Whether the patch is where the tween starts or where it ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenKind {
    /// Start at the patch, end at rest (entrance animations)
    From,
    /// Start at rest, end at the patch
    To,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    Once,
    /// Play this many extra cycles after the first
    Times(u32),
    Forever,
}

/// One animation applied to a group of elements
///
/// Element `i` of the group starts `stagger * i` after the first one.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    pub kind: TweenKind,
    pub patch: PropsPatch,
    pub duration: Duration,
    pub delay: Duration,
    pub ease: EasingType,
    pub stagger: Duration,
    pub repeat: Repeat,
    pub yoyo: bool,
}

impl Tween {
    fn new(kind: TweenKind, patch: PropsPatch, duration: Duration) -> Self {
        Self {
            kind,
            patch,
            duration,
            delay: Duration::ZERO,
            ease: EasingType::Power2Out,
            stagger: Duration::ZERO,
            repeat: Repeat::Once,
            yoyo: false,
        }
    }

    /// Animate from `patch` to rest
    pub fn from_props(patch: PropsPatch, duration: Duration) -> Self {
        Self::new(TweenKind::From, patch, duration)
    }

    /// Animate from rest to `patch`
    pub fn to_props(patch: PropsPatch, duration: Duration) -> Self {
        Self::new(TweenKind::To, patch, duration)
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn ease(mut self, ease: EasingType) -> Self {
        self.ease = ease;
        self
    }

    pub fn stagger(mut self, stagger: Duration) -> Self {
        self.stagger = stagger;
        self
    }

    pub fn repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn yoyo(mut self, yoyo: bool) -> Self {
        self.yoyo = yoyo;
        self
    }

    /// Number of cycles played, `None` when it never stops
    pub fn cycles(&self) -> Option<u32> {
        match self.repeat {
            Repeat::Once => Some(1),
            Repeat::Times(n) => Some(n.saturating_add(1)),
            Repeat::Forever => None,
        }
    }

    /// Time from the start of the tween until the last of `count` elements settles
    pub fn total_duration(&self, count: usize) -> Option<Duration> {
        let cycles = self.cycles()?;
        let last_offset = self.stagger * count.saturating_sub(1) as u32;
        Some(self.delay + last_offset + self.duration * cycles)
    }

    /// Properties before the tween has started
    pub fn initial(&self) -> Props {
        match self.kind {
            TweenKind::From => self.patch.apply_to(Props::REST),
            TweenKind::To => Props::REST,
        }
    }

    /// Properties of element `index` at `elapsed` since the tween was placed
    pub fn sample(&self, elapsed: Duration, index: usize) -> Props {
        let offset = self.delay + self.stagger * index as u32;
        let Some(local) = elapsed.checked_sub(offset) else {
            return self.initial();
        };

        let t = self.cycle_progress(local);
        let eased = self.ease.apply(t);

        match self.kind {
            TweenKind::From => self.initial().lerp(&Props::REST, eased),
            TweenKind::To => Props::REST.lerp(&self.patch.apply_to(Props::REST), eased),
        }
    }

    /// Linear progress within the current cycle, with yoyo cycles reversed
    fn cycle_progress(&self, local: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }

        let cycle_len = self.duration.as_secs_f64();
        let played = local.as_secs_f64() / cycle_len;
        let completed = played.floor() as u64;

        let (iteration, t) = match self.cycles() {
            Some(cycles) if completed >= cycles as u64 => (cycles as u64 - 1, 1.0),
            _ => {
                let within = local.as_secs_f64() - completed as f64 * cycle_len;
                (completed, progress_at(Duration::from_secs_f64(within.max(0.0)), self.duration))
            }
        };

        if self.yoyo && iteration % 2 == 1 {
            1.0 - t
        } else {
            t
        }
    }
}

/// A single value easing towards a target that can change mid-flight
///
/// Retargeting starts the new transition from wherever the value currently
/// is, so hovering on and off quickly never jumps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    from: f64,
    to: f64,
    started: Duration,
    duration: Duration,
    ease: EasingType,
}

impl Transition {
    pub fn settled(value: f64, duration: Duration, ease: EasingType) -> Self {
        Self {
            from: value,
            to: value,
            started: Duration::ZERO,
            duration,
            ease,
        }
    }

    pub fn value_at(&self, now: Duration) -> f64 {
        let elapsed = now.saturating_sub(self.started);
        let t = self.ease.apply(progress_at(elapsed, self.duration));
        lerp(self.from, self.to, t)
    }

    pub fn retarget(&mut self, to: f64, now: Duration) {
        if (to - self.to).abs() < f64::EPSILON {
            return;
        }
        self.from = self.value_at(now);
        self.to = to;
        self.started = now;
    }

    pub fn target(&self) -> f64 {
        self.to
    }

    pub fn is_settled(&self, now: Duration) -> bool {
        now.saturating_sub(self.started) >= self.duration
    }
}
