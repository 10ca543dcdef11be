//! Motion engine for entrance and scroll-driven animations
//!
//! ## Atoms
//! - `easing` - easing curves mapping [0, 1] to [0, 1]
//! - `timing` - progress and interpolation helpers
//! - `tween` - property tweens with stagger, repeat and yoyo
//!
//! ## Molecules
//! - `timeline` - tweens placed relative to each other
//! - `trigger` - scroll-position triggers (batch reveals, scrubbing, enter)
//! - `landing` - the animation plan for the landing page
//!
//! All sampling is done against an explicit elapsed time; nothing here
//! reads the wall clock.

pub mod easing;
pub mod landing;
pub mod timeline;
pub mod timing;
pub mod trigger;
pub mod tween;

pub use easing::EasingType;
pub use landing::LandingMotion;
pub use timeline::{Position, Timeline};
pub use trigger::{BatchTrigger, Bounds, EnterTrigger, ScrubTrigger, TriggerLine, TriggerSet};
pub use tween::{Props, PropsPatch, Repeat, Transition, Tween};
