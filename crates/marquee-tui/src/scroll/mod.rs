//! Smooth scrolling for the landing page
//!
//! Easing curves and timing helpers live in `marquee_core::motion`; this
//! module adds the scroll position controller that drives the viewport.
//!
//! ```ignore
//! use marquee_tui::scroll::ScrollAnimator;
//!
//! let mut animator = ScrollAnimator::with_defaults();
//! animator.scroll_to(anchor_row, max_scroll);
//!
//! // each frame
//! let scroll = animator.update(max_scroll);
//! ```

pub mod animation;
pub mod config;

pub use animation::ScrollAnimator;
pub use config::{ScrollConfig, ScrollConfigExt};
