//! Easing functions: map progress in [0, 1] to eased progress
//!
//! Curve names follow the animation vocabulary the page was designed with
//! (`power2.out`, `back.out(1.7)`, `none`).

use std::str::FromStr;

pub use crate::config::EasingType;
use crate::Error;

/// Overshoot used by `back.out`
const BACK_OVERSHOOT: f64 = 1.7;

impl EasingType {
    /// Apply the easing function to a progress value
    ///
    /// Input is clamped to [0, 1]. Every curve maps 0 to 0 and 1 to 1;
    /// `BackOut` overshoots past 1 in between.
    #[inline]
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            EasingType::None => {
                if t < 1.0 {
                    0.0
                } else {
                    1.0
                }
            }
            EasingType::Linear => t,
            EasingType::Cubic | EasingType::Power2Out => cubic_ease_out(t),
            EasingType::Quintic => quintic_ease_out(t),
            EasingType::EaseOut => exponential_ease_out(t),
            EasingType::Power2InOut => cubic_ease_in_out(t),
            EasingType::BackOut => back_ease_out(t, BACK_OVERSHOOT),
        }
    }
}

impl FromStr for EasingType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        // "back.out(1.7)" -> "back.out"
        let base = name.split('(').next().unwrap_or(name);
        match base {
            "none" | "linear" => Ok(EasingType::Linear),
            "step" | "jump" => Ok(EasingType::None),
            "cubic" => Ok(EasingType::Cubic),
            "power2" | "power2.out" => Ok(EasingType::Power2Out),
            "quintic" | "power4.out" => Ok(EasingType::Quintic),
            "expo.out" | "ease_out" => Ok(EasingType::EaseOut),
            "power2.inOut" => Ok(EasingType::Power2InOut),
            "back.out" => Ok(EasingType::BackOut),
            _ => Err(Error::Parse(format!("unknown easing: {}", s))),
        }
    }
}

/// Cubic ease-out: f(t) = 1 - (1-t)³
#[inline]
fn cubic_ease_out(t: f64) -> f64 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}

/// Quintic ease-out: f(t) = 1 - (1-t)⁵
#[inline]
fn quintic_ease_out(t: f64) -> f64 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv * inv * inv
}

/// Exponential ease-out: f(t) = 1 - 2^(-10t)
#[inline]
fn exponential_ease_out(t: f64) -> f64 {
    if t >= 1.0 {
        1.0
    } else {
        1.0 - 2.0_f64.powf(-10.0 * t)
    }
}

#[inline]
fn cubic_ease_in_out(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u * u / 2.0
    }
}

/// Back ease-out: overshoots the target by `s`-controlled amount, then settles
#[inline]
fn back_ease_out(t: f64, s: f64) -> f64 {
    let u = t - 1.0;
    1.0 + (s + 1.0) * u * u * u + s * u * u
}
