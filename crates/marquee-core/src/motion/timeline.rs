use std::str::FromStr;
use std::time::Duration;

use super::timing::secs;
use super::tween::{Props, Tween};
use crate::Error;

/// Where a tween is placed relative to what is already on the timeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Position {
    /// Right after the current end of the timeline
    Sequential,
    /// Offset from the current end, in seconds ("-=0.6" overlaps by 0.6s)
    Relative(f64),
    /// At an absolute time, in seconds
    Absolute(f64),
}

impl FromStr for Position {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parse = |v: &str| {
            v.trim()
                .parse::<f64>()
                .map_err(|_| Error::Parse(format!("invalid timeline position: {}", s)))
        };

        if s.is_empty() {
            Ok(Position::Sequential)
        } else if let Some(v) = s.strip_prefix("-=") {
            Ok(Position::Relative(-parse(v)?))
        } else if let Some(v) = s.strip_prefix("+=") {
            Ok(Position::Relative(parse(v)?))
        } else {
            Ok(Position::Absolute(parse(s)?))
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    target: String,
    count: usize,
    tween: Tween,
    start: Duration,
}

/// A sequence of tweens, each on its own target, played from one clock
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    entries: Vec<Entry>,
    end: Duration,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tween on a single element
    pub fn add(self, target: &str, tween: Tween, position: Position) -> Self {
        self.add_group(target, 1, tween, position)
    }

    /// Add a tween on `count` elements sharing a target (staggered)
    pub fn add_group(mut self, target: &str, count: usize, tween: Tween, position: Position) -> Self {
        let start = match position {
            Position::Sequential => self.end,
            Position::Relative(offset) => {
                secs(self.end.as_secs_f64() + offset)
            }
            Position::Absolute(at) => secs(at),
        };

        // Infinite tweens do not extend the timeline
        if let Some(length) = tween.total_duration(count) {
            self.end = self.end.max(start + length);
        }

        self.entries.push(Entry {
            target: target.to_string(),
            count: count.max(1),
            tween,
            start,
        });
        self
    }

    /// Time at which every finite tween has settled
    pub fn duration(&self) -> Duration {
        self.end
    }

    pub fn is_complete(&self, elapsed: Duration) -> bool {
        elapsed >= self.end
    }

    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.target.as_str())
    }

    /// When the tween for `target` begins
    pub fn start_of(&self, target: &str) -> Option<Duration> {
        self.entry(target).map(|e| e.start)
    }

    /// Properties of element `index` of `target` at `elapsed`
    ///
    /// Returns `None` for targets this timeline does not animate.
    pub fn props_for(&self, target: &str, index: usize, elapsed: Duration) -> Option<Props> {
        let entry = self.entry(target)?;
        let local = elapsed.saturating_sub(entry.start);
        if elapsed < entry.start {
            return Some(entry.tween.initial());
        }
        Some(entry.tween.sample(local, index))
    }

    /// Every animated element at `elapsed`
    pub fn sample(&self, elapsed: Duration) -> Vec<(&str, usize, Props)> {
        self.entries
            .iter()
            .flat_map(|entry| {
                (0..entry.count).map(move |i| {
                    let props = match elapsed.checked_sub(entry.start) {
                        Some(local) => entry.tween.sample(local, i),
                        None => entry.tween.initial(),
                    };
                    (entry.target.as_str(), i, props)
                })
            })
            .collect()
    }

    fn entry(&self, target: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.target == target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::tween::PropsPatch;
    use crate::motion::EasingType;

    fn fade(duration: f64) -> Tween {
        Tween::from_props(PropsPatch::new().opacity(0.0).y(20.0), secs(duration))
            .ease(EasingType::Linear)
    }

    #[test]
    fn test_parse_positions() {
        assert_eq!("-=0.6".parse::<Position>().unwrap(), Position::Relative(-0.6));
        assert_eq!("+=0.25".parse::<Position>().unwrap(), Position::Relative(0.25));
        assert_eq!("1.5".parse::<Position>().unwrap(), Position::Absolute(1.5));
        assert_eq!("".parse::<Position>().unwrap(), Position::Sequential);
        assert!("-=soon".parse::<Position>().is_err());
    }

    #[test]
    fn test_overlapping_positions() {
        let timeline = Timeline::new()
            .add("badge", fade(0.8).delay(secs(0.2)), Position::Sequential)
            .add("title", fade(0.8), Position::Relative(-0.6))
            .add("buttons", fade(0.8), Position::Relative(-0.4));

        // badge: 0.0 + 0.2 delay -> ends 1.0; title starts at 0.4, ends 1.2;
        // buttons start at 0.8, end 1.6
        assert_eq!(timeline.start_of("title"), Some(secs(0.4)));
        assert_eq!(timeline.start_of("buttons"), Some(secs(0.8)));
        assert_eq!(timeline.duration(), secs(1.6));
    }

    #[test]
    fn test_props_before_and_after_start() {
        let timeline = Timeline::new()
            .add("a", fade(1.0), Position::Sequential)
            .add("b", fade(1.0), Position::Sequential);

        let b_early = timeline.props_for("b", 0, secs(0.5)).unwrap();
        assert_eq!(b_early.opacity, 0.0);

        let b_mid = timeline.props_for("b", 0, secs(1.5)).unwrap();
        assert!((b_mid.opacity - 0.5).abs() < 0.001);

        assert_eq!(timeline.props_for("b", 0, secs(9.0)).unwrap(), Props::REST);
        assert!(timeline.props_for("missing", 0, secs(1.0)).is_none());
    }

    #[test]
    fn test_group_stagger_extends_duration() {
        let timeline = Timeline::new().add_group(
            "stat",
            3,
            fade(0.6).stagger(secs(0.1)),
            Position::Sequential,
        );
        assert_eq!(timeline.duration(), secs(0.8));
        assert_eq!(timeline.sample(secs(0.0)).len(), 3);
    }

    #[test]
    fn test_negative_offset_clamps_to_zero() {
        let timeline = Timeline::new().add("a", fade(0.5), Position::Relative(-2.0));
        assert_eq!(timeline.start_of("a"), Some(Duration::ZERO));
    }
}
