//! Scroll-position triggers
//!
//! A trigger line pairs a point on an element with a point on the viewport:
//! `"top 80%"` fires when the element's top edge reaches 80% of the way down
//! the viewport. Positions are in rows of the scrolled document.

use std::str::FromStr;
use std::time::Duration;

use tracing::debug;

use super::tween::{Props, Tween};
use crate::Error;

/// Vertical extent of an element in document rows
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub top: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }
}

/// A point on the element meeting a point on the viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerLine {
    /// Fraction of the element height (0 = top edge, 1 = bottom edge)
    pub element: f64,
    /// Fraction of the viewport height (0 = top, 1 = bottom)
    pub viewport: f64,
}

impl TriggerLine {
    pub const fn new(element: f64, viewport: f64) -> Self {
        Self { element, viewport }
    }

    /// Scroll offset at which the element point reaches the viewport point
    pub fn scroll_position(&self, bounds: Bounds, viewport_height: f64) -> f64 {
        bounds.top + self.element * bounds.height - self.viewport * viewport_height
    }

    pub fn is_crossed(&self, bounds: Bounds, scroll: f64, viewport_height: f64) -> bool {
        scroll >= self.scroll_position(bounds, viewport_height)
    }
}

fn parse_edge(word: &str, line: &str) -> Result<f64, Error> {
    match word {
        "top" => Ok(0.0),
        "center" => Ok(0.5),
        "bottom" => Ok(1.0),
        pct => pct
            .strip_suffix('%')
            .and_then(|v| v.parse::<f64>().ok())
            .map(|v| v / 100.0)
            .ok_or_else(|| Error::Parse(format!("invalid trigger line: {}", line))),
    }
}

impl FromStr for TriggerLine {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let element = words
            .next()
            .ok_or_else(|| Error::Parse(format!("invalid trigger line: {}", s)))?;
        // A single word applies to both sides ("center" == "center center")
        let viewport = words.next().unwrap_or(element);
        if words.next().is_some() {
            return Err(Error::Parse(format!("invalid trigger line: {}", s)));
        }

        Ok(Self {
            element: parse_edge(element, s)?,
            viewport: parse_edge(viewport, s)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Entered {
    at: Duration,
    /// Position among the elements that entered in the same update
    index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct BatchElement {
    bounds: Bounds,
    entered: Option<Entered>,
}

/// Reveals a group of elements as they scroll into view
///
/// Elements crossing the start line in the same update animate together,
/// staggered in document order. Each element is revealed once.
#[derive(Debug, Clone)]
pub struct BatchTrigger {
    target: String,
    start: TriggerLine,
    tween: Tween,
    elements: Vec<BatchElement>,
}

impl BatchTrigger {
    pub fn new(target: &str, start: TriggerLine, tween: Tween) -> Self {
        Self {
            target: target.to_string(),
            start,
            tween,
            elements: Vec::new(),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Replace element positions, keeping which ones were already revealed
    pub fn set_bounds(&mut self, bounds: Vec<Bounds>) {
        let previous = std::mem::take(&mut self.elements);
        self.elements = bounds
            .into_iter()
            .enumerate()
            .map(|(i, bounds)| BatchElement {
                bounds,
                entered: previous.get(i).and_then(|e| e.entered),
            })
            .collect();
    }

    /// Reveal elements whose start line has been crossed
    ///
    /// Returns how many elements entered in this update.
    pub fn update(&mut self, scroll: f64, viewport_height: f64, now: Duration) -> usize {
        let mut batch = 0;
        for element in &mut self.elements {
            if element.entered.is_none()
                && self.start.is_crossed(element.bounds, scroll, viewport_height)
            {
                element.entered = Some(Entered { at: now, index: batch });
                batch += 1;
            }
        }
        if batch > 0 {
            debug!(target_class = %self.target, count = batch, "Batch entered");
        }
        batch
    }

    pub fn is_entered(&self, index: usize) -> bool {
        self.elements
            .get(index)
            .is_some_and(|e| e.entered.is_some())
    }

    /// Whether any revealed element is still mid-animation
    pub fn is_animating(&self, now: Duration) -> bool {
        self.elements.iter().filter_map(|e| e.entered).any(|entered| {
            self.tween
                .total_duration(entered.index + 1)
                .map_or(true, |length| now.saturating_sub(entered.at) < length)
        })
    }

    pub fn entered_count(&self) -> usize {
        self.elements.iter().filter(|e| e.entered.is_some()).count()
    }

    /// Properties of element `index` at `now`
    pub fn props(&self, index: usize, now: Duration) -> Props {
        match self.elements.get(index).and_then(|e| e.entered) {
            Some(entered) => self
                .tween
                .sample(now.saturating_sub(entered.at), entered.index),
            None => self.tween.initial(),
        }
    }
}

/// Maps the scroll position between two lines onto a progress in [0, 1]
#[derive(Debug, Clone)]
pub struct ScrubTrigger {
    target: String,
    start: TriggerLine,
    end: TriggerLine,
    bounds: Bounds,
    /// How long the progress takes to catch up with the scrollbar
    lag: Option<Duration>,
    progress: f64,
}

impl ScrubTrigger {
    pub fn new(target: &str, start: TriggerLine, end: TriggerLine, lag: Option<Duration>) -> Self {
        Self {
            target: target.to_string(),
            start,
            end,
            bounds: Bounds::new(0.0, 0.0),
            lag,
            progress: 0.0,
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    /// Progress the scroll position alone implies
    pub fn raw_progress(&self, scroll: f64, viewport_height: f64) -> f64 {
        let from = self.start.scroll_position(self.bounds, viewport_height);
        let to = self.end.scroll_position(self.bounds, viewport_height);
        if to <= from {
            return if scroll >= from { 1.0 } else { 0.0 };
        }
        ((scroll - from) / (to - from)).clamp(0.0, 1.0)
    }

    /// Move progress towards the scroll position, `dt` after the last update
    pub fn update(&mut self, scroll: f64, viewport_height: f64, dt: Duration) -> f64 {
        let raw = self.raw_progress(scroll, viewport_height);
        self.progress = match self.lag {
            None => raw,
            Some(lag) if lag.is_zero() => raw,
            Some(lag) => {
                let k = (dt.as_secs_f64() / lag.as_secs_f64()).min(1.0);
                self.progress + (raw - self.progress) * k
            }
        };
        self.progress
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }
}

/// Fires once when an element scrolls past its start line
#[derive(Debug, Clone)]
pub struct EnterTrigger {
    target: String,
    start: TriggerLine,
    bounds: Bounds,
    entered_at: Option<Duration>,
}

impl EnterTrigger {
    pub fn new(target: &str, start: TriggerLine) -> Self {
        Self {
            target: target.to_string(),
            start,
            bounds: Bounds::new(0.0, 0.0),
            entered_at: None,
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    /// Returns `true` on the update in which the trigger fires
    pub fn update(&mut self, scroll: f64, viewport_height: f64, now: Duration) -> bool {
        if self.entered_at.is_some() || !self.start.is_crossed(self.bounds, scroll, viewport_height) {
            return false;
        }
        debug!(target_class = %self.target, "Enter trigger fired");
        self.entered_at = Some(now);
        true
    }

    /// Time since the trigger fired
    pub fn elapsed(&self, now: Duration) -> Option<Duration> {
        self.entered_at.map(|at| now.saturating_sub(at))
    }
}

/// Every trigger on a page
#[derive(Debug, Clone, Default)]
pub struct TriggerSet {
    batches: Vec<BatchTrigger>,
    scrubs: Vec<ScrubTrigger>,
    enters: Vec<EnterTrigger>,
}

impl TriggerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_batch(mut self, trigger: BatchTrigger) -> Self {
        self.batches.push(trigger);
        self
    }

    pub fn with_scrub(mut self, trigger: ScrubTrigger) -> Self {
        self.scrubs.push(trigger);
        self
    }

    pub fn with_enter(mut self, trigger: EnterTrigger) -> Self {
        self.enters.push(trigger);
        self
    }

    pub fn len(&self) -> usize {
        self.batches.len() + self.scrubs.len() + self.enters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn batches(&self) -> impl Iterator<Item = &BatchTrigger> {
        self.batches.iter()
    }

    pub fn batch(&self, target: &str) -> Option<&BatchTrigger> {
        self.batches.iter().find(|t| t.target == target)
    }

    pub fn scrub(&self, target: &str) -> Option<&ScrubTrigger> {
        self.scrubs.iter().find(|t| t.target == target)
    }

    pub fn enter(&self, target: &str) -> Option<&EnterTrigger> {
        self.enters.iter().find(|t| t.target == target)
    }

    /// Re-read element positions, e.g. after the terminal was resized
    pub fn refresh<F>(&mut self, bounds_of: F)
    where
        F: Fn(&str) -> Vec<Bounds>,
    {
        for batch in &mut self.batches {
            batch.set_bounds(bounds_of(&batch.target));
        }
        for scrub in &mut self.scrubs {
            if let Some(bounds) = bounds_of(&scrub.target).first() {
                scrub.set_bounds(*bounds);
            }
        }
        for enter in &mut self.enters {
            if let Some(bounds) = bounds_of(&enter.target).first() {
                enter.set_bounds(*bounds);
            }
        }
    }

    /// Advance every trigger to the current scroll position
    pub fn update(&mut self, scroll: f64, viewport_height: f64, now: Duration, dt: Duration) {
        for batch in &mut self.batches {
            batch.update(scroll, viewport_height, now);
        }
        for scrub in &mut self.scrubs {
            scrub.update(scroll, viewport_height, dt);
        }
        for enter in &mut self.enters {
            enter.update(scroll, viewport_height, now);
        }
    }

    /// Drop every scroll-scrubbed trigger; returns how many were removed
    pub fn prune_scrubbed(&mut self) -> usize {
        let removed = self.scrubs.len();
        self.scrubs.clear();
        if removed > 0 {
            debug!(removed, "Pruned scrubbed triggers");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::timing::secs;
    use crate::motion::tween::PropsPatch;
    use crate::motion::EasingType;

    fn reveal() -> Tween {
        Tween::from_props(PropsPatch::new().opacity(0.0).y(50.0), secs(0.8))
            .stagger(secs(0.2))
            .ease(EasingType::Linear)
    }

    #[test]
    fn test_parse_trigger_lines() {
        assert_eq!("top 80%".parse::<TriggerLine>().unwrap(), TriggerLine::new(0.0, 0.8));
        assert_eq!("top bottom".parse::<TriggerLine>().unwrap(), TriggerLine::new(0.0, 1.0));
        assert_eq!("bottom top".parse::<TriggerLine>().unwrap(), TriggerLine::new(1.0, 0.0));
        assert_eq!("center".parse::<TriggerLine>().unwrap(), TriggerLine::new(0.5, 0.5));
        assert!("top 80".parse::<TriggerLine>().is_err());
        assert!("".parse::<TriggerLine>().is_err());
    }

    #[test]
    fn test_scroll_position() {
        // element top at row 100, viewport 40 rows: top hits 80% at scroll 68
        let line = TriggerLine::new(0.0, 0.8);
        let bounds = Bounds::new(100.0, 10.0);
        assert!((line.scroll_position(bounds, 40.0) - 68.0).abs() < 0.001);
        assert!(!line.is_crossed(bounds, 67.0, 40.0));
        assert!(line.is_crossed(bounds, 68.0, 40.0));
    }

    #[test]
    fn test_batch_staggers_elements_entering_together() {
        let mut batch = BatchTrigger::new("feature-card", TriggerLine::new(0.0, 0.8), reveal());
        batch.set_bounds(vec![
            Bounds::new(50.0, 5.0),
            Bounds::new(56.0, 5.0),
            Bounds::new(200.0, 5.0),
        ]);

        assert_eq!(batch.update(0.0, 40.0, Duration::ZERO), 0);
        assert_eq!(batch.props(0, Duration::ZERO).opacity, 0.0);

        let now = secs(1.0);
        assert_eq!(batch.update(30.0, 40.0, now), 2);
        assert!(batch.is_entered(1));
        assert!(!batch.is_entered(2));

        // second card waits out one stagger step
        assert!(batch.props(0, now + secs(0.1)).opacity > 0.0);
        assert_eq!(batch.props(1, now + secs(0.1)).opacity, 0.0);
        assert_eq!(batch.props(1, now + secs(5.0)), Props::REST);
        assert!(batch.is_animating(now + secs(0.5)));
        assert!(!batch.is_animating(now + secs(1.0)));

        // entering again later starts a fresh batch at index 0
        let later = secs(3.0);
        assert_eq!(batch.update(170.0, 40.0, later), 1);
        assert!(batch.props(2, later + secs(0.1)).opacity > 0.0);

        // already revealed elements stay revealed when scrolling back
        assert_eq!(batch.update(0.0, 40.0, secs(4.0)), 0);
        assert_eq!(batch.entered_count(), 3);
    }

    #[test]
    fn test_set_bounds_keeps_revealed_state() {
        let mut batch = BatchTrigger::new("step", TriggerLine::new(0.0, 0.8), reveal());
        batch.set_bounds(vec![Bounds::new(0.0, 5.0)]);
        batch.update(0.0, 40.0, Duration::ZERO);
        batch.set_bounds(vec![Bounds::new(80.0, 5.0), Bounds::new(90.0, 5.0)]);
        assert!(batch.is_entered(0));
        assert!(!batch.is_entered(1));
    }

    #[test]
    fn test_scrub_maps_scroll_to_progress() {
        let mut scrub = ScrubTrigger::new(
            "hero",
            "top bottom".parse().unwrap(),
            "bottom top".parse().unwrap(),
            None,
        );
        scrub.set_bounds(Bounds::new(0.0, 20.0));

        // start at scroll -40 (top reaches bottom), end at scroll 20
        assert!((scrub.update(-40.0, 40.0, Duration::ZERO) - 0.0).abs() < 0.001);
        assert!((scrub.update(-10.0, 40.0, Duration::ZERO) - 0.5).abs() < 0.001);
        assert!((scrub.update(100.0, 40.0, Duration::ZERO) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_scrub_lag_catches_up() {
        let mut scrub = ScrubTrigger::new(
            "code-window",
            TriggerLine::new(0.0, 1.0),
            TriggerLine::new(1.0, 0.0),
            Some(secs(1.0)),
        );
        scrub.set_bounds(Bounds::new(0.0, 20.0));

        let first = scrub.update(20.0, 40.0, secs(0.5));
        assert!((first - 0.5).abs() < 0.001);
        let second = scrub.update(20.0, 40.0, secs(0.5));
        assert!((second - 0.75).abs() < 0.001);
        assert!((scrub.update(20.0, 40.0, secs(2.0)) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_enter_fires_once() {
        let mut enter = EnterTrigger::new("contribute-section", TriggerLine::new(0.0, 0.8));
        enter.set_bounds(Bounds::new(100.0, 30.0));

        assert!(!enter.update(10.0, 40.0, secs(1.0)));
        assert!(enter.update(70.0, 40.0, secs(2.0)));
        assert!(!enter.update(90.0, 40.0, secs(3.0)));
        assert_eq!(enter.elapsed(secs(2.5)), Some(secs(0.5)));
    }

    #[test]
    fn test_prune_scrubbed_keeps_other_triggers() {
        let mut set = TriggerSet::new()
            .with_batch(BatchTrigger::new("usage-card", TriggerLine::new(0.0, 0.85), reveal()))
            .with_scrub(ScrubTrigger::new("hero", TriggerLine::new(0.0, 1.0), TriggerLine::new(1.0, 0.0), None))
            .with_scrub(ScrubTrigger::new("code-window", TriggerLine::new(0.0, 0.8), TriggerLine::new(1.0, 0.2), Some(secs(1.0))))
            .with_enter(EnterTrigger::new("contribute-section", TriggerLine::new(0.0, 0.8)));

        assert_eq!(set.len(), 4);
        assert_eq!(set.prune_scrubbed(), 2);
        assert_eq!(set.len(), 2);
        assert!(set.scrub("hero").is_none());
        assert!(set.batch("usage-card").is_some());
    }

    #[test]
    fn test_refresh_reads_bounds_by_target() {
        let mut set = TriggerSet::new()
            .with_batch(BatchTrigger::new("step", TriggerLine::new(0.0, 0.8), reveal()))
            .with_enter(EnterTrigger::new("contribute-section", TriggerLine::new(0.0, 0.8)));

        set.refresh(|target| match target {
            "step" => vec![Bounds::new(10.0, 4.0), Bounds::new(15.0, 4.0)],
            "contribute-section" => vec![Bounds::new(60.0, 20.0)],
            _ => Vec::new(),
        });

        assert_eq!(set.batch("step").map(|b| b.len()), Some(2));
        set.update(30.0, 40.0, secs(1.0), secs(0.1));
        assert!(set.enter("contribute-section").and_then(|e| e.elapsed(secs(1.0))).is_some());
    }
}
