//! Span tracking over a per-frame predicate
//!
//! One span is reported per contiguous run of frames where the predicate
//! holds. A run still open at the last frame is closed at the series end.

/// Half-open frame range `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    pub fn slice<'a>(&self, values: &'a [f64]) -> &'a [f64] {
        &values[self.start..self.end.min(values.len())]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Active { start: usize },
}

/// Idle/active state machine fed one frame at a time
#[derive(Debug)]
pub struct SpanTracker {
    state: State,
}

impl SpanTracker {
    pub fn new() -> Self {
        Self { state: State::Idle }
    }

    /// Feed the predicate value for frame `index`; returns the span that
    /// this frame closes, if any.
    pub fn step(&mut self, index: usize, above: bool) -> Option<Span> {
        match (self.state, above) {
            (State::Idle, true) => {
                self.state = State::Active { start: index };
                None
            }
            (State::Active { start }, false) => {
                self.state = State::Idle;
                Some(Span { start, end: index })
            }
            _ => None,
        }
    }

    /// Close a span left open at the end of a series of `len` frames
    pub fn finish(&mut self, len: usize) -> Option<Span> {
        match std::mem::replace(&mut self.state, State::Idle) {
            State::Active { start } if start < len => Some(Span { start, end: len }),
            _ => None,
        }
    }
}

impl Default for SpanTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// All maximal runs where `scores[i] > threshold`
pub fn spans_above(scores: &[f64], threshold: f64) -> Vec<Span> {
    let mut tracker = SpanTracker::new();
    let mut spans: Vec<Span> = scores
        .iter()
        .enumerate()
        .filter_map(|(i, &s)| tracker.step(i, s > threshold))
        .collect();
    spans.extend(tracker.finish(scores.len()));
    spans
}
