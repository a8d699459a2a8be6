//! Folding temporally close events into groups
//!
//! A single left-to-right pass: an event joins the open group when it follows
//! the previous event by at most the merge threshold.

use crate::event::{sort_by_time, Event, HighlightKind, KindHistogram};
use crate::kinds::KindTable;


/// Member kinds listed in a composite description
const MAX_LISTED_KINDS: usize = 3;

pub struct EventMerger<'a> {
    threshold_s: f64,
    kinds: &'a KindTable,
}

impl<'a> EventMerger<'a> {
    pub fn new(threshold_s: f64, kinds: &'a KindTable) -> Self {
        Self { threshold_s, kinds }
    }

    /// Merge events of any kind; output is time-ascending, one event per group
    pub fn merge(&self, events: &[Event]) -> Vec<Event> {
        let mut sorted = events.to_vec();
        sort_by_time(&mut sorted);

        let mut merged = Vec::new();
        let mut group: Vec<Event> = Vec::new();
        for event in sorted {
            if let Some(prev) = group.last() {
                if event.time - prev.time > self.threshold_s {
                    merged.push(self.merge_group(std::mem::take(&mut group)));
                }
            }
            group.push(event);
        }
        if !group.is_empty() {
            merged.push(self.merge_group(group));
        }

        log::debug!("merged {} events into {} groups", events.len(), merged.len());
        merged
    }

    /// Collapse one non-empty group into its representative event
    fn merge_group(&self, mut group: Vec<Event>) -> Event {
        if group.len() == 1 {
            return group.remove(0);
        }

        let mut histogram = KindHistogram::default();
        for event in &group {
            event.tally_into(&mut histogram);
        }

        let (weighted, total_weight) = group.iter().fold((0.0, 0.0), |(sum, w), event| {
            let weight = self.kinds.weight(&event.kind);
            (sum + event.intensity.unwrap_or(1.0) * weight, w + weight)
        });
        let intensity = if total_weight > 0.0 {
            weighted / total_weight
        } else {
            1.0
        };

        let kind = match histogram.ranked().as_slice() {
            [(only, _)] => HighlightKind::Single(*only),
            _ => HighlightKind::Mixed(histogram),
        };
        let description = self.describe(&kind);
        let event_count = group.iter().map(|e| e.event_count).sum();

        Event {
            time: group[0].time,
            kind,
            intensity: Some(intensity),
            duration: None,
            confidence: None,
            description,
            event_count,
        }
    }

    fn describe(&self, kind: &HighlightKind) -> String {
        match kind {
            HighlightKind::Single(k) => self.kinds.event(*k).label.clone(),
            HighlightKind::Mixed(histogram) => {
                let parts: Vec<String> = histogram
                    .ranked()
                    .into_iter()
                    .take(MAX_LISTED_KINDS)
                    .map(|(k, count)| {
                        let label = &self.kinds.event(k).label;
                        if count > 1 {
                            format!("{}×{}", label, count)
                        } else {
                            label.clone()
                        }
                    })
                    .collect();
                format!(
                    "{} ({})",
                    self.kinds.mixed.label,
                    parts.join(&self.kinds.list_separator)
                )
            }
        }
    }
}
