//! Transcript segments and excerpt lookup for sections
//!
//! Enrichment is best-effort: malformed segments are dropped when the
//! transcript is loaded and a section without nearby speech simply gets no
//! excerpt.

use crate::config::TranscriptConfig;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Characters that end a summary fragment (kept with the fragment)
const FRAGMENT_TERMINATORS: [char; 7] = ['。', '、', '！', '？', '.', '!', '?'];

const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// Segment as it arrives from a speech-to-text tool; any field may be missing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSegment {
    pub start: Option<f64>,
    pub end: Option<f64>,
    pub text: Option<String>,
}

impl RawSegment {
    fn into_segment(self) -> Option<TranscriptSegment> {
        let start = self.start.filter(|s| s.is_finite())?;
        let text = self.text?;
        Some(TranscriptSegment {
            start,
            end: self.end.unwrap_or(start),
            text,
        })
    }
}

/// Time-ordered speech segments for one recording
#[derive(Debug, Clone, Default, Serialize)]
pub struct Transcript {
    pub segments: Vec<TranscriptSegment>,
    /// Whole-recording text, when the recognizer provides it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Text attached to a section
#[derive(Debug, Clone, PartialEq)]
pub struct Excerpt {
    /// Short summary fragment
    pub content: String,
    /// Concatenated neighbor text, bounded
    pub full_text: String,
}

impl Transcript {
    pub fn new(segments: Vec<TranscriptSegment>) -> Self {
        Self {
            segments,
            text: None,
            language: None,
        }
    }

    /// Keep the well-formed segments, logging the ones that are skipped
    pub fn from_raw(raw: Vec<RawSegment>) -> Self {
        let total = raw.len();
        let segments: Vec<TranscriptSegment> =
            raw.into_iter().filter_map(RawSegment::into_segment).collect();
        if segments.len() < total {
            log::warn!(
                "Skipped {} malformed transcript segments ({} kept)",
                total - segments.len(),
                segments.len()
            );
        }
        Self::new(segments)
    }

    /// Parse either `{"segments": [...], "text": .., "language": ..}` or a
    /// bare segment array
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let (items, text, language) = match value {
            serde_json::Value::Array(items) => (items, None, None),
            serde_json::Value::Object(mut obj) => {
                let field = |name: &str| obj.get(name).and_then(|v| v.as_str()).map(str::to_string);
                let text = field("text");
                let language = field("language");
                let items = match obj.remove("segments") {
                    Some(serde_json::Value::Array(items)) => items,
                    _ => Vec::new(),
                };
                (items, text, language)
            }
            _ => (Vec::new(), None, None),
        };

        // A segment with wrongly typed fields is as malformed as one with missing fields
        let raw = items
            .into_iter()
            .map(|item| serde_json::from_value(item).unwrap_or_default())
            .collect();
        let mut transcript = Self::from_raw(raw);
        transcript.text = text;
        transcript.language = language;
        Ok(transcript)
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Index of the segment starting closest to `time`; earliest wins ties
    pub fn closest(&self, time: f64) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, seg) in self.segments.iter().enumerate() {
            let diff = (seg.start - time).abs();
            if best.map_or(true, |(_, d)| diff < d) {
                best = Some((i, diff));
            }
        }
        best.map(|(i, _)| i)
    }

    /// Text around `time`: the closest segment plus neighbors that start
    /// within the configured window.
    pub fn excerpt(&self, time: f64, config: &TranscriptConfig) -> Option<Excerpt> {
        let idx = self.closest(time)?;
        let lo = idx.saturating_sub(config.preceding);
        let hi = (idx + config.following + 1).min(self.segments.len());

        let texts: Vec<&str> = self.segments[lo..hi]
            .iter()
            .filter(|seg| (seg.start - time).abs() <= config.window_s)
            .map(|seg| seg.text.trim())
            .filter(|t| !t.is_empty())
            .collect();
        if texts.is_empty() {
            return None;
        }

        let joined = texts.join(" ");
        Some(Excerpt {
            content: summarize(&joined, config),
            full_text: truncate_chars(&joined, config.full_text_max_chars),
        })
    }
}

/// First fragment long enough to carry meaning, bounded in length
pub fn summarize(text: &str, config: &TranscriptConfig) -> String {
    let fragments = split_fragments(text);
    let chosen = fragments
        .iter()
        .find(|f| f.chars().count() > config.min_fragment_chars)
        .or_else(|| fragments.first());
    match chosen {
        Some(fragment) => truncate_chars(fragment, config.summary_max_chars),
        None => truncate_chars(text.trim(), config.summary_max_chars),
    }
}

fn split_fragments(text: &str) -> Vec<&str> {
    text.split_inclusive(|c| FRAGMENT_TERMINATORS.contains(&c))
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .collect()
}

/// Cut to at most `max` characters, ending in an ellipsis when cut
pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(ELLIPSIS.len());
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}
