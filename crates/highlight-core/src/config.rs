//! Tunable parameters for detection, merging and section building
//!
//! Every table can be given partially in TOML; missing keys keep their
//! defaults.

use crate::error::{HighlightError, Result};
use crate::kinds::KindTable;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub volume_peak: VolumePeakConfig,
    pub surprise: SurpriseConfig,
    pub sustained: SustainedConfig,
    pub laughter: LaughterConfig,
    pub applause: ApplauseConfig,
    pub cheering: CheeringConfig,
    pub merge: MergeConfig,
    pub transcript: TranscriptConfig,
    pub kinds: KindTable,
    pub topics: TopicConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumePeakConfig {
    pub enabled: bool,
    /// Threshold = mean + k * std
    pub threshold_multiplier: f64,
    /// Minimum separation between accepted peaks (seconds)
    pub min_distance_s: f64,
}

impl Default for VolumePeakConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold_multiplier: 1.5,
            min_distance_s: 2.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SurpriseConfig {
    pub enabled: bool,
    pub silence_threshold: f64,
    pub loud_threshold: f64,
    /// Lookback window that must have been quiet (seconds)
    pub max_gap_s: f64,
}

impl Default for SurpriseConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            silence_threshold: 0.01,
            loud_threshold: 0.1,
            max_gap_s: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SustainedConfig {
    pub enabled: bool,
    /// Threshold = mean * multiplier
    pub threshold_multiplier: f64,
    pub min_duration_s: f64,
}

impl Default for SustainedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold_multiplier: 1.3,
            min_duration_s: 5.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LaughterConfig {
    pub enabled: bool,
    pub confidence_threshold: f64,
    pub band_low_hz: f64,
    pub band_high_hz: f64,
    /// Moving-average window over the band energy variation (frames)
    pub smoothing_frames: usize,
    /// A span must cover more than this many frames
    pub min_frames: usize,
}

impl Default for LaughterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            confidence_threshold: 0.7,
            band_low_hz: 300.0,
            band_high_hz: 800.0,
            smoothing_frames: 10,
            min_frames: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplauseConfig {
    pub enabled: bool,
    pub min_duration_s: f64,
    pub smoothing_s: f64,
    /// Threshold = mean + k * std of the smoothed score
    pub std_multiplier: f64,
}

impl Default for ApplauseConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_duration_s: 1.0,
            smoothing_s: 0.5,
            std_multiplier: 2.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CheeringConfig {
    pub enabled: bool,
    pub min_duration_s: f64,
    pub std_multiplier: f64,
}

impl Default for CheeringConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_duration_s: 1.5,
            std_multiplier: 1.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Maximum gap between consecutive events of one group (seconds)
    pub threshold_s: f64,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self { threshold_s: 5.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptConfig {
    /// Neighbor segments must start within this many seconds of the section
    pub window_s: f64,
    pub preceding: usize,
    pub following: usize,
    pub summary_max_chars: usize,
    pub full_text_max_chars: usize,
    /// Fragments must be longer than this to become the summary
    pub min_fragment_chars: usize,
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            window_s: 15.0,
            preceding: 1,
            following: 2,
            summary_max_chars: 30,
            full_text_max_chars: 200,
            min_fragment_chars: 5,
        }
    }
}

/// Transcript-only topic sectioning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicConfig {
    /// Phrases that announce a new topic, matched case-insensitively
    /// anywhere in a segment; `*` stands for any text in between
    pub cues: Vec<String>,
    /// A cue closer than this to the current section start does not split
    pub min_section_s: f64,
    pub title_max_chars: usize,
    /// Section length when no cue matches at all
    pub fallback_interval_s: f64,
    pub intro_title: String,
    /// Fallback sections are titled "{prefix} {n}"
    pub fallback_title_prefix: String,
}

impl Default for TopicConfig {
    fn default() -> Self {
        let cues = [
            "次は", "続いて", "それでは", "ここから", "まず", "最初に", "次に", "最後に",
            "では*について", "の説明", "を見て", "実際に", "デモ", "例として", "まとめ",
            "next", "now", "let's", "first", "finally", "in this section", "moving on",
        ];
        Self {
            cues: cues.iter().map(|c| c.to_string()).collect(),
            min_section_s: 30.0,
            title_max_chars: 30,
            fallback_interval_s: 300.0,
            intro_title: "Introduction".to_string(),
            fallback_title_prefix: "Section".to_string(),
        }
    }
}

impl HighlightConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| HighlightError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: HighlightConfig =
            toml::from_str(&content).map_err(|source| HighlightError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(HighlightError::InvalidConfig(msg));

        if !(self.volume_peak.threshold_multiplier >= 0.0) {
            return invalid("volume_peak.threshold_multiplier must be >= 0".into());
        }
        if !(self.volume_peak.min_distance_s > 0.0) {
            return invalid("volume_peak.min_distance_s must be > 0".into());
        }

        let s = &self.surprise;
        if !(s.silence_threshold > 0.0) {
            return invalid("surprise.silence_threshold must be > 0".into());
        }
        if s.silence_threshold >= s.loud_threshold {
            return invalid(format!(
                "surprise.silence_threshold ({}) must be < loud_threshold ({})",
                s.silence_threshold, s.loud_threshold
            ));
        }
        if !(s.max_gap_s > 0.0) {
            return invalid("surprise.max_gap_s must be > 0".into());
        }

        if !(self.sustained.threshold_multiplier > 0.0) {
            return invalid("sustained.threshold_multiplier must be > 0".into());
        }
        if !(self.sustained.min_duration_s >= 0.0) {
            return invalid("sustained.min_duration_s must be >= 0".into());
        }

        let l = &self.laughter;
        if !(l.confidence_threshold >= 0.0 && l.confidence_threshold <= 1.0) {
            return invalid("laughter.confidence_threshold must be within [0, 1]".into());
        }
        if !(l.band_low_hz >= 0.0 && l.band_low_hz < l.band_high_hz) {
            return invalid(format!(
                "laughter band {}..{} Hz is empty or inverted",
                l.band_low_hz, l.band_high_hz
            ));
        }
        if l.smoothing_frames == 0 {
            return invalid("laughter.smoothing_frames must be > 0".into());
        }

        if !(self.applause.smoothing_s > 0.0) {
            return invalid("applause.smoothing_s must be > 0".into());
        }
        for (name, value) in [
            ("applause.min_duration_s", self.applause.min_duration_s),
            ("applause.std_multiplier", self.applause.std_multiplier),
            ("cheering.min_duration_s", self.cheering.min_duration_s),
            ("cheering.std_multiplier", self.cheering.std_multiplier),
            ("merge.threshold_s", self.merge.threshold_s),
            ("transcript.window_s", self.transcript.window_s),
        ] {
            if !(value >= 0.0) {
                return invalid(format!("{} must be >= 0", name));
            }
        }

        if self.transcript.summary_max_chars < 4 || self.transcript.full_text_max_chars < 4 {
            return invalid("transcript text limits must leave room for an ellipsis".into());
        }

        let t = &self.topics;
        if !(t.min_section_s >= 0.0) {
            return invalid("topics.min_section_s must be >= 0".into());
        }
        if !(t.fallback_interval_s > 0.0) {
            return invalid("topics.fallback_interval_s must be > 0".into());
        }
        if t.title_max_chars < 4 {
            return invalid("topics.title_max_chars must leave room for an ellipsis".into());
        }

        for (name, entry) in self.kinds.entries() {
            if !(entry.weight > 0.0) {
                return invalid(format!("kinds.{}.weight must be > 0", name));
            }
        }

        Ok(())
    }
}
