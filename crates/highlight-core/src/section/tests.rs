//! Tests for section building and prioritization

use super::*;
use crate::event::{EventKind, KindHistogram};
use crate::transcript::TranscriptSegment;
use approx::assert_abs_diff_eq;

fn peak(time: f64, intensity: f64) -> Event {
    Event::new(time, EventKind::VolumePeak, "volume peak").with_intensity(intensity)
}

fn mixed(time: f64, intensity: f64) -> Event {
    let mut histogram = KindHistogram::default();
    histogram.add(EventKind::Laughter, 1);
    histogram.add(EventKind::Applause, 1);
    Event {
        time,
        kind: HighlightKind::Mixed(histogram),
        intensity: Some(intensity),
        duration: None,
        confidence: None,
        description: "composite event (laughter, applause)".to_string(),
        event_count: 2,
    }
}

#[test]
fn test_format_timestamp() {
    assert_eq!(format_timestamp(0.0), "00:00");
    assert_eq!(format_timestamp(59.99), "00:59");
    assert_eq!(format_timestamp(65.9), "01:05");
    assert_eq!(format_timestamp(3599.0), "59:59");
    assert_eq!(format_timestamp(3725.0), "01:02:05");
    assert_eq!(format_timestamp(-3.0), "00:00");
}

#[test]
fn test_title_qualifiers() {
    let kinds = KindTable::default();
    let config = TranscriptConfig::default();
    let builder = SectionBuilder::new(&kinds, &config);

    assert_eq!(builder.title(&peak(0.0, 2.5), 2.5), "🔊 large volume peak");
    assert_eq!(builder.title(&peak(0.0, 2.0), 2.0), "🔊 volume peak");
    assert_eq!(builder.title(&peak(0.0, 1.8), 1.8), "🔊 volume peak");
    assert_eq!(builder.title(&peak(0.0, 1.5), 1.5), "🔊 small volume peak");
    assert_eq!(builder.title(&peak(0.0, 0.4), 0.4), "🔊 small volume peak");

    // composites never carry a qualifier
    assert_eq!(
        builder.title(&mixed(0.0, 3.0), 3.0),
        "🎊 composite event (laughter, applause)"
    );
}

#[test]
fn test_missing_intensity_defaults_to_one() {
    let kinds = KindTable::default();
    let config = TranscriptConfig::default();
    let event = Event::new(4.0, EventKind::Laughter, "laughter").with_confidence(0.9);

    let sections = SectionBuilder::new(&kinds, &config).build(&[event], None);
    assert_eq!(sections[0].intensity, 1.0);
    assert_eq!(sections[0].title, "😂 small laughter");
    assert_abs_diff_eq!(sections[0].priority_score, 1.3, epsilon = 1e-12);
}

#[test]
fn test_priority_score() {
    assert_abs_diff_eq!(priority_score(1.5, 2.0, 1), 3.0, epsilon = 1e-12);
    assert_abs_diff_eq!(
        priority_score(1.0, 1.2, 2),
        1.2 * (1.0 + 2f64.ln()),
        epsilon = 1e-12
    );
    assert_abs_diff_eq!(priority_score(1.0, 1.0, 0), 1.0, epsilon = 1e-12);
}

#[test]
fn test_sections_are_chronological_not_by_priority() {
    let kinds = KindTable::default();
    let config = TranscriptConfig::default();
    // the later event has a much higher priority
    let events = vec![peak(10.0, 0.5), mixed(40.0, 5.0), peak(25.0, 1.0)];

    let sections = SectionBuilder::new(&kinds, &config).build(&events, None);
    assert_eq!(sections.len(), events.len());
    let starts: Vec<f64> = sections.iter().map(|s| s.start_time).collect();
    assert_eq!(starts, vec![10.0, 25.0, 40.0]);
    assert!(sections[2].priority_score > sections[0].priority_score);
    assert_eq!(sections[2].event_count, 2);
    assert_eq!(sections[1].start_time_str, "00:25");
}

#[test]
fn test_transcript_enrichment() {
    let kinds = KindTable::default();
    let config = TranscriptConfig::default();
    let transcript = Transcript::new(vec![
        TranscriptSegment {
            start: 9.0,
            end: 11.0,
            text: "That was amazing!".to_string(),
        },
        TranscriptSegment {
            start: 200.0,
            end: 202.0,
            text: "unrelated".to_string(),
        },
    ]);
    let events = vec![peak(10.0, 2.5), peak(100.0, 2.5)];

    let sections = SectionBuilder::new(&kinds, &config).build(&events, Some(&transcript));
    assert_eq!(sections[0].content.as_deref(), Some("That was amazing!"));
    assert_eq!(sections[0].full_text.as_deref(), Some("That was amazing!"));
    // nearest segment is 100 s away
    assert!(sections[1].content.is_none());
    assert!(sections[1].full_text.is_none());
}

#[test]
fn test_section_json_shape() {
    let kinds = KindTable::default();
    let config = TranscriptConfig::default();
    let sections = SectionBuilder::new(&kinds, &config).build(&[mixed(61.0, 1.2)], None);

    let json = serde_json::to_value(&sections[0]).unwrap();
    assert_eq!(json["type"], "mixed");
    assert_eq!(json["start_time_str"], "01:01");
    assert_eq!(json["event_count"], 2);
    assert!(json.get("content").is_none());
    assert!(json.get("full_text").is_none());
}

#[test]
fn test_empty_input() {
    let kinds = KindTable::default();
    let config = TranscriptConfig::default();
    assert!(SectionBuilder::new(&kinds, &config).build(&[], None).is_empty());
}
