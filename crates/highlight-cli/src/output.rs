//! JSON and plain-text report formatting

use highlight_core::{format_timestamp, Event, KindTable, Section, TopicSection};
use serde::Serialize;

const RULE_WIDTH: usize = 50;
/// Characters of section text shown under each topic
const PREVIEW_CHARS: usize = 100;

#[derive(Debug, Serialize)]
pub struct HighlightReport<'a> {
    pub source: String,
    /// RFC 3339 timestamp
    pub generated_at: String,
    pub duration: f64,
    pub num_events: usize,
    pub num_sections: usize,
    pub sections: &'a [Section],
}

impl<'a> HighlightReport<'a> {
    pub fn new(source: impl Into<String>, duration: f64, num_events: usize, sections: &'a [Section]) -> Self {
        Self {
            source: source.into(),
            generated_at: chrono::Local::now().to_rfc3339(),
            duration,
            num_events,
            num_sections: sections.len(),
            sections,
        }
    }
}

/// Report for transcript-only topic sections
#[derive(Debug, Serialize)]
pub struct TopicReport<'a> {
    pub source: String,
    pub generated_at: String,
    pub num_sections: usize,
    pub sections: &'a [TopicSection],
}

impl<'a> TopicReport<'a> {
    pub fn new(source: impl Into<String>, sections: &'a [TopicSection]) -> Self {
        Self {
            source: source.into(),
            generated_at: chrono::Local::now().to_rfc3339(),
            num_sections: sections.len(),
            sections,
        }
    }
}

#[derive(Serialize)]
struct EventsOutput<'a> {
    source: &'a str,
    num_events: usize,
    events: &'a [Event],
}

/// Print the section report as JSON
pub fn print_json_report(report: &HighlightReport) {
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing report: {}", e),
    }
}

/// Print the topic report as JSON
pub fn print_json_topics(report: &TopicReport) {
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing report: {}", e),
    }
}

/// Print raw detector events as JSON
pub fn print_json_events(source: &str, events: &[Event]) {
    let output = EventsOutput {
        source,
        num_events: events.len(),
        events,
    };
    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing events: {}", e),
    }
}

/// Section counts per display label, most frequent first
pub fn type_statistics(sections: &[Section], kinds: &KindTable) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for section in sections {
        let label = &kinds.entry(&section.kind).label;
        match counts.iter_mut().find(|(l, _)| l == label) {
            Some((_, count)) => *count += 1,
            None => counts.push((label.clone(), 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// One `MM:SS - title「content」` line per section
pub fn timeline_line(section: &Section) -> String {
    match &section.content {
        Some(content) => format!("{} - {}「{}」", section.start_time_str, section.title, content),
        None => format!("{} - {}", section.start_time_str, section.title),
    }
}

/// Human-readable timeline with per-type statistics
pub fn render_text(report: &HighlightReport, kinds: &KindTable) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();

    out.push_str("Highlight timeline\n");
    out.push_str(&rule);
    out.push('\n');
    out.push_str(&format!("Source: {}\n", report.source));
    out.push_str(&format!("Duration: {}\n", format_timestamp(report.duration)));
    out.push_str(&format!("Generated: {}\n", report.generated_at));
    out.push_str(&format!(
        "Events: {} detected, {} sections\n\n",
        report.num_events, report.num_sections
    ));

    if report.sections.is_empty() {
        out.push_str("No sections detected.\n");
        return out;
    }

    for section in report.sections {
        out.push_str(&timeline_line(section));
        out.push('\n');
    }

    out.push_str("\nEvent statistics\n");
    out.push_str(&rule);
    out.push('\n');
    for (label, count) in type_statistics(report.sections, kinds) {
        out.push_str(&format!("  {}: {}\n", label, count));
    }
    out
}

/// Topic timeline followed by a short text preview per section
pub fn render_topics_text(report: &TopicReport) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();

    out.push_str("Topic timeline\n");
    out.push_str(&rule);
    out.push('\n');
    out.push_str(&format!("Source: {}\n", report.source));
    out.push_str(&format!("Generated: {}\n\n", report.generated_at));

    if report.sections.is_empty() {
        out.push_str("No sections detected.\n");
        return out;
    }

    for section in report.sections {
        out.push_str(&format!("{} - {}\n", section.start_time_str, section.title));
    }

    out.push_str("\nDetails\n");
    out.push_str(&rule);
    out.push('\n');
    for (i, section) in report.sections.iter().enumerate() {
        out.push_str(&format!(
            "\n[{}] {} - {}\n",
            i + 1,
            section.start_time_str,
            section.title
        ));
        let preview: String = section.text.chars().take(PREVIEW_CHARS).collect();
        if !preview.is_empty() {
            out.push_str(&format!("    {}...\n", preview));
        }
    }
    out
}
