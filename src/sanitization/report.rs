//! Dry-run detection reporting
//!
//! A [`DetectionReport`] aggregates what the sanitizer *would* redact. It never
//! holds matched text: samples carry only category, source, position and length.

use crate::sanitization::models::{PhiCategory, ResolvedSpan};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

const MAX_SAMPLES: usize = 20;
const SAMPLES_PER_INPUT: usize = 3;

/// Detection statistics over one or more inputs
#[derive(Debug, Clone, Default, Serialize)]
pub struct DetectionReport {
    pub generated_at: DateTime<Utc>,

    /// Inputs analyzed
    pub total_inputs: usize,

    /// Resolved spans across all inputs
    pub total_detected: usize,

    pub detections_by_category: BTreeMap<PhiCategory, usize>,

    /// Keyed by pattern or code-context detector name
    pub detections_by_pattern: BTreeMap<String, usize>,

    pub samples: Vec<DetectionSample>,

    pub warnings: Vec<String>,

    pub stats: ProcessingStats,
}

/// Location of one detection, without its content
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectionSample {
    /// Zero-based index of the input the span came from
    pub input: usize,
    pub category: PhiCategory,
    pub source_name: String,
    pub start: usize,
    pub length: usize,
}

/// Processing statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProcessingStats {
    pub inputs_with_phi: usize,
    pub inputs_without_phi: usize,
    /// Inputs skipped because they exceeded the size limit
    pub inputs_oversized: usize,
    pub total_processing_time_ms: u64,
}

impl DetectionReport {
    pub fn new() -> Self {
        Self {
            generated_at: Utc::now(),
            ..Self::default()
        }
    }

    /// Add the resolved spans of one input
    pub fn add_input(&mut self, spans: &[ResolvedSpan], processing_time_ms: u64) {
        let input = self.total_inputs;
        self.total_inputs += 1;
        self.stats.total_processing_time_ms += processing_time_ms;

        if spans.is_empty() {
            self.stats.inputs_without_phi += 1;
            return;
        }

        self.stats.inputs_with_phi += 1;
        self.total_detected += spans.len();

        for span in spans {
            *self.detections_by_category.entry(span.category()).or_insert(0) += 1;
            *self
                .detections_by_pattern
                .entry(span.source_name().to_string())
                .or_insert(0) += 1;
        }

        for span in spans.iter().take(SAMPLES_PER_INPUT) {
            if self.samples.len() >= MAX_SAMPLES {
                break;
            }
            self.samples.push(DetectionSample {
                input,
                category: span.category(),
                source_name: span.source_name().to_string(),
                start: span.start(),
                length: span.end() - span.start(),
            });
        }
    }

    /// Record an input that was not scanned because of its size
    pub fn add_oversized(&mut self, size: usize, limit: usize) {
        self.total_inputs += 1;
        self.stats.inputs_oversized += 1;
        self.add_warning(format!(
            "Input #{} not scanned: {size} bytes exceeds limit of {limit}",
            self.total_inputs - 1
        ));
    }

    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    /// Fold another report into this one
    pub fn merge(&mut self, other: DetectionReport) {
        let offset = self.total_inputs;
        self.total_inputs += other.total_inputs;
        self.total_detected += other.total_detected;
        for (category, count) in other.detections_by_category {
            *self.detections_by_category.entry(category).or_insert(0) += count;
        }
        for (pattern, count) in other.detections_by_pattern {
            *self.detections_by_pattern.entry(pattern).or_insert(0) += count;
        }
        let room = MAX_SAMPLES.saturating_sub(self.samples.len());
        self.samples.extend(other.samples.into_iter().take(room).map(|mut s| {
            s.input += offset;
            s
        }));
        self.warnings.extend(other.warnings);
        self.stats.inputs_with_phi += other.stats.inputs_with_phi;
        self.stats.inputs_without_phi += other.stats.inputs_without_phi;
        self.stats.inputs_oversized += other.stats.inputs_oversized;
        self.stats.total_processing_time_ms += other.stats.total_processing_time_ms;
    }

    /// Format report for console output
    pub fn format_console(&self) -> String {
        let mut output = String::new();

        output.push('\n');
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push_str("                    PHI DETECTION REPORT                       \n");
        output.push_str("═══════════════════════════════════════════════════════════════\n\n");

        output.push_str("📊 SUMMARY\n");
        output.push_str("───────────────────────────────────────────────────────────────\n");
        output.push_str(&format!(
            "  Generated:              {}\n",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        output.push_str(&format!("  Inputs Analyzed:        {}\n", self.total_inputs));
        output.push_str(&format!("  Inputs with PHI:        {}\n", self.stats.inputs_with_phi));
        output.push_str(&format!("  Inputs without PHI:     {}\n", self.stats.inputs_without_phi));
        output.push_str(&format!("  Inputs Oversized:       {}\n", self.stats.inputs_oversized));
        output.push_str(&format!("  Total PHI Detected:     {}\n", self.total_detected));
        output.push_str(&format!(
            "  Processing Time:        {} ms\n\n",
            self.stats.total_processing_time_ms
        ));

        if !self.detections_by_category.is_empty() {
            output.push_str("🔍 DETECTIONS BY CATEGORY\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");
            let mut categories: Vec<_> = self.detections_by_category.iter().collect();
            categories.sort_by(|a, b| b.1.cmp(a.1));
            for (category, count) in categories {
                output.push_str(&format!("  {:30} {:>5}\n", category.label(), count));
            }
            output.push('\n');
        }

        if !self.detections_by_pattern.is_empty() {
            output.push_str("🧩 DETECTIONS BY PATTERN\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");
            for (pattern, count) in &self.detections_by_pattern {
                output.push_str(&format!("  {pattern:30} {count:>5}\n"));
            }
            output.push('\n');
        }

        if !self.samples.is_empty() {
            output.push_str("📝 SAMPLE LOCATIONS\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");
            for sample in self.samples.iter().take(10) {
                output.push_str(&format!(
                    "  input #{:<4} {:15} at {:>6} len {:>4}  ({})\n",
                    sample.input,
                    sample.category.label(),
                    sample.start,
                    sample.length,
                    sample.source_name
                ));
            }
            output.push('\n');
        }

        if !self.warnings.is_empty() {
            output.push_str("⚠️  WARNINGS\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");
            for warning in &self.warnings {
                output.push_str(&format!("  • {warning}\n"));
            }
            output.push('\n');
        }

        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output
    }

    /// Format report as JSON
    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
