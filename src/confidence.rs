//! Translation confidence scoring

use crate::validator::ValidationReport;

/// Note substrings that mark an uncertain translation step
pub const ISSUE_MARKERS: [&str; 3] = ["Unknown", "manual", "WARNING"];

const ERROR_PENALTY: i64 = 20;
const WARNING_PENALTY: i64 = 5;
const ISSUE_NOTE_PENALTY: i64 = 10;

/// Whether a translation note reports something the translator was unsure about
#[must_use]
pub fn is_issue_note(note: &str) -> bool {
    ISSUE_MARKERS.iter().any(|marker| note.contains(marker))
}

/// Score a translation from 0 to 100
///
/// Starts at 100 and subtracts 20 per validation error, 5 per validation
/// warning (input and output alike) and 10 per issue note.
#[must_use]
pub fn score(input: &ValidationReport, output: &ValidationReport, notes: &[String]) -> u8 {
    let penalty = |report: &ValidationReport| {
        report.errors.len() as i64 * ERROR_PENALTY + report.warnings.len() as i64 * WARNING_PENALTY
    };
    let issues = notes.iter().filter(|note| is_issue_note(note)).count() as i64;

    let score = 100 - penalty(input) - penalty(output) - issues * ISSUE_NOTE_PENALTY;
    // Clamped to 0..=100, so the cast is lossless
    score.clamp(0, 100) as u8
}
