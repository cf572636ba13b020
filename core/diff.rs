//! Reduces unified diff text to groups of removed/added lines.
//!
//! Context lines and hunk positions are discarded, so the merge step below
//! judges proximity purely from how many lines changed. Two hunks far apart
//! in the file can still merge when both are small.

use log;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DiffSection {
    pub before: Vec<String>,
    pub after: Vec<String>,
}

impl DiffSection {
    pub fn is_empty(&self) -> bool {
        self.before.is_empty() && self.after.is_empty()
    }

    fn line_count(&self) -> usize {
        self.before.len() + self.after.len()
    }

    fn absorb(&mut self, other: DiffSection) {
        self.before.extend(other.before);
        self.after.extend(other.after);
    }
}

pub fn segment(diff_text: &str) -> Vec<DiffSection> {
    let sections = parse_sections(diff_text);
    let parsed = sections.len();
    let merged = merge_adjacent(sections);
    log::trace!("Diff segmented into {} hunk(s), {} after merging", parsed, merged.len());
    merged
}

fn parse_sections(diff_text: &str) -> Vec<DiffSection> {
    let mut sections = Vec::new();
    let mut current = DiffSection::default();
    // File headers (`--- a/x`, `+++ b/x`) precede the first hunk marker.
    let mut in_hunk = false;

    // Split on '\n' only: a CRLF file's lines keep their '\r'.
    for line in diff_text.split('\n') {
        if line.starts_with("@@") {
            close_section(&mut sections, &mut current);
            in_hunk = true;
        } else if line.starts_with("diff --git") {
            close_section(&mut sections, &mut current);
            in_hunk = false;
        } else if !in_hunk {
            continue;
        } else if let Some(removed) = line.strip_prefix('-') {
            current.before.push(removed.to_string());
        } else if let Some(added) = line.strip_prefix('+') {
            current.after.push(added.to_string());
        }
    }
    close_section(&mut sections, &mut current);
    sections
}

fn close_section(sections: &mut Vec<DiffSection>, current: &mut DiffSection) {
    if !current.is_empty() {
        sections.push(std::mem::take(current));
    }
}

/// Merge when `gap < 0.2 * total`, compared as `5 * gap < total` to stay in
/// integers. `gap` may be negative.
pub fn should_merge(previous: &DiffSection, next: &DiffSection) -> bool {
    let gap = next.before.len() as i64 - previous.after.len() as i64;
    let total = (previous.line_count() + next.line_count()) as i64;
    5 * gap < total
}

fn merge_adjacent(sections: Vec<DiffSection>) -> Vec<DiffSection> {
    let mut merged: Vec<DiffSection> = Vec::with_capacity(sections.len());
    for section in sections {
        match merged.last_mut() {
            Some(previous) if should_merge(previous, &section) => previous.absorb(section),
            _ => merged.push(section),
        }
    }
    merged
}
