//! Class-conflict detection over existing calendar events.
//!
//! An event counts as a fitness class when its title contains any marker
//! substring (case-insensitive). Matching is substring-based on purpose, to
//! tolerate studio naming variants. Titles in the generated-event namespace
//! are skipped first so regenerated workout events can never be
//! misclassified as classes.

use crate::types::ExistingEvent;
use chrono::{NaiveDate, NaiveDateTime};

/// Start/end window of one detected class
#[derive(Clone, Debug, PartialEq)]
pub struct ClassWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Title classifier with injectable marker sets
#[derive(Clone, Debug)]
pub struct ClassMatcher {
    /// Lowercased substrings that mark a class
    patterns: Vec<String>,
    /// Lowercased substrings of our own generated titles, checked first
    own_markers: Vec<String>,
}

impl Default for ClassMatcher {
    fn default() -> Self {
        Self::new(
            crate::config::CalendarConfig::default().class_markers,
            crate::plan::default_plan().generated_title_markers(),
        )
    }
}

impl ClassMatcher {
    /// Build a matcher from class markers and the generated-title namespace
    pub fn new(patterns: Vec<String>, own_markers: Vec<String>) -> Self {
        Self {
            patterns: patterns.iter().map(|p| p.to_lowercase()).collect(),
            own_markers: own_markers.iter().map(|m| m.to_lowercase()).collect(),
        }
    }

    /// True if the title would be classified as a class
    pub fn title_is_class(&self, title: &str) -> bool {
        let title = title.to_lowercase();

        // Our own generated events are never classes
        if self.own_markers.iter().any(|m| title.contains(m)) {
            return false;
        }

        self.patterns.iter().any(|p| title.contains(p))
    }

    /// Class windows for one calendar day, sorted by start time
    pub fn classes_on(&self, day: NaiveDate, events: &[ExistingEvent]) -> Vec<ClassWindow> {
        let mut windows: Vec<ClassWindow> = events
            .iter()
            .filter(|e| e.start.date() == day && self.title_is_class(&e.title))
            .map(|e| ClassWindow {
                start: e.start,
                end: e.end,
            })
            .collect();

        windows.sort_by_key(|w| w.start);

        if !windows.is_empty() {
            tracing::debug!("{} class(es) detected on {}", windows.len(), day);
        }

        windows
    }
}

/// Latest ending time among a day's classes.
///
/// Tie-break for days with more than one class: the workout is scheduled
/// after all of them, anchored on the latest end.
pub fn latest_end(windows: &[ClassWindow]) -> Option<NaiveDateTime> {
    windows.iter().map(|w| w.end).max()
}
