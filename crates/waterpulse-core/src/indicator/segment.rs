//! Segments of the tab bar

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::IndicatorError;

/// Definition of a tab as it appears in configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabDefinition {
    /// Stable route key
    pub key: String,
    /// Label shown while the tab is focused
    pub label: String,
}

impl TabDefinition {
    /// Create a tab definition
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

/// The app's bottom navigation: home, pulse, report, profile
pub fn default_tabs() -> Vec<TabDefinition> {
    vec![
        TabDefinition::new("home", "Home"),
        TabDefinition::new("pulse", "Pulse"),
        TabDefinition::new("report", "Report"),
        TabDefinition::new("profile", "Profile"),
    ]
}

/// One selectable entry of a segmented control
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    /// Stable route key
    pub key: String,
    /// Display label
    pub label: String,
    /// Zero-based position
    pub index: usize,
}

/// Fixed, ordered, non-empty list of segments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentList {
    segments: Vec<Segment>,
}

impl SegmentList {
    /// Build the list, assigning positions in order.
    ///
    /// Fails on an empty list, a blank key or a repeated key.
    pub fn new(definitions: &[TabDefinition]) -> Result<Self, IndicatorError> {
        if definitions.is_empty() {
            return Err(IndicatorError::EmptySegments);
        }

        let mut seen = HashSet::new();
        let mut segments = Vec::with_capacity(definitions.len());
        for (index, def) in definitions.iter().enumerate() {
            if def.key.trim().is_empty() {
                return Err(IndicatorError::BlankKey(index));
            }
            if !seen.insert(def.key.as_str()) {
                return Err(IndicatorError::DuplicateKey(def.key.clone()));
            }
            segments.push(Segment {
                key: def.key.clone(),
                label: def.label.clone(),
                index,
            });
        }

        Ok(Self { segments })
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Never true for a constructed list
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segment at `index`
    pub fn get(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    /// Segments as a slice
    pub fn as_slice(&self) -> &[Segment] {
        &self.segments
    }

    /// Segments in order
    pub fn iter(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    /// Position of the segment with `key`
    pub fn position(&self, key: &str) -> Option<usize> {
        self.segments.iter().position(|s| s.key == key)
    }

    /// Nearest valid index
    pub fn clamp_index(&self, index: usize) -> usize {
        index.min(self.segments.len() - 1)
    }
}
