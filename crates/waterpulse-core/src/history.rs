//! Reading history
//!
//! Bounded list of recent quality scores for the pulse-screen trend chart.

use serde::Serialize;
use std::collections::VecDeque;

use crate::quality::{classify, QualityBand};

/// Number of readings the trend chart shows
pub const DEFAULT_HISTORY_CAPACITY: usize = 12;

/// History the pulse screen starts with before any live reading, newest first
pub const SEED_HISTORY: [u8; DEFAULT_HISTORY_CAPACITY] =
    [80, 60, 30, 35, 75, 85, 70, 60, 25, 30, 80, 85];

/// One column of the trend chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartBar {
    /// Score 0-100
    pub score: u8,
    /// Band the score falls in
    pub band: QualityBand,
    /// Empty space above the point, percent of chart height
    pub top_gap_percent: u8,
}

/// Fixed-capacity history, newest first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadingHistory {
    entries: VecDeque<u8>,
    capacity: usize,
}

impl ReadingHistory {
    /// Create an empty history. A zero capacity is raised to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// History pre-filled with [`SEED_HISTORY`], truncated to `capacity`
    pub fn seeded(capacity: usize) -> Self {
        let mut history = Self::new(capacity);
        history
            .entries
            .extend(SEED_HISTORY.iter().copied().take(history.capacity));
        history
    }

    /// Convert a normalized reading to the stored whole-number score
    pub fn score_of(normalized: f64) -> u8 {
        (crate::geometry::clamp_unit(normalized) * 100.0).round() as u8
    }

    /// Record a score (clamped to 100) as the newest entry, evicting the
    /// oldest when full
    pub fn push(&mut self, score: u8) {
        self.entries.push_front(score.min(100));
        while self.entries.len() > self.capacity {
            self.entries.pop_back();
        }
    }

    /// Newest score
    pub fn latest(&self) -> Option<u8> {
        self.entries.front().copied()
    }

    /// Number of stored scores
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of scores kept
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Scores newest first
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.entries.iter().copied()
    }

    /// Scores oldest first, the order the chart draws them left to right
    pub fn chronological(&self) -> impl Iterator<Item = u8> + '_ {
        self.entries.iter().rev().copied()
    }

    /// Chart columns, oldest first
    pub fn chart_bars(&self) -> Vec<ChartBar> {
        self.chronological()
            .map(|score| ChartBar {
                score,
                band: classify(score as f64),
                top_gap_percent: 100 - score,
            })
            .collect()
    }

    /// Drop all scores
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for ReadingHistory {
    fn default() -> Self {
        Self::seeded(DEFAULT_HISTORY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_newest_first() {
        let mut history = ReadingHistory::new(3);
        history.push(10);
        history.push(20);
        assert_eq!(history.iter().collect::<Vec<_>>(), vec![20, 10]);
        assert_eq!(history.latest(), Some(20));
    }

    #[test]
    fn test_eviction() {
        let mut history = ReadingHistory::new(3);
        for score in [1, 2, 3, 4] {
            history.push(score);
        }
        assert_eq!(history.iter().collect::<Vec<_>>(), vec![4, 3, 2]);
    }

    #[test]
    fn test_seeded() {
        let history = ReadingHistory::default();
        assert_eq!(history.len(), 12);
        assert_eq!(history.latest(), Some(80));
        assert_eq!(history.chronological().next(), Some(85));

        let short = ReadingHistory::seeded(4);
        assert_eq!(short.iter().collect::<Vec<_>>(), vec![80, 60, 30, 35]);
    }

    #[test]
    fn test_score_of() {
        assert_eq!(ReadingHistory::score_of(0.694), 69);
        assert_eq!(ReadingHistory::score_of(0.696), 70);
        assert_eq!(ReadingHistory::score_of(1.7), 100);
        assert_eq!(ReadingHistory::score_of(-1.0), 0);
    }

    #[test]
    fn test_chart_bars() {
        let mut history = ReadingHistory::new(2);
        history.push(25);
        history.push(75);
        let bars = history.chart_bars();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].score, 25);
        assert_eq!(bars[0].band, QualityBand::Poor);
        assert_eq!(bars[0].top_gap_percent, 75);
        assert_eq!(bars[1].band, QualityBand::Good);
    }

    #[test]
    fn test_zero_capacity_raised() {
        let mut history = ReadingHistory::new(0);
        history.push(5);
        history.push(6);
        assert_eq!(history.capacity(), 1);
        assert_eq!(history.latest(), Some(6));
        assert_eq!(history.len(), 1);
    }
}
