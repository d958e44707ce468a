//! Study statistics derived by scanning the item table

use chrono::{DateTime, Utc};

use super::models::Item;

/// Aggregate progress figures for the whole item pool
#[derive(Debug, Clone, Default)]
pub struct StudyStats {
    pub total_items: usize,
    /// Distinct items reviewed at least once
    pub reviewed_items: usize,
    pub answered_today: usize,
    pub due_now: usize,
    /// Items with no accumulated errors
    pub easy: usize,
    /// Items with 1-2 errors
    pub medium: usize,
    /// Items with 3 or more errors
    pub hard: usize,
}

impl StudyStats {
    /// Fraction of items reviewed at least once, in [0, 1]
    pub fn review_progress(&self) -> f64 {
        if self.total_items == 0 {
            return 0.0;
        }
        self.reviewed_items as f64 / self.total_items as f64
    }
}

/// Scan the item table and collect statistics
pub fn collect(items: &[Item], now: DateTime<Utc>) -> StudyStats {
    let mut stats = StudyStats {
        total_items: items.len(),
        ..StudyStats::default()
    };

    for item in items {
        if item.total_reviews > 0 {
            stats.reviewed_items += 1;
        }
        if item.reviewed_today(now) {
            stats.answered_today += 1;
        }
        if item.is_due(now) {
            stats.due_now += 1;
        }
        match item.review_count {
            0 => stats.easy += 1,
            1..=2 => stats.medium += 1,
            _ => stats.hard += 1,
        }
    }

    stats
}

/// Average error count across the pool, used for the study-load bar
pub fn average_errors(items: &[Item]) -> f64 {
    if items.is_empty() {
        return 0.0;
    }
    let total: u64 = items.iter().map(|item| item.review_count as u64).sum();
    total as f64 / items.len() as f64
}
