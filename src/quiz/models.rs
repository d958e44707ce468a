//! Data models for the review trainer

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp format used in the persisted item table
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Answer streak length that marks an item as mastered
pub const MASTERY_STREAK: u32 = 3;

/// Which side of an item a question drills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuestionKind {
    /// Ask for the word root given its meaning
    Root,
    /// Ask for the vocabulary word given the memorize hint and translation
    Vocabulary,
}

impl QuestionKind {
    /// The expected answer for an item under this question kind
    pub fn answer<'a>(&self, item: &'a Item) -> &'a str {
        match self {
            Self::Root => &item.root,
            Self::Vocabulary => &item.voc,
        }
    }

    /// Build the hint shown before the timed answer phase
    pub fn hint(&self, item: &Item) -> String {
        match self {
            Self::Root => format!("Meaning: {}", item.meaning),
            Self::Vocabulary => {
                format!("{}\nTranslation: {}", item.memorize, item.translation)
            }
        }
    }
}

/// One study unit with its review state.
///
/// Content fields are immutable once loaded (case folding happens only at
/// comparison time). Review-state fields are owned by the session controller
/// and backfilled with defaults when absent from the persisted table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(default)]
    pub root: String,
    #[serde(default)]
    pub meaning: String,
    #[serde(default)]
    pub voc: String,
    #[serde(default)]
    pub memorize: String,
    #[serde(default)]
    pub sentence: String,
    #[serde(default)]
    pub translation: String,

    /// When the item is next due; empty means never scheduled (due now)
    #[serde(default)]
    pub next_review_at: String,
    /// Current interval in days
    #[serde(default)]
    pub review_interval: u32,
    /// Incorrect/timeout outcomes since the last mastery reset
    #[serde(default)]
    pub review_count: u32,
    /// Correct-answer streak since the last reset
    #[serde(default)]
    pub consecutive_correct: u32,
    /// When the item was last answered; empty means never
    #[serde(default)]
    pub last_reviewed_at: String,
    /// Lifetime answer count, bumped once per completed cycle
    #[serde(default)]
    pub total_reviews: u64,
    /// SM-2 ease factor, clamped to [1.3, 2.5]
    #[serde(default = "default_ease_factor")]
    pub ease_factor: f64,
}

fn default_ease_factor() -> f64 {
    2.5
}

impl Default for Item {
    fn default() -> Self {
        Self {
            root: String::new(),
            meaning: String::new(),
            voc: String::new(),
            memorize: String::new(),
            sentence: String::new(),
            translation: String::new(),
            next_review_at: String::new(),
            review_interval: 0,
            review_count: 0,
            consecutive_correct: 0,
            last_reviewed_at: String::new(),
            total_reviews: 0,
            ease_factor: default_ease_factor(),
        }
    }
}

impl Item {
    /// Whether all fields required by `kind` are populated.
    /// Items failing this check are excluded from selection and never mutated.
    pub fn usable_for(&self, kind: QuestionKind) -> bool {
        match kind {
            QuestionKind::Root => !self.root.is_empty() && !self.meaning.is_empty(),
            QuestionKind::Vocabulary => {
                !self.voc.is_empty()
                    && !self.sentence.is_empty()
                    && !self.translation.is_empty()
                    && !self.memorize.is_empty()
            }
        }
    }

    /// A never-reviewed item
    pub fn is_new(&self) -> bool {
        self.review_count == 0 && self.last_reviewed_at.is_empty()
    }

    /// Scheduled review time, if one is set and parseable
    pub fn next_review(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.next_review_at)
    }

    /// Due when never scheduled, when the timestamp is unparseable, or when
    /// the scheduled time has passed.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        match self.next_review() {
            Some(due) => due <= now,
            None => true,
        }
    }

    /// Whole days the item is past its scheduled review (0 if not overdue
    /// or never scheduled)
    pub fn overdue_days(&self, now: DateTime<Utc>) -> u32 {
        match self.next_review() {
            Some(due) if due <= now => (now - due).num_days().max(0) as u32,
            _ => 0,
        }
    }

    /// Whether the item was answered on `now`'s calendar date
    pub fn reviewed_today(&self, now: DateTime<Utc>) -> bool {
        let today = now.format("%Y-%m-%d").to_string();
        self.last_reviewed_at.starts_with(&today)
    }
}

/// Difficulty tier derived from the error count
pub fn difficulty_label(review_count: u32) -> &'static str {
    match review_count {
        0 => "easy",
        1..=2 => "medium",
        _ => "hard",
    }
}

/// Parse a persisted timestamp. Returns `None` for empty or malformed
/// strings, which callers treat as "due now".
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Format a timestamp for the persisted table
pub fn format_timestamp(moment: DateTime<Utc>) -> String {
    moment.format(TIMESTAMP_FORMAT).to_string()
}

/// Transient per-session state. Only item review state is persisted.
#[derive(Debug, Clone)]
pub struct Session {
    pub score: i64,
    pub answered_questions: u64,
    /// Disables quota enforcement and difficulty-counter mutation
    pub burst_mode: bool,
    /// Daily cap on answered questions
    pub daily_max_quota: u32,
    /// Target minimum of never-reviewed items per day (coverage planning)
    pub daily_new_quota: u32,
    /// Answer time limit in seconds
    pub time_limit: f64,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            score: 0,
            answered_questions: 0,
            burst_mode: false,
            daily_max_quota: 150,
            daily_new_quota: 50,
            time_limit: 5.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn voc_item(word: &str) -> Item {
        Item {
            voc: word.to_string(),
            sentence: "An example sentence.".to_string(),
            translation: "翻譯".to_string(),
            memorize: "a hint".to_string(),
            ..Item::default()
        }
    }

    #[test]
    fn test_usable_for_requires_all_fields() {
        let mut item = voc_item("run");
        assert!(item.usable_for(QuestionKind::Vocabulary));
        assert!(!item.usable_for(QuestionKind::Root));

        item.translation.clear();
        assert!(!item.usable_for(QuestionKind::Vocabulary));

        item.root = "curr".to_string();
        item.meaning = "to run".to_string();
        assert!(item.usable_for(QuestionKind::Root));
    }

    #[test]
    fn test_unparseable_timestamp_means_due_now() {
        let now = Utc::now();
        let mut item = voc_item("run");
        item.next_review_at = "not a date".to_string();
        assert!(item.is_due(now));
        assert_eq!(item.overdue_days(now), 0);
    }

    #[test]
    fn test_overdue_days() {
        let now = Utc::now();
        let mut item = voc_item("run");
        item.next_review_at = format_timestamp(now - Duration::days(4));
        assert!(item.is_due(now));
        assert_eq!(item.overdue_days(now), 4);

        item.next_review_at = format_timestamp(now + Duration::days(2));
        assert!(!item.is_due(now));
        assert_eq!(item.overdue_days(now), 0);
    }

    #[test]
    fn test_serde_backfills_review_state() {
        let item: Item = serde_json::from_str(r#"{"voc": "run"}"#).unwrap();
        assert_eq!(item.ease_factor, 2.5);
        assert_eq!(item.review_interval, 0);
        assert_eq!(item.total_reviews, 0);
        assert!(item.next_review_at.is_empty());
        assert!(item.is_new());
    }
}
