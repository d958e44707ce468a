//! Session controller: one question-answer cycle at a time
//!
//! The cycle runs select -> present -> bounded wait -> judge -> update
//! schedule -> report. The only concurrency lives in the bounded wait, where
//! a countdown task and a blocking-read task race through shared flags; both
//! are always awaited to completion before grading, so all item mutation
//! happens single-threaded after the join.

use std::io::{self, BufRead};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration as StdDuration, Instant};

use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::models::{format_timestamp, Item, QuestionKind, Session, MASTERY_STREAK};
use super::selector::{self, Selected};
use super::{judge, schedule, stats};

/// Source of user answers during the awaiting-input phase.
///
/// Reads block; the controller runs them on a blocking task. Errors are
/// treated as an absent answer and never propagate.
pub trait InputSource: Send + Sync {
    fn read_answer(&self) -> io::Result<String>;
}

/// Reads one line from standard input
pub struct StdinInput;

impl InputSource for StdinInput {
    fn read_answer(&self) -> io::Result<String> {
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Side-effecting display capability. The controller reports through it but
/// never depends on it for correctness.
pub trait Presenter: Send + Sync {
    /// A question is being presented with its hint and time limit
    fn question(&self, hint: &str, time_limit: f64);
    /// The countdown elapsed before any input arrived
    fn timed_out(&self);
    fn correct(&self);
    fn incorrect(&self, expected: &str);
    /// The item just hit the mastery streak
    fn mastered(&self);
    /// Reveal answer, sentence and translation after a vocabulary question
    fn reveal(&self, item: &Item);
    /// Difficulty tier, next review date and streak for the graded item
    fn review_outcome(&self, item: &Item);
    /// Average error count across the pool
    fn study_load(&self, average_errors: f64);
    fn session_progress(&self, score: i64, answered: u64, due_now: usize);
    /// Informational message (quota reached, nothing due, ...)
    fn notice(&self, message: &str);
}

/// Result of the bounded answer wait
struct AnswerOutcome {
    /// The captured response; `None` on timeout or read failure
    response: Option<String>,
    /// Response latency in seconds, capped at the time limit
    elapsed: f64,
    timed_out: bool,
}

/// Orchestrates answer cycles over an exclusively owned item table
pub struct SessionController {
    items: Vec<Item>,
    session: Session,
    input: Arc<dyn InputSource>,
    presenter: Arc<dyn Presenter>,
    rng: StdRng,
}

impl SessionController {
    pub fn new(
        items: Vec<Item>,
        session: Session,
        input: Arc<dyn InputSource>,
        presenter: Arc<dyn Presenter>,
    ) -> Self {
        Self::with_rng(items, session, input, presenter, StdRng::from_entropy())
    }

    /// Construct with a seeded generator for deterministic selection
    pub fn with_rng(
        items: Vec<Item>,
        session: Session,
        input: Arc<dyn InputSource>,
        presenter: Arc<dyn Presenter>,
        rng: StdRng,
    ) -> Self {
        Self {
            items,
            session,
            input,
            presenter,
            rng,
        }
    }

    /// Read-only view of the item table, for persistence and statistics
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Toggle burst mode; returns the new state
    pub fn toggle_burst_mode(&mut self) -> bool {
        self.session.burst_mode = !self.session.burst_mode;
        self.session.burst_mode
    }

    pub fn set_daily_max_quota(&mut self, quota: u32) {
        self.session.daily_max_quota = quota;
    }

    pub fn set_daily_new_quota(&mut self, quota: u32) {
        self.session.daily_new_quota = quota;
    }

    /// Run one answer cycle for the given question kind. Returns false when
    /// the daily quota is exhausted or nothing is due.
    pub async fn ask(&mut self, kind: QuestionKind) -> bool {
        let now = Utc::now();
        if !self.session.burst_mode
            && selector::answered_today(&self.items, now) >= self.session.daily_max_quota
        {
            self.presenter.notice(&format!(
                "Daily review quota reached ({} questions). Come back tomorrow.",
                self.session.daily_max_quota
            ));
            return false;
        }

        let selected = match selector::select(
            &self.items,
            kind,
            self.session.daily_max_quota,
            self.session.burst_mode,
            now,
            &mut self.rng,
        ) {
            Some(selected) => selected,
            None => {
                self.presenter
                    .notice("Nothing is due for this question type right now.");
                return false;
            }
        };

        self.run_cycle(kind, selected).await;
        true
    }

    async fn run_cycle(&mut self, kind: QuestionKind, selected: Selected) {
        let hint = kind.hint(&self.items[selected.index]);
        self.presenter.question(&hint, self.session.time_limit);

        let outcome = self.await_answer().await;
        let quality = self.grade(kind, selected, &outcome);
        self.reschedule(selected, quality);
        self.session.answered_questions += 1;

        let item = &self.items[selected.index];
        if kind == QuestionKind::Vocabulary {
            self.presenter.reveal(item);
        }
        self.presenter.review_outcome(item);
        if !self.session.burst_mode {
            self.presenter.study_load(stats::average_errors(&self.items));
        }

        let now = Utc::now();
        let due_now = self.items.iter().filter(|i| i.is_due(now)).count();
        self.presenter.session_progress(
            self.session.score,
            self.session.answered_questions,
            due_now,
        );
    }

    /// Bounded wait for a response: a countdown task and a blocking-read
    /// task race through an `input_received` flag. The countdown only flags
    /// the timeout; it never touches item or session state. Both tasks are
    /// joined before this returns, and a read that finishes after the
    /// deadline is simply ignored.
    async fn await_answer(&self) -> AnswerOutcome {
        let limit = self.session.time_limit;
        let received = Arc::new(AtomicBool::new(false));
        let start = Instant::now();

        let timer = tokio::spawn({
            let received = Arc::clone(&received);
            let presenter = Arc::clone(&self.presenter);
            async move {
                let mut elapsed = 0.0_f64;
                while elapsed < limit {
                    let step = (limit - elapsed).min(1.0);
                    tokio::time::sleep(StdDuration::from_secs_f64(step)).await;
                    elapsed += step;
                }
                if received.load(Ordering::SeqCst) {
                    false
                } else {
                    presenter.timed_out();
                    true
                }
            }
        });

        let reader = tokio::task::spawn_blocking({
            let input = Arc::clone(&self.input);
            let received = Arc::clone(&received);
            move || match input.read_answer() {
                Ok(line) => {
                    received.store(true, Ordering::SeqCst);
                    Some(line)
                }
                Err(error) => {
                    log::warn!("failed to capture answer: {}", error);
                    None
                }
            }
        });

        let response = reader.await.unwrap_or(None);
        let elapsed = start.elapsed().as_secs_f64().min(limit);
        let timed_out = timer.await.unwrap_or(false);

        AnswerOutcome {
            response: if timed_out { None } else { response },
            elapsed,
            timed_out,
        }
    }

    /// Apply score and difficulty-counter mutations and compute the quality
    /// score for the interval engine. Difficulty counters are exempt in
    /// burst mode; score always moves.
    fn grade(&mut self, kind: QuestionKind, selected: Selected, outcome: &AnswerOutcome) -> i32 {
        let expected = kind.answer(&self.items[selected.index]).to_string();
        let response = outcome.response.clone().unwrap_or_default();

        let correct = !outcome.timed_out && judge::is_correct(&response, &expected);
        if correct {
            self.session.score += 10;
            self.presenter.correct();
            if !selected.is_burst {
                let item = &mut self.items[selected.index];
                item.consecutive_correct += 1;
                if item.consecutive_correct >= MASTERY_STREAK {
                    // Mastery: both counters reset in the same transition
                    item.review_count = 0;
                    item.consecutive_correct = 0;
                    self.presenter.mastered();
                }
            }
        } else {
            self.session.score -= 5;
            self.presenter.incorrect(&expected);
            if !selected.is_burst {
                let item = &mut self.items[selected.index];
                item.review_count += 1;
                item.consecutive_correct = 0;
            }
        }

        judge::score(&response, &expected, outcome.elapsed, self.session.time_limit)
    }

    /// Write the new schedule back. Runs unconditionally: burst mode exempts
    /// difficulty counters, not scheduling.
    fn reschedule(&mut self, selected: Selected, quality: i32) {
        let now = Utc::now();
        let item = &mut self.items[selected.index];
        let result = schedule::next_schedule(
            item.review_interval,
            item.ease_factor,
            quality,
            selected.overdue_days,
        );

        item.review_interval = result.interval;
        item.ease_factor = result.ease_factor;
        item.next_review_at = format_timestamp(now + Duration::days(result.interval as i64));
        item.last_reviewed_at = format_timestamp(now);
        item.total_reviews += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::models::parse_timestamp;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays scripted answers with optional latency
    struct ScriptedInput {
        answers: Mutex<VecDeque<(u64, io::Result<String>)>>,
    }

    impl ScriptedInput {
        fn new(answers: Vec<(u64, io::Result<String>)>) -> Arc<Self> {
            Arc::new(Self {
                answers: Mutex::new(answers.into()),
            })
        }

        fn answer(text: &str) -> Arc<Self> {
            Self::new(vec![(0, Ok(text.to_string()))])
        }
    }

    impl InputSource for ScriptedInput {
        fn read_answer(&self) -> io::Result<String> {
            let (delay_ms, result) = self
                .answers
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or((0, Ok(String::new())));
            std::thread::sleep(StdDuration::from_millis(delay_ms));
            result
        }
    }

    struct SilentPresenter;

    impl Presenter for SilentPresenter {
        fn question(&self, _: &str, _: f64) {}
        fn timed_out(&self) {}
        fn correct(&self) {}
        fn incorrect(&self, _: &str) {}
        fn mastered(&self) {}
        fn reveal(&self, _: &Item) {}
        fn review_outcome(&self, _: &Item) {}
        fn study_load(&self, _: f64) {}
        fn session_progress(&self, _: i64, _: u64, _: usize) {}
        fn notice(&self, _: &str) {}
    }

    fn voc_item(word: &str) -> Item {
        Item {
            voc: word.to_string(),
            sentence: "s".to_string(),
            translation: "t".to_string(),
            memorize: "m".to_string(),
            ..Item::default()
        }
    }

    fn controller(
        items: Vec<Item>,
        session: Session,
        input: Arc<dyn InputSource>,
    ) -> SessionController {
        SessionController::with_rng(
            items,
            session,
            input,
            Arc::new(SilentPresenter),
            StdRng::seed_from_u64(11),
        )
    }

    fn fast_session() -> Session {
        Session {
            time_limit: 0.2,
            ..Session::default()
        }
    }

    #[tokio::test]
    async fn test_correct_answer_cycle() {
        let mut controller = controller(
            vec![voc_item("run")],
            fast_session(),
            ScriptedInput::answer("run"),
        );

        assert!(controller.ask(QuestionKind::Vocabulary).await);

        let item = &controller.items()[0];
        assert_eq!(controller.session().score, 10);
        assert_eq!(item.consecutive_correct, 1);
        assert_eq!(item.review_count, 0);
        assert_eq!(item.total_reviews, 1);
        assert_eq!(item.review_interval, 1);
        assert!(parse_timestamp(&item.next_review_at).unwrap() > Utc::now());
        assert!(item.ease_factor <= 2.5 && item.ease_factor >= 1.3);
    }

    #[tokio::test]
    async fn test_timeout_counts_as_miss() {
        // Correct text, but it arrives after the deadline: still a timeout
        let input = ScriptedInput::new(vec![(450, Ok("run".to_string()))]);
        let mut controller = controller(vec![voc_item("run")], fast_session(), input);

        assert!(controller.ask(QuestionKind::Vocabulary).await);

        let item = &controller.items()[0];
        assert_eq!(controller.session().score, -5);
        assert_eq!(item.review_count, 1);
        assert_eq!(item.consecutive_correct, 0);
        assert_eq!(item.total_reviews, 1);
        assert!(parse_timestamp(&item.next_review_at).unwrap() > Utc::now());
    }

    #[tokio::test]
    async fn test_read_failure_is_an_absent_answer() {
        let input = ScriptedInput::new(vec![(
            0,
            Err(io::Error::new(io::ErrorKind::Other, "closed")),
        )]);
        let mut controller = controller(vec![voc_item("run")], fast_session(), input);

        assert!(controller.ask(QuestionKind::Vocabulary).await);

        let item = &controller.items()[0];
        assert_eq!(item.total_reviews, 1);
        assert_eq!(item.review_count, 1);
    }

    #[tokio::test]
    async fn test_mastery_resets_both_counters() {
        let mut item = voc_item("run");
        item.consecutive_correct = 2;
        item.review_count = 4;
        item.last_reviewed_at = "2024-01-01 10:00:00".to_string();
        let mut controller =
            controller(vec![item], fast_session(), ScriptedInput::answer("run"));

        assert!(controller.ask(QuestionKind::Vocabulary).await);

        let item = &controller.items()[0];
        assert_eq!(item.review_count, 0);
        assert_eq!(item.consecutive_correct, 0);
    }

    #[tokio::test]
    async fn test_burst_mode_exempts_difficulty_counters_only() {
        let mut item = voc_item("run");
        item.review_count = 2;
        item.last_reviewed_at = "2024-01-01 10:00:00".to_string();
        let mut session = fast_session();
        session.burst_mode = true;
        let mut controller = controller(vec![item], session, ScriptedInput::answer("nope"));

        assert!(controller.ask(QuestionKind::Vocabulary).await);

        let item = &controller.items()[0];
        // Counters untouched, schedule and score still updated
        assert_eq!(item.review_count, 2);
        assert_eq!(item.consecutive_correct, 0);
        assert_eq!(item.total_reviews, 1);
        assert_eq!(controller.session().score, -5);
        assert!(!item.next_review_at.is_empty());
    }

    #[tokio::test]
    async fn test_quota_exhaustion_blocks_selection() {
        let mut session = fast_session();
        session.daily_max_quota = 0;
        let mut controller = controller(
            vec![voc_item("run")],
            session,
            ScriptedInput::answer("run"),
        );

        assert!(!controller.ask(QuestionKind::Vocabulary).await);
        assert_eq!(controller.items()[0].total_reviews, 0);
    }
}
