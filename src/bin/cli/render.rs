use std::io::Write;

use recall_lib::quiz::coverage::DayProgress;
use recall_lib::quiz::models::difficulty_label;
use recall_lib::quiz::{Item, Presenter};

/// ANSI color codes
#[allow(dead_code)]
pub struct Color;

#[allow(dead_code)]
impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";
}

const BAR_LENGTH: usize = 30;

/// Renders session events as colored terminal output
pub struct TerminalPresenter {
    use_color: bool,
}

impl TerminalPresenter {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.use_color {
            format!("{}{}{}", color, text, Color::RESET)
        } else {
            text.to_string()
        }
    }
}

impl Presenter for TerminalPresenter {
    fn question(&self, hint: &str, time_limit: f64) {
        println!("\nHint: {} (time limit {:.0}s)", hint, time_limit);
        print!("\nYour answer: ");
        let _ = std::io::stdout().flush();
    }

    fn timed_out(&self) {
        println!("\n{}", self.paint(Color::RED, "Time's up!"));
    }

    fn correct(&self) {
        println!("{}", self.paint(Color::GREEN, "Correct!"));
    }

    fn incorrect(&self, expected: &str) {
        println!(
            "{} The answer is: {}",
            self.paint(Color::RED, "Wrong!"),
            expected
        );
    }

    fn mastered(&self) {
        println!("{}", self.paint(Color::CYAN, "Nice! This one is mastered."));
    }

    fn reveal(&self, item: &Item) {
        println!("\nAnswer: {}", item.voc);
        println!("Sentence: {}", item.sentence);
        println!("Translation: {}", item.translation);
    }

    fn review_outcome(&self, item: &Item) {
        println!(
            "Difficulty: {} ({} errors)",
            difficulty_label(item.review_count),
            item.review_count
        );
        println!(
            "Next review: {} (in {} days)",
            item.next_review_at, item.review_interval
        );
        if item.consecutive_correct > 0 {
            println!("Streak: {} correct in a row", item.consecutive_correct);
        }
    }

    fn study_load(&self, average_errors: f64) {
        const MAX_ERRORS: f64 = 10.0;
        let ratio = (average_errors / MAX_ERRORS).min(1.0);
        let filled = (BAR_LENGTH as f64 * ratio) as usize;
        let bar: String = "█".repeat(filled) + &"-".repeat(BAR_LENGTH - filled);
        println!(
            "Study load: |{}| {:.2} average errors",
            self.paint(Color::YELLOW, &bar),
            average_errors
        );
    }

    fn session_progress(&self, score: i64, answered: u64, due_now: usize) {
        println!("\nScore: {}, questions answered: {}", score, answered);
        println!("Items due for review: {}\n", due_now);
    }

    fn notice(&self, message: &str) {
        println!("\n{}", message);
    }
}

/// Draw one smoothed frame of the coverage progress bar in place
pub fn draw_coverage_bar(percent: f64, day: &DayProgress, use_color: bool) {
    let filled = (BAR_LENGTH as f64 * percent) as usize;
    let bar: String = "█".repeat(filled) + &"░".repeat(BAR_LENGTH - filled);

    let color = if !use_color {
        ""
    } else if percent < 0.3 {
        Color::RED
    } else if percent < 0.7 {
        Color::YELLOW
    } else {
        Color::GREEN
    };
    let reset = if use_color { Color::RESET } else { "" };

    print!(
        "\r{}[{}] {:6.2}% (new {}/{}, old {}/{}) days left: {}{}",
        color,
        bar,
        percent * 100.0,
        day.new_done,
        day.new_total,
        day.old_done,
        day.old_total,
        day.remaining_days,
        reset
    );
    let _ = std::io::stdout().flush();
}
