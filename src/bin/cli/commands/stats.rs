use chrono::Utc;

use recall_lib::quiz::stats::collect;
use recall_lib::quiz::Item;

use crate::render::Color;

/// Print the study statistics block
pub fn show(items: &[Item], use_color: bool) {
    let stats = collect(items, Utc::now());

    let (bold, reset) = if use_color {
        (Color::BOLD, Color::RESET)
    } else {
        ("", "")
    };

    println!("\n{}=== Study statistics ==={}", bold, reset);
    println!("Total items: {}", stats.total_items);
    println!("Items reviewed at least once: {}", stats.reviewed_items);
    println!("Review progress: {:.1}%", stats.review_progress() * 100.0);
    println!("Answered today: {}", stats.answered_today);
    println!("Due now: {}", stats.due_now);

    println!("\nDifficulty distribution (by error count):");
    println!("  easy   (mastered):   {}", stats.easy);
    println!("  medium (1-2 errors): {}", stats.medium);
    println!("  hard   (3+ errors):  {}", stats.hard);
}
