use std::time::Duration;

use recall_lib::quiz::coverage;
use recall_lib::quiz::{Item, Session};

use crate::render::draw_coverage_bar;

const ANIMATION_STEPS: u32 = 10;
const STEP_DELAY: Duration = Duration::from_millis(50);

/// Animate the day-by-day coverage simulation under the current quotas
pub fn run(items: &[Item], session: &Session, use_color: bool) {
    let days = coverage::plan(items, session.daily_max_quota, session.daily_new_quota);
    if days.is_empty() {
        println!("\nEvery item is already covered!");
        return;
    }

    println!(
        "\nTotal items: {}, daily cap: {}, new per day: {}",
        items.len(),
        session.daily_max_quota,
        session.daily_new_quota
    );
    println!("Days needed to cover the pool: {}\n", days.len());

    let mut previous = 0.0;
    for day in &days {
        for step in 1..=ANIMATION_STEPS {
            let percent =
                previous + (day.percent_done - previous) * step as f64 / ANIMATION_STEPS as f64;
            draw_coverage_bar(percent, day, use_color);
            std::thread::sleep(STEP_DELAY);
        }
        previous = day.percent_done;
    }

    // Land exactly on 100%
    if let Some(last) = days.last() {
        let mut done = last.clone();
        done.remaining_days = 0;
        draw_coverage_bar(1.0, &done, use_color);
    }
    println!("\nSimulation complete!");
}
