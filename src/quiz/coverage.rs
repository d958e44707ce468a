//! Coverage planning: simulate how many days the current quotas need to
//! touch every not-yet-reviewed item.
//!
//! Pure arithmetic; the CLI animates the resulting day list.

use super::models::Item;

/// Cumulative progress after one simulated day
#[derive(Debug, Clone, PartialEq)]
pub struct DayProgress {
    pub day: u32,
    pub new_done: u64,
    pub old_done: u64,
    pub new_total: u64,
    pub old_total: u64,
    /// Fraction of the remaining pool covered so far, in [0, 1]
    pub percent_done: f64,
    pub remaining_days: u32,
}

/// Simulate day-by-day coverage of the unreviewed pool under the given
/// quotas. Returns an empty plan when everything is already covered or the
/// quotas cannot make progress.
pub fn plan(items: &[Item], daily_max_quota: u32, daily_new_quota: u32) -> Vec<DayProgress> {
    let total = items.len() as u64;
    let already_reviewed = items.iter().filter(|item| item.review_count > 0).count() as u64;
    let remaining = total.saturating_sub(already_reviewed);
    if remaining == 0 {
        return Vec::new();
    }

    let new_total = items.iter().filter(|item| item.review_count == 0).count() as u64;
    let old_total = total - new_total;

    let mut new_done: u64 = 0;
    let mut old_done: u64 = 0;
    let mut days = Vec::new();

    while new_done + old_done < remaining {
        let mut today_new = u64::from(daily_new_quota).min(new_total - new_done);
        let mut today_old =
            u64::from(daily_max_quota).saturating_sub(today_new).min(old_total - old_done);

        // Never overshoot the remaining pool
        let done_so_far = new_done + old_done;
        let today_total = (today_new + today_old).min(remaining - done_so_far);
        if today_total == 0 {
            // Quotas of zero would loop forever
            break;
        }
        if today_total < today_new + today_old {
            let scale = today_total as f64 / (today_new + today_old) as f64;
            today_new = (today_new as f64 * scale) as u64;
            today_old = today_total - today_new;
        }

        new_done += today_new;
        old_done += today_old;

        days.push(DayProgress {
            day: days.len() as u32 + 1,
            new_done,
            old_done,
            new_total,
            old_total,
            percent_done: (new_done + old_done) as f64 / remaining as f64,
            remaining_days: 0,
        });
    }

    let total_days = days.len() as u32;
    for day in &mut days {
        day.remaining_days = total_days.saturating_sub(day.day);
    }
    days
}
