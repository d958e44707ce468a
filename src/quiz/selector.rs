//! Daily quota tracking and priority-weighted item selection
//!
//! Selection is probabilistic on purpose: due items are sampled from a
//! normalized priority distribution rather than picked by argmax, so
//! lower-priority items still surface occasionally. The random source is
//! injected to keep selection deterministic under test.

use chrono::{DateTime, Utc};
use rand::Rng;

use super::models::{Item, QuestionKind};

/// Priority weight per accumulated error
const ERROR_WEIGHT: u32 = 80;
/// Priority weight per overdue day
const OVERDUE_WEIGHT: u32 = 20;
/// Bonus for a never-reviewed item that reached the weighted branch
const NEW_BONUS: u32 = 50;

/// A selected item index with its ephemeral annotations. Neither field is
/// persisted: `overdue_days` feeds the interval engine, `is_burst` tells the
/// session controller whether difficulty counters are exempt.
#[derive(Debug, Clone, Copy)]
pub struct Selected {
    pub index: usize,
    pub overdue_days: u32,
    pub is_burst: bool,
}

/// Count of items answered on `now`'s calendar date
pub fn answered_today(items: &[Item], now: DateTime<Utc>) -> u32 {
    items.iter().filter(|item| item.reviewed_today(now)).count() as u32
}

/// Remaining daily budget, floored at zero for scheduling purposes
pub fn quota_remaining(items: &[Item], daily_max_quota: u32, now: DateTime<Utc>) -> u32 {
    daily_max_quota.saturating_sub(answered_today(items, now))
}

/// Pick the next item to ask, or `None` when the quota is exhausted or
/// nothing is due.
///
/// New items (never reviewed) are sampled uniformly while daily budget
/// remains, bypassing priority weighting to guarantee new-word exposure.
/// Otherwise selection weights due old items by error count, overdue days
/// and a new-item bonus. An empty old pool never falls back to new items.
pub fn select<R: Rng>(
    items: &[Item],
    kind: QuestionKind,
    daily_max_quota: u32,
    burst_mode: bool,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Option<Selected> {
    let usable: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.usable_for(kind))
        .map(|(index, _)| index)
        .collect();
    if usable.is_empty() {
        return None;
    }

    // The quota gate takes precedence over the new-item branch
    if !burst_mode && answered_today(items, now) >= daily_max_quota {
        log::debug!("daily quota of {} reached", daily_max_quota);
        return None;
    }

    let (new_pool, old_pool): (Vec<usize>, Vec<usize>) = usable
        .into_iter()
        .partition(|&index| items[index].is_new());

    let remaining_new_quota = quota_remaining(items, daily_max_quota, now);
    if remaining_new_quota > 0 && !new_pool.is_empty() {
        let index = new_pool[rng.gen_range(0..new_pool.len())];
        return Some(Selected {
            index,
            overdue_days: 0,
            is_burst: burst_mode,
        });
    }

    weighted_due_choice(items, &old_pool, now, burst_mode, rng)
}

fn weighted_due_choice<R: Rng>(
    items: &[Item],
    old_pool: &[usize],
    now: DateTime<Utc>,
    burst_mode: bool,
    rng: &mut R,
) -> Option<Selected> {
    let mut candidates = Vec::new();
    let mut priorities = Vec::new();

    for &index in old_pool {
        let item = &items[index];
        if !item.is_due(now) {
            continue;
        }

        let overdue_days = item.overdue_days(now);
        // A "new" item can still land here when the new-item budget ran out
        let is_new_bonus = if item.is_new() { NEW_BONUS } else { 0 };
        let priority = item.review_count * ERROR_WEIGHT + overdue_days * OVERDUE_WEIGHT + is_new_bonus;

        candidates.push((index, overdue_days));
        priorities.push(priority as f64);
    }

    if candidates.is_empty() {
        return None;
    }

    let total: f64 = priorities.iter().sum();
    let position = if total > 0.0 {
        // Sample the normalized distribution via its cumulative sum
        let mut roll = rng.gen::<f64>() * total;
        let mut chosen = candidates.len() - 1;
        for (position, weight) in priorities.iter().enumerate() {
            if roll < *weight {
                chosen = position;
                break;
            }
            roll -= weight;
        }
        chosen
    } else {
        // All priorities zero: every due item equally likely
        rng.gen_range(0..candidates.len())
    };

    let (index, overdue_days) = candidates[position];
    Some(Selected {
        index,
        overdue_days,
        is_burst: burst_mode,
    })
}
