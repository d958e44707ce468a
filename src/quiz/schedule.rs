//! SM-2 derived interval calculation
//!
//! Conservative variant of the SuperMemo 2 formula. A correct answer on an
//! overdue item earns a capped bonus (late recall is a signal of durable
//! retention), and interval growth is hard-capped at 2x the prior interval.

/// Minimum ease factor allowed
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Maximum ease factor allowed
pub const MAX_EASE_FACTOR: f64 = 2.5;

/// Result of computing the next review schedule
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleResult {
    /// Days until the next review
    pub interval: u32,
    /// Updated ease factor, clamped to [1.3, 2.5]
    pub ease_factor: f64,
}

/// Map (prior interval, ease, answer quality, overdue days) to the next
/// schedule.
///
/// Quality below 3 is a lapse: the interval resets to one day and the ease
/// factor drops by 0.1. Otherwise the ease factor creeps up by 0.02 and the
/// interval grows by `ease * overdue_bonus`, where the bonus is
/// `1 + 0.5 * overdue_days / last_interval` capped at 1.3. Growth never
/// exceeds twice the prior interval.
pub fn next_schedule(
    last_interval: u32,
    ease_factor: f64,
    quality: i32,
    overdue_days: u32,
) -> ScheduleResult {
    if quality < 3 {
        return ScheduleResult {
            interval: 1,
            ease_factor: (ease_factor - 0.1).max(MIN_EASE_FACTOR),
        };
    }

    let ease_factor = (ease_factor + 0.02).min(MAX_EASE_FACTOR);
    let interval = match last_interval {
        0 => 1,
        1 => 3,
        last => {
            let last = last as f64;
            let overdue_bonus = (1.0 + 0.5 * overdue_days as f64 / last).min(1.3);
            let grown = (last * ease_factor * overdue_bonus).min(last * 2.0);
            grown.round() as u32
        }
    };

    ScheduleResult {
        interval,
        ease_factor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_correct_review() {
        let result = next_schedule(0, 2.5, 4, 0);
        assert_eq!(result.interval, 1);
    }

    #[test]
    fn test_second_correct_review_jumps_to_three_days() {
        // last_interval=1, ease=2.5, quality=5, overdue=0
        let result = next_schedule(1, 2.5, 5, 0);
        assert_eq!(result.interval, 3);
        assert_eq!(result.ease_factor, 2.5); // clamped at max
    }

    #[test]
    fn test_lapse_resets_interval_and_drops_ease() {
        // last_interval=10, ease=2.0, quality=1, overdue=5
        let result = next_schedule(10, 2.0, 1, 5);
        assert_eq!(result.interval, 1);
        assert!((result.ease_factor - 1.9).abs() < 1e-9);
    }

    #[test]
    fn test_growth_capped_at_double() {
        for last in [2u32, 5, 10, 40] {
            let result = next_schedule(last, 2.5, 5, 100);
            assert!(result.interval <= last * 2, "interval {} for last {}", result.interval, last);
        }
    }

    #[test]
    fn test_overdue_bonus_is_capped() {
        // Massive overdue: bonus capped at 1.3, growth capped at 2x
        let modest = next_schedule(10, 1.5, 4, 0);
        let overdue = next_schedule(10, 1.5, 4, 4);
        let very_overdue = next_schedule(10, 1.5, 4, 1000);
        assert!(overdue.interval > modest.interval);
        // 10 * 1.52 * 1.3 = 19.76 < 20, so the bonus cap binds before 2x
        assert_eq!(very_overdue.interval, 20);
    }

    #[test]
    fn test_ease_stays_in_bounds() {
        let mut ease = 1.35;
        for _ in 0..10 {
            let result = next_schedule(5, ease, 1, 0);
            assert!(result.ease_factor >= MIN_EASE_FACTOR);
            ease = result.ease_factor;
        }
        let mut ease = 2.48;
        for _ in 0..10 {
            let result = next_schedule(5, ease, 5, 0);
            assert!(result.ease_factor <= MAX_EASE_FACTOR);
            ease = result.ease_factor;
        }
    }
}
