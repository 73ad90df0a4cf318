//! Longest run of in-diet meals eaten within a day of each other.
//!
//! The input must be sorted by `eaten_at` ascending. Each meal after the first
//! extends the running streak when it is in-diet and no more than 24 hours away
//! from the meal before it; anything else resets the run to zero. Only the later
//! meal's flag is checked, so the first meal never counts on its own and a
//! non-diet meal can still be the predecessor of a streak step.

use crate::meals::repo_types::MealMark;

const WINDOW_MS: i128 = 24 * 60 * 60 * 1000;

pub fn best_streak(meals: &[MealMark]) -> u32 {
    let mut count = 0u32;
    let mut best = 0u32;

    for pair in meals.windows(2) {
        let (prev, cur) = (&pair[0], &pair[1]);
        let gap_ms = (cur.eaten_at - prev.eaten_at).whole_milliseconds().abs();

        if gap_ms <= WINDOW_MS && cur.in_diet {
            count += 1;
            best = best.max(count);
        } else {
            count = 0;
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{macros::datetime, Duration, OffsetDateTime};

    const T0: OffsetDateTime = datetime!(2024-03-01 08:00 UTC);

    fn mark(hours: i64, in_diet: bool) -> MealMark {
        MealMark {
            eaten_at: T0 + Duration::hours(hours),
            in_diet,
        }
    }

    #[test]
    fn empty_and_single_meal_have_no_streak() {
        assert_eq!(best_streak(&[]), 0);
        assert_eq!(best_streak(&[mark(0, true)]), 0);
        assert_eq!(best_streak(&[mark(0, false)]), 0);
    }

    #[test]
    fn gap_beyond_a_day_breaks_the_run() {
        let meals = [mark(0, false), mark(1, true), mark(2, true), mark(30, true)];
        assert_eq!(best_streak(&meals), 2);
    }

    #[test]
    fn all_close_and_in_diet_counts_every_step() {
        for n in 2..8 {
            let meals: Vec<_> = (0..n).map(|h| mark(h, true)).collect();
            assert_eq!(best_streak(&meals), (n - 1) as u32);
        }
    }

    #[test]
    fn off_diet_meal_resets_even_when_close() {
        let meals = [
            mark(0, true),
            mark(1, true),
            mark(2, true),
            mark(3, false),
            mark(4, true),
        ];
        assert_eq!(best_streak(&meals), 2);
    }

    #[test]
    fn earlier_meal_flag_is_not_inspected() {
        let meals = [mark(0, false), mark(1, true)];
        assert_eq!(best_streak(&meals), 1);
    }

    #[test]
    fn exactly_twenty_four_hours_is_inside_the_window() {
        assert_eq!(best_streak(&[mark(0, true), mark(24, true)]), 1);

        let just_over = MealMark {
            eaten_at: T0 + Duration::hours(24) + Duration::milliseconds(1),
            in_diet: true,
        };
        assert_eq!(best_streak(&[mark(0, true), just_over]), 0);
    }

    #[test]
    fn keeps_the_best_run_not_the_last() {
        let meals = [
            mark(0, true),
            mark(1, true),
            mark(2, true),
            mark(3, true),
            mark(100, true),
            mark(101, true),
        ];
        assert_eq!(best_streak(&meals), 3);
    }

    #[test]
    fn reset_is_to_zero_not_a_decrement() {
        let meals = [
            mark(0, true),
            mark(1, true),
            mark(2, true),
            mark(50, true),
            mark(51, true),
            mark(52, true),
        ];
        assert_eq!(best_streak(&meals), 2);
    }
}
