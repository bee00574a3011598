//! Aggregation over the meal log: per-day totals and the goal streak.
//! Pure functions; the handlers only fetch rows and format responses.

use std::collections::BTreeMap;

use time::Date;

use crate::meals::repo::MacroRow;

/// Tolerance band around the calorie goal: a day counts while its total
/// lands within ±20% of the target, bounds included.
const STREAK_TOLERANCE: f64 = 0.20;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DayTotals {
    pub calories: i64,
    pub protein: i64,
    pub carbs: i64,
    pub fats: i64,
    pub meals: u32,
}

/// Sum meal rows into one bucket per calendar day.
pub fn daily_totals(rows: &[MacroRow]) -> BTreeMap<Date, DayTotals> {
    let mut totals: BTreeMap<Date, DayTotals> = BTreeMap::new();
    for row in rows {
        let day = totals.entry(row.meal_date).or_default();
        day.calories += i64::from(row.calories);
        day.protein += i64::from(row.protein);
        day.carbs += i64::from(row.carbs);
        day.fats += i64::from(row.fats);
        day.meals += 1;
    }
    totals
}

/// Consecutive trailing days (starting at `today`) whose logged calories fall
/// inside the tolerance band. A day with nothing logged is a miss. A goal of
/// zero calories never matches anything.
pub fn goal_streak(totals: &BTreeMap<Date, DayTotals>, calorie_goal: i32, today: Date) -> u32 {
    if calorie_goal <= 0 {
        return 0;
    }
    let lo = f64::from(calorie_goal) * (1.0 - STREAK_TOLERANCE);
    let hi = f64::from(calorie_goal) * (1.0 + STREAK_TOLERANCE);

    let mut streak = 0;
    let mut day = today;
    loop {
        let Some(t) = totals.get(&day) else { break };
        let calories = t.calories as f64;
        if calories < lo || calories > hi {
            break;
        }
        streak += 1;
        match day.previous_day() {
            Some(prev) => day = prev,
            None => break,
        }
    }
    streak
}

/// Mean calories over the days that actually have logs; 0 when none do.
pub fn average_calories<'a>(days: impl Iterator<Item = &'a DayTotals>) -> i64 {
    let (mut sum, mut n) = (0i64, 0i64);
    for d in days.filter(|d| d.meals > 0) {
        sum += d.calories;
        n += 1;
    }
    if n == 0 {
        0
    } else {
        // round half away from zero, calories are never negative here
        (sum + n / 2) / n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn row(day: Date, calories: i32, protein: i32, carbs: i32, fats: i32) -> MacroRow {
        MacroRow { meal_date: day, calories, protein, carbs, fats }
    }

    #[test]
    fn totals_sum_exactly() {
        let d = date!(2025 - 04 - 01);
        let rows = vec![
            row(d, 350, 12, 65, 8),
            row(d, 450, 35, 30, 18),
            row(d, 250, 18, 20, 12),
        ];
        let totals = daily_totals(&rows);
        assert_eq!(totals.len(), 1);
        let t = totals[&d];
        assert_eq!(t.calories, 1050);
        assert_eq!(t.protein, 65);
        assert_eq!(t.carbs, 115);
        assert_eq!(t.fats, 38);
        assert_eq!(t.meals, 3);
    }

    #[test]
    fn totals_bucket_per_day() {
        let rows = vec![
            row(date!(2025 - 04 - 01), 500, 30, 40, 10),
            row(date!(2025 - 04 - 02), 600, 40, 50, 20),
            row(date!(2025 - 04 - 02), 400, 20, 30, 10),
        ];
        let totals = daily_totals(&rows);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[&date!(2025 - 04 - 01)].calories, 500);
        assert_eq!(totals[&date!(2025 - 04 - 02)].calories, 1000);
    }

    #[test]
    fn empty_input_empty_totals() {
        assert!(daily_totals(&[]).is_empty());
    }

    #[test]
    fn streak_zero_with_no_meals() {
        let totals = BTreeMap::new();
        assert_eq!(goal_streak(&totals, 2000, date!(2025 - 04 - 07)), 0);
    }

    #[test]
    fn streak_zero_with_zero_goal() {
        let totals = daily_totals(&[row(date!(2025 - 04 - 07), 0, 0, 0, 0)]);
        assert_eq!(goal_streak(&totals, 0, date!(2025 - 04 - 07)), 0);
    }

    #[test]
    fn streak_counts_consecutive_days_and_stops_at_miss() {
        let today = date!(2025 - 04 - 07);
        let rows = vec![
            row(date!(2025 - 04 - 07), 2000, 0, 0, 0),
            row(date!(2025 - 04 - 06), 1900, 0, 0, 0),
            row(date!(2025 - 04 - 05), 2200, 0, 0, 0),
            // 04-04 over the band: streak must stop here
            row(date!(2025 - 04 - 04), 3000, 0, 0, 0),
            row(date!(2025 - 04 - 03), 2000, 0, 0, 0),
        ];
        assert_eq!(goal_streak(&daily_totals(&rows), 2000, today), 3);
    }

    #[test]
    fn streak_broken_by_unlogged_day() {
        let today = date!(2025 - 04 - 07);
        let rows = vec![
            row(date!(2025 - 04 - 07), 2000, 0, 0, 0),
            // nothing on 04-06
            row(date!(2025 - 04 - 05), 2000, 0, 0, 0),
        ];
        assert_eq!(goal_streak(&daily_totals(&rows), 2000, today), 1);
    }

    #[test]
    fn streak_band_is_inclusive() {
        let today = date!(2025 - 04 - 07);
        // exactly -20% and +20% of 2000
        let rows = vec![
            row(date!(2025 - 04 - 07), 1600, 0, 0, 0),
            row(date!(2025 - 04 - 06), 2400, 0, 0, 0),
        ];
        assert_eq!(goal_streak(&daily_totals(&rows), 2000, today), 2);

        let out = vec![row(date!(2025 - 04 - 07), 1599, 0, 0, 0)];
        assert_eq!(goal_streak(&daily_totals(&out), 2000, today), 0);
        let out = vec![row(date!(2025 - 04 - 07), 2401, 0, 0, 0)];
        assert_eq!(goal_streak(&daily_totals(&out), 2000, today), 0);
    }

    #[test]
    fn average_ignores_unlogged_days() {
        let logged = DayTotals { calories: 1800, meals: 2, ..Default::default() };
        let also = DayTotals { calories: 1900, meals: 1, ..Default::default() };
        let empty = DayTotals::default();
        let days = [logged, empty, also];
        assert_eq!(average_calories(days.iter()), 1850);
        assert_eq!(average_calories([empty].iter()), 0);
        assert_eq!(average_calories(std::iter::empty()), 0);
    }
}
