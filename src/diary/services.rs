use serde::Serialize;

use crate::diary::repo::FoodEntry;

/// Servings move in quarter steps with a floor of one quarter serving,
/// matching the UI's +/- 0.25 buttons.
pub fn clamp_servings(servings: f64) -> f64 {
    let quarters = (servings * 4.0).round() / 4.0;
    quarters.max(0.25)
}

/// Aggregated macros for one calendar day. Computed on every read,
/// never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

pub fn compute_totals(entries: &[FoodEntry]) -> DailyTotals {
    entries.iter().fold(
        DailyTotals {
            calories: 0.0,
            protein: 0.0,
            carbs: 0.0,
            fat: 0.0,
        },
        |acc, e| DailyTotals {
            calories: acc.calories + e.calories * e.servings,
            protein: acc.protein + e.protein * e.servings,
            carbs: acc.carbs + e.carbs * e.servings,
            fat: acc.fat + e.fat * e.servings,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn entry(name: &str, calories: f64, protein: f64, carbs: f64, fat: f64, servings: f64) -> FoodEntry {
        FoodEntry {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            date: date!(2024 - 12 - 14),
            food_name: name.into(),
            calories,
            protein,
            carbs,
            fat,
            servings,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn clamp_floors_at_a_quarter_serving() {
        assert_eq!(clamp_servings(0.0), 0.25);
        assert_eq!(clamp_servings(-1.0), 0.25);
        assert_eq!(clamp_servings(0.25), 0.25);
    }

    #[test]
    fn clamp_rounds_to_quarter_steps() {
        assert_eq!(clamp_servings(1.0), 1.0);
        assert_eq!(clamp_servings(1.1), 1.0);
        assert_eq!(clamp_servings(1.13), 1.25);
        assert_eq!(clamp_servings(2.75), 2.75);
    }

    #[test]
    fn totals_scale_with_servings() {
        let banana = entry("Banana", 105.0, 1.3, 27.0, 0.3, 1.0);
        let totals = compute_totals(&[banana.clone()]);
        assert_eq!(totals.calories, 105.0);

        let mut doubled = banana;
        doubled.servings = 2.0;
        let totals = compute_totals(&[doubled]);
        assert_eq!(totals.calories, 210.0);
        assert_eq!(totals.protein, 2.6);
        assert_eq!(totals.carbs, 54.0);
        assert_eq!(totals.fat, 0.6);
    }

    #[test]
    fn adjusting_one_entry_changes_only_its_contribution() {
        let banana = entry("Banana", 105.0, 1.3, 27.0, 0.3, 1.0);
        let chicken = entry("Chicken Breast", 165.0, 31.0, 0.0, 3.6, 1.0);
        let before = compute_totals(&[banana.clone(), chicken.clone()]);

        let mut banana2 = banana;
        banana2.servings = 2.0;
        let after = compute_totals(&[banana2, chicken]);

        assert_eq!(after.calories - before.calories, 105.0);
        assert!((after.protein - before.protein - 1.3).abs() < 1e-9);
        assert!((after.fat - before.fat - 0.3).abs() < 1e-9);
    }

    #[test]
    fn removal_brings_totals_to_zero() {
        let totals = compute_totals(&[]);
        assert_eq!(
            totals,
            DailyTotals {
                calories: 0.0,
                protein: 0.0,
                carbs: 0.0,
                fat: 0.0
            }
        );
    }
}
