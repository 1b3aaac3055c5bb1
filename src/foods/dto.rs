use serde::Serialize;

use crate::foods::client::{FoodNutrient, SearchFood};

// FoodData Central nutrient IDs.
pub const NUTRIENT_ENERGY_ATWATER_GENERAL: i64 = 2047;
pub const NUTRIENT_ENERGY: i64 = 1008;
pub const NUTRIENT_PROTEIN: i64 = 1003;
pub const NUTRIENT_FAT: i64 = 1004;
pub const NUTRIENT_CARBS: i64 = 1005;

/// Flat nutrient record per reference serving (100 g when the upstream
/// record declares no serving size).
#[derive(Debug, Clone, Serialize)]
pub struct FoodSummary {
    pub fdc_id: i64,
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub serving_size: Option<f64>,
    pub serving_size_unit: Option<String>,
}

fn nutrient_value(nutrients: &[FoodNutrient], id: i64) -> Option<f64> {
    nutrients.iter().find(|n| n.nutrient_id == id).map(|n| n.value)
}

/// Energy rule: Atwater General Factors (2047, Foundation foods) with
/// fallback to plain Energy (1008, SR Legacy). One food never mixes the
/// two; a record carrying neither reads as 0.
fn energy_kcal(nutrients: &[FoodNutrient]) -> f64 {
    nutrient_value(nutrients, NUTRIENT_ENERGY_ATWATER_GENERAL)
        .or_else(|| nutrient_value(nutrients, NUTRIENT_ENERGY))
        .unwrap_or(0.0)
}

impl From<SearchFood> for FoodSummary {
    fn from(food: SearchFood) -> Self {
        let n = &food.food_nutrients;
        Self {
            fdc_id: food.fdc_id,
            name: food.description,
            calories: energy_kcal(n),
            protein: nutrient_value(n, NUTRIENT_PROTEIN).unwrap_or(0.0),
            carbs: nutrient_value(n, NUTRIENT_CARBS).unwrap_or(0.0),
            fat: nutrient_value(n, NUTRIENT_FAT).unwrap_or(0.0),
            serving_size: food.serving_size,
            serving_size_unit: food.serving_size_unit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nutrient(id: i64, value: f64) -> FoodNutrient {
        FoodNutrient {
            nutrient_id: id,
            value,
            unit_name: "G".into(),
        }
    }

    fn food(nutrients: Vec<FoodNutrient>) -> SearchFood {
        SearchFood {
            fdc_id: 1_102_653,
            description: "Banana, raw".into(),
            food_nutrients: nutrients,
            serving_size: None,
            serving_size_unit: None,
        }
    }

    #[test]
    fn maps_all_four_macros() {
        let summary = FoodSummary::from(food(vec![
            nutrient(NUTRIENT_ENERGY_ATWATER_GENERAL, 98.0),
            nutrient(NUTRIENT_PROTEIN, 0.74),
            nutrient(NUTRIENT_FAT, 0.29),
            nutrient(NUTRIENT_CARBS, 23.0),
        ]));
        assert_eq!(summary.calories, 98.0);
        assert_eq!(summary.protein, 0.74);
        assert_eq!(summary.fat, 0.29);
        assert_eq!(summary.carbs, 23.0);
    }

    #[test]
    fn energy_prefers_atwater_general() {
        let summary = FoodSummary::from(food(vec![
            nutrient(NUTRIENT_ENERGY, 105.0),
            nutrient(NUTRIENT_ENERGY_ATWATER_GENERAL, 98.0),
        ]));
        assert_eq!(summary.calories, 98.0);
    }

    #[test]
    fn energy_falls_back_to_1008() {
        let summary = FoodSummary::from(food(vec![nutrient(NUTRIENT_ENERGY, 105.0)]));
        assert_eq!(summary.calories, 105.0);
    }

    #[test]
    fn missing_nutrients_read_as_zero() {
        let summary = FoodSummary::from(food(vec![]));
        assert_eq!(summary.calories, 0.0);
        assert_eq!(summary.protein, 0.0);
        assert_eq!(summary.carbs, 0.0);
        assert_eq!(summary.fat, 0.0);
    }
}
