use std::fmt;

use serde::{Deserialize, Serialize};

/// Which macronutrient the generated meal should lean into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MacroFocus {
    Protein,
    Fat,
    Carbs,
    Balanced,
}

impl fmt::Display for MacroFocus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MacroFocus::Protein => "Protein",
            MacroFocus::Fat => "Fat",
            MacroFocus::Carbs => "Carbs",
            MacroFocus::Balanced => "Balanced",
        };
        f.write_str(s)
    }
}

/// User-entered dietary preferences. Lives only for the duration of one
/// generation request; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPreferences {
    pub diet: String,
    pub max_calories: u32,
    pub food_preferences: String,
    pub foods_to_avoid: String,
    pub macro_focus: MacroFocus,
    pub max_budget: u32,
}

/// A parsed meal suggestion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedMeal {
    pub name: String,
    pub description: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub preferences: MealPreferences,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub meal: GeneratedMeal,
    pub credits_remaining: i32,
}
