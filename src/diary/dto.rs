use serde::{Deserialize, Serialize};
use time::Date;

use crate::diary::repo::FoodEntry;
use crate::diary::services::DailyTotals;

// Dates cross the wire as ISO `YYYY-MM-DD` strings (see SPEC_FULL.md §API).
time::serde::format_description!(date_fmt, Date, "[year]-[month]-[day]");

#[derive(Debug, Deserialize)]
pub struct CreateEntryRequest {
    #[serde(with = "date_fmt")]
    pub date: Date,
    pub food_name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    #[serde(default = "default_servings")]
    pub servings: f64,
}

fn default_servings() -> f64 {
    1.0
}

#[derive(Debug, Deserialize)]
pub struct UpdateServingsRequest {
    pub servings: f64,
}

#[derive(Debug, Deserialize)]
pub struct DayQuery {
    #[serde(with = "date_fmt")]
    pub date: Date,
}

/// One day of the log: the raw entries plus the derived totals.
#[derive(Debug, Serialize)]
pub struct DayResponse {
    #[serde(with = "date_fmt")]
    pub date: Date,
    pub entries: Vec<FoodEntry>,
    pub totals: DailyTotals,
}
