use crate::mealgen::dto::MealPreferences;

/// The fixed instruction block sent as the system message. Every
/// preference field is embedded, together with the kcal-per-gram facts
/// and the exact response format the parser expects.
pub fn build_prompt(p: &MealPreferences) -> String {
    format!(
        "Dietary Preference: {diet}\n\
         Max Calories Limit: {max_calories} kcal\n\
         Food Preferences: {food_preferences}\n\
         Foods to Avoid: {foods_to_avoid}\n\
         What Macro to Focus On: {macro_focus}\n\
         Max Budget per Meal: ${max_budget}\n\
         \n\
         Carbohydrates provide 4 calories per gram\n\
         Protein provides 4 calories per gram\n\
         Fat provides 9 calories per gram\n\
         Ensure the total calories match exactly the sum of all macros (no rounding, no ranges).\n\
         Use USDA FoodData Central information for calorie and nutrient data.\n\
         No warnings or health disclaimers. Be concise, simple, and direct. 5th to 7th-grade reading level.\n\
         Do not use any markup (no bold, no BBCode, no headings) other than a dash (-) for bullet points.\n\
         No extra fluff, just provide the meal directly.\n\
         \n\
         The response should follow this format exactly:\n\
         \n\
         Here is your meal. I hope you enjoy it.\n\
         \n\
         [Name of the Dish],\n\
         Servings Per Recipe: [Number of Servings],\n\
         Serving Amount: [Serving Value] [Serving Units]\n\
         Calories per Serving: [Exact Calories per Serving in kcal]\n\
         Protein per Serving: [Protein in grams]\n\
         Carbs per Serving: [Carbohydrates in grams]\n\
         Fats per Serving: [Fats in grams]\n\
         \n\
         Ingredients: [List each ingredient with quantity in grams and also specify counts, e.g., 2 peppers (20g)],\n\
         \n\
         Instructions: [Step-by-step instructions to prepare the meal]\n\
         \n\
         Constraints:\n\
         - Must adhere to {diet} if specified.\n\
         - Must not exceed {max_calories} per serving.\n\
         - Exclude foods in the list: {foods_to_avoid}\n\
         - Include {food_preferences} if possible.\n\
         - Focus on {macro_focus} as the key macro if applicable.\n\
         - Stay under ${max_budget}.\n\
         - Sum of macros must match total calories exactly, no approximations.",
        diet = p.diet,
        max_calories = p.max_calories,
        food_preferences = p.food_preferences,
        foods_to_avoid = p.foods_to_avoid,
        macro_focus = p.macro_focus,
        max_budget = p.max_budget,
    )
}
