use crate::mealgen::dto::GeneratedMeal;

/// Parse failure: the reply dropped or reworded one of the required
/// labels. A missing field is an explicit error, never a silent zero.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MealParseError {
    #[error("model response is missing \"{0}\"")]
    MissingField(&'static str),
}

const LABEL_SERVINGS: &str = "Servings Per Recipe:";
const LABEL_SERVING_AMOUNT: &str = "Serving Amount:";
const LABEL_CALORIES: &str = "Calories per Serving:";
const LABEL_PROTEIN: &str = "Protein per Serving:";
const LABEL_CARBS: &str = "Carbs per Serving:";
const LABEL_FATS: &str = "Fats per Serving:";

const GREETING: &str = "Here is your meal";

/// First numeric token after a label, tolerating units glued on or
/// trailing ("350 kcal", "42g", "12.5").
fn leading_number(s: &str) -> Option<f64> {
    let token = s.split_whitespace().next()?;
    let cleaned: String = token
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    cleaned.parse().ok()
}

/// Scan the free-text reply line by line. Lines starting with one of the
/// fixed labels feed the numeric fields; the line introducing the recipe
/// (right before "Servings Per Recipe:") is the dish name; everything
/// else is descriptive text.
pub fn parse_generated_meal(text: &str) -> Result<GeneratedMeal, MealParseError> {
    let mut name: Option<String> = None;
    let mut calories: Option<f64> = None;
    let mut protein: Option<f64> = None;
    let mut carbs: Option<f64> = None;
    let mut fat: Option<f64> = None;
    let mut description = Vec::new();
    let mut prev_line: Option<&str> = None;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix(LABEL_CALORIES) {
            calories = calories.or_else(|| leading_number(rest));
        } else if let Some(rest) = line.strip_prefix(LABEL_PROTEIN) {
            protein = protein.or_else(|| leading_number(rest));
        } else if let Some(rest) = line.strip_prefix(LABEL_CARBS) {
            carbs = carbs.or_else(|| leading_number(rest));
        } else if let Some(rest) = line.strip_prefix(LABEL_FATS) {
            fat = fat.or_else(|| leading_number(rest));
        } else if line.starts_with(LABEL_SERVINGS) {
            if name.is_none() {
                name = prev_line.map(|l| l.trim_end_matches(',').trim().to_string());
            }
        } else if line.starts_with(LABEL_SERVING_AMOUNT) || line.starts_with(GREETING) {
            // structural lines, not description
        } else {
            description.push(line);
        }

        prev_line = Some(line);
    }

    let name = name.ok_or(MealParseError::MissingField("Servings Per Recipe:"))?;
    let calories = calories.ok_or(MealParseError::MissingField(LABEL_CALORIES))?;
    let protein = protein.ok_or(MealParseError::MissingField(LABEL_PROTEIN))?;
    let carbs = carbs.ok_or(MealParseError::MissingField(LABEL_CARBS))?;
    let fat = fat.ok_or(MealParseError::MissingField(LABEL_FATS))?;

    // The name line also landed in description; drop it.
    let description = description
        .into_iter()
        .filter(|l| l.trim_end_matches(',').trim() != name)
        .collect::<Vec<_>>()
        .join("\n");

    Ok(GeneratedMeal {
        name,
        description,
        calories,
        protein,
        carbs,
        fat,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Here is your meal. I hope you enjoy it.\n\
        \n\
        Grilled Chicken Bowl,\n\
        Servings Per Recipe: 2,\n\
        Serving Amount: 350 grams\n\
        Calories per Serving: 520 kcal\n\
        Protein per Serving: 42g\n\
        Carbs per Serving: 55\n\
        Fats per Serving: 12.5\n\
        \n\
        Ingredients: 2 chicken breasts (250g), 1 cup rice (180g),\n\
        \n\
        Instructions: Grill the chicken. Cook the rice. Combine.";

    #[test]
    fn parses_a_well_formed_reply() {
        let meal = parse_generated_meal(SAMPLE).unwrap();
        assert_eq!(meal.name, "Grilled Chicken Bowl");
        assert_eq!(meal.calories, 520.0);
        assert_eq!(meal.protein, 42.0);
        assert_eq!(meal.carbs, 55.0);
        assert_eq!(meal.fat, 12.5);
    }

    #[test]
    fn non_label_lines_become_description() {
        let meal = parse_generated_meal(SAMPLE).unwrap();
        assert!(meal.description.contains("Ingredients: 2 chicken breasts"));
        assert!(meal.description.contains("Instructions: Grill the chicken."));
        assert!(!meal.description.contains("Grilled Chicken Bowl"));
    }

    #[test]
    fn missing_protein_label_is_an_explicit_error() {
        let reply = SAMPLE.replace("Protein per Serving: 42g\n", "");
        assert_eq!(
            parse_generated_meal(&reply),
            Err(MealParseError::MissingField("Protein per Serving:"))
        );
    }

    #[test]
    fn reworded_label_is_an_explicit_error_not_a_zero() {
        let reply = SAMPLE.replace("Calories per Serving:", "Energy per Serving:");
        assert_eq!(
            parse_generated_meal(&reply),
            Err(MealParseError::MissingField("Calories per Serving:"))
        );
    }

    #[test]
    fn label_without_a_number_is_missing() {
        let reply = SAMPLE.replace("Fats per Serving: 12.5", "Fats per Serving: some");
        assert_eq!(
            parse_generated_meal(&reply),
            Err(MealParseError::MissingField("Fats per Serving:"))
        );
    }

    #[test]
    fn tolerates_units_glued_to_the_number() {
        let reply = SAMPLE.replace("Carbs per Serving: 55", "Carbs per Serving: 55g");
        let meal = parse_generated_meal(&reply).unwrap();
        assert_eq!(meal.carbs, 55.0);
    }
}
