use crate::lenient;
use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::{Map, Value, json};
use std::{fmt, str::FromStr};
use thiserror::Error;
use validator::Validate;

pub const MIN_SERVINGS: u8 = 1;
pub const MAX_SERVINGS: u8 = 12;
pub const DEFAULT_SERVINGS: u8 = 4;

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Unknown {kind} '{value}'")]
pub struct UnknownOption {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownOption {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// A trimmed, non-empty ingredient name as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ingredient(String);

impl Ingredient {
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DietaryPreference {
    Vegetarian,
    Vegan,
    GlutenFree,
    Keto,
    Paleo,
    LowCarb,
    DairyFree,
    NutFree,
}

impl DietaryPreference {
    pub const ALL: [DietaryPreference; 8] = [
        DietaryPreference::Vegetarian,
        DietaryPreference::Vegan,
        DietaryPreference::GlutenFree,
        DietaryPreference::Keto,
        DietaryPreference::Paleo,
        DietaryPreference::LowCarb,
        DietaryPreference::DairyFree,
        DietaryPreference::NutFree,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DietaryPreference::Vegetarian => "vegetarian",
            DietaryPreference::Vegan => "vegan",
            DietaryPreference::GlutenFree => "gluten-free",
            DietaryPreference::Keto => "keto",
            DietaryPreference::Paleo => "paleo",
            DietaryPreference::LowCarb => "low-carb",
            DietaryPreference::DairyFree => "dairy-free",
            DietaryPreference::NutFree => "nut-free",
        }
    }
}

impl FromStr for DietaryPreference {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|pref| pref.as_str() == s)
            .ok_or_else(|| UnknownOption::new("dietary preference", s))
    }
}

impl fmt::Display for DietaryPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    #[default]
    Any,
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub const ALL: [MealType; 5] = [
        MealType::Any,
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MealType::Any => "any",
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MealType::Any => "Any",
            MealType::Breakfast => "Breakfast",
            MealType::Lunch => "Lunch",
            MealType::Dinner => "Dinner",
            MealType::Snack => "Snack",
        }
    }
}

impl FromStr for MealType {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|meal| meal.as_str() == s)
            .ok_or_else(|| UnknownOption::new("meal type", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CookingTime {
    #[default]
    Any,
    Quick,
    Medium,
    Long,
}

impl CookingTime {
    pub const ALL: [CookingTime; 4] = [
        CookingTime::Any,
        CookingTime::Quick,
        CookingTime::Medium,
        CookingTime::Long,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CookingTime::Any => "any",
            CookingTime::Quick => "quick",
            CookingTime::Medium => "medium",
            CookingTime::Long => "long",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CookingTime::Any => "Any",
            CookingTime::Quick => "Quick (15 min)",
            CookingTime::Medium => "Medium (30 min)",
            CookingTime::Long => "Long (60+ min)",
        }
    }
}

impl FromStr for CookingTime {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|time| time.as_str() == s)
            .ok_or_else(|| UnknownOption::new("cooking time", s))
    }
}

/// Body of `POST /api/generate-recipe`. Field order is the wire order.
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct GenerationRequest {
    #[validate(length(min = 1, message = "Please add at least one ingredient"))]
    pub ingredients: Vec<Ingredient>,
    pub dietary_preferences: Vec<DietaryPreference>,
    pub meal_type: MealType,
    pub cooking_time: CookingTime,
    #[validate(range(min = 1, max = 12, message = "Servings must be between 1 and 12"))]
    pub servings: u8,
}

/// Body of `POST /api/meal-plan`.
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct MealPlanRequest {
    #[validate(length(min = 1, message = "Please add at least one ingredient"))]
    pub ingredients: Vec<Ingredient>,
    pub dietary_preferences: Vec<DietaryPreference>,
    #[validate(range(min = 1, max = 12, message = "Servings must be between 1 and 12"))]
    pub servings: u8,
}

impl From<&GenerationRequest> for MealPlanRequest {
    fn from(req: &GenerationRequest) -> Self {
        Self {
            ingredients: req.ingredients.clone(),
            dietary_preferences: req.dietary_preferences.clone(),
            servings: req.servings,
        }
    }
}

/// Backends disagree on whether ids are strings or numbers; accept both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecipeId {
    Text(String),
    Number(i64),
}

impl RecipeId {
    fn lenient<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Self>, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => Some(RecipeId::Text(s)),
            Value::Number(n) => Some(
                n.as_i64()
                    .map(RecipeId::Number)
                    .unwrap_or_else(|| RecipeId::Text(n.to_string())),
            ),
            _ => None,
        })
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecipeId::Text(s) => f.write_str(s),
            RecipeId::Number(n) => write!(f, "{}", n),
        }
    }
}

/// A recipe as the backend returns it. Only the shape of the record is required;
/// individual fields that are missing, `null` or oddly typed decode to defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(
        default,
        deserialize_with = "RecipeId::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecipeId>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub cooking_time: String,
    #[serde(
        default,
        deserialize_with = "lenient::count",
        skip_serializing_if = "Option::is_none"
    )]
    pub servings: Option<u32>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub difficulty: String,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub ingredients: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub instructions: Vec<String>,
    #[serde(
        default,
        deserialize_with = "lenient::object",
        skip_serializing_if = "Option::is_none"
    )]
    pub nutritional_info: Option<Map<String, Value>>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub dietary_tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlannedMeal {
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub cooking_time: String,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub ingredients: Vec<String>,
}

/// One day of a meal plan: meal label ("breakfast", ...) to meal, in backend order.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedDay {
    pub label: String,
    pub meals: Vec<(String, PlannedMeal)>,
}

impl PlannedDay {
    pub fn meal(&self, label: &str) -> Option<&PlannedMeal> {
        self.meals
            .iter()
            .find(|(name, _)| name == label)
            .map(|(_, meal)| meal)
    }
}

/// Day label -> meal label -> meal, in the order the backend produced them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct MealPlan {
    days: Vec<PlannedDay>,
}

impl MealPlan {
    pub fn days(&self) -> impl Iterator<Item = &PlannedDay> {
        self.days.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl TryFrom<Map<String, Value>> for MealPlan {
    type Error = serde_json::Error;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        let days = map
            .into_iter()
            .map(|(label, meals)| -> Result<PlannedDay, serde_json::Error> {
                let Value::Object(meals) = meals else {
                    return Err(<serde_json::Error as de::Error>::custom(format!(
                        "meal plan day '{}' is not an object",
                        label
                    )));
                };
                let meals = meals
                    .into_iter()
                    .map(|(name, meal)| Ok((name, serde_json::from_value::<PlannedMeal>(meal)?)))
                    .collect::<Result<Vec<_>, serde_json::Error>>()?;
                Ok(PlannedDay { label, meals })
            })
            .collect::<Result<Vec<_>, serde_json::Error>>()?;
        Ok(Self { days })
    }
}

impl From<MealPlan> for Map<String, Value> {
    fn from(plan: MealPlan) -> Self {
        plan.days
            .into_iter()
            .map(|day| {
                let meals: Map<String, Value> = day
                    .meals
                    .into_iter()
                    .map(|(name, meal)| {
                        let meal = json!({
                            "title": meal.title,
                            "cooking_time": meal.cooking_time,
                            "ingredients": meal.ingredients,
                        });
                        (name, meal)
                    })
                    .collect();
                (day.label, Value::Object(meals))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_request() -> GenerationRequest {
        GenerationRequest {
            ingredients: vec![
                Ingredient::parse("eggs").unwrap(),
                Ingredient::parse("spinach").unwrap(),
            ],
            dietary_preferences: vec![DietaryPreference::Vegetarian],
            meal_type: MealType::Breakfast,
            cooking_time: CookingTime::Quick,
            servings: 2,
        }
    }

    #[test]
    fn ingredient_parse_trims_and_rejects_blank() {
        assert_eq!(Ingredient::parse("  basil ").unwrap().as_str(), "basil");
        assert!(Ingredient::parse("").is_none());
        assert!(Ingredient::parse(" \t\n").is_none());
    }

    #[test]
    fn dietary_preferences_use_kebab_case_on_the_wire() {
        for pref in DietaryPreference::ALL {
            let json = serde_json::to_string(&pref).unwrap();
            assert_eq!(json, format!("\"{}\"", pref.as_str()));
            assert_eq!(pref.as_str().parse::<DietaryPreference>().unwrap(), pref);
        }
        let err = "carnivore".parse::<DietaryPreference>().unwrap_err();
        assert_eq!(err.kind, "dietary preference");
    }

    #[test]
    fn option_enums_parse_their_wire_names() {
        assert_eq!("snack".parse::<MealType>().unwrap(), MealType::Snack);
        assert_eq!("long".parse::<CookingTime>().unwrap(), CookingTime::Long);
        assert!("brunch".parse::<MealType>().is_err());
        assert!("Quick".parse::<CookingTime>().is_err());
    }

    #[test]
    fn generation_request_matches_backend_body() {
        let body = serde_json::to_string(&scenario_request()).unwrap();
        assert_eq!(
            body,
            r#"{"ingredients":["eggs","spinach"],"dietary_preferences":["vegetarian"],"meal_type":"breakfast","cooking_time":"quick","servings":2}"#
        );
    }

    #[test]
    fn meal_plan_request_drops_meal_type_and_time() {
        let body = serde_json::to_string(&MealPlanRequest::from(&scenario_request())).unwrap();
        assert_eq!(
            body,
            r#"{"ingredients":["eggs","spinach"],"dietary_preferences":["vegetarian"],"servings":2}"#
        );
    }

    #[test]
    fn validation_rejects_empty_ingredients_and_out_of_range_servings() {
        assert!(scenario_request().validate().is_ok());

        let mut empty = scenario_request();
        empty.ingredients.clear();
        let errors = empty.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("ingredients"));

        let mut too_many = scenario_request();
        too_many.servings = 13;
        let errors = too_many.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("servings"));
    }

    #[test]
    fn recipe_tolerates_missing_optional_fields() {
        let recipe: Recipe = serde_json::from_str(
            r#"{"id": 7, "title": "Omelette", "cooking_time": "10 minutes", "servings": 2,
                "difficulty": "Easy", "ingredients": ["eggs"], "instructions": ["Whisk", "Cook"],
                "dietary_tags": ["vegetarian"]}"#,
        )
        .unwrap();
        assert_eq!(recipe.id, Some(RecipeId::Number(7)));
        assert!(recipe.nutritional_info.is_none());
        assert_eq!(recipe.instructions, vec!["Whisk", "Cook"]);
    }

    #[test]
    fn recipe_keeps_nutrition_order() {
        let recipe: Recipe = serde_json::from_str(
            r#"{"id": "abc", "title": "Salad",
                "nutritional_info": {"calories": 320, "protein": "12g", "carbs": "30g"}}"#,
        )
        .unwrap();
        let info = recipe.nutritional_info.unwrap();
        assert_eq!(
            info.keys().collect::<Vec<_>>(),
            vec!["calories", "protein", "carbs"]
        );
        assert_eq!(recipe.id.unwrap().to_string(), "abc");
    }

    #[test]
    fn meal_plan_preserves_day_and_meal_order() {
        let plan: MealPlan = serde_json::from_str(
            r#"{"day1": {"breakfast": {"title": "Oats", "cooking_time": "5 min", "ingredients": ["oats"]},
                         "lunch": {"title": "Soup", "cooking_time": "20 min", "ingredients": []},
                         "dinner": {"title": "Stew", "cooking_time": "1 h", "ingredients": ["beans"]}},
                "day2": {"breakfast": {"title": "Toast"}}}"#,
        )
        .unwrap();
        let days: Vec<_> = plan.days().map(|day| day.label.as_str()).collect();
        assert_eq!(days, vec!["day1", "day2"]);
        let first = plan.days().next().unwrap();
        let meals: Vec<_> = first.meals.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(meals, vec!["breakfast", "lunch", "dinner"]);
        assert_eq!(first.meal("dinner").unwrap().ingredients, vec!["beans"]);

        let round_trip: MealPlan =
            serde_json::from_value(serde_json::to_value(&plan).unwrap()).unwrap();
        assert_eq!(round_trip, plan);
    }

    #[test]
    fn meal_plan_rejects_day_that_is_not_an_object() {
        let err = serde_json::from_str::<MealPlan>(r#"{"day1": "rest"}"#).unwrap_err();
        assert!(err.to_string().contains("day1"));
    }

    #[test]
    fn recipe_null_fields_decode_to_defaults() {
        let recipe: Recipe = serde_json::from_str(
            r#"{"id": "1", "title": "Soup", "difficulty": null, "cooking_time": null,
                "servings": null, "ingredients": null, "instructions": null,
                "nutritional_info": null, "dietary_tags": null}"#,
        )
        .unwrap();
        assert_eq!(recipe.title, "Soup");
        assert_eq!(recipe.difficulty, "");
        assert_eq!(recipe.cooking_time, "");
        assert_eq!(recipe.servings, None);
        assert!(recipe.ingredients.is_empty());
        assert!(recipe.dietary_tags.is_empty());
        assert!(recipe.nutritional_info.is_none());
    }

    #[test]
    fn recipe_numeric_text_fields_are_shown_as_text() {
        let recipe: Recipe = serde_json::from_str(
            r#"{"id": 12.5, "title": "Stew", "cooking_time": 30, "servings": "4",
                "difficulty": 2, "ingredients": ["beans", 2, null],
                "instructions": "Simmer everything", "nutritional_info": "n/a"}"#,
        )
        .unwrap();
        assert_eq!(recipe.id, Some(RecipeId::Text("12.5".into())));
        assert_eq!(recipe.cooking_time, "30");
        assert_eq!(recipe.servings, Some(4));
        assert_eq!(recipe.difficulty, "2");
        assert_eq!(recipe.ingredients, vec!["beans", "2"]);
        assert_eq!(recipe.instructions, vec!["Simmer everything"]);
        assert!(recipe.nutritional_info.is_none());
    }

    #[test]
    fn saved_list_survives_one_irregular_record() {
        let recipes: Vec<Recipe> = serde_json::from_str(
            r#"[{"id": "a", "title": "Pancakes", "dietary_tags": ["vegetarian"]},
                {"id": "b", "title": "Tacos", "dietary_tags": null, "servings": -1},
                {"id": "c", "title": "Curry", "cooking_time": 45}]"#,
        )
        .unwrap();
        let titles: Vec<_> = recipes.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Pancakes", "Tacos", "Curry"]);
        assert!(recipes[1].dietary_tags.is_empty());
        assert_eq!(recipes[1].servings, None);
        assert_eq!(recipes[2].cooking_time, "45");
    }
}
