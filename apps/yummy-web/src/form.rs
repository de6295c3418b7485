use recipe_backend_client::{
    CookingTime, DEFAULT_SERVINGS, DietaryPreference, GenerationRequest, Ingredient, MAX_SERVINGS,
    MIN_SERVINGS, MealType,
};
use serde::Serialize;
use tracing::debug;

/// Working set of ingredients and preferences the user is editing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormModel {
    ingredients: Vec<Ingredient>,
    pending_ingredient: String,
    dietary_preferences: Vec<DietaryPreference>,
    meal_type: MealType,
    cooking_time: CookingTime,
    servings: u8,
}

impl Default for FormModel {
    fn default() -> Self {
        Self {
            ingredients: Vec::new(),
            pending_ingredient: String::new(),
            dietary_preferences: Vec::new(),
            meal_type: MealType::default(),
            cooking_time: CookingTime::default(),
            servings: DEFAULT_SERVINGS,
        }
    }
}

impl FormModel {
    pub fn ingredients(&self) -> &[Ingredient] {
        &self.ingredients
    }

    pub fn pending_ingredient(&self) -> &str {
        &self.pending_ingredient
    }

    pub fn dietary_preferences(&self) -> &[DietaryPreference] {
        &self.dietary_preferences
    }

    pub fn is_selected(&self, pref: DietaryPreference) -> bool {
        self.dietary_preferences.contains(&pref)
    }

    pub fn meal_type(&self) -> MealType {
        self.meal_type
    }

    pub fn cooking_time(&self) -> CookingTime {
        self.cooking_time
    }

    pub fn servings(&self) -> u8 {
        self.servings
    }

    /// Appends `text` unless it is blank or already listed (exact match).
    ///
    /// The raw text stays in the pending input when it is refused, and is cleared
    /// once accepted. Returns whether the list changed.
    pub fn add_ingredient(&mut self, text: &str) -> bool {
        self.pending_ingredient = text.to_string();

        let Some(ingredient) = Ingredient::parse(text) else {
            debug!("Ignoring blank ingredient");
            return false;
        };
        if self.ingredients.contains(&ingredient) {
            debug!("Ignoring duplicate ingredient '{}'", ingredient);
            return false;
        }

        self.ingredients.push(ingredient);
        self.pending_ingredient.clear();
        true
    }

    pub fn remove_ingredient(&mut self, index: usize) -> bool {
        if index < self.ingredients.len() {
            self.ingredients.remove(index);
            true
        } else {
            debug!(
                "Ignoring removal of ingredient {} (only {} listed)",
                index,
                self.ingredients.len()
            );
            false
        }
    }

    /// Returns whether `pref` is selected after the toggle.
    pub fn toggle_preference(&mut self, pref: DietaryPreference) -> bool {
        if let Some(pos) = self.dietary_preferences.iter().position(|p| *p == pref) {
            self.dietary_preferences.remove(pos);
            false
        } else {
            self.dietary_preferences.push(pref);
            true
        }
    }

    pub fn set_meal_type(&mut self, meal_type: MealType) {
        self.meal_type = meal_type;
    }

    pub fn set_cooking_time(&mut self, cooking_time: CookingTime) {
        self.cooking_time = cooking_time;
    }

    /// Stores `n` clamped into the supported range and returns the stored value.
    pub fn set_servings(&mut self, n: i64) -> u8 {
        let clamped = n.clamp(i64::from(MIN_SERVINGS), i64::from(MAX_SERVINGS));
        // In range after the clamp above.
        self.servings = clamped as u8;
        self.servings
    }

    /// Snapshot of the form as the backend expects it.
    pub fn generation_request(&self) -> GenerationRequest {
        GenerationRequest {
            ingredients: self.ingredients.clone(),
            dietary_preferences: self.dietary_preferences.clone(),
            meal_type: self.meal_type,
            cooking_time: self.cooking_time,
            servings: self.servings,
        }
    }
}
