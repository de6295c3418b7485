use reqwest::Url;
use std::env;
use thiserror::Error;

mod client;
mod lenient;
mod models;

pub use client::{BackendClient, BackendError, GENERATE_RECIPE_PATH, MEAL_PLAN_PATH, RECIPES_PATH};
pub use models::{
    CookingTime, DEFAULT_SERVINGS, DietaryPreference, GenerationRequest, Ingredient, MAX_SERVINGS,
    MIN_SERVINGS, MealPlan, MealPlanRequest, MealType, PlannedDay, PlannedMeal, Recipe,
    RecipeId, UnknownOption,
};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8001";

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid BACKEND_URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct BackendConfig {
    /// Scheme, host and optional path prefix, without a trailing slash.
    pub base_url: String,
}

impl BackendConfig {
    pub fn from_base_url(raw: &str) -> Result<Self, ConfigError> {
        let trimmed = raw.trim().trim_end_matches('/');
        let invalid = |reason: String| ConfigError::InvalidUrl {
            url: raw.to_string(),
            reason,
        };

        let parsed = Url::parse(trimmed).map_err(|e| invalid(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", parsed.scheme())));
        }

        Ok(Self {
            base_url: trimmed.to_string(),
        })
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
        }
    }
}

pub fn load_config() -> Result<BackendConfig, ConfigError> {
    dotenvy::dotenv().ok();

    match env::var("BACKEND_URL") {
        Ok(raw) if !raw.trim().is_empty() => {
            tracing::info!("Using recipe backend at {}", raw);
            BackendConfig::from_base_url(&raw)
        }
        _ => {
            tracing::info!(
                "BACKEND_URL not set, defaulting to {}",
                DEFAULT_BACKEND_URL
            );
            Ok(BackendConfig::default())
        }
    }
}
