use crate::{
    BackendConfig,
    models::{GenerationRequest, MealPlan, MealPlanRequest, Recipe},
};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, error, instrument};

pub const RECIPES_PATH: &str = "/api/recipes";
pub const GENERATE_RECIPE_PATH: &str = "/api/generate-recipe";
pub const MEAL_PLAN_PATH: &str = "/api/meal-plan";

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("HTTP request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Error response from recipe backend at '{endpoint}': Status {status}")]
    UpstreamStatus { endpoint: &'static str, status: u16 },

    #[error("Malformed response from recipe backend at '{endpoint}': {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Thin client for the recipe-generation backend. Cheap to clone.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http_client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let http_client = Client::builder().build()?;
        Ok(Self::with_http_client(http_client, config))
    }

    pub fn with_http_client(http_client: Client, config: &BackendConfig) -> Self {
        Self {
            http_client,
            base_url: config.base_url.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    #[instrument(skip(self))]
    pub async fn list_recipes(&self) -> Result<Vec<Recipe>, BackendError> {
        let request = self.http_client.get(self.url(RECIPES_PATH));
        self.send_json(request, RECIPES_PATH).await
    }

    #[instrument(skip(self, payload), fields(ingredients = payload.ingredients.len()))]
    pub async fn generate_recipe(&self, payload: &GenerationRequest) -> Result<Recipe, BackendError> {
        let request = self
            .http_client
            .post(self.url(GENERATE_RECIPE_PATH))
            .json(payload);
        self.send_json(request, GENERATE_RECIPE_PATH).await
    }

    #[instrument(skip(self, payload), fields(ingredients = payload.ingredients.len()))]
    pub async fn generate_meal_plan(
        &self,
        payload: &MealPlanRequest,
    ) -> Result<MealPlan, BackendError> {
        let request = self.http_client.post(self.url(MEAL_PLAN_PATH)).json(payload);
        self.send_json(request, MEAL_PLAN_PATH).await
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        endpoint: &'static str,
    ) -> Result<T, BackendError> {
        debug!("Calling recipe backend: {}", endpoint);
        let response = request
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                let body = response.bytes().await?;
                serde_json::from_slice::<T>(&body).map_err(|e| {
                    error!("Failed to deserialize response from {}: {}", endpoint, e);
                    BackendError::Decode {
                        endpoint,
                        source: e,
                    }
                })
            }
            other_status => {
                let body = response.text().await.unwrap_or_default();
                error!(
                    "Recipe backend failed at {} with status {}: {}",
                    endpoint, other_status, body
                );
                Err(BackendError::UpstreamStatus {
                    endpoint,
                    status: other_status.as_u16(),
                })
            }
        }
    }
}
