//! In-process stand-in for the recipe backend used by the unit tests.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use recipe_backend_client::{
    BackendClient, BackendConfig, GENERATE_RECIPE_PATH, MEAL_PLAN_PATH, MealPlan, RECIPES_PATH,
    Recipe,
};
use serde_json::{Value, json};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use tokio::sync::Semaphore;

pub fn sample_recipe(title: &str) -> Recipe {
    serde_json::from_value(sample_recipe_json(title)).unwrap()
}

pub fn sample_recipe_json(title: &str) -> Value {
    json!({
        "id": format!("id-{}", title.to_lowercase()),
        "title": title,
        "cooking_time": "15 minutes",
        "servings": 2,
        "difficulty": "Easy",
        "ingredients": ["2 eggs", "1 cup spinach", "salt", "pepper"],
        "instructions": ["Whisk the eggs", "Wilt the spinach", "Cook together"],
        "nutritional_info": {"calories": 210, "protein": "14g"},
        "dietary_tags": ["vegetarian", "gluten-free", "keto", "low-carb"]
    })
}

pub fn sample_meal_plan_json() -> Value {
    json!({
        "day1": {
            "breakfast": {"title": "Spinach Omelette", "cooking_time": "10 min", "ingredients": ["eggs", "spinach"]},
            "lunch": {"title": "Egg Salad", "cooking_time": "15 min", "ingredients": ["eggs", "mayo"]},
            "dinner": {"title": "Creamed Spinach", "cooking_time": "20 min", "ingredients": ["spinach", "cream"]}
        },
        "day2": {
            "breakfast": {"title": "Shakshuka", "cooking_time": "25 min", "ingredients": ["eggs", "tomato"]}
        }
    })
}

pub fn sample_meal_plan() -> MealPlan {
    serde_json::from_value(sample_meal_plan_json()).unwrap()
}

#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    Status(StatusCode),
}

impl Reply {
    fn respond(&self) -> Response {
        match self {
            Reply::Json(value) => Json(value.clone()).into_response(),
            Reply::Status(status) => (*status, "backend failure").into_response(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MockConfig {
    pub recipe: Reply,
    pub meal_plan: Reply,
    pub saved: Reply,
    /// Generation replies wait for [`MockBackend::release`] when set.
    pub hold_generation: bool,
    /// When set, the first saved-list request waits for [`MockBackend::release`]
    /// and is answered with this reply instead of `saved`.
    pub slow_first_saved: Option<Reply>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            recipe: Reply::Json(sample_recipe_json("Spinach Frittata")),
            meal_plan: Reply::Json(sample_meal_plan_json()),
            saved: Reply::Json(json!([sample_recipe_json("Spinach Frittata")])),
            hold_generation: false,
            slow_first_saved: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct Hits {
    pub saved: AtomicUsize,
    pub recipe: AtomicUsize,
    pub meal_plan: AtomicUsize,
    pub last_recipe_body: Mutex<Option<Value>>,
    pub last_meal_plan_body: Mutex<Option<Value>>,
}

impl Hits {
    pub fn saved(&self) -> usize {
        self.saved.load(Ordering::SeqCst)
    }

    pub fn recipe(&self) -> usize {
        self.recipe.load(Ordering::SeqCst)
    }

    pub fn meal_plan(&self) -> usize {
        self.meal_plan.load(Ordering::SeqCst)
    }
}

struct Shared {
    config: MockConfig,
    hits: Arc<Hits>,
    gate: Arc<Semaphore>,
}

impl Shared {
    async fn wait_for_release(&self) {
        if self.config.hold_generation {
            if let Ok(permit) = self.gate.acquire().await {
                permit.forget();
            }
        }
    }
}

pub struct MockBackend {
    pub client: BackendClient,
    pub hits: Arc<Hits>,
    gate: Arc<Semaphore>,
}

impl MockBackend {
    pub async fn start(config: MockConfig) -> Self {
        let hits = Arc::new(Hits::default());
        let gate = Arc::new(Semaphore::new(0));
        let shared = Arc::new(Shared {
            config,
            hits: hits.clone(),
            gate: gate.clone(),
        });

        let router = Router::new()
            .route(RECIPES_PATH, get(list_recipes))
            .route(GENERATE_RECIPE_PATH, post(generate_recipe))
            .route(MEAL_PLAN_PATH, post(generate_meal_plan))
            .with_state(shared);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let config = BackendConfig::from_base_url(&format!("http://{}", addr)).unwrap();
        Self {
            client: BackendClient::new(&config).unwrap(),
            hits,
            gate,
        }
    }

    /// Lets one held generation request answer.
    pub fn release(&self) {
        self.gate.add_permits(1);
    }
}

async fn list_recipes(State(shared): State<Arc<Shared>>) -> Response {
    let previous = shared.hits.saved.fetch_add(1, Ordering::SeqCst);
    if let (0, Some(reply)) = (previous, &shared.config.slow_first_saved) {
        if let Ok(permit) = shared.gate.acquire().await {
            permit.forget();
        }
        return reply.respond();
    }
    shared.config.saved.respond()
}

async fn generate_recipe(State(shared): State<Arc<Shared>>, Json(body): Json<Value>) -> Response {
    shared.hits.recipe.fetch_add(1, Ordering::SeqCst);
    *shared.hits.last_recipe_body.lock().unwrap() = Some(body);
    shared.wait_for_release().await;
    shared.config.recipe.respond()
}

async fn generate_meal_plan(
    State(shared): State<Arc<Shared>>,
    Json(body): Json<Value>,
) -> Response {
    shared.hits.meal_plan.fetch_add(1, Ordering::SeqCst);
    *shared.hits.last_meal_plan_body.lock().unwrap() = Some(body);
    shared.wait_for_release().await;
    shared.config.meal_plan.respond()
}
