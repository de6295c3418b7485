use crate::{
    errors::Result,
    navigation::Tab,
    orchestrator::Generation,
    render::render_page,
    state::AppState,
    store::{Action, ClientState, Dispatch},
};
use axum::{
    Form, Json,
    extract::{Path, State},
    response::{Html, Redirect},
};
use recipe_backend_client::{CookingTime, DietaryPreference, MealType};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Deserialize)]
pub struct IngredientForm {
    #[serde(default)]
    pub ingredient: String,
}

#[derive(Debug, Deserialize)]
pub struct OptionsForm {
    pub meal_type: Option<String>,
    pub cooking_time: Option<String>,
    pub servings: Option<String>,
}

fn back_to_page() -> Redirect {
    Redirect::to("/")
}

pub async fn health_check() -> &'static str {
    "YummyTool Web Client OK"
}

pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let banner_index = state.banner.current();
    Html(state.store.read(|s| render_page(s, banner_index)).await)
}

pub async fn client_state(State(state): State<Arc<AppState>>) -> Json<ClientState> {
    Json(state.store.snapshot().await)
}

#[instrument(skip(state, form))]
pub async fn add_ingredient(
    State(state): State<Arc<AppState>>,
    Form(form): Form<IngredientForm>,
) -> Redirect {
    if state.store.dispatch(Action::AddIngredient(form.ingredient)).await == Dispatch::Applied {
        info!("Ingredient added");
    }
    back_to_page()
}

/// A segment that is not an index is treated like an index past the end: a no-op.
#[instrument(skip(state))]
pub async fn remove_ingredient(
    State(state): State<Arc<AppState>>,
    Path(index): Path<String>,
) -> Redirect {
    match index.parse::<usize>() {
        Ok(index) => {
            state.store.dispatch(Action::RemoveIngredient(index)).await;
        }
        Err(e) => debug!("Ignoring removal of ingredient '{}': {}", index, e),
    }
    back_to_page()
}

#[instrument(skip(state))]
pub async fn toggle_preference(
    State(state): State<Arc<AppState>>,
    Path(tag): Path<String>,
) -> Result<Redirect> {
    let pref = tag.parse::<DietaryPreference>()?;
    state.store.dispatch(Action::TogglePreference(pref)).await;
    Ok(back_to_page())
}

/// Applies the options form. Unknown meal types or cooking times reject the whole
/// form; an unparsable servings value is ignored and the previous one kept.
#[instrument(skip(state))]
pub async fn update_options(
    State(state): State<Arc<AppState>>,
    Form(form): Form<OptionsForm>,
) -> Result<Redirect> {
    let meal_type = form
        .meal_type
        .as_deref()
        .map(str::parse::<MealType>)
        .transpose()?;
    let cooking_time = form
        .cooking_time
        .as_deref()
        .map(str::parse::<CookingTime>)
        .transpose()?;
    let servings = match form.servings.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => match raw.parse::<i64>() {
            Ok(n) => Some(n),
            Err(e) => {
                warn!("Ignoring servings value '{}': {}", raw, e);
                None
            }
        },
        _ => None,
    };

    if let Some(meal_type) = meal_type {
        state.store.dispatch(Action::SetMealType(meal_type)).await;
    }
    if let Some(cooking_time) = cooking_time {
        state.store.dispatch(Action::SetCookingTime(cooking_time)).await;
    }
    if let Some(servings) = servings {
        state.store.dispatch(Action::SetServings(servings)).await;
    }
    Ok(back_to_page())
}

#[instrument(skip(state))]
pub async fn select_tab(
    State(state): State<Arc<AppState>>,
    Path(tab): Path<String>,
) -> Result<Redirect> {
    let tab = tab.parse::<Tab>()?;
    state.store.dispatch(Action::SelectTab(tab)).await;
    Ok(back_to_page())
}

pub async fn toggle_menu(State(state): State<Arc<AppState>>) -> Redirect {
    state.store.dispatch(Action::ToggleMenu).await;
    back_to_page()
}

pub async fn dismiss_notice(State(state): State<Arc<AppState>>) -> Redirect {
    state.store.dispatch(Action::DismissNotice).await;
    back_to_page()
}

#[instrument(skip(state))]
pub async fn generate_recipe(State(state): State<Arc<AppState>>) -> Redirect {
    let outcome = state.orchestrator.spawn_generate(Generation::Recipe).await;
    debug!("Recipe generation trigger: {:?}", outcome);
    back_to_page()
}

#[instrument(skip(state))]
pub async fn generate_meal_plan(State(state): State<Arc<AppState>>) -> Redirect {
    let outcome = state
        .orchestrator
        .spawn_generate(Generation::MealPlan)
        .await;
    debug!("Meal plan generation trigger: {:?}", outcome);
    back_to_page()
}
