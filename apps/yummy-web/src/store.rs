use crate::{
    form::FormModel,
    navigation::{Navigation, Tab},
};
use recipe_backend_client::{CookingTime, DietaryPreference, MealPlan, MealType, Recipe};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use validator::{Validate, ValidationErrors};

const RECIPE_FAILURE_MESSAGE: &str = "Error generating recipe. Please try again.";
const MEAL_PLAN_FAILURE_MESSAGE: &str = "Error generating meal plan. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestKind {
    Recipe,
    MealPlan,
    SavedRecipes,
}

impl RequestKind {
    /// Generation calls share the single in-flight flag; the saved-recipes fetch
    /// only reads and runs alongside them.
    pub fn uses_in_flight(self) -> bool {
        !matches!(self, RequestKind::SavedRecipes)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "state", content = "error", rename_all = "lowercase")]
pub enum RequestStatus {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RequestStatuses {
    pub recipe: RequestStatus,
    pub meal_plan: RequestStatus,
    pub saved_recipes: RequestStatus,
}

impl RequestStatuses {
    fn set(&mut self, kind: RequestKind, status: RequestStatus) {
        match kind {
            RequestKind::Recipe => self.recipe = status,
            RequestKind::MealPlan => self.meal_plan = status,
            RequestKind::SavedRecipes => self.saved_recipes = status,
        }
    }
}

/// Sequence number handed out when a request starts. Replies carry it back so a
/// reply to a superseded request can be told apart from the latest one.
pub type Ticket = u64;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestTickets {
    issued: Ticket,
    recipe: Ticket,
    meal_plan: Ticket,
    saved_recipes: Ticket,
}

impl RequestTickets {
    pub fn latest(&self, kind: RequestKind) -> Ticket {
        match kind {
            RequestKind::Recipe => self.recipe,
            RequestKind::MealPlan => self.meal_plan,
            RequestKind::SavedRecipes => self.saved_recipes,
        }
    }

    fn issue(&mut self, kind: RequestKind) -> Ticket {
        self.issued += 1;
        let slot = match kind {
            RequestKind::Recipe => &mut self.recipe,
            RequestKind::MealPlan => &mut self.meal_plan,
            RequestKind::SavedRecipes => &mut self.saved_recipes,
        };
        *slot = self.issued;
        self.issued
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Validation,
    Network,
}

/// Blocking message shown to the user until dismissed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

#[derive(Debug, Clone)]
pub enum Action {
    SelectTab(Tab),
    ToggleMenu,
    AddIngredient(String),
    RemoveIngredient(usize),
    TogglePreference(DietaryPreference),
    SetMealType(MealType),
    SetCookingTime(CookingTime),
    SetServings(i64),
    DismissNotice,
    BeginRequest(RequestKind),
    RecipeGenerated(Ticket, Recipe),
    MealPlanGenerated(Ticket, MealPlan),
    SavedRecipesLoaded(Ticket, Vec<Recipe>),
    RequestFailed {
        kind: RequestKind,
        ticket: Ticket,
        error: String,
    },
}

/// How the reducer treated an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Applied,
    /// A generation call is already in flight.
    Busy,
    /// The action was refused and left the state untouched, apart from any notice.
    /// Replies to superseded requests are refused this way.
    Rejected,
}

/// Everything the page shows. Both result slots survive tab switches.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClientState {
    pub navigation: Navigation,
    pub form: FormModel,
    pub recipe: Option<Recipe>,
    pub meal_plan: Option<MealPlan>,
    pub saved_recipes: Vec<Recipe>,
    pub in_flight: bool,
    pub requests: RequestStatuses,
    #[serde(skip)]
    pub tickets: RequestTickets,
    pub notice: Option<Notice>,
}

impl ClientState {
    pub fn can_generate(&self) -> bool {
        !self.in_flight && !self.form.ingredients().is_empty()
    }

    pub fn apply(&mut self, action: Action) -> Dispatch {
        match action {
            Action::SelectTab(tab) => self.navigation.select(tab),
            Action::ToggleMenu => self.navigation.toggle_menu(),
            Action::AddIngredient(text) => {
                if !self.form.add_ingredient(&text) {
                    return Dispatch::Rejected;
                }
            }
            Action::RemoveIngredient(index) => {
                if !self.form.remove_ingredient(index) {
                    return Dispatch::Rejected;
                }
            }
            Action::TogglePreference(pref) => {
                self.form.toggle_preference(pref);
            }
            Action::SetMealType(meal_type) => self.form.set_meal_type(meal_type),
            Action::SetCookingTime(cooking_time) => self.form.set_cooking_time(cooking_time),
            Action::SetServings(n) => {
                self.form.set_servings(n);
            }
            Action::DismissNotice => self.notice = None,
            Action::BeginRequest(kind) => return self.begin_request(kind),
            Action::RecipeGenerated(ticket, recipe) => {
                if !self.is_latest(RequestKind::Recipe, ticket) {
                    return Dispatch::Rejected;
                }
                self.recipe = Some(recipe);
                self.settle(RequestKind::Recipe, RequestStatus::Succeeded);
            }
            Action::MealPlanGenerated(ticket, plan) => {
                if !self.is_latest(RequestKind::MealPlan, ticket) {
                    return Dispatch::Rejected;
                }
                self.meal_plan = Some(plan);
                self.settle(RequestKind::MealPlan, RequestStatus::Succeeded);
            }
            Action::SavedRecipesLoaded(ticket, recipes) => {
                if !self.is_latest(RequestKind::SavedRecipes, ticket) {
                    return Dispatch::Rejected;
                }
                self.saved_recipes = recipes;
                self.settle(RequestKind::SavedRecipes, RequestStatus::Succeeded);
            }
            Action::RequestFailed {
                kind,
                ticket,
                error,
            } => {
                if !self.is_latest(kind, ticket) {
                    return Dispatch::Rejected;
                }
                let message = match kind {
                    RequestKind::Recipe => Some(RECIPE_FAILURE_MESSAGE),
                    RequestKind::MealPlan => Some(MEAL_PLAN_FAILURE_MESSAGE),
                    RequestKind::SavedRecipes => None,
                };
                if let Some(message) = message {
                    self.notice = Some(Notice {
                        kind: NoticeKind::Network,
                        message: message.to_string(),
                    });
                }
                self.settle(kind, RequestStatus::Failed(error));
            }
        }
        Dispatch::Applied
    }

    fn begin_request(&mut self, kind: RequestKind) -> Dispatch {
        if kind.uses_in_flight() {
            if self.in_flight {
                return Dispatch::Busy;
            }
            if let Err(errors) = self.form.generation_request().validate() {
                let message = validation_message(&errors);
                warn!("Refusing to send {:?} request: {}", kind, message);
                self.notice = Some(Notice {
                    kind: NoticeKind::Validation,
                    message,
                });
                return Dispatch::Rejected;
            }
            self.in_flight = true;
        }
        self.tickets.issue(kind);
        self.requests.set(kind, RequestStatus::Pending);
        Dispatch::Applied
    }

    fn is_latest(&self, kind: RequestKind, ticket: Ticket) -> bool {
        let latest = self.tickets.latest(kind);
        if ticket != latest {
            debug!(
                "Dropping stale {:?} reply (ticket {}, latest {})",
                kind, ticket, latest
            );
        }
        ticket == latest
    }

    fn settle(&mut self, kind: RequestKind, status: RequestStatus) {
        if kind.uses_in_flight() {
            self.in_flight = false;
        }
        self.requests.set(kind, status);
    }
}

fn validation_message(errors: &ValidationErrors) -> String {
    let fields = errors.field_errors();
    ["ingredients", "servings"]
        .iter()
        .filter_map(|field| fields.get(*field))
        .flat_map(|field_errors| field_errors.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| errors.to_string())
}

/// Shared client state. All writes go through [`Store::dispatch`].
#[derive(Debug, Clone, Default)]
pub struct Store {
    state: Arc<RwLock<ClientState>>,
}

impl Store {
    pub async fn dispatch(&self, action: Action) -> Dispatch {
        let mut state = self.state.write().await;
        Self::apply_logged(&mut state, action)
    }

    /// Dispatches `action` and, if it was applied, reads from the resulting state
    /// under the same lock.
    pub async fn dispatch_then<R>(
        &self,
        action: Action,
        read: impl FnOnce(&ClientState) -> R,
    ) -> Result<R, Dispatch> {
        let mut state = self.state.write().await;
        match Self::apply_logged(&mut state, action) {
            Dispatch::Applied => Ok(read(&state)),
            other => Err(other),
        }
    }

    pub async fn read<R>(&self, read: impl FnOnce(&ClientState) -> R) -> R {
        let state = self.state.read().await;
        read(&state)
    }

    pub async fn snapshot(&self) -> ClientState {
        self.state.read().await.clone()
    }

    fn apply_logged(state: &mut ClientState, action: Action) -> Dispatch {
        let name = action_name(&action);
        let result = state.apply(action);
        debug!(action = name, result = ?result, in_flight = state.in_flight, "Dispatched action");
        result
    }
}

fn action_name(action: &Action) -> &'static str {
    match action {
        Action::SelectTab(_) => "select_tab",
        Action::ToggleMenu => "toggle_menu",
        Action::AddIngredient(_) => "add_ingredient",
        Action::RemoveIngredient(_) => "remove_ingredient",
        Action::TogglePreference(_) => "toggle_preference",
        Action::SetMealType(_) => "set_meal_type",
        Action::SetCookingTime(_) => "set_cooking_time",
        Action::SetServings(_) => "set_servings",
        Action::DismissNotice => "dismiss_notice",
        Action::BeginRequest(_) => "begin_request",
        Action::RecipeGenerated(..) => "recipe_generated",
        Action::MealPlanGenerated(..) => "meal_plan_generated",
        Action::SavedRecipesLoaded(..) => "saved_recipes_loaded",
        Action::RequestFailed { .. } => "request_failed",
    }
}
