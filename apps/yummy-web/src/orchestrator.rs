use crate::store::{Action, Dispatch, RequestKind, Store, Ticket};
use recipe_backend_client::{BackendClient, BackendError, GenerationRequest, MealPlanRequest};
use tracing::{debug, error, info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generation {
    Recipe,
    MealPlan,
}

impl From<Generation> for RequestKind {
    fn from(generation: Generation) -> Self {
        match generation {
            Generation::Recipe => RequestKind::Recipe,
            Generation::MealPlan => RequestKind::MealPlan,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Claimed and handed to a background task.
    Started,
    Succeeded,
    Failed,
    /// Another generation was already in flight; nothing was sent.
    Busy,
    /// The form did not pass validation; nothing was sent.
    Invalid,
    /// A newer request of the same kind started meanwhile; this reply was dropped.
    Superseded,
}

/// Turns user actions into backend calls and routes the results into the store.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    store: Store,
    backend: BackendClient,
}

impl Orchestrator {
    pub fn new(store: Store, backend: BackendClient) -> Self {
        Self { store, backend }
    }

    /// Claims the in-flight flag now and runs the call on a background task, so
    /// the caller can answer immediately with the pending state in place.
    #[instrument(skip(self))]
    pub async fn spawn_generate(&self, generation: Generation) -> RequestOutcome {
        let (ticket, request) = match self.claim(generation).await {
            Ok(claimed) => claimed,
            Err(outcome) => return outcome,
        };

        let this = self.clone();
        tokio::spawn(async move {
            let outcome = this.finish(generation, ticket, request).await;
            debug!("Background {:?} generation settled: {:?}", generation, outcome);
        });
        RequestOutcome::Started
    }

    #[instrument(skip(self))]
    pub async fn refresh_saved_recipes(&self) -> RequestOutcome {
        let kind = RequestKind::SavedRecipes;
        let ticket = match self
            .store
            .dispatch_then(Action::BeginRequest(kind), |state| state.tickets.latest(kind))
            .await
        {
            Ok(ticket) => ticket,
            Err(dispatch) => {
                warn!("Saved recipes refresh refused: {:?}", dispatch);
                return RequestOutcome::Invalid;
            }
        };
        self.settle(kind, ticket, self.backend.list_recipes(), move |recipes| {
            Action::SavedRecipesLoaded(ticket, recipes)
        })
        .await
    }

    async fn claim(
        &self,
        generation: Generation,
    ) -> Result<(Ticket, GenerationRequest), RequestOutcome> {
        let kind = RequestKind::from(generation);
        self.store
            .dispatch_then(Action::BeginRequest(kind), |state| {
                (state.tickets.latest(kind), state.form.generation_request())
            })
            .await
            .map_err(|dispatch| match dispatch {
                Dispatch::Busy => {
                    debug!("Ignoring {:?} generation: request already in flight", generation);
                    RequestOutcome::Busy
                }
                _ => RequestOutcome::Invalid,
            })
    }

    async fn finish(
        &self,
        generation: Generation,
        ticket: Ticket,
        request: GenerationRequest,
    ) -> RequestOutcome {
        match generation {
            Generation::Recipe => {
                info!(
                    "Requesting recipe for {} ingredients",
                    request.ingredients.len()
                );
                let outcome = self
                    .settle(
                        RequestKind::Recipe,
                        ticket,
                        self.backend.generate_recipe(&request),
                        move |recipe| Action::RecipeGenerated(ticket, recipe),
                    )
                    .await;
                // Generated recipes are persisted by the backend.
                if outcome == RequestOutcome::Succeeded {
                    self.refresh_saved_recipes().await;
                }
                outcome
            }
            Generation::MealPlan => {
                let payload = MealPlanRequest::from(&request);
                info!(
                    "Requesting meal plan for {} ingredients",
                    payload.ingredients.len()
                );
                self.settle(
                    RequestKind::MealPlan,
                    ticket,
                    self.backend.generate_meal_plan(&payload),
                    move |plan| Action::MealPlanGenerated(ticket, plan),
                )
                .await
            }
        }
    }

    /// Awaits `call` and routes its result: `on_success` builds the action that
    /// fills the result slot, failures become [`Action::RequestFailed`]. The store
    /// drops either one if `ticket` has been superseded.
    async fn settle<T>(
        &self,
        kind: RequestKind,
        ticket: Ticket,
        call: impl Future<Output = Result<T, BackendError>>,
        on_success: impl FnOnce(T) -> Action,
    ) -> RequestOutcome {
        match call.await {
            Ok(value) => {
                if self.store.dispatch(on_success(value)).await != Dispatch::Applied {
                    info!("{:?} reply {} superseded by a newer request", kind, ticket);
                    return RequestOutcome::Superseded;
                }
                info!("{:?} request succeeded", kind);
                RequestOutcome::Succeeded
            }
            Err(e) => {
                if kind.uses_in_flight() {
                    error!("Error generating {:?}: {}", kind, e);
                } else {
                    warn!("Error fetching saved recipes: {}", e);
                }
                let failed = Action::RequestFailed {
                    kind,
                    ticket,
                    error: e.to_string(),
                };
                if self.store.dispatch(failed).await != Dispatch::Applied {
                    return RequestOutcome::Superseded;
                }
                RequestOutcome::Failed
            }
        }
    }
}
