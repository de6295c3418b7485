use crate::{banner::RotatingBanner, orchestrator::Orchestrator, store::Store};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub orchestrator: Orchestrator,
    pub banner: Arc<RotatingBanner>,
}
