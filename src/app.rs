//! Application state injected into every handler.

use std::sync::Arc;

use crate::api::EstimationApi;
use crate::form::FormController;
use crate::state::AppStores;

/// One client session: the form container and the stores it writes to.
///
/// The results page reads `stores` directly; the form only goes through
/// `form`.
pub struct AppState {
    pub form: FormController,
    pub stores: AppStores,
}

impl AppState {
    pub fn new(api: Arc<dyn EstimationApi>) -> Self {
        Self::with_stores(api, AppStores::default())
    }

    pub fn with_stores(api: Arc<dyn EstimationApi>, stores: AppStores) -> Self {
        Self {
            form: FormController::new(api, stores.clone()),
            stores,
        }
    }
}
