pub mod report;
pub mod response;

use std::sync::Arc;

use crate::model::pay_group::RateTable;
use crate::store::PayrollStore;

/// Shared by every worker; nothing in here changes after startup.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PayrollStore>,
    pub rates: Arc<RateTable>,
    pub max_upload_bytes: usize,
}
