use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::AppConfig;
use crate::connectors::{CanvasClient, EpokClient, LadokClient, StudentItsClient};
use crate::services::RosterStore;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub canvas: Arc<dyn CanvasClient>,
    pub studentits: Arc<dyn StudentItsClient>,
    pub ladok: Arc<dyn LadokClient>,
    pub epok: Arc<dyn EpokClient>,
    pub store: Arc<RwLock<RosterStore>>,
}
