use std::sync::Arc;

use tokio::sync::Mutex;

use crate::chat::CompletionClient;
use crate::config::Config;
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<Store>>,
    pub config: Config,
    pub llm: Arc<dyn CompletionClient>,
}

impl AppState {
    pub fn new(config: Config, llm: Arc<dyn CompletionClient>) -> Self {
        Self {
            store: Arc::new(Mutex::new(Store::new())),
            config,
            llm,
        }
    }
}
