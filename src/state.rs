use crate::store::ActivityStore;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<ActivityStore>>,
}

impl AppState {
    pub fn new(store: ActivityStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }
}
