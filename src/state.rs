use crate::documents::DocumentService;
use crate::storage::DocumentStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub documents: Arc<DocumentService>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, profile_name: impl Into<String>) -> Self {
        Self {
            documents: Arc::new(DocumentService::new(store, profile_name)),
        }
    }
}
