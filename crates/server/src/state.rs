use std::sync::Arc;

use service::news::repository::memory::MemoryNewsRepository;
use service::{NewsRepository, NewsResourceService};

/// News service over whichever store was configured at startup.
pub type NewsService = NewsResourceService<dyn NewsRepository>;

#[derive(Clone)]
pub struct ServerState {
    pub news: NewsService,
}

impl ServerState {
    pub fn new(repo: Arc<dyn NewsRepository>) -> Self {
        Self { news: NewsResourceService::new(repo) }
    }

    /// State backed by a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryNewsRepository::new()))
    }
}
