//! Shared request state.

use std::sync::Arc;

use deckrelay_anki_connect::Client;
use deckrelay_file_store::FileStore;

/// State handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub anki: Arc<Client>,
    pub store: Arc<FileStore>,
}

impl AppState {
    pub fn new(anki: Client, store: FileStore) -> Self {
        Self {
            anki: Arc::new(anki),
            store: Arc::new(store),
        }
    }
}
