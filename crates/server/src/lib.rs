//! HTTP relay surface for deck archive import and export.
//!
//! Each request maps to exactly one handler invocation, which makes at
//! most one AnkiConnect call and at most one filesystem
//! read/write/delete sequence. There is no background processing and no
//! queuing; concurrency is whatever the runtime interleaves, with
//! same-path requests serialized by the file store's locks.

mod error;
mod export;
mod routes;
mod state;
mod status;
mod stream;
mod upload;

pub use error::ApiError;
pub use routes::{MAX_UPLOAD_SIZE, router};
pub use state::AppState;
