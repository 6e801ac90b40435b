//! Streamed-download cleanup.

use std::io;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_util::Stream;
use tokio::fs::File;
use tokio_util::io::ReaderStream;

use deckrelay_file_store::{FileStore, PathGuard};

/// Response-body stream that removes the underlying file at EOF.
///
/// The delete happens only once the file has been read to the end; a
/// transfer that aborts mid-stream drops the wrapper early and leaves the
/// file on disk for inspection. The per-path guard is held until the
/// wrapper drops, so a concurrent export of the same deck cannot touch
/// the file while it is being streamed.
pub struct RemoveOnEof {
    inner: ReaderStream<File>,
    store: Arc<FileStore>,
    path: PathBuf,
    finished: bool,
    _guard: PathGuard,
}

impl RemoveOnEof {
    pub fn new(file: File, store: Arc<FileStore>, path: PathBuf, guard: PathGuard) -> Self {
        Self {
            inner: ReaderStream::new(file),
            store,
            path,
            finished: false,
            _guard: guard,
        }
    }
}

impl Stream for RemoveOnEof {
    type Item = io::Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.as_mut().get_mut();
        match Pin::new(&mut this.inner).poll_next(cx) {
            Poll::Ready(None) => {
                if !this.finished {
                    this.finished = true;
                    this.store.remove(&this.path);
                }
                Poll::Ready(None)
            }
            other => other,
        }
    }
}

impl Drop for RemoveOnEof {
    fn drop(&mut self) {
        if !self.finished {
            tracing::warn!(path = %self.path.display(), "transfer aborted, archive kept");
        }
    }
}
