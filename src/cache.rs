use std::future::Future;

use tracing::debug;

use crate::{Document, KagError};

/// One memoized API document. Either empty or holding a complete response;
/// a refresh swaps the whole document and a failed fetch leaves it alone.
#[derive(Debug, Clone, Default)]
pub(crate) struct Cached {
    value: Option<Document>,
}

impl Cached {
    /// Returns the cached document, awaiting `fetch` only when forced or empty.
    pub(crate) async fn load<F>(&mut self, force: bool, fetch: F) -> Result<&Document, KagError>
    where
        F: Future<Output = Result<Document, KagError>>,
    {
        if force || self.value.is_none() {
            self.value = Some(fetch.await?);
        } else {
            debug!("Using cached document");
        }
        Ok(&*self.value.get_or_insert_with(Document::new))
    }

    pub(crate) fn get(&self) -> Option<&Document> {
        self.value.as_ref()
    }
}
