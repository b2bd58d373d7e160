//! Thread-blocking facade over [`ViewContentFetcher`].
//!
//! Each call drives the async operation to completion on a private
//! current-thread runtime, blocking the caller for the round-trip and the
//! full body copy. Do not call these from inside an async runtime.

use crate::error::ViewError;
use crate::fetcher::ViewContentFetcher;
use crate::types::{ImageFilters, TicketToken};
use tokio::runtime::{Builder, Runtime};

#[derive(Debug)]
pub struct BlockingViewContentFetcher {
    inner: ViewContentFetcher,
    runtime: Runtime,
}

impl BlockingViewContentFetcher {
    pub fn new(inner: ViewContentFetcher) -> Result<Self, ViewError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ViewError::configuration(format!("Failed to start runtime: {e}")))?;
        Ok(Self { inner, runtime })
    }

    pub fn inner(&self) -> &ViewContentFetcher {
        &self.inner
    }

    pub fn get_preview_thumbnail(
        &self,
        workbook_id: &str,
        view_id: &str,
    ) -> Result<Vec<u8>, ViewError> {
        self.runtime
            .block_on(self.inner.get_preview_thumbnail(workbook_id, view_id))
    }

    pub fn get_image(&self, workbook_id: &str, view_id: &str) -> Result<Vec<u8>, ViewError> {
        self.runtime
            .block_on(self.inner.get_image(workbook_id, view_id))
    }

    pub fn get_image_with_filters(
        &self,
        workbook_id: &str,
        view_id: &str,
        filters: &ImageFilters,
        ticket: &TicketToken,
    ) -> Result<Vec<u8>, ViewError> {
        self.runtime.block_on(
            self.inner
                .get_image_with_filters(workbook_id, view_id, filters, ticket),
        )
    }

    pub fn get_data(&self, view_id: &str) -> Result<String, ViewError> {
        self.runtime.block_on(self.inner.get_data(view_id))
    }
}
