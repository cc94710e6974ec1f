//! Page sources

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::{WorkplacePageResponse, WorkplaceRecord};
use crate::infrastructure::ApiClient;
use crate::shared::{LoadError, Page, PagingState};

/// Something that can produce page `page` of size `page_size`
#[async_trait]
pub trait PageSource: Send + Sync {
    type Item: Clone + Send + Sync;

    async fn load(&self, page: u32, page_size: u32) -> Result<Page<Self::Item>, LoadError>;

    /// Page to reload after invalidation, given the loaded pages and anchor
    fn refresh_key(&self, state: &PagingState<'_, Self::Item>) -> Option<u32> {
        state.refresh_key()
    }
}

/// Workplace list backed by `GET /api/workplace?page&pageSize`
pub struct WorkplacePagingSource {
    client: Arc<ApiClient>,
}

impl WorkplacePagingSource {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageSource for WorkplacePagingSource {
    type Item = WorkplaceRecord;

    async fn load(&self, page: u32, page_size: u32) -> Result<Page<WorkplaceRecord>, LoadError> {
        let response = self
            .client
            .list_workplaces(page, page_size)
            .await
            .map_err(|source| LoadError { page, source })?;

        let page = workplace_page(&response, page, page_size);
        debug!(
            "Loaded workplace page {} ({} records, total {})",
            page.page,
            page.len(),
            page.total
        );
        Ok(page)
    }
}

/// Normalize a list response into a keyed page
pub fn workplace_page(
    response: &WorkplacePageResponse,
    page: u32,
    page_size: u32,
) -> Page<WorkplaceRecord> {
    Page::new(response.records(), page, page_size, response.total)
}
