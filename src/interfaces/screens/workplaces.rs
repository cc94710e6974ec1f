//! Paged workplace list
//!
//! The first load behaves like a refresh and reports failures with the
//! "load" wording; later loads append and use the "append" wording.

use std::sync::Arc;

use crate::application::{LoadOutcome, Pager, WorkplacePagingSource};
use crate::domain::WorkplaceRecord;
use crate::shared::ClientError;

use super::{messages, AppContext, Screen, ScreenError, ScreenId, ScreenResult};

pub struct WorkplacesScreen {
    pager: Arc<Pager<WorkplacePagingSource>>,
}

impl Screen for WorkplacesScreen {
    const ID: ScreenId = ScreenId::Workplaces;

    fn open(ctx: &AppContext) -> Self {
        let source = WorkplacePagingSource::new(ctx.client().clone());
        Self {
            pager: Arc::new(Pager::new(source, ctx.page_size())),
        }
    }
}

impl WorkplacesScreen {
    /// Shared handle for tasks spawned in a [`super::ScreenScope`]
    pub fn pager(&self) -> Arc<Pager<WorkplacePagingSource>> {
        self.pager.clone()
    }

    pub fn items(&self) -> Vec<WorkplaceRecord> {
        self.pager.items()
    }

    /// Total reported by the most recent page, if any is loaded
    pub fn total(&self) -> Option<u64> {
        self.pager.pages().last().map(|page| page.total)
    }

    pub fn set_anchor(&self, position: usize) {
        self.pager.set_anchor(position);
    }

    /// Load the next page. `Ok(false)` once the end is reached.
    pub async fn load_more(&self) -> ScreenResult<bool> {
        let first = self.pager.pages().is_empty();
        let outcome = self.pager.load_next().await;
        outcome_to_result(outcome, first)
    }

    /// Drop everything and reload around the last anchor
    pub async fn refresh(&self) -> ScreenResult<bool> {
        let outcome = self.pager.refresh().await;
        outcome_to_result(outcome, true)
    }

    /// Load every remaining page
    pub async fn load_all(&self) -> ScreenResult<Vec<WorkplaceRecord>> {
        while self.load_more().await? {}
        Ok(self.items())
    }
}

fn outcome_to_result(outcome: LoadOutcome, first: bool) -> ScreenResult<bool> {
    match outcome {
        LoadOutcome::Loaded(_)
        | LoadOutcome::AlreadyLoaded(_)
        | LoadOutcome::Stale(_) => Ok(true),
        LoadOutcome::EndReached => Ok(false),
        LoadOutcome::Failed(e) => {
            if matches!(e.source, ClientError::SessionExpired) {
                return Err(ScreenError::SignInRequired);
            }
            let detail = messages::describe(&e.source);
            Err(ScreenError::Message(if first {
                messages::load_failed(&detail)
            } else {
                messages::append_failed(&detail)
            }))
        }
    }
}
