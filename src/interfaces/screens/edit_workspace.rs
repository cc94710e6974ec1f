use tokio::sync::Mutex;

use crate::application::WorkplaceService;
use crate::domain::{WorkplaceCreateDto, WorkplaceRecord};

use super::find_workspace::lookup_failed;
use super::{messages, AppContext, Screen, ScreenError, ScreenId, ScreenResult};

/// Fetch a record by name, edit its fields, save with a full update
pub struct EditWorkspaceScreen {
    workplaces: WorkplaceService,
    loaded: Mutex<Option<WorkplaceRecord>>,
}

impl Screen for EditWorkspaceScreen {
    const ID: ScreenId = ScreenId::EditWorkspace;

    fn open(ctx: &AppContext) -> Self {
        Self {
            workplaces: WorkplaceService::new(ctx.client().clone()),
            loaded: Mutex::new(None),
        }
    }
}

impl EditWorkspaceScreen {
    /// Load the record and return its editable fields
    pub async fn search(&self, name: &str) -> ScreenResult<WorkplaceCreateDto> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ScreenError::message(messages::NAME_REQUIRED));
        }

        let mut loaded = self.loaded.lock().await;
        *loaded = None;

        let record = self
            .workplaces
            .find_by_name(name)
            .await
            .map_err(|e| ScreenError::from_client(e, lookup_failed))?;

        let form = WorkplaceCreateDto::from(&record);
        *loaded = Some(record);
        Ok(form)
    }

    pub async fn loaded(&self) -> Option<WorkplaceRecord> {
        self.loaded.lock().await.clone()
    }

    /// Replace the loaded record's fields with `form`
    pub async fn save(&self, form: &WorkplaceCreateDto) -> ScreenResult<&'static str> {
        let mut loaded = self.loaded.lock().await;
        let id = loaded
            .as_ref()
            .map(|record| record.id)
            .ok_or_else(|| ScreenError::message(messages::SEARCH_FIRST))?;

        if form.name.trim().is_empty() {
            return Err(ScreenError::message(messages::NAME_REQUIRED));
        }

        self.workplaces.update(id, form).await.map_err(|e| {
            ScreenError::from_client(e, |e| match e.status() {
                Some(status) => messages::save_failed(status),
                None => messages::describe(e),
            })
        })?;

        if let Some(record) = loaded.as_mut() {
            record.name = form.name.clone();
            record.description = form.description.clone();
            record.location = form.location.clone();
            record.pc = form.pc.clone();
            record.monitor = form.monitor.clone();
            record.telephone = form.telephone.clone();
        }
        Ok(messages::SAVED)
    }
}
