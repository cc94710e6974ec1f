use crate::application::WorkplaceService;

use super::{messages, AppContext, Screen, ScreenError, ScreenId, ScreenResult};

pub struct DeleteWorkspaceScreen {
    workplaces: WorkplaceService,
}

impl Screen for DeleteWorkspaceScreen {
    const ID: ScreenId = ScreenId::DeleteWorkspace;

    fn open(ctx: &AppContext) -> Self {
        Self {
            workplaces: WorkplaceService::new(ctx.client().clone()),
        }
    }
}

impl DeleteWorkspaceScreen {
    /// Delete by name; returns the confirmation message
    pub async fn submit(&self, name: &str) -> ScreenResult<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ScreenError::message(messages::NAME_REQUIRED));
        }

        self.workplaces.delete_by_name(name).await.map_err(|e| {
            ScreenError::from_client(e, |e| {
                if e.status().is_some() {
                    messages::workplace_missing(name)
                } else {
                    messages::describe(e)
                }
            })
        })?;

        Ok(messages::workplace_deleted(name))
    }
}
