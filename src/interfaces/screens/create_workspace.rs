use crate::application::WorkplaceService;
use crate::domain::{WorkplaceCreateDto, WorkplaceRecord};

use super::{messages, AppContext, Screen, ScreenError, ScreenId, ScreenResult};

/// A created record with its QR image or the reason it is missing
#[derive(Debug)]
pub struct CreatedView {
    pub record: WorkplaceRecord,
    pub qr: Result<Vec<u8>, String>,
}

pub struct CreateWorkspaceScreen {
    workplaces: WorkplaceService,
}

impl Screen for CreateWorkspaceScreen {
    const ID: ScreenId = ScreenId::CreateWorkspace;

    fn open(ctx: &AppContext) -> Self {
        Self {
            workplaces: WorkplaceService::new(ctx.client().clone()),
        }
    }
}

impl CreateWorkspaceScreen {
    /// Name, location and PC are required before anything is sent
    pub fn is_form_valid(form: &WorkplaceCreateDto) -> bool {
        !form.name.trim().is_empty() && !form.location.trim().is_empty() && !form.pc.trim().is_empty()
    }

    pub async fn submit(&self, form: &WorkplaceCreateDto) -> ScreenResult<CreatedView> {
        if !Self::is_form_valid(form) {
            return Err(ScreenError::message(messages::REQUIRED_FIELDS));
        }

        let created = self.workplaces.create(form).await.map_err(|e| {
            ScreenError::from_client(e, |e| {
                if e.is_conflict() {
                    messages::workplace_exists(&form.name)
                } else {
                    messages::create_failed(e)
                }
            })
        })?;

        Ok(CreatedView {
            record: created.record,
            qr: created.qr.map_err(|e| messages::qr_failed(&e)),
        })
    }
}
