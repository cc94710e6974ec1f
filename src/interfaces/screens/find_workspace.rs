use crate::application::{decode_qr, WorkplaceService};
use crate::domain::WorkplaceRecord;
use crate::shared::ClientError;

use super::{messages, AppContext, Screen, ScreenError, ScreenId, ScreenResult};

/// A found record with its decoded QR image
#[derive(Debug)]
pub struct FoundView {
    pub record: WorkplaceRecord,
    pub qr: Result<Vec<u8>, String>,
}

pub struct FindWorkspaceScreen {
    workplaces: WorkplaceService,
}

impl Screen for FindWorkspaceScreen {
    const ID: ScreenId = ScreenId::FindWorkspace;

    fn open(ctx: &AppContext) -> Self {
        Self {
            workplaces: WorkplaceService::new(ctx.client().clone()),
        }
    }
}

impl FindWorkspaceScreen {
    pub async fn search(&self, name: &str) -> ScreenResult<FoundView> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ScreenError::message(messages::NAME_REQUIRED));
        }

        let record = self
            .workplaces
            .find_by_name(name)
            .await
            .map_err(|e| ScreenError::from_client(e, lookup_failed))?;

        let qr = match decode_qr(&record) {
            Ok(Some(bytes)) => Ok(bytes),
            Ok(None) => Err(messages::QR_MISSING.to_string()),
            Err(e) => Err(messages::qr_failed(&e)),
        };

        Ok(FoundView { record, qr })
    }
}

/// Lookup failures shared by the find and edit screens
pub(super) fn lookup_failed(err: &ClientError) -> String {
    if err.is_not_found() {
        messages::WORKPLACE_NOT_FOUND.to_string()
    } else {
        messages::describe(err)
    }
}
