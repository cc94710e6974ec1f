//! Workplace service: create, look up, edit and delete records

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::{info, warn};
use validator::Validate;

use crate::domain::{WorkplaceCreateDto, WorkplaceRecord};
use crate::infrastructure::ApiClient;
use crate::shared::{ClientError, ClientResult};

/// A freshly created record and, if it could be fetched, its QR image
#[derive(Debug)]
pub struct CreatedWorkplace {
    pub record: WorkplaceRecord,
    pub qr: Result<Vec<u8>, ClientError>,
}

pub struct WorkplaceService {
    client: Arc<ApiClient>,
}

impl WorkplaceService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Create a record, then fetch its QR image.
    ///
    /// A failed QR fetch does not undo or fail the creation.
    pub async fn create(&self, dto: &WorkplaceCreateDto) -> ClientResult<CreatedWorkplace> {
        dto.validate()?;

        let record = self.client.create_workplace(dto).await?;
        info!("Workplace {} created with id {}", record.name, record.id);

        let qr = self.client.workplace_qr(record.id).await;
        if let Err(e) = &qr {
            warn!("QR fetch for workplace {} failed: {}", record.id, e);
        }

        Ok(CreatedWorkplace { record, qr })
    }

    pub async fn qr(&self, id: i32) -> ClientResult<Vec<u8>> {
        self.client.workplace_qr(id).await
    }

    pub async fn find_by_name(&self, name: &str) -> ClientResult<WorkplaceRecord> {
        self.client.workplace_by_name(name).await
    }

    /// Full replacement of the record's editable fields
    pub async fn update(&self, id: i32, dto: &WorkplaceCreateDto) -> ClientResult<()> {
        dto.validate()?;
        self.client.update_workplace(id, dto).await?;
        info!("Workplace {} updated", id);
        Ok(())
    }

    pub async fn delete(&self, id: i32) -> ClientResult<()> {
        self.client.delete_workplace(id).await?;
        info!("Workplace {} deleted", id);
        Ok(())
    }

    pub async fn delete_by_name(&self, name: &str) -> ClientResult<()> {
        self.client.delete_workplace_by_name(name).await?;
        info!("Workplace {} deleted", name);
        Ok(())
    }
}

/// Decode the base64 QR image embedded in a record.
///
/// `Ok(None)` when the backend sent no QR payload.
pub fn decode_qr(record: &WorkplaceRecord) -> ClientResult<Option<Vec<u8>>> {
    let Some(encoded) = record.qr_code.as_deref() else {
        return Ok(None);
    };
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    Ok(Some(STANDARD.decode(compact)?))
}
