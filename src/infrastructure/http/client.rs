//! REST client for the inventory service
//!
//! One [`ApiClient`] is built from configuration at startup and shared by
//! handle (`Arc`) with every service. Each call performs exactly one round
//! trip; there is no retry.

use std::sync::Arc;

use reqwest::{Method, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::auth::{Clock, SessionGuard, SessionSignal, SystemClock};
use crate::config::ApiConfig;
use crate::domain::{
    ChangePasswordRequest, CreateUserRequest, LoginRequest, LoginResponse, UserSummary,
    WorkplaceCreateDto, WorkplacePageResponse, WorkplaceRecord,
};
use crate::infrastructure::storage::SessionStore;
use crate::shared::{ClientError, ClientResult};

pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    guard: SessionGuard,
}

impl ApiClient {
    /// Build a client using the wall clock
    pub fn new(config: &ApiConfig, store: Arc<dyn SessionStore>) -> ClientResult<Self> {
        Self::with_clock(config, store, Arc::new(SystemClock))
    }

    /// Build a client with an explicit time source.
    ///
    /// An expired credential found in `store` is cleared right away.
    pub fn with_clock(
        config: &ApiConfig,
        store: Arc<dyn SessionStore>,
        clock: Arc<dyn Clock>,
    ) -> ClientResult<Self> {
        let base_url = parse_base_url(&config.base_url)?;

        if config.accept_invalid_certs {
            warn!("TLS certificate verification is disabled for {}", base_url);
        }

        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .read_timeout(config.read_timeout())
            .timeout(config.request_timeout())
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        let guard = SessionGuard::new(store, clock);
        guard.check_stored_credential()?;

        Ok(Self {
            http,
            base_url,
            guard,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn guard(&self) -> &SessionGuard {
        &self.guard
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        self.guard.store()
    }

    // ── Auth ────────────────────────────────────────────────────

    pub async fn login(&self, request: &LoginRequest) -> ClientResult<LoginResponse> {
        let response = self
            .send(Method::POST, &["api", "auth", "login"], Some(request))
            .await?;
        decode_json(response).await
    }

    pub async fn change_initial_password(
        &self,
        request: &ChangePasswordRequest,
    ) -> ClientResult<LoginResponse> {
        let response = self
            .send(
                Method::POST,
                &["api", "auth", "change-initial-password"],
                Some(request),
            )
            .await?;
        decode_json(response).await
    }

    pub async fn register_user(&self, request: &CreateUserRequest) -> ClientResult<()> {
        self.send(Method::POST, &["api", "auth", "register"], Some(request))
            .await?;
        Ok(())
    }

    pub async fn list_users(&self) -> ClientResult<Vec<UserSummary>> {
        let response = self
            .send(Method::GET, &["api", "auth", "users"], None::<&()>)
            .await?;
        decode_json(response).await
    }

    pub async fn delete_user(&self, id: i32) -> ClientResult<()> {
        let id = id.to_string();
        self.send(Method::DELETE, &["api", "auth", "users", &id], None::<&()>)
            .await?;
        Ok(())
    }

    // ── Workplaces ──────────────────────────────────────────────

    pub async fn create_workplace(&self, dto: &WorkplaceCreateDto) -> ClientResult<WorkplaceRecord> {
        let response = self
            .send(Method::POST, &["api", "workplace"], Some(dto))
            .await?;
        decode_record(response).await
    }

    /// Raw QR image bytes for a workplace
    pub async fn workplace_qr(&self, id: i32) -> ClientResult<Vec<u8>> {
        let id = id.to_string();
        let response = self
            .send(Method::GET, &["api", "workplace", &id, "qr"], None::<&()>)
            .await?;
        Ok(response.bytes().await?.to_vec())
    }

    pub async fn delete_workplace(&self, id: i32) -> ClientResult<()> {
        let id = id.to_string();
        self.send(Method::DELETE, &["api", "workplace", &id], None::<&()>)
            .await?;
        Ok(())
    }

    pub async fn delete_workplace_by_name(&self, name: &str) -> ClientResult<()> {
        self.send(Method::DELETE, &["api", "workplace", "name", name], None::<&()>)
            .await?;
        Ok(())
    }

    pub async fn workplace_by_name(&self, name: &str) -> ClientResult<WorkplaceRecord> {
        let response = self
            .send(Method::GET, &["api", "workplace", "getname", name], None::<&()>)
            .await?;
        decode_record(response).await
    }

    pub async fn update_workplace(&self, id: i32, dto: &WorkplaceCreateDto) -> ClientResult<()> {
        let id = id.to_string();
        self.send(Method::PUT, &["api", "workplace", &id], Some(dto))
            .await?;
        Ok(())
    }

    pub async fn list_workplaces(
        &self,
        page: u32,
        page_size: u32,
    ) -> ClientResult<WorkplacePageResponse> {
        let mut url = self.endpoint(&["api", "workplace"])?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("pageSize", &page_size.to_string());

        let response = self.send_to(Method::GET, url, None::<&()>).await?;
        let body: Value = decode_json(response).await?;
        Ok(WorkplacePageResponse::from_value(&body))
    }

    // ── Plumbing ────────────────────────────────────────────────

    fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::Validation(format!("Base URL {} cannot hold a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> ClientResult<Response> {
        let url = self.endpoint(segments)?;
        self.send_to(method, url, body).await
    }

    /// Decorate, send, and run the response through the session guard.
    /// Non-2xx statuses become [`ClientError::Status`].
    async fn send_to<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> ClientResult<Response> {
        let path = url.path().to_string();
        let mut builder = self.http.request(method.clone(), url);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let (builder, attached) = self.guard.decorate(builder)?;

        debug!(
            "{} {} (authorized: {})",
            method,
            path,
            attached.is_some()
        );
        let response = builder.send().await?;
        let status = response.status();
        debug!("{} {} -> {}", method, path, status.as_u16());

        if self.guard.on_response(status, attached.as_deref()) == SessionSignal::Clear {
            warn!("Token expired during {} {}, clearing session", method, path);
            self.guard.clear_session()?;
            return Err(ClientError::SessionExpired);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status == StatusCode::INTERNAL_SERVER_ERROR {
                warn!("{} {} failed on the server: {}", method, path, body);
            }
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }
}

fn parse_base_url(raw: &str) -> ClientResult<Url> {
    let mut url =
        Url::parse(raw).map_err(|e| ClientError::Validation(format!("Invalid base URL {raw}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(ClientError::Validation(format!("Invalid base URL {raw}")));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
}

async fn decode_record(response: Response) -> ClientResult<WorkplaceRecord> {
    let body: Value = decode_json(response).await?;
    WorkplaceRecord::from_raw(&body)
        .ok_or_else(|| ClientError::Decode("workplace record has no workplaceID".to_string()))
}
