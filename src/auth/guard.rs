//! Session/authorization guard
//!
//! Decides per outgoing request whether the stored credential is attached,
//! and per response whether the local session has to be dropped.

use std::sync::Arc;

use reqwest::{RequestBuilder, StatusCode};
use tracing::{debug, warn};

use super::clock::Clock;
use super::jwt::is_expired_at;
use crate::infrastructure::storage::{SessionStore, StorageResult};

/// State of the stored credential at a given instant
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    /// Present and not expired
    Valid(String),
    /// Present but expired or unreadable
    Expired,
    /// Nothing stored
    Absent,
}

/// What the caller must do with the local session after a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSignal {
    Keep,
    Clear,
}

pub struct SessionGuard {
    store: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
}

impl SessionGuard {
    pub fn new(store: Arc<dyn SessionStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Whether `token` is expired according to this guard's clock
    pub fn is_expired(&self, token: &str) -> bool {
        is_expired_at(token, self.clock.now())
    }

    /// Classify the stored credential
    pub fn credential(&self) -> StorageResult<Credential> {
        Ok(match self.store.token()? {
            None => Credential::Absent,
            Some(token) if token.is_empty() => Credential::Absent,
            Some(token) if self.is_expired(&token) => Credential::Expired,
            Some(token) => Credential::Valid(token),
        })
    }

    /// Attach `Authorization: Bearer <token>` when `credential` is present
    /// and not expired; pass the request through untouched otherwise.
    pub fn decorate_with(&self, request: RequestBuilder, credential: Option<&str>) -> RequestBuilder {
        match credential {
            Some(token) if !token.is_empty() && !self.is_expired(token) => request.bearer_auth(token),
            _ => request,
        }
    }

    /// Decorate `request` with the stored credential.
    ///
    /// An expired credential is never sent; it is cleared from the store and
    /// the request proceeds unauthenticated. Returns the token that was
    /// attached, if any.
    pub fn decorate(&self, request: RequestBuilder) -> StorageResult<(RequestBuilder, Option<String>)> {
        match self.credential()? {
            Credential::Valid(token) => {
                let request = self.decorate_with(request, Some(&token));
                Ok((request, Some(token)))
            }
            Credential::Expired => {
                warn!("Stored token expired, clearing session");
                self.clear_session()?;
                Ok((request, None))
            }
            Credential::Absent => Ok((request, None)),
        }
    }

    /// Session lifecycle decision for a response.
    ///
    /// Only a 401 on a request that carried a credential which is by now
    /// expired clears the session; a 401 for other reasons (e.g. missing
    /// role on the backend) leaves it alone.
    pub fn on_response(&self, status: StatusCode, attached: Option<&str>) -> SessionSignal {
        if status != StatusCode::UNAUTHORIZED {
            return SessionSignal::Keep;
        }
        match attached {
            Some(token) if self.is_expired(token) => SessionSignal::Clear,
            Some(_) => {
                debug!("401 with a live token, keeping session");
                SessionSignal::Keep
            }
            None => SessionSignal::Keep,
        }
    }

    /// Erase token and role atomically
    pub fn clear_session(&self) -> StorageResult<()> {
        self.store.clear_session()
    }

    /// Drop an expired stored credential. Returns whether a valid one remains.
    pub fn check_stored_credential(&self) -> StorageResult<bool> {
        match self.credential()? {
            Credential::Valid(_) => Ok(true),
            Credential::Expired => {
                warn!("Stored token expired on startup, clearing session");
                self.clear_session()?;
                Ok(false)
            }
            Credential::Absent => Ok(false),
        }
    }
}
