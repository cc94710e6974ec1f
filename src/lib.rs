//! # Inventory client
//!
//! Client for the workplace inventory REST service.
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles:
//!
//! - **domain**: roles, workplace records and request/response DTOs
//! - **shared**: paging types and the error taxonomy
//! - **auth**: token expiry decoding and the session guard
//! - **infrastructure**: session storage and the HTTP client
//! - **application**: authentication, workplace and user services, paging
//! - **interfaces**: role-gated screen controllers

pub mod application;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod shared;
pub mod telemetry;

pub use config::{default_config_path, AppConfig};
pub use infrastructure::{ApiClient, FileSessionStore, InMemorySessionStore, SessionStore};
pub use interfaces::{Access, AppContext, ScreenId};
pub use shared::{ClientError, ClientResult};
pub use telemetry::init_tracing;
