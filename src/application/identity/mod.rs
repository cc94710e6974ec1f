//! Identity module: sign-in, password change and user administration

pub mod service;
pub mod users;

pub use service::{AuthService, LoginOutcome};
pub use users::UserService;
