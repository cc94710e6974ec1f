//! User aggregate
//!
//! Accounts as listed by the user-administration endpoints, and the
//! registration request.

pub mod model;

mod dto_create;

pub use dto_create::CreateUserRequest;
pub use model::UserSummary;
