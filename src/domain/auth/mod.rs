//! Authentication DTOs

mod dto_change_password;
mod dto_login;

pub use dto_change_password::ChangePasswordRequest;
pub use dto_login::{LoginRequest, LoginResponse};
