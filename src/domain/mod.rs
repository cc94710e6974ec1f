pub mod auth;
pub mod role;
pub mod user;
pub mod workplace;

// Re-export commonly used types
pub use auth::{ChangePasswordRequest, LoginRequest, LoginResponse};
pub use role::{Role, RoleSet};
pub use user::{CreateUserRequest, UserSummary};
pub use workplace::{WorkplaceCreateDto, WorkplacePageResponse, WorkplaceRecord};
