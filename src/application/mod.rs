//! Application layer: use-cases orchestrating the API client and the
//! session store

pub mod identity;
pub mod paging;
pub mod workplace;

pub use identity::{AuthService, LoginOutcome, UserService};
pub use paging::{LoadOutcome, LoadState, PageSource, Pager, WorkplacePagingSource};
pub use workplace::{decode_qr, CreatedWorkplace, WorkplaceService};
