//! Workplace aggregate
//!
//! Contains the workplace record, its create/update DTO and the raw page
//! envelope returned by the list endpoint.

pub mod model;

mod dto_create;
mod page_response;

pub use dto_create::WorkplaceCreateDto;
pub use model::{parse_created_at, WorkplaceRecord, CREATED_AT_FORMAT};
pub use page_response::WorkplacePageResponse;
