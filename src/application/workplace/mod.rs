//! Workplace management use-cases

pub mod service;

pub use service::{decode_qr, CreatedWorkplace, WorkplaceService};
