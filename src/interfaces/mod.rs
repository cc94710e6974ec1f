//! Interface layer: role-gated screen controllers

pub mod screens;

pub use screens::{Access, AccessDenied, AppContext, Screen, ScreenError, ScreenId, ScreenResult, ScreenScope};
