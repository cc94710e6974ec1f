//! Authentication and authorization
//!
//! Token payload inspection and the per-request session guard.

pub mod clock;
pub mod guard;
pub mod jwt;

pub use clock::{Clock, FixedClock, SystemClock};
pub use guard::{Credential, SessionGuard, SessionSignal};
pub use jwt::{decode_claims, expires_at, is_expired, is_expired_at, TokenClaims, TokenError};
