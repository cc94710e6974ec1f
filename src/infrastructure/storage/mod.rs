//! Session store trait and implementations

mod file;
mod memory;
mod traits;

pub use file::FileSessionStore;
pub use memory::InMemorySessionStore;
pub use traits::{SessionState, SessionStore, StorageResult};
