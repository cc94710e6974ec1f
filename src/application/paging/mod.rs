//! Incremental loading of the workplace list

pub mod pager;
pub mod source;

pub use pager::{LoadOutcome, LoadState, Pager};
pub use source::{workplace_page, PageSource, WorkplacePagingSource};
