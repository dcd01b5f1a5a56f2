//! Request middleware and extractors.

pub mod caller;

pub use caller::{CALLER_HEADER, Caller};
