//! Command handlers, one module per command group.

pub mod comment;
pub mod link;
pub mod migrate;
pub mod task;
