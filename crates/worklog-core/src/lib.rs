//! Core types for the worklog system.
//!
//! Tasks, links and comments, the enumerations they carry, query filters,
//! validation rules, the list codec used for array-valued columns, and ID
//! generation. Nothing in this crate performs I/O.

pub mod codec;
pub mod comment;
pub mod enums;
pub mod filter;
pub mod idgen;
pub mod link;
pub mod task;
pub mod validation;
