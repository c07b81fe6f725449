//! Filesystem helpers.

pub mod file_handler;
pub mod paths;
