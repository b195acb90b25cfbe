//! Session-persisted models.

pub mod session;
