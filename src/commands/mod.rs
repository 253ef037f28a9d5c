//! Command boundary
//!
//! The layer the UI talks to. Commands return typed errors; the caller
//! renders them as warnings via `ErrorResponse` and never crashes on them.

pub mod forecast;
pub mod location;
pub mod readings;
