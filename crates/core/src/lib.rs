//! Domain types and rules for the category grid service.
//!
//! Pure logic only: no I/O, no database, no HTTP.

pub mod access;
pub mod category;
pub mod error;
pub mod locale;
pub mod types;
pub mod upload;
pub mod validation;
