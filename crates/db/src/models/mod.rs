//! Row types and DTOs.

pub mod category;
