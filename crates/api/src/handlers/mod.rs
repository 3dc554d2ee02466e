pub mod categories;
pub mod uploads;
