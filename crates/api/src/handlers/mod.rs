pub mod stories;
pub mod uploads;
