//! Core utilities shared by commands.

mod datetime;

pub use datetime::parse_history_date;
