pub mod conversion;
pub mod datetime;
pub mod file_name;
pub mod flush_gate;
pub mod formatting;
pub mod record;
pub mod schedule;
