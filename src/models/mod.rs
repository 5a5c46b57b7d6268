pub mod api;
pub mod submission;
