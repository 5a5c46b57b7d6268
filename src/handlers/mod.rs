pub mod fallback;
pub mod health;
pub mod pass_id;
pub mod submission;
