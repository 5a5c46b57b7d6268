pub mod allocator;
pub mod counter;
