pub mod address;
pub mod signal;
