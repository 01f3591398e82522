pub mod error;
pub mod lazy;
