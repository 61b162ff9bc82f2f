pub mod bank;
pub mod error;
pub mod session;
