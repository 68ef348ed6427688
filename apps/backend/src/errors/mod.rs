//! Error handling for the game backend.

pub mod domain;
pub mod error_code;
#[cfg(test)]
mod tests_error_mapping;

pub use domain::{DomainError, ErrorKind};
pub use error_code::ErrorCode;
