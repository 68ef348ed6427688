//! Backend test support utilities
//!
//! Shared by the backend's integration test binaries: logging bootstrap,
//! unique name helpers and piece token fixtures. Nothing here depends on
//! backend types.

pub mod fixtures;
pub mod logging;
pub mod unique_helpers;
