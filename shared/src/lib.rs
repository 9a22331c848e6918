//! Shared types for the agency operations backend
//!
//! Common types used across crates: unified error codes, the API
//! response envelope, and time utilities.

pub mod error;
pub mod util;

// Re-exports
pub use axum::Json;
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use serde::{Deserialize, Serialize};
