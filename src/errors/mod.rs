//! Centralized error handling for the Pluto TV proxy
//!
//! Unifies error types across the application layers: upstream provider
//! failures, configuration problems, and web-facing lookup errors. Every
//! upstream failure is non-fatal to the process; operations surface a
//! descriptive error and the caller (refresh job or HTTP handler) decides
//! what to do with the last known-good state.

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for provider/source Results
pub type SourceResult<T> = Result<T, SourceError>;
