pub mod error;
pub mod projection;
pub mod types;

#[cfg(feature = "advisory")]
pub mod advisory;

#[cfg(feature = "comparison")]
pub mod comparison;

#[cfg(feature = "sensitivity")]
pub mod sensitivity;

pub use error::ProjectionError;
pub use types::*;

/// Standard result type for all projection operations
pub type ProjectionResult<T> = Result<T, ProjectionError>;
