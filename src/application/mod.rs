// Application layer - configuration, use cases and report assembly.
// The domain layer stays free of I/O; everything that reads input or
// applies user settings lives here.

pub mod config;
pub mod error;
pub mod reporting;
pub mod service;

pub use config::*;
pub use error::*;
pub use reporting::*;
pub use service::*;
