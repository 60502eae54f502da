// Application layer - use cases and orchestration.
// Everything here is scoped to a single owner; identity is resolved by the caller.

pub mod error;
pub mod reporting;
pub mod service;

pub use error::*;
pub use reporting::*;
pub use service::*;
