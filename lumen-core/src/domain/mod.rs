pub mod cleaning;
pub mod error;
pub mod project;
pub mod quality;
pub mod record;

// Handy re-exports to keep imports short elsewhere
pub use error::DomainError;
