/*!
 * Core Module
 * Error types and synchronization primitives
 */

pub mod errors;
pub mod sync;

// Re-export for convenience
pub use errors::*;
