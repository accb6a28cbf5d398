//! Port traits defining external boundaries.
//!
//! The audit core reads text sources and lists directories only through these
//! traits. Implementations live in `src/adapters/`.

pub mod filesystem;

pub use filesystem::FileSystem;
