//! In-memory adapters for audits over fixtures.

pub mod filesystem;

pub use filesystem::InMemoryFileSystem;
