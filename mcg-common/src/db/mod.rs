//! Database connection setup and row/batch primitives

pub mod init;
pub mod store;

pub use init::*;
pub use store::*;
