//! Utility functions and supporting infrastructure.
//!
//! Provides byte and bit cursors, error types, soft-failure diagnostics,
//! object id hashing and granule bookkeeping.

pub mod bitstream_io;
pub mod cursor;
pub mod diagnostics;
pub mod errors;
pub mod hash;
pub mod timing;
