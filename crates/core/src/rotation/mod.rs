//! Round-robin rotation over the pool.
//!
//! The cursor is the only mutable state shared between requests. It is
//! restored from the restart file at startup and written back at shutdown;
//! a crash in between loses only the advances since the last write.

pub mod cursor;
pub mod restart;

pub use cursor::RotationCursor;
pub use restart::RestartFile;
