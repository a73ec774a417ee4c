//! Pure, deterministic provisioning logic. No I/O.

pub mod access;
pub mod pool;
pub mod step;
