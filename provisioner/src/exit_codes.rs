//! Stable exit codes for provisioner CLI commands.

/// The run finished, or the fatal error path was taken after the operator
/// acknowledged the report. The legacy installer exits 0 in both cases
/// and callers depend on it, so the error path uses this code too.
pub const OK: i32 = 0;
