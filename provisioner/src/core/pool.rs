//! Application pool settings and name-collision checking.

use std::fmt;

/// Managed pipeline mode for an application pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineMode {
    Integrated,
    Classic,
}

impl fmt::Display for PipelineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineMode::Integrated => write!(f, "Integrated"),
            PipelineMode::Classic => write!(f, "Classic"),
        }
    }
}

/// Runtime settings applied to every pool this tool creates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSettings {
    /// Managed runtime version, e.g. `v4.0`.
    pub runtime_version: String,
    pub pipeline_mode: PipelineMode,
    /// Allow 32-bit worker processes on a 64-bit host.
    pub enable_32bit: bool,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            runtime_version: "v4.0".to_string(),
            pipeline_mode: PipelineMode::Integrated,
            enable_32bit: true,
        }
    }
}

/// Whether `candidate` collides with a configured pool name.
///
/// Matching is a case-sensitive exact comparison. Empty and
/// whitespace-only candidates never collide, so a blank interactive
/// submission is accepted as a pool name (legacy installer behavior,
/// kept as-is).
pub fn name_taken(existing: &[String], candidate: &str) -> bool {
    if candidate.trim().is_empty() {
        return false;
    }
    existing.iter().any(|name| name == candidate)
}
