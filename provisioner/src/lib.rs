//! One-shot provisioning of a Windows IIS server for a Viewer/Services
//! deployment.
//!
//! The run is a strict linear sequence: verify the web-publishing service,
//! negotiate two free application pool names interactively, create and bind
//! both pools, grant the worker identity access to the site content
//! directory, and register the managed runtime. Any failure surfaces as an
//! error to a single handler in `main`; nothing is rolled back.
//!
//! The architecture enforces a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (collision checks, fixed
//!   settings, the phase sequence). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting adapters over the platform administration
//!   tools, each behind a trait so tests can script them.
//!
//! [`provision`] coordinates core logic with I/O to implement the run.

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod provision;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
