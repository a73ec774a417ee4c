//! Side-effecting adapters over the platform administration tools.
//! Each surface is a trait so tests can substitute scripted fakes.

pub mod acl;
pub mod appcmd;
pub mod console;
pub mod process;
pub mod regiis;
pub mod services;
