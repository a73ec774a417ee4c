//! IIS administration through `appcmd.exe`.
//!
//! The [`IisAdmin`] trait decouples the run from the live server so tests
//! can use an in-memory admin that records created pools and bindings.

use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use tracing::{info, instrument};

use crate::core::pool::PoolSettings;
use crate::io::process::{DEFAULT_OUTPUT_LIMIT_BYTES, run_command};

const APPCMD_TIMEOUT: Duration = Duration::from_secs(60);

/// Administration surface for application pools and site bindings.
pub trait IisAdmin {
    /// Names of every configured application pool.
    fn pool_names(&self) -> Result<Vec<String>>;
    /// Create a pool with the given settings. Fails if the name is taken.
    fn create_pool(&self, name: &str, settings: &PoolSettings) -> Result<()>;
    /// Assign `pool` to the application at `app_path` under `site`.
    fn assign_pool(&self, site: &str, app_path: &str, pool: &str) -> Result<()>;
    /// Turn on 32-bit worker processes for an existing pool.
    fn enable_32bit(&self, pool: &str) -> Result<()>;
}

/// Admin backed by `%windir%\system32\inetsrv\appcmd.exe`.
pub struct AppCmd {
    exe: PathBuf,
}

impl AppCmd {
    /// Locate `appcmd.exe` from the `windir` environment variable.
    pub fn from_env() -> Result<Self> {
        let windir = std::env::var("windir").context("read windir environment variable")?;
        let exe = PathBuf::from(windir)
            .join("system32")
            .join("inetsrv")
            .join("appcmd.exe");
        Ok(Self { exe })
    }

    fn run(&self, args: &[String]) -> Result<String> {
        let mut cmd = Command::new(&self.exe);
        cmd.args(args);
        let output = run_command(cmd, Some(APPCMD_TIMEOUT), DEFAULT_OUTPUT_LIMIT_BYTES)
            .with_context(|| format!("run {}", self.exe.display()))?;
        if !output.status.success() {
            // appcmd reports its failure reason on stdout.
            let stdout = output.stdout_text();
            let detail = if stdout.trim().is_empty() {
                output.stderr_text()
            } else {
                stdout
            };
            return Err(anyhow!(
                "appcmd {} failed: {}",
                args.first().map(String::as_str).unwrap_or_default(),
                detail.trim()
            ));
        }
        Ok(output.stdout_text())
    }
}

/// Arguments listing bare pool names, one per line.
fn list_pools_args() -> Vec<String> {
    vec![
        "list".to_string(),
        "apppool".to_string(),
        "/text:APPPOOL.NAME".to_string(),
    ]
}

/// Arguments creating a pool with the given runtime settings.
fn add_pool_args(name: &str, settings: &PoolSettings) -> Vec<String> {
    vec![
        "add".to_string(),
        "apppool".to_string(),
        format!("/name:{name}"),
        format!("/managedRuntimeVersion:{}", settings.runtime_version),
        format!("/managedPipelineMode:{}", settings.pipeline_mode),
        format!("/enable32BitAppOnWin64:{}", settings.enable_32bit),
    ]
}

/// Arguments binding the application at `site` + `app_path` to `pool`.
/// appcmd addresses applications as `<site><path>`, e.g. `Viewer/Viewer`.
fn assign_pool_args(site: &str, app_path: &str, pool: &str) -> Vec<String> {
    vec![
        "set".to_string(),
        "app".to_string(),
        format!("{site}{app_path}"),
        format!("/applicationPool:{pool}"),
    ]
}

fn enable_32bit_args(pool: &str) -> Vec<String> {
    vec![
        "set".to_string(),
        "apppool".to_string(),
        format!("/apppool.name:{pool}"),
        "/enable32BitAppOnWin64:true".to_string(),
    ]
}

impl IisAdmin for AppCmd {
    #[instrument(skip(self))]
    fn pool_names(&self) -> Result<Vec<String>> {
        let text = self.run(&list_pools_args())?;
        Ok(text
            .lines()
            .map(|line| line.trim_end_matches('\r').to_string())
            .filter(|line| !line.is_empty())
            .collect())
    }

    #[instrument(skip(self, settings))]
    fn create_pool(&self, name: &str, settings: &PoolSettings) -> Result<()> {
        self.run(&add_pool_args(name, settings))?;
        info!(pool = name, "application pool created");
        Ok(())
    }

    #[instrument(skip(self))]
    fn assign_pool(&self, site: &str, app_path: &str, pool: &str) -> Result<()> {
        self.run(&assign_pool_args(site, app_path, pool))?;
        info!(site, app_path, pool, "application bound to pool");
        Ok(())
    }

    #[instrument(skip(self))]
    fn enable_32bit(&self, pool: &str) -> Result<()> {
        self.run(&enable_32bit_args(pool))?;
        info!(pool, "32-bit worker processes enabled");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_pool_args_carry_the_fixed_settings() {
        let args = add_pool_args("Viewer", &PoolSettings::default());
        assert_eq!(
            args,
            vec![
                "add",
                "apppool",
                "/name:Viewer",
                "/managedRuntimeVersion:v4.0",
                "/managedPipelineMode:Integrated",
                "/enable32BitAppOnWin64:true",
            ]
        );
    }

    #[test]
    fn assign_pool_args_join_site_and_path() {
        let args = assign_pool_args("Viewer", "/Services", "ServicesAlt");
        assert_eq!(
            args,
            vec!["set", "app", "Viewer/Services", "/applicationPool:ServicesAlt"]
        );
    }

    #[test]
    fn enable_32bit_args_address_the_pool_by_name() {
        let args = enable_32bit_args("DefaultAppPool");
        assert_eq!(
            args,
            vec![
                "set",
                "apppool",
                "/apppool.name:DefaultAppPool",
                "/enable32BitAppOnWin64:true",
            ]
        );
    }
}
