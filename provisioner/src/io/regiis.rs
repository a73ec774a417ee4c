//! ASP.NET IIS registration utility invocation.

use std::path::PathBuf;
use std::process::Command;

use anyhow::{Context, Result};
use tracing::{info, instrument};

use crate::io::process::{DEFAULT_OUTPUT_LIMIT_BYTES, run_command};

/// Registers the managed runtime with the web server.
pub trait RegistrationTool {
    /// Run the install step; returns whatever the tool wrote to stderr.
    fn install(&self) -> Result<String>;
}

/// `aspnet_regiis.exe -i` under the v4.0 framework directory.
pub struct AspnetRegiis {
    exe: PathBuf,
}

const FRAMEWORK_V4_DIR: &str = r"Microsoft.NET\Framework\v4.0.30319";

impl AspnetRegiis {
    /// Locate the utility from the `windir` environment variable.
    pub fn from_env() -> Result<Self> {
        let windir = std::env::var("windir").context("read windir environment variable")?;
        Ok(Self {
            exe: PathBuf::from(windir)
                .join(FRAMEWORK_V4_DIR)
                .join("aspnet_regiis.exe"),
        })
    }
}

impl RegistrationTool for AspnetRegiis {
    #[instrument(skip(self), fields(exe = %self.exe.display()))]
    fn install(&self) -> Result<String> {
        let mut cmd = Command::new(&self.exe);
        cmd.arg("-i");
        // Registration can take minutes; the wait is deliberately unbounded.
        // Output is piped, so the tool gets no console window of its own.
        let output = run_command(cmd, None, DEFAULT_OUTPUT_LIMIT_BYTES)
            .with_context(|| format!("run {}", self.exe.display()))?;
        info!(exit_code = ?output.status.code(), "aspnet_regiis finished");
        Ok(output.stderr_text())
    }
}
