//! Probes for the host web server: service presence and IIS version.

use std::process::Command;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, instrument};

use crate::io::process::{DEFAULT_OUTPUT_LIMIT_BYTES, run_command};

/// Well-known short name of the IIS web publishing service.
pub const WEB_PUBLISHING_SERVICE: &str = "W3SVC";

const PROBE_TIMEOUT: Duration = Duration::from_secs(30);

/// Queries the host for installed services and the IIS version.
pub trait ServerProbe {
    /// Whether a service with the given short name is installed.
    fn service_installed(&self, name: &str) -> Result<bool>;
    /// The IIS major version number.
    fn iis_major_version(&self) -> Result<u32>;
}

/// Probe backed by the platform tools `sc.exe` and `reg.exe`.
pub struct PlatformProbe;

impl ServerProbe for PlatformProbe {
    #[instrument(skip(self))]
    fn service_installed(&self, name: &str) -> Result<bool> {
        let mut cmd = Command::new("sc.exe");
        cmd.arg("query").arg(name);
        let output = run_command(cmd, Some(PROBE_TIMEOUT), DEFAULT_OUTPUT_LIMIT_BYTES)
            .context("query service manager")?;
        // sc.exe exits non-zero (1060) when no such service exists.
        debug!(exit_code = ?output.status.code(), "sc query finished");
        Ok(output.status.success())
    }

    #[instrument(skip(self))]
    fn iis_major_version(&self) -> Result<u32> {
        let mut cmd = Command::new("reg.exe");
        cmd.args([
            "query",
            r"HKLM\SOFTWARE\Microsoft\InetStp",
            "/v",
            "MajorVersion",
        ]);
        let output = run_command(cmd, Some(PROBE_TIMEOUT), DEFAULT_OUTPUT_LIMIT_BYTES)
            .context("query IIS version registry key")?;
        if !output.status.success() {
            return Err(anyhow!(
                "IIS version key not readable: {}",
                output.stderr_text().trim()
            ));
        }
        parse_reg_dword(&output.stdout_text())
            .ok_or_else(|| anyhow!("unexpected reg.exe output while reading the IIS version"))
    }
}

/// Extract the value from a `reg.exe query` REG_DWORD line, e.g.
/// `    MajorVersion    REG_DWORD    0xa` yields 10.
fn parse_reg_dword(text: &str) -> Option<u32> {
    for line in text.lines() {
        let mut fields = line.split_whitespace();
        let (Some(_name), Some(kind), Some(value)) = (fields.next(), fields.next(), fields.next())
        else {
            continue;
        };
        if kind != "REG_DWORD" {
            continue;
        }
        let digits = value.strip_prefix("0x")?;
        return u32::from_str_radix(digits, 16).ok();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_dword_from_reg_output() {
        let text = "\r\nHKEY_LOCAL_MACHINE\\SOFTWARE\\Microsoft\\InetStp\r\n    MajorVersion    REG_DWORD    0xa\r\n\r\n";
        assert_eq!(parse_reg_dword(text), Some(10));
    }

    #[test]
    fn ignores_lines_without_a_dword() {
        assert_eq!(parse_reg_dword("HKEY_LOCAL_MACHINE\\SOFTWARE"), None);
        assert_eq!(parse_reg_dword(""), None);
    }

    #[test]
    fn rejects_non_hex_values() {
        assert_eq!(parse_reg_dword("    MajorVersion    REG_DWORD    ten"), None);
    }
}
