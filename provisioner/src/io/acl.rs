//! Directory ACL writes through `icacls.exe`.

use std::path::Path;
use std::process::Command;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use tracing::{info, instrument};

use crate::core::access::{AccessEffect, AccessRights, AccessRule};
use crate::io::process::{DEFAULT_OUTPUT_LIMIT_BYTES, run_command};

const ACL_TIMEOUT: Duration = Duration::from_secs(120);

/// Writes directory access-control entries.
pub trait AclWriter {
    /// Apply `rule` to `dir`; the inheritance flags make it flow to
    /// everything created under it.
    fn grant(&self, dir: &Path, rule: &AccessRule) -> Result<()>;
}

/// ACL writer backed by `icacls.exe`.
pub struct Icacls;

/// Render the icacls rights specification, e.g. `IIS_IUSRS:(OI)(CI)F`.
///
/// `(OI)` and `(CI)` carry the rule's inheritance scope; the trailing
/// letter follows the icacls simple-rights table.
fn rights_spec(rule: &AccessRule) -> String {
    let mut spec = format!("{}:", rule.identity);
    if rule.object_inherit {
        spec.push_str("(OI)");
    }
    if rule.container_inherit {
        spec.push_str("(CI)");
    }
    spec.push(match rule.rights {
        AccessRights::FullControl => 'F',
        AccessRights::Modify => 'M',
        AccessRights::Read => 'R',
    });
    spec
}

impl AclWriter for Icacls {
    #[instrument(skip(self, rule), fields(dir = %dir.display(), identity = %rule.identity))]
    fn grant(&self, dir: &Path, rule: &AccessRule) -> Result<()> {
        let verb = match rule.effect {
            AccessEffect::Allow => "/grant",
            AccessEffect::Deny => "/deny",
        };
        let mut cmd = Command::new("icacls.exe");
        cmd.arg(dir).arg(verb).arg(rights_spec(rule));
        let output =
            run_command(cmd, Some(ACL_TIMEOUT), DEFAULT_OUTPUT_LIMIT_BYTES).context("run icacls")?;
        if !output.status.success() {
            // icacls reports "path not found" style failures on stderr.
            return Err(anyhow!(
                "icacls failed on {}: {}",
                dir.display(),
                output.stderr_text().trim()
            ));
        }
        info!("access rule applied");
        Ok(())
    }
}
