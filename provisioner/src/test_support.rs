//! Test-only scripted adapters for driving the provisioning run.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};

use crate::core::access::AccessRule;
use crate::core::pool::PoolSettings;
use crate::io::acl::AclWriter;
use crate::io::appcmd::IisAdmin;
use crate::io::console::Console;
use crate::io::regiis::RegistrationTool;
use crate::io::services::ServerProbe;

/// Probe with fixed answers.
pub struct FakeProbe {
    pub installed: bool,
    pub major_version: u32,
}

impl ServerProbe for FakeProbe {
    fn service_installed(&self, _name: &str) -> Result<bool> {
        Ok(self.installed)
    }

    fn iis_major_version(&self) -> Result<u32> {
        Ok(self.major_version)
    }
}

/// In-memory admin recording created pools and bindings.
#[derive(Default)]
pub struct FakeAdmin {
    pub pools: RefCell<Vec<(String, PoolSettings)>>,
    /// (site, app_path, pool) triples in assignment order.
    pub bindings: RefCell<Vec<(String, String, String)>>,
}

impl FakeAdmin {
    /// Admin pre-seeded with existing pools (default settings).
    pub fn with_pools(names: &[&str]) -> Self {
        let admin = Self::default();
        for name in names {
            admin
                .pools
                .borrow_mut()
                .push(((*name).to_string(), PoolSettings::default()));
        }
        admin
    }

    /// Settings of the named pool, if it exists.
    pub fn pool(&self, name: &str) -> Option<PoolSettings> {
        self.pools
            .borrow()
            .iter()
            .find(|(pool, _)| pool == name)
            .map(|(_, settings)| settings.clone())
    }
}

impl IisAdmin for FakeAdmin {
    fn pool_names(&self) -> Result<Vec<String>> {
        Ok(self
            .pools
            .borrow()
            .iter()
            .map(|(name, _)| name.clone())
            .collect())
    }

    fn create_pool(&self, name: &str, settings: &PoolSettings) -> Result<()> {
        let mut pools = self.pools.borrow_mut();
        if pools.iter().any(|(pool, _)| pool == name) {
            return Err(anyhow!("application pool {name} already exists"));
        }
        pools.push((name.to_string(), settings.clone()));
        Ok(())
    }

    fn assign_pool(&self, site: &str, app_path: &str, pool: &str) -> Result<()> {
        self.bindings.borrow_mut().push((
            site.to_string(),
            app_path.to_string(),
            pool.to_string(),
        ));
        Ok(())
    }

    fn enable_32bit(&self, pool: &str) -> Result<()> {
        let mut pools = self.pools.borrow_mut();
        let entry = pools
            .iter_mut()
            .find(|(name, _)| name == pool)
            .ok_or_else(|| anyhow!("no application pool named {pool}"))?;
        entry.1.enable_32bit = true;
        Ok(())
    }
}

/// ACL writer recording grants, optionally failing every call.
#[derive(Default)]
pub struct FakeAcl {
    pub fail_with: Option<String>,
    pub grants: RefCell<Vec<(PathBuf, AccessRule)>>,
}

impl AclWriter for FakeAcl {
    fn grant(&self, dir: &Path, rule: &AccessRule) -> Result<()> {
        if let Some(message) = &self.fail_with {
            return Err(anyhow!("{message}"));
        }
        self.grants
            .borrow_mut()
            .push((dir.to_path_buf(), rule.clone()));
        Ok(())
    }
}

/// Registration tool returning a scripted stderr capture.
pub struct FakeRegistration {
    pub stderr: String,
}

impl RegistrationTool for FakeRegistration {
    fn install(&self) -> Result<String> {
        Ok(self.stderr.clone())
    }
}

/// Console fed from a queue of input lines, recording the transcript.
/// Exhausted input reads as empty lines, like a closed stdin.
#[derive(Default)]
pub struct ScriptedConsole {
    pub input: RefCell<VecDeque<String>>,
    pub transcript: RefCell<Vec<String>>,
}

impl ScriptedConsole {
    pub fn with_input(lines: &[&str]) -> Self {
        Self {
            input: RefCell::new(lines.iter().map(|line| (*line).to_string()).collect()),
            transcript: RefCell::default(),
        }
    }

    /// Whether any transcript line contains `needle`.
    pub fn said(&self, needle: &str) -> bool {
        self.transcript
            .borrow()
            .iter()
            .any(|line| line.contains(needle))
    }
}

impl Console for ScriptedConsole {
    fn say(&self, message: &str) {
        self.transcript.borrow_mut().push(message.to_string());
    }

    fn read_line(&self) -> Result<String> {
        Ok(self.input.borrow_mut().pop_front().unwrap_or_default())
    }

    fn acknowledge(&self) -> Result<()> {
        Ok(())
    }
}
