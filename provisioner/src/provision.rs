//! Orchestration of the one-shot provisioning run.
//!
//! The adapters are constructed once at startup and threaded through as
//! parameters; there is no shared administration handle. Every failure
//! propagates as an error to the single handler in `main` — nothing
//! already committed to the server is rolled back.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use tracing::info;

use crate::core::access::AccessRule;
use crate::core::pool::{PoolSettings, name_taken};
use crate::core::step::Phase;
use crate::io::acl::AclWriter;
use crate::io::appcmd::IisAdmin;
use crate::io::console::Console;
use crate::io::regiis::RegistrationTool;
use crate::io::services::{ServerProbe, WEB_PUBLISHING_SERVICE};

pub const DEFAULT_SITE: &str = "Viewer";
pub const DEFAULT_VIEWER_APP_PATH: &str = "/Viewer";
pub const DEFAULT_SERVICES_APP_PATH: &str = "/Services";
pub const DEFAULT_VIEWER_POOL: &str = "Viewer";
pub const DEFAULT_SERVICES_POOL: &str = "Services";
pub const DEFAULT_CONTENT_DIR: &str = r"C:\inetpub\wwwroot\viewer";

/// Where the deployment lives on the server.
///
/// Both role applications are looked up under the one `site`; a two-site
/// deployment would pass a different layout, not change code.
#[derive(Debug, Clone)]
pub struct SiteLayout {
    /// Site both role applications live under.
    pub site: String,
    /// Application path for the viewer role.
    pub viewer_app_path: String,
    /// Application path for the services role.
    pub services_app_path: String,
    /// Content directory granted to the worker identity.
    pub content_dir: PathBuf,
    /// Initial pool name for the viewer role, renegotiated on collision.
    pub viewer_pool: String,
    /// Initial pool name for the services role, renegotiated on collision.
    pub services_pool: String,
}

impl Default for SiteLayout {
    fn default() -> Self {
        Self {
            site: DEFAULT_SITE.to_string(),
            viewer_app_path: DEFAULT_VIEWER_APP_PATH.to_string(),
            services_app_path: DEFAULT_SERVICES_APP_PATH.to_string(),
            content_dir: PathBuf::from(DEFAULT_CONTENT_DIR),
            viewer_pool: DEFAULT_VIEWER_POOL.to_string(),
            services_pool: DEFAULT_SERVICES_POOL.to_string(),
        }
    }
}

/// What a completed run decided and created.
#[derive(Debug, Clone)]
pub struct ProvisionOutcome {
    pub iis_major_version: u32,
    /// Pool name finally accepted for the viewer role.
    pub viewer_pool: String,
    /// Pool name finally accepted for the services role.
    pub services_pool: String,
}

/// Execute the whole provisioning sequence.
///
/// Phases run in [`Phase::SEQUENCE`] order; the first failure aborts the
/// run with everything already committed left in place.
pub fn run_provision<P, A, W, R, C>(
    probe: &P,
    admin: &A,
    acl: &W,
    registration: &R,
    console: &C,
    layout: &SiteLayout,
) -> Result<ProvisionOutcome>
where
    P: ServerProbe,
    A: IisAdmin,
    W: AclWriter,
    R: RegistrationTool,
    C: Console,
{
    announce(console, Phase::CheckIis);
    let iis_major_version = check_iis(probe, console)?;

    announce(console, Phase::NegotiateViewerPool);
    let viewer_pool = negotiate_pool_name(admin, console, &layout.viewer_pool)?;
    announce(console, Phase::NegotiateServicesPool);
    let services_pool = negotiate_pool_name(admin, console, &layout.services_pool)?;

    let settings = PoolSettings::default();
    announce(console, Phase::CreateViewerPool);
    create_and_bind(
        admin,
        console,
        &layout.site,
        &layout.viewer_app_path,
        &viewer_pool,
        &settings,
    )?;
    announce(console, Phase::CreateServicesPool);
    create_and_bind(
        admin,
        console,
        &layout.site,
        &layout.services_app_path,
        &services_pool,
        &settings,
    )?;

    announce(console, Phase::SetPermissions);
    let rule = AccessRule::default();
    acl.grant(&layout.content_dir, &rule).with_context(|| {
        format!(
            "grant {} access on {}",
            rule.identity,
            layout.content_dir.display()
        )
    })?;

    announce(console, Phase::RunRegistration);
    run_registration(registration)?;

    announce(console, Phase::Done);
    Ok(ProvisionOutcome {
        iis_major_version,
        viewer_pool,
        services_pool,
    })
}

/// Verify the web-publishing service is installed and report the IIS
/// version. A missing service and a failed probe are both fatal.
pub fn check_iis<P: ServerProbe, C: Console>(probe: &P, console: &C) -> Result<u32> {
    let installed = probe
        .service_installed(WEB_PUBLISHING_SERVICE)
        .context("probe service manager")?;
    if !installed {
        return Err(anyhow!("IIS is not installed on this server"));
    }
    let version = probe.iis_major_version().context("read IIS version")?;
    console.say(&format!("IIS version: {version}"));
    Ok(version)
}

/// Renegotiate `initial` on stdin until it collides with no configured
/// pool. Unbounded: keeps prompting as long as the operator keeps
/// supplying taken names. A blank submission tests as free and is
/// accepted as-is.
fn negotiate_pool_name<A: IisAdmin, C: Console>(
    admin: &A,
    console: &C,
    initial: &str,
) -> Result<String> {
    let mut candidate = initial.to_string();
    loop {
        let existing = admin.pool_names().context("list application pools")?;
        if !name_taken(&existing, &candidate) {
            return Ok(candidate);
        }
        console.say(&format!(
            "{candidate} already names an application pool, enter another name:"
        ));
        candidate = console.read_line().context("read pool name")?;
    }
}

fn create_and_bind<A: IisAdmin, C: Console>(
    admin: &A,
    console: &C,
    site: &str,
    app_path: &str,
    pool: &str,
    settings: &PoolSettings,
) -> Result<()> {
    admin
        .create_pool(pool, settings)
        .with_context(|| format!("create application pool {pool}"))?;
    console.say(&format!(
        "{pool}: pipeline mode {}, runtime {}",
        settings.pipeline_mode, settings.runtime_version
    ));
    admin
        .assign_pool(site, app_path, pool)
        .with_context(|| format!("bind {site}{app_path} to pool {pool}"))?;
    Ok(())
}

/// The utility's stderr capture is the failure signal; its exit status is
/// deliberately not consulted (legacy contract — tools that emit warnings
/// on stderr will fail this check even when they exit 0).
fn run_registration<R: RegistrationTool>(registration: &R) -> Result<()> {
    let stderr = registration
        .install()
        .context("run registration utility")?;
    if !stderr.is_empty() {
        return Err(anyhow!(stderr.trim_end().to_string()));
    }
    Ok(())
}

fn announce<C: Console>(console: &C, phase: Phase) {
    info!(phase = phase.label(), "phase start");
    console.say(phase.label());
}
