//! Command-line entry point for the IIS deployment provisioner.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use provisioner::exit_codes;
use provisioner::io::acl::Icacls;
use provisioner::io::appcmd::{AppCmd, IisAdmin};
use provisioner::io::console::{Console, StdConsole};
use provisioner::io::regiis::AspnetRegiis;
use provisioner::io::services::PlatformProbe;
use provisioner::logging;
use provisioner::provision::{
    DEFAULT_CONTENT_DIR, DEFAULT_SERVICES_APP_PATH, DEFAULT_SERVICES_POOL, DEFAULT_SITE,
    DEFAULT_VIEWER_APP_PATH, DEFAULT_VIEWER_POOL, SiteLayout, check_iis, run_provision,
};

#[derive(Parser)]
#[command(
    name = "provisioner",
    version,
    about = "One-shot IIS setup for a Viewer/Services deployment"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check IIS, create both application pools, grant directory
    /// permissions, and register the managed runtime.
    Run {
        /// Site both role applications live under.
        #[arg(long, default_value = DEFAULT_SITE)]
        site: String,
        /// Initial name for the viewer role's pool.
        #[arg(long, default_value = DEFAULT_VIEWER_POOL)]
        viewer_pool: String,
        /// Initial name for the services role's pool.
        #[arg(long, default_value = DEFAULT_SERVICES_POOL)]
        services_pool: String,
        /// Content directory granted to the worker identity.
        #[arg(long, default_value = DEFAULT_CONTENT_DIR)]
        content_dir: PathBuf,
    },
    /// Only verify IIS is installed and report its version.
    Check,
    /// Turn on 32-bit worker processes for an existing pool.
    #[command(name = "enable-32bit")]
    Enable32Bit {
        /// Pool to modify.
        #[arg(long, default_value = "DefaultAppPool")]
        pool: String,
    },
}

fn main() {
    logging::init();
    let console = StdConsole;
    if let Err(err) = run(&console) {
        console.say(&format!("{err:#}"));
        console.say("Press Enter to exit");
        let _ = console.acknowledge();
        // Matches the success code; see exit_codes.
        std::process::exit(exit_codes::OK);
    }
}

fn run(console: &StdConsole) -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Run {
            site,
            viewer_pool,
            services_pool,
            content_dir,
        } => {
            let layout = SiteLayout {
                site,
                viewer_app_path: DEFAULT_VIEWER_APP_PATH.to_string(),
                services_app_path: DEFAULT_SERVICES_APP_PATH.to_string(),
                content_dir,
                viewer_pool,
                services_pool,
            };
            let probe = PlatformProbe;
            let admin = AppCmd::from_env()?;
            let acl = Icacls;
            let registration = AspnetRegiis::from_env()?;
            run_provision(&probe, &admin, &acl, &registration, console, &layout)?;
            console.say("Press Enter to exit");
            console.acknowledge()?;
            Ok(())
        }
        Command::Check => {
            check_iis(&PlatformProbe, console)?;
            Ok(())
        }
        Command::Enable32Bit { pool } => {
            let admin = AppCmd::from_env()?;
            admin.enable_32bit(&pool)?;
            console.say(&format!("{pool} now allows 32-bit worker processes"));
            Ok(())
        }
    }
}
