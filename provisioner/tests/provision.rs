//! End-to-end provisioning scenarios driven with scripted adapters.
//!
//! These tests run the full linear sequence and assert both the outcome
//! and the state left behind on the (fake) server, including what remains
//! committed after a mid-run failure.

use std::path::PathBuf;

use provisioner::core::pool::PipelineMode;
use provisioner::provision::{SiteLayout, run_provision};
use provisioner::test_support::{FakeAcl, FakeAdmin, FakeProbe, FakeRegistration, ScriptedConsole};

fn probe() -> FakeProbe {
    FakeProbe {
        installed: true,
        major_version: 10,
    }
}

fn quiet_registration() -> FakeRegistration {
    FakeRegistration {
        stderr: String::new(),
    }
}

#[test]
fn clean_run_creates_both_pools_with_fixed_settings() {
    let admin = FakeAdmin::default();
    let acl = FakeAcl::default();
    let console = ScriptedConsole::default();

    let outcome = run_provision(
        &probe(),
        &admin,
        &acl,
        &quiet_registration(),
        &console,
        &SiteLayout::default(),
    )
    .expect("provision");

    assert_eq!(outcome.iis_major_version, 10);
    assert_eq!(outcome.viewer_pool, "Viewer");
    assert_eq!(outcome.services_pool, "Services");

    let viewer = admin.pool("Viewer").expect("viewer pool");
    assert_eq!(viewer.runtime_version, "v4.0");
    assert_eq!(viewer.pipeline_mode, PipelineMode::Integrated);
    assert!(viewer.enable_32bit);
    assert!(admin.pool("Services").is_some());

    // Both applications are bound under the one site.
    let bindings = admin.bindings.borrow();
    assert_eq!(
        bindings.as_slice(),
        &[
            (
                "Viewer".to_string(),
                "/Viewer".to_string(),
                "Viewer".to_string()
            ),
            (
                "Viewer".to_string(),
                "/Services".to_string(),
                "Services".to_string()
            ),
        ]
    );

    let grants = acl.grants.borrow();
    assert_eq!(grants.len(), 1);
    assert_eq!(grants[0].0, PathBuf::from(r"C:\inetpub\wwwroot\viewer"));
    assert_eq!(grants[0].1.identity, "IIS_IUSRS");

    assert!(console.said("IIS version: 10"));
    assert!(console.said("IIS configuration finished"));
}

#[test]
fn missing_service_fails_before_touching_pools() {
    let admin = FakeAdmin::default();
    let err = run_provision(
        &FakeProbe {
            installed: false,
            major_version: 0,
        },
        &admin,
        &FakeAcl::default(),
        &quiet_registration(),
        &ScriptedConsole::default(),
        &SiteLayout::default(),
    )
    .expect_err("missing service");

    assert!(format!("{err:#}").contains("IIS is not installed"));
    assert!(admin.pools.borrow().is_empty());
    assert!(admin.bindings.borrow().is_empty());
}

#[test]
fn colliding_name_is_renegotiated_on_stdin() {
    let admin = FakeAdmin::with_pools(&["Viewer"]);
    let console = ScriptedConsole::with_input(&["ViewerAlt"]);

    let outcome = run_provision(
        &probe(),
        &admin,
        &FakeAcl::default(),
        &quiet_registration(),
        &console,
        &SiteLayout::default(),
    )
    .expect("provision");

    assert_eq!(outcome.viewer_pool, "ViewerAlt");
    assert!(admin.pool("ViewerAlt").is_some());
    assert!(console.said("Viewer already names an application pool"));
}

#[test]
fn repeated_collisions_keep_prompting() {
    let admin = FakeAdmin::with_pools(&["Viewer", "Services", "Taken"]);
    let console = ScriptedConsole::with_input(&["Taken", "Free", "ServicesAlt"]);

    let outcome = run_provision(
        &probe(),
        &admin,
        &FakeAcl::default(),
        &quiet_registration(),
        &console,
        &SiteLayout::default(),
    )
    .expect("provision");

    assert_eq!(outcome.viewer_pool, "Free");
    assert_eq!(outcome.services_pool, "ServicesAlt");
    assert!(console.said("Taken already names an application pool"));
}

#[test]
fn blank_renegotiated_name_is_accepted() {
    // A blank submission never tests as taken, so it goes through as the
    // pool name. Legacy behavior, kept deliberately.
    let admin = FakeAdmin::with_pools(&["Viewer"]);
    let console = ScriptedConsole::with_input(&[""]);

    let outcome = run_provision(
        &probe(),
        &admin,
        &FakeAcl::default(),
        &quiet_registration(),
        &console,
        &SiteLayout::default(),
    )
    .expect("provision");

    assert_eq!(outcome.viewer_pool, "");
    assert!(admin.pool("").is_some());
}

#[test]
fn acl_failure_leaves_created_pools_in_place() {
    let admin = FakeAdmin::default();
    let acl = FakeAcl {
        fail_with: Some("path not found".to_string()),
        ..FakeAcl::default()
    };

    let err = run_provision(
        &probe(),
        &admin,
        &acl,
        &quiet_registration(),
        &ScriptedConsole::default(),
        &SiteLayout::default(),
    )
    .expect_err("acl failure");

    assert!(format!("{err:#}").contains("path not found"));
    // No rollback: both pools and bindings stay committed.
    assert_eq!(admin.pools.borrow().len(), 2);
    assert_eq!(admin.bindings.borrow().len(), 2);
}

#[test]
fn registration_stderr_aborts_with_that_text() {
    let admin = FakeAdmin::default();
    let err = run_provision(
        &probe(),
        &admin,
        &FakeAcl::default(),
        &FakeRegistration {
            stderr: "Setup failed: access denied\n".to_string(),
        },
        &ScriptedConsole::default(),
        &SiteLayout::default(),
    )
    .expect_err("registration stderr");

    assert!(format!("{err:#}").contains("Setup failed: access denied"));
    assert_eq!(admin.pools.borrow().len(), 2);
}

#[test]
fn quiet_registration_completes_the_run() {
    let console = ScriptedConsole::default();
    run_provision(
        &probe(),
        &FakeAdmin::default(),
        &FakeAcl::default(),
        &quiet_registration(),
        &console,
        &SiteLayout::default(),
    )
    .expect("provision");

    assert!(console.said("aspnet_regiis"));
    assert!(console.said("IIS configuration finished"));
}

#[test]
fn custom_layout_overrides_site_and_directory() {
    let admin = FakeAdmin::default();
    let acl = FakeAcl::default();
    let layout = SiteLayout {
        site: "Intranet".to_string(),
        content_dir: PathBuf::from(r"D:\sites\intranet"),
        ..SiteLayout::default()
    };

    run_provision(
        &probe(),
        &admin,
        &acl,
        &quiet_registration(),
        &ScriptedConsole::default(),
        &layout,
    )
    .expect("provision");

    let bindings = admin.bindings.borrow();
    assert!(bindings.iter().all(|(site, _, _)| site == "Intranet"));
    assert_eq!(acl.grants.borrow()[0].0, PathBuf::from(r"D:\sites\intranet"));
}
