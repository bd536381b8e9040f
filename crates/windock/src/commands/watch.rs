use clap::ArgMatches;
use tracing::info;

#[cfg(target_os = "macos")]
use std::sync::atomic::{AtomicBool, Ordering};
#[cfg(target_os = "macos")]
use std::time::{Duration, Instant};

#[cfg(target_os = "macos")]
use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, SigSet, Signal};

#[cfg(target_os = "macos")]
use windock_core::activation::{
    ActivationListener, ActivationOutcome, ActivationRequest, ActivationRouter, AppActivator,
};
#[cfg(target_os = "macos")]
use windock_core::config::Config;
#[cfg(target_os = "macos")]
use windock_core::events;
#[cfg(target_os = "macos")]
use windock_core::filter::AppFilter;
#[cfg(target_os = "macos")]
use windock_core::windows::{Snapshot, WindowEnumerator};

#[cfg(target_os = "macos")]
use super::print_warnings;
#[cfg(target_os = "macos")]
use crate::platform::{self, Manager};

/// Set from the SIGINT/SIGTERM handler; the loop exits on its next turn.
#[cfg(target_os = "macos")]
static SHUTDOWN_REQUESTED: AtomicBool = AtomicBool::new(false);

/// Longest single wait on the run loop, bounding shutdown latency.
#[cfg(target_os = "macos")]
const MAX_PUMP: Duration = Duration::from_millis(250);

pub(crate) fn handle_watch_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let keep_helpers = matches.get_flag("keep-helpers");

    info!(event = "cli.watch_started", keep_helpers = keep_helpers);

    #[cfg(target_os = "macos")]
    {
        run_watch(keep_helpers)
    }
    #[cfg(not(target_os = "macos"))]
    {
        let e = windock_core::windows::WindowError::Unsupported;
        eprintln!("{}", e);
        tracing::error!(event = "cli.watch_failed", error = %e);
        Err(e.into())
    }
}

#[cfg(target_os = "macos")]
extern "C" fn request_shutdown(_signal: std::ffi::c_int) {
    SHUTDOWN_REQUESTED.store(true, Ordering::SeqCst);
}

#[cfg(target_os = "macos")]
fn install_signal_handlers() -> nix::Result<()> {
    let action = SigAction::new(
        SigHandler::Handler(request_shutdown),
        SaFlags::empty(),
        SigSet::empty(),
    );
    for sig in [Signal::SIGINT, Signal::SIGTERM] {
        // SAFETY: the handler only stores to an atomic.
        unsafe { signal::sigaction(sig, &action)? };
    }
    Ok(())
}

#[cfg(target_os = "macos")]
fn run_watch(keep_helpers: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::new();
    let file_config = platform::load_config_with_warning();
    let filter = platform::load_filter(&config, &file_config);
    let mut manager = platform::helper_manager(&config, &file_config)?;
    let activator = platform::app_activator()?;
    let router = ActivationRouter::new(activator.as_ref());
    let mut enumerator = WindowEnumerator::new(platform::window_source()?)
        .with_interval(file_config.monitor.poll_interval());
    let listener = ActivationListener::new()?;
    install_signal_handlers()?;

    println!(
        "Watching windows every {} ms. Press Ctrl-C to stop.",
        enumerator.interval().as_millis()
    );

    while !SHUTDOWN_REQUESTED.load(Ordering::SeqCst) {
        if let Some(update) = enumerator.poll(Instant::now())
            && update.changed
        {
            manager.reload();
            report_snapshot(&update.snapshot, &filter, &manager);
        }

        let wait = enumerator
            .time_until_next_poll(Instant::now())
            .min(MAX_PUMP);
        for request in listener.pump(wait) {
            route_request(&router, &request);
        }
    }

    let cleanup = file_config.monitor.cleanup_on_exit && !keep_helpers;
    events::log_app_shutdown(cleanup);
    if cleanup {
        manager.reload();
        if let Some(report) = manager.shutdown_cleanup() {
            println!("Removed all helpers.");
            print_warnings(&report);
        }
    }

    info!(event = "cli.watch_completed", cleaned_up = cleanup);
    Ok(())
}

#[cfg(target_os = "macos")]
fn report_snapshot(snapshot: &Snapshot, filter: &AppFilter, manager: &Manager) {
    let supported = filter.supported_windows(snapshot.iter()).count();
    let with_helpers = snapshot.iter().filter(|w| manager.has_helper(w)).count();

    println!(
        "{} window(s) open, {} supported, {} with helpers.",
        snapshot.len(),
        supported,
        with_helpers
    );
    info!(
        event = "cli.watch_snapshot_changed",
        windows = snapshot.len(),
        supported = supported,
        with_helpers = with_helpers
    );
}

#[cfg(target_os = "macos")]
fn route_request<A: AppActivator>(router: &ActivationRouter<A>, request: &ActivationRequest) {
    let outcome = router.handle(request);
    match &outcome {
        ActivationOutcome::Raised { .. } => {
            println!("Activated '{}'.", request.window_title);
        }
        ActivationOutcome::NoMatchingWindow => {
            println!(
                "Activated {}, but no window matched '{}'.",
                request.bundle_identifier, request.window_title
            );
        }
        ActivationOutcome::AppNotRunning => {
            eprintln!("{} is not running.", request.bundle_identifier);
        }
        ActivationOutcome::Failed { message } => {
            eprintln!("Activation failed: {}", message);
        }
    }
    events::log_activation_routed(request, &outcome);
}
