use std::path::PathBuf;

use clap::ArgMatches;
use serde::Serialize;
use tracing::{error, info, warn};

use windock_core::activation::{
    ActivationOutcome, ActivationRequest, ActivationRouter, WindowMatch,
};
use windock_core::config::Config;
use windock_core::errors::WindockError;
use windock_core::events;
use windock_core::filter::AppFilter;
use windock_core::helpers::{BatchOutcome, HelperRecord, LifecycleReport};
use windock_core::identity::MatchKind;
use windock_core::windows::{Snapshot, WindowError, WindowRecord, build_snapshot};

use crate::platform;
use crate::table::TableFormatter;

mod apps;
mod completions;
mod watch;

pub fn run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    events::log_app_startup();

    match matches.subcommand() {
        Some(("list", sub_matches)) => handle_list_command(sub_matches),
        Some(("add", sub_matches)) => handle_add_command(sub_matches),
        Some(("remove", sub_matches)) => handle_remove_command(sub_matches),
        Some(("helpers", sub_matches)) => handle_helpers_command(sub_matches),
        Some(("clear", sub_matches)) => handle_clear_command(sub_matches),
        Some(("refresh", _)) => handle_refresh_command(),
        Some(("watch", sub_matches)) => watch::handle_watch_command(sub_matches),
        Some(("activate", sub_matches)) => handle_activate_command(sub_matches),
        Some(("apps", sub_matches)) => apps::handle_apps_command(sub_matches),
        Some(("completions", sub_matches)) => {
            completions::handle_completions_command(sub_matches)
        }
        _ => {
            error!(event = "cli.command_unknown");
            Err("Unknown command".into())
        }
    }
}

/// One enumeration pass over the live windows.
fn take_snapshot() -> Result<Snapshot, WindowError> {
    let source = platform::window_source()?;
    build_snapshot(&source)
}

/// Print an error and, when a missing permission is the likely cause, where
/// to grant it.
fn report_error(error: &dyn WindockError) {
    eprintln!("{}", error);
    if let Some(permission) = error.required_permission() {
        eprintln!("Tip: grant windock access in {}.", permission.settings_path());
    }
    events::log_app_error(error);
}

/// Enumerate windows, reporting failure to the user.
fn take_snapshot_or_report(command: &str) -> Result<Snapshot, Box<dyn std::error::Error>> {
    take_snapshot().map_err(|e| {
        error!(event = "cli.enumeration_failed", command = command, error = %e);
        report_error(&e);
        e.into()
    })
}

/// Check if user confirmation input indicates acceptance.
/// Accepts "y" or "yes" (case-insensitive).
fn is_confirmation_accepted(input: &str) -> bool {
    let normalized = input.trim().to_lowercase();
    normalized == "y" || normalized == "yes"
}

/// Format partial failure error message for bulk operations.
fn format_partial_failure_error(operation: &str, failed: usize, total: usize) -> String {
    format!(
        "Partial failure: {} of {} window(s) failed to {}",
        failed, total, operation
    )
}

fn print_warnings(report: &LifecycleReport) {
    for warning in &report.warnings {
        eprintln!("Warning: {}", warning);
    }
}

/// Split requested window numbers into live windows and numbers not on screen.
fn resolve_windows<'a>(
    snapshot: &'a Snapshot,
    numbers: &[u32],
) -> (Vec<&'a WindowRecord>, Vec<u32>) {
    let mut found = Vec::new();
    let mut missing = Vec::new();
    for &number in numbers {
        match snapshot.find_by_number(number) {
            Some(window) => found.push(window),
            None => missing.push(number),
        }
    }
    (found, missing)
}

/// Split windows into those the filter offers for helpers and those of
/// applications that are not enabled.
///
/// Windows without a bundle identifier are kept so creating their helper
/// reports the missing identity.
fn split_supported<'a>(
    windows: Vec<&'a WindowRecord>,
    filter: &AppFilter,
) -> (Vec<&'a WindowRecord>, Vec<&'a WindowRecord>) {
    windows.into_iter().partition(|w| {
        w.owner_bundle_id
            .as_deref()
            .is_none_or(|b| filter.is_app_supported(b))
    })
}

fn requested_windows(matches: &ArgMatches) -> Result<Vec<u32>, Box<dyn std::error::Error>> {
    Ok(matches
        .get_many::<u32>("windows")
        .ok_or("Window numbers are required")?
        .copied()
        .collect())
}

#[derive(Serialize)]
struct HelperRef<'a> {
    name: &'a str,
    matched_by: MatchKind,
}

#[derive(Serialize)]
struct WindowEntry<'a> {
    #[serde(flatten)]
    window: &'a WindowRecord,
    supported: bool,
    helper: Option<HelperRef<'a>>,
}

fn handle_list_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let show_all = matches.get_flag("all");
    let json_output = matches.get_flag("json");

    info!(event = "cli.list_started", all = show_all, json_output = json_output);

    let config = Config::new();
    let file_config = platform::load_config_with_warning();
    let filter = platform::load_filter(&config, &file_config);
    let manager = platform::helper_manager(&config, &file_config)?;
    let snapshot = take_snapshot_or_report("list")?;

    let entries: Vec<WindowEntry> = snapshot
        .iter()
        .map(|window| WindowEntry {
            window,
            supported: window
                .owner_bundle_id
                .as_deref()
                .is_some_and(|b| filter.is_app_supported(b)),
            helper: manager.find_helper(window).map(|m| HelperRef {
                name: &m.helper.helper_name,
                matched_by: m.kind,
            }),
        })
        .filter(|entry| show_all || entry.supported)
        .collect();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else if entries.is_empty() {
        if show_all {
            println!("No windows found.");
        } else {
            println!("No windows of enabled applications found. Use --all to show every window.");
        }
    } else {
        let rows: Vec<Vec<String>> = entries
            .iter()
            .map(|entry| {
                vec![
                    entry.window.window_number.to_string(),
                    entry.window.owner_app_name.clone(),
                    entry.window.title.clone(),
                    entry
                        .helper
                        .as_ref()
                        .map_or("-".to_string(), |h| format!("{} ({})", h.name, h.matched_by)),
                ]
            })
            .collect();
        TableFormatter::new(
            &[("Window", 8), ("App", 20), ("Title", 50), ("Helper", 40)],
            &rows,
        )
        .print_table(&rows);
    }

    info!(event = "cli.list_completed", count = entries.len());
    Ok(())
}

fn print_batch_outcome(verb: &str, outcome: &BatchOutcome) {
    if !outcome.succeeded.is_empty() {
        println!("{} {} helper(s):", verb, outcome.succeeded.len());
        for number in &outcome.succeeded {
            println!("   window {}", number);
        }
    }
    for (number, e) in &outcome.failures {
        eprintln!("   window {}: {}", number, e);
    }
    print_warnings(&outcome.report);
}

fn handle_add_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let numbers = requested_windows(matches)?;

    info!(event = "cli.add_started", windows = ?numbers);

    let config = Config::new();
    let file_config = platform::load_config_with_warning();
    let filter = platform::load_filter(&config, &file_config);
    let mut manager = platform::helper_manager(&config, &file_config)?;
    let snapshot = take_snapshot_or_report("add")?;

    let (found, missing) = resolve_windows(&snapshot, &numbers);
    for &window_number in &missing {
        eprintln!(
            "{}. Run 'windock list' to see open windows.",
            WindowError::WindowNotFound { window_number }
        );
    }
    let (windows, rejected) = split_supported(found, &filter);
    for window in &rejected {
        eprintln!(
            "{}. Run 'windock apps list' to see which applications are enabled.",
            WindowError::AppNotEnabled {
                window_number: window.window_number,
                app: window.owner_app_name.clone(),
            }
        );
    }

    let outcome = manager.create_many(windows.iter().copied());
    print_batch_outcome("Created", &outcome);
    for number in &outcome.skipped {
        println!("Window {} already has a helper.", number);
    }

    let failed = outcome.failures.len() + missing.len() + rejected.len();
    info!(
        event = "cli.add_completed",
        created = outcome.succeeded.len(),
        skipped = outcome.skipped.len(),
        failed = failed
    );

    if failed > 0 {
        return Err(format_partial_failure_error("add", failed, numbers.len()).into());
    }
    Ok(())
}

fn handle_remove_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let numbers = requested_windows(matches)?;

    info!(event = "cli.remove_started", windows = ?numbers);

    let config = Config::new();
    let file_config = platform::load_config_with_warning();
    let mut manager = platform::helper_manager(&config, &file_config)?;

    // Helpers of closed windows are still removable by their captured number.
    let snapshot = take_snapshot().unwrap_or_else(|e| {
        warn!(event = "cli.remove_enumeration_failed", error = %e);
        Snapshot::default()
    });
    let (windows, gone) = resolve_windows(&snapshot, &numbers);

    let mut outcome = manager.remove_many(windows.iter().copied());

    let mut stale: Vec<(u32, PathBuf)> = Vec::new();
    for &number in &gone {
        let before = stale.len();
        for helper in manager.helpers() {
            if helper.captured_window_number == number {
                stale.push((number, helper.path.clone()));
            }
        }
        if stale.len() == before {
            outcome.skipped.push(number);
        }
    }
    if !stale.is_empty() {
        for (number, path) in &stale {
            outcome.report.absorb(manager.remove_artifact(path));
            outcome.succeeded.push(*number);
        }
        outcome.report.absorb(manager.refresh_registry());
    }

    print_batch_outcome("Removed", &outcome);
    for number in &outcome.skipped {
        println!("Window {} has no helper.", number);
    }

    info!(
        event = "cli.remove_completed",
        removed = outcome.succeeded.len(),
        skipped = outcome.skipped.len()
    );
    Ok(())
}

fn handle_helpers_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = matches.get_flag("json");

    info!(event = "cli.helpers_started", json_output = json_output);

    let config = Config::new();
    let file_config = platform::load_config_with_warning();
    let manager = platform::helper_manager(&config, &file_config)?;
    let helpers: Vec<&HelperRecord> = manager.helpers().collect();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&helpers)?);
    } else if helpers.is_empty() {
        println!("No helpers found.");
    } else {
        let rows: Vec<Vec<String>> = helpers
            .iter()
            .map(|h| {
                vec![
                    h.helper_name.clone(),
                    h.title.clone(),
                    h.original_bundle_id.clone(),
                    h.captured_window_number.to_string(),
                    h.captured_project_name.clone().unwrap_or_default(),
                    h.created_at.clone().unwrap_or_default(),
                ]
            })
            .collect();
        TableFormatter::new(
            &[
                ("Helper", 30),
                ("Title", 40),
                ("App", 28),
                ("Window", 8),
                ("Project", 20),
                ("Created", 25),
            ],
            &rows,
        )
        .print_table(&rows);
    }

    info!(event = "cli.helpers_completed", count = helpers.len());
    Ok(())
}

fn handle_clear_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let force = matches.get_flag("force");

    info!(event = "cli.clear_started", force = force);

    let config = Config::new();
    let file_config = platform::load_config_with_warning();
    let mut manager = platform::helper_manager(&config, &file_config)?;
    let count = manager.index().len();

    if count == 0 {
        println!("No helpers to remove.");
        info!(event = "cli.clear_completed", removed = 0);
        return Ok(());
    }

    if !force {
        use std::io::{self, Write};

        print!("Remove ALL {} helper(s) from the dock? [y/N] ", count);
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if !is_confirmation_accepted(&input) {
            println!("Aborted.");
            info!(event = "cli.clear_aborted");
            return Ok(());
        }
    }

    let report = manager.clear_all();
    println!("Removed {} helper(s).", count);
    print_warnings(&report);

    info!(
        event = "cli.clear_completed",
        removed = count,
        warnings = report.warnings.len()
    );
    Ok(())
}

fn handle_refresh_command() -> Result<(), Box<dyn std::error::Error>> {
    info!(event = "cli.refresh_started");

    let config = Config::new();
    let file_config = platform::load_config_with_warning();
    let mut manager = platform::helper_manager(&config, &file_config)?;

    let mut report = manager.reload();
    match take_snapshot() {
        Ok(snapshot) => println!("{} window(s) open.", snapshot.len()),
        Err(e) => {
            eprintln!("Warning: Could not enumerate windows: {}", e);
            warn!(event = "cli.refresh_enumeration_failed", error = %e);
        }
    }
    report.absorb(manager.refresh_registry());

    println!(
        "Reloaded {} helper(s) and refreshed the dock.",
        manager.index().len()
    );
    print_warnings(&report);

    info!(
        event = "cli.refresh_completed",
        helpers = manager.index().len(),
        warnings = report.warnings.len()
    );
    Ok(())
}

fn describe_match(matched_by: WindowMatch) -> &'static str {
    match matched_by {
        WindowMatch::ExactTitle => "exact title",
        WindowMatch::SearchKey => "search key",
    }
}

fn handle_activate_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let title = matches
        .get_one::<String>("title")
        .ok_or("Title argument is required")?;
    let bundle_id = matches
        .get_one::<String>("bundle-id")
        .ok_or("Bundle id argument is required")?;
    let json_output = matches.get_flag("json");

    info!(event = "cli.activate_started", title = title, bundle_id = bundle_id);

    let activator = platform::app_activator().inspect_err(|e| {
        error!(event = "cli.activate_failed", error = %e);
        report_error(e);
    })?;
    let router = ActivationRouter::new(activator.as_ref());
    let request = ActivationRequest::new(title.as_str(), bundle_id.as_str());
    let outcome = router.handle(&request);
    events::log_activation_routed(&request, &outcome);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    }

    match outcome {
        ActivationOutcome::Raised { index, matched_by } => {
            if !json_output {
                println!(
                    "Raised window {} of {} (matched by {}).",
                    index + 1,
                    bundle_id,
                    describe_match(matched_by)
                );
            }
            Ok(())
        }
        ActivationOutcome::NoMatchingWindow => {
            if !json_output {
                println!(
                    "Brought {} forward, but no window matched '{}'.",
                    bundle_id, title
                );
            }
            Ok(())
        }
        ActivationOutcome::AppNotRunning => {
            Err(format!("No running application with bundle id '{}'", bundle_id).into())
        }
        ActivationOutcome::Failed { message } => Err(message.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use windock_core::filter::builtin_rules;

    fn window(number: u32, title: &str) -> WindowRecord {
        WindowRecord {
            window_number: number,
            owner_pid: 100,
            owner_app_name: "Code".to_string(),
            title: title.to_string(),
            owner_bundle_id: Some("com.microsoft.VSCode".to_string()),
            positional_index: 1,
        }
    }

    #[test]
    fn test_is_confirmation_accepted() {
        assert!(is_confirmation_accepted("y"));
        assert!(is_confirmation_accepted("YES\n"));
        assert!(!is_confirmation_accepted(""));
        assert!(!is_confirmation_accepted("no"));
    }

    #[test]
    fn test_format_partial_failure_error() {
        assert_eq!(
            format_partial_failure_error("add", 1, 3),
            "Partial failure: 1 of 3 window(s) failed to add"
        );
    }

    #[test]
    fn test_resolve_windows_splits_missing() {
        let snapshot = Snapshot::new(vec![window(7, "a"), window(9, "b")]);
        let (found, missing) = resolve_windows(&snapshot, &[9, 12, 7]);
        let found: Vec<u32> = found.iter().map(|w| w.window_number).collect();
        assert_eq!(found, vec![9, 7]);
        assert_eq!(missing, vec![12]);
    }

    #[test]
    fn test_split_supported_rejects_disabled_apps() {
        let code = window(7, "main.py — myproj");
        let mut safari = window(8, "Start Page");
        safari.owner_app_name = "Safari".to_string();
        safari.owner_bundle_id = Some("com.apple.Safari".to_string());
        let mut textedit = window(9, "notes.txt");
        textedit.owner_bundle_id = Some("com.apple.TextEdit".to_string());
        let mut orphan = window(10, "orphan");
        orphan.owner_bundle_id = None;

        let filter = AppFilter::new(builtin_rules());
        let (kept, rejected) = split_supported(vec![&code, &safari, &textedit, &orphan], &filter);

        let kept: Vec<u32> = kept.iter().map(|w| w.window_number).collect();
        let rejected: Vec<u32> = rejected.iter().map(|w| w.window_number).collect();
        assert_eq!(kept, vec![7, 10]);
        assert_eq!(rejected, vec![8, 9]);
    }

    #[test]
    fn test_window_entry_json_shape() {
        let record = window(7, "main.py — myproj");
        let entry = WindowEntry {
            window: &record,
            supported: true,
            helper: Some(HelperRef {
                name: "WD_main_py_myproj",
                matched_by: MatchKind::ProjectName,
            }),
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["window_number"], 7);
        assert_eq!(value["supported"], true);
        assert_eq!(value["helper"]["matched_by"], "project_name");
    }

    #[test]
    fn test_describe_match() {
        assert_eq!(describe_match(WindowMatch::ExactTitle), "exact title");
        assert_eq!(describe_match(WindowMatch::SearchKey), "search key");
    }
}
