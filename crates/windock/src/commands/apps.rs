use clap::ArgMatches;
use serde::Serialize;
use tracing::{error, info};

use windock_core::config::Config;
use windock_core::events;
use windock_core::filter::AppFilter;

use crate::platform;
use crate::table::TableFormatter;

#[derive(Serialize)]
struct AppEntry<'a> {
    label: &'a str,
    enabled: bool,
    patterns: &'a [String],
}

pub(crate) fn handle_apps_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    match matches.subcommand() {
        Some(("enable", sub_matches)) => handle_toggle(sub_matches, true),
        Some(("disable", sub_matches)) => handle_toggle(sub_matches, false),
        Some(("reset", _)) => handle_reset(),
        Some(("list", sub_matches)) => handle_list(sub_matches.get_flag("json")),
        _ => handle_list(false),
    }
}

/// Load the filter strictly: changes must be saved back to the same file.
fn load_filter_for_update() -> Result<AppFilter, Box<dyn std::error::Error>> {
    let config = Config::new();
    let file_config = platform::load_config_with_warning();
    AppFilter::load(&config.preferences_file(), &file_config).map_err(|e| {
        eprintln!("Failed to read preferences: {}", e);
        error!(event = "cli.apps_load_failed", error = %e);
        events::log_app_error(&e);
        e.into()
    })
}

fn handle_list(json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    info!(event = "cli.apps_list_started", json_output = json_output);

    let config = Config::new();
    let file_config = platform::load_config_with_warning();
    let filter = platform::load_filter(&config, &file_config);

    let entries: Vec<AppEntry> = filter
        .rules()
        .iter()
        .map(|rule| AppEntry {
            label: &rule.label,
            enabled: filter.is_app_enabled(&rule.label),
            patterns: &rule.patterns,
        })
        .collect();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        let rows: Vec<Vec<String>> = entries
            .iter()
            .map(|entry| {
                vec![
                    entry.label.to_string(),
                    if entry.enabled { "yes" } else { "no" }.to_string(),
                    entry.patterns.join(", "),
                ]
            })
            .collect();
        TableFormatter::new(&[("App", 16), ("Enabled", 7), ("Bundle ids", 40)], &rows)
            .print_table(&rows);
    }

    info!(event = "cli.apps_list_completed", count = entries.len());
    Ok(())
}

fn handle_toggle(matches: &ArgMatches, enabled: bool) -> Result<(), Box<dyn std::error::Error>> {
    let label = matches
        .get_one::<String>("app")
        .ok_or("App argument is required")?;

    info!(event = "cli.apps_toggle_started", label = label, enabled = enabled);

    let mut filter = load_filter_for_update()?;
    if let Err(e) = filter.set_app_enabled(label, enabled) {
        eprintln!("{}", e);
        let known: Vec<&str> = filter.rules().iter().map(|r| r.label.as_str()).collect();
        eprintln!("Known apps: {}", known.join(", "));
        error!(event = "cli.apps_toggle_failed", label = label, error = %e);
        return Err(e.into());
    }

    println!(
        "{} {}.",
        if enabled { "Enabled" } else { "Disabled" },
        label
    );
    info!(event = "cli.apps_toggle_completed", label = label, enabled = enabled);
    Ok(())
}

fn handle_reset() -> Result<(), Box<dyn std::error::Error>> {
    info!(event = "cli.apps_reset_started");

    let mut filter = load_filter_for_update()?;
    filter.reset_to_defaults()?;

    println!("Restored the default applications.");
    info!(event = "cli.apps_reset_completed");
    Ok(())
}
