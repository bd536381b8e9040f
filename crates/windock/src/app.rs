use clap::{Arg, ArgAction, Command, value_parser};
use clap_complete::Shell;

pub fn build_cli() -> Command {
    Command::new("windock")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Give individual macOS windows their own dock icon")
        .long_about("windock creates a small helper application for each window you pick and pins it to the dock. Clicking the helper brings that exact window to the front. Helpers survive restarts of the owning application and are re-matched to its windows by title.")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("list")
                .about("List open windows of supported applications")
                .arg(
                    Arg::new("all")
                        .long("all")
                        .short('a')
                        .help("Include windows of applications that are not enabled")
                        .action(ArgAction::SetTrue)
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output in JSON format")
                        .action(ArgAction::SetTrue)
                )
        )
        .subcommand(
            Command::new("add")
                .about("Create dock helpers for windows")
                .arg(
                    Arg::new("windows")
                        .help("Window numbers as shown by 'windock list'")
                        .required(true)
                        .num_args(1..)
                        .value_parser(value_parser!(u32))
                )
        )
        .subcommand(
            Command::new("remove")
                .about("Remove the dock helpers of windows")
                .arg(
                    Arg::new("windows")
                        .help("Window numbers as shown by 'windock list' or 'windock helpers'")
                        .required(true)
                        .num_args(1..)
                        .value_parser(value_parser!(u32))
                )
        )
        .subcommand(
            Command::new("helpers")
                .about("List helper applications on disk")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output in JSON format")
                        .action(ArgAction::SetTrue)
                )
        )
        .subcommand(
            Command::new("clear")
                .about("Remove every helper and its dock tile")
                .arg(
                    Arg::new("force")
                        .long("force")
                        .short('f')
                        .help("Skip confirmation prompt")
                        .action(ArgAction::SetTrue)
                )
        )
        .subcommand(
            Command::new("refresh")
                .about("Re-enumerate windows, reload helpers and restart the dock")
        )
        .subcommand(
            Command::new("watch")
                .about("Poll windows and route helper clicks until interrupted")
                .arg(
                    Arg::new("keep-helpers")
                        .long("keep-helpers")
                        .help("Leave helpers in the dock on exit (overrides config)")
                        .action(ArgAction::SetTrue)
                )
        )
        .subcommand(
            Command::new("activate")
                .about("Bring a window forward the way a helper click does")
                .arg(
                    Arg::new("title")
                        .long("title")
                        .short('t')
                        .help("Window title captured by the helper")
                        .required(true)
                )
                .arg(
                    Arg::new("bundle-id")
                        .long("bundle-id")
                        .short('b')
                        .help("Bundle identifier of the owning application")
                        .required(true)
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output in JSON format")
                        .action(ArgAction::SetTrue)
                )
        )
        .subcommand(
            Command::new("apps")
                .about("Show or change which applications are supported")
                .subcommand(
                    Command::new("list")
                        .about("List known applications and whether they are enabled")
                        .arg(
                            Arg::new("json")
                                .long("json")
                                .help("Output in JSON format")
                                .action(ArgAction::SetTrue)
                        )
                )
                .subcommand(
                    Command::new("enable")
                        .about("Enable an application")
                        .arg(Arg::new("app").help("Application label, e.g. VSCode").required(true))
                )
                .subcommand(
                    Command::new("disable")
                        .about("Disable an application")
                        .arg(Arg::new("app").help("Application label, e.g. VSCode").required(true))
                )
                .subcommand(
                    Command::new("reset")
                        .about("Restore the default set of enabled applications")
                )
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .help("Target shell")
                        .required(true)
                        .value_parser(value_parser!(Shell))
                )
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_build() {
        let app = build_cli();
        assert_eq!(app.get_name(), "windock");
        app.debug_assert();
    }

    #[test]
    fn test_cli_list_flags() {
        let matches = build_cli()
            .try_get_matches_from(vec!["windock", "list", "--all", "--json"])
            .unwrap();
        let sub = matches.subcommand_matches("list").unwrap();
        assert!(sub.get_flag("all"));
        assert!(sub.get_flag("json"));
    }

    #[test]
    fn test_cli_add_parses_window_numbers() {
        let matches = build_cli()
            .try_get_matches_from(vec!["windock", "add", "7", "42"])
            .unwrap();
        let sub = matches.subcommand_matches("add").unwrap();
        let numbers: Vec<u32> = sub.get_many::<u32>("windows").unwrap().copied().collect();
        assert_eq!(numbers, vec![7, 42]);
    }

    #[test]
    fn test_cli_add_rejects_non_numeric_window() {
        let result = build_cli().try_get_matches_from(vec!["windock", "add", "main.py"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_add_requires_window() {
        let result = build_cli().try_get_matches_from(vec!["windock", "add"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_verbose_is_global() {
        let matches = build_cli()
            .try_get_matches_from(vec!["windock", "helpers", "-v"])
            .unwrap();
        assert!(matches.get_flag("verbose"));
    }

    #[test]
    fn test_cli_activate_requires_both_fields() {
        let result =
            build_cli().try_get_matches_from(vec!["windock", "activate", "--title", "x"]);
        assert!(result.is_err());

        let matches = build_cli()
            .try_get_matches_from(vec![
                "windock",
                "activate",
                "--title",
                "main.py — myproj",
                "--bundle-id",
                "com.microsoft.VSCode",
            ])
            .unwrap();
        let sub = matches.subcommand_matches("activate").unwrap();
        assert_eq!(
            sub.get_one::<String>("bundle-id").map(String::as_str),
            Some("com.microsoft.VSCode")
        );
    }

    #[test]
    fn test_cli_watch_keep_helpers() {
        let matches = build_cli()
            .try_get_matches_from(vec!["windock", "watch", "--keep-helpers"])
            .unwrap();
        let sub = matches.subcommand_matches("watch").unwrap();
        assert!(sub.get_flag("keep-helpers"));
    }

    #[test]
    fn test_cli_apps_subcommands() {
        let matches = build_cli()
            .try_get_matches_from(vec!["windock", "apps", "enable", "Xcode"])
            .unwrap();
        let (name, sub) = matches
            .subcommand_matches("apps")
            .unwrap()
            .subcommand()
            .unwrap();
        assert_eq!(name, "enable");
        assert_eq!(sub.get_one::<String>("app").map(String::as_str), Some("Xcode"));
    }

    #[test]
    fn test_cli_completions_shell() {
        let matches = build_cli()
            .try_get_matches_from(vec!["windock", "completions", "zsh"])
            .unwrap();
        let sub = matches.subcommand_matches("completions").unwrap();
        assert_eq!(sub.get_one::<Shell>("shell"), Some(&Shell::Zsh));
    }
}
