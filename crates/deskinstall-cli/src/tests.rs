use std::path::PathBuf;
use std::time::Duration;

use clap::error::ErrorKind;
use clap::Parser;
use deskinstall_core::{InstallAction, InstallationStatus};
use deskinstall_installer::SetupLayout;

use super::*;
use crate::dispatch::{build_install_request, parse_confirmation};
use crate::render::{
    format_elapsed, format_layout_lines, format_status_lines, render_status_line,
    resolve_output_style, OutputStyle,
};

fn sample_status() -> InstallationStatus {
    InstallationStatus::evaluate("1.0.0", "1.1.0", PathBuf::from("/opt/AnythingLLM"), true)
}

#[test]
fn install_command_parses_action_and_shortcut_flags() {
    let cli = Cli::try_parse_from([
        "deskinstall",
        "install",
        "--path",
        "/srv/llm",
        "--action",
        "repair",
        "--no-menu-shortcut",
        "--yes",
    ])
    .expect("must parse install command");

    match cli.command {
        Commands::Install {
            path,
            action,
            no_desktop_shortcut,
            no_menu_shortcut,
            yes,
        } => {
            assert_eq!(path, Some(PathBuf::from("/srv/llm")));
            assert_eq!(action, Some(InstallAction::RepairExisting));
            assert!(!no_desktop_shortcut);
            assert!(no_menu_shortcut);
            assert!(yes);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn install_command_rejects_unknown_action() {
    let err = Cli::try_parse_from(["deskinstall", "install", "--action", "downgrade"])
        .expect_err("unknown action must be rejected");
    assert_eq!(err.kind(), ErrorKind::ValueValidation);
}

#[test]
fn global_layout_overrides_follow_subcommand() {
    let cli = Cli::try_parse_from([
        "deskinstall",
        "detect",
        "--payload-dir",
        "/media/payload",
        "--state-file",
        "/tmp/state.json",
        "-v",
    ])
    .expect("must parse global flags");
    assert_eq!(cli.payload_dir, Some(PathBuf::from("/media/payload")));
    assert_eq!(cli.state_file, Some(PathBuf::from("/tmp/state.json")));
    assert!(cli.verbose);
    assert!(matches!(cli.command, Commands::Detect));
}

#[test]
fn install_request_defaults_to_detected_path_and_recommendation() {
    let status = sample_status();
    let request = build_install_request(&status, None, None, true, false);
    assert_eq!(request.target, PathBuf::from("/opt/AnythingLLM"));
    assert_eq!(request.action, InstallAction::UpdateExisting);
    assert!(request.desktop_shortcut);
    assert!(!request.menu_shortcut);

    let overridden = build_install_request(
        &status,
        Some(PathBuf::from("/elsewhere")),
        Some(InstallAction::RepairExisting),
        false,
        true,
    );
    assert_eq!(overridden.target, PathBuf::from("/elsewhere"));
    assert_eq!(overridden.action, InstallAction::RepairExisting);
}

#[test]
fn parse_confirmation_accepts_default_and_yes() {
    assert!(parse_confirmation("\n"));
    assert!(parse_confirmation("y\n"));
    assert!(parse_confirmation(" YES "));
    assert!(!parse_confirmation("n\n"));
    assert!(!parse_confirmation("nope"));
}

#[test]
fn resolve_output_style_uses_rich_only_for_colored_terminals() {
    assert_eq!(resolve_output_style(true, false), OutputStyle::Rich);
    assert_eq!(resolve_output_style(true, true), OutputStyle::Plain);
    assert_eq!(resolve_output_style(false, false), OutputStyle::Plain);
}

#[test]
fn render_status_line_plain_is_unadorned() {
    assert_eq!(
        render_status_line(OutputStyle::Plain, "ok", "Installation completed successfully."),
        "Installation completed successfully."
    );
}

#[test]
fn render_status_line_rich_includes_ascii_badge() {
    assert_eq!(
        render_status_line(OutputStyle::Rich, "ok", "Update completed successfully."),
        "[OK] Update completed successfully."
    );
    assert_eq!(
        render_status_line(OutputStyle::Rich, "warn", "desktop shortcut skipped"),
        "[WARN] desktop shortcut skipped"
    );
}

#[test]
fn format_status_lines_describe_detected_installation() {
    assert_eq!(
        format_status_lines(&sample_status()),
        vec![
            "installed: yes (1.0.0)",
            "available version: 1.1.0",
            "install path: /opt/AnythingLLM",
            "update available: yes",
            "repair available: yes",
            "recommended action: update",
        ]
    );
}

#[test]
fn format_status_lines_for_fresh_machine() {
    let status = InstallationStatus::evaluate("", "1.1.0", PathBuf::from("/opt/AnythingLLM"), false);
    let lines = format_status_lines(&status);
    assert_eq!(lines[0], "installed: no");
    assert_eq!(lines[5], "recommended action: install");
}

#[test]
fn format_layout_lines_lists_resolved_paths() {
    let layout = SetupLayout::new("/media/payload", "/cfg/installer-state.json", "/opt/AnythingLLM");
    assert_eq!(
        format_layout_lines(&layout, "1.1.0"),
        vec![
            "payload: /media/payload",
            "state file: /cfg/installer-state.json",
            "default install path: /opt/AnythingLLM",
            "available version: 1.1.0",
        ]
    );
}

#[test]
fn format_elapsed_pads_milliseconds() {
    assert_eq!(format_elapsed(Duration::from_millis(2_045)), "2.045s");
    assert_eq!(format_elapsed(Duration::from_millis(7)), "0.007s");
}
