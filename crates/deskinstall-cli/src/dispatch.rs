use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::{mpsc, Arc};

use anyhow::{anyhow, Context, Result};
use deskinstall_core::{
    InstallAction, InstallResult, InstallationStatus, PRODUCT_DISPLAY_NAME,
};
use deskinstall_installer::{
    platform_shortcut_installer, spawn_detection, spawn_installation, InstallRequest,
    InstallWorkflow, InstallerEvent, SetupLayout,
};
use tracing::debug;

use crate::render::{action_label, format_layout_lines, format_status_lines, TerminalRenderer};
use crate::{Cli, Commands};

pub(crate) fn run_cli(cli: Cli) -> Result<()> {
    let renderer = TerminalRenderer::current();
    let layout = resolve_layout(cli.payload_dir, cli.state_file)?;
    let workflow = Arc::new(InstallWorkflow::new(layout, platform_shortcut_installer()));

    match cli.command {
        Commands::Detect => {
            let status = run_detection(&workflow)?;
            renderer.print_section("Installation status");
            renderer.print_lines(&format_status_lines(&status));
        }
        Commands::Doctor => {
            renderer.print_section("Installer layout");
            renderer.print_lines(&format_layout_lines(
                workflow.layout(),
                workflow.available_version(),
            ));
        }
        Commands::Install {
            path,
            action,
            no_desktop_shortcut,
            no_menu_shortcut,
            yes,
        } => {
            let status = run_detection(&workflow)?;
            renderer.print_section("Installation status");
            renderer.print_lines(&format_status_lines(&status));

            let request = build_install_request(
                &status,
                path,
                action,
                !no_desktop_shortcut,
                !no_menu_shortcut,
            );
            let prompt = format!(
                "{} {PRODUCT_DISPLAY_NAME} {} at {}?",
                capitalized_action(request.action),
                workflow.available_version(),
                request.target.display()
            );
            if !yes && !confirm(&prompt)? {
                renderer.print_status("warn", "installation cancelled");
                return Ok(());
            }

            let result = run_installation(&workflow, request, renderer)?;
            if !result.success {
                renderer.print_status("err", "installation failed");
                return Err(anyhow!(result.message));
            }
            let mut lines = result.message.lines();
            if let Some(first) = lines.next() {
                renderer.print_status("ok", first);
            }
            for line in lines {
                renderer.print_status("warn", line);
            }
        }
    }

    Ok(())
}

fn resolve_layout(
    payload_dir: Option<PathBuf>,
    state_file: Option<PathBuf>,
) -> Result<SetupLayout> {
    let mut layout = SetupLayout::discover()?;
    if let Some(payload_dir) = payload_dir {
        layout = layout.with_payload_dir(payload_dir);
    }
    if let Some(state_file) = state_file {
        layout = layout.with_state_file(state_file);
    }
    debug!(?layout, "resolved installer layout");
    Ok(layout)
}

pub(crate) fn build_install_request(
    status: &InstallationStatus,
    path: Option<PathBuf>,
    action: Option<InstallAction>,
    desktop_shortcut: bool,
    menu_shortcut: bool,
) -> InstallRequest {
    InstallRequest {
        target: path.unwrap_or_else(|| status.install_path.clone()),
        action: action.unwrap_or(status.recommended_action),
        desktop_shortcut,
        menu_shortcut,
    }
}

fn run_detection(workflow: &Arc<InstallWorkflow>) -> Result<InstallationStatus> {
    let (sender, receiver) = mpsc::channel();
    let handle = spawn_detection(Arc::clone(workflow), sender);
    let status = receiver.iter().find_map(|event| match event {
        InstallerEvent::DetectionFinished(status) => Some(status),
        _ => None,
    });
    handle
        .join()
        .map_err(|_| anyhow!("detection worker panicked"))?;
    status.context("detection finished without reporting a status")
}

fn run_installation(
    workflow: &Arc<InstallWorkflow>,
    request: InstallRequest,
    renderer: TerminalRenderer,
) -> Result<InstallResult> {
    let label = action_label(request.action);
    let (sender, receiver) = mpsc::channel();
    let handle = spawn_installation(Arc::clone(workflow), request, sender);

    let mut progress = renderer.start_progress(label);
    let mut result = None;
    for event in receiver {
        match event {
            InstallerEvent::Message(message) => progress.message(&message),
            InstallerEvent::Percent(percent) => progress.set_percent(percent),
            InstallerEvent::Warning(warning) => progress.warning(&warning),
            InstallerEvent::InstallationFinished(finished) => {
                result = Some(finished);
                break;
            }
            InstallerEvent::DetectionFinished(_) => {}
        }
    }

    handle
        .join()
        .map_err(|_| anyhow!("installation worker panicked"))?;
    let result = result.context("installation finished without reporting a result")?;
    if result.success {
        progress.finish_success();
    } else {
        progress.finish_abandon();
    }
    Ok(result)
}

fn capitalized_action(action: InstallAction) -> &'static str {
    match action {
        InstallAction::FreshInstall => "Install",
        InstallAction::UpdateExisting => "Update",
        InstallAction::RepairExisting => "Repair",
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [Y/n] ");
    io::stdout().flush().context("failed to flush prompt")?;
    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("failed to read confirmation")?;
    Ok(parse_confirmation(&answer))
}

pub(crate) fn parse_confirmation(answer: &str) -> bool {
    matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "" | "y" | "yes"
    )
}
