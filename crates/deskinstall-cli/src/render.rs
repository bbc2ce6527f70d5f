use std::io::IsTerminal;
use std::time::{Duration, Instant};

use anstyle::{AnsiColor, Effects, Style};
use deskinstall_core::{InstallAction, InstallationStatus};
use deskinstall_installer::SetupLayout;
use indicatif::{ProgressBar, ProgressStyle};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum OutputStyle {
    Plain,
    Rich,
}

pub(crate) fn current_output_style() -> OutputStyle {
    resolve_output_style(
        std::io::stdout().is_terminal(),
        std::env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty()),
    )
}

pub(crate) fn resolve_output_style(stdout_is_tty: bool, no_color: bool) -> OutputStyle {
    if stdout_is_tty && !no_color {
        OutputStyle::Rich
    } else {
        OutputStyle::Plain
    }
}

#[derive(Copy, Clone, Debug)]
pub(crate) struct TerminalRenderer {
    style: OutputStyle,
}

pub(crate) struct TerminalProgress {
    style: OutputStyle,
    label: String,
    percent: u8,
    progress_bar: Option<ProgressBar>,
    started_at: Instant,
}

impl TerminalRenderer {
    pub(crate) fn current() -> Self {
        Self {
            style: current_output_style(),
        }
    }

    pub(crate) fn print_status(self, status: &str, message: &str) {
        println!("{}", render_status_line(self.style, status, message));
    }

    pub(crate) fn print_section(self, title: &str) {
        if self.style == OutputStyle::Plain {
            return;
        }
        println!();
        println!("{}", colorize(section_style(), &format!("== {title} ==")));
    }

    pub(crate) fn print_lines(self, lines: &[String]) {
        for line in lines {
            println!("{line}");
        }
    }

    pub(crate) fn start_progress(self, label: &str) -> TerminalProgress {
        let progress_bar = if self.style == OutputStyle::Rich {
            let progress_bar = ProgressBar::new(100);
            if let Ok(style) = ProgressStyle::with_template(
                "{spinner:.cyan.bold} {prefix:<8} [{bar:30.cyan/blue}] {pos:>3}% {wide_msg}",
            ) {
                progress_bar.set_style(style.tick_chars(".oO@* ").progress_chars("=>-"));
            }
            progress_bar.set_prefix(label.to_string());
            progress_bar.enable_steady_tick(Duration::from_millis(80));
            Some(progress_bar)
        } else {
            None
        };

        TerminalProgress {
            style: self.style,
            label: label.to_string(),
            percent: 0,
            progress_bar,
            started_at: Instant::now(),
        }
    }
}

impl TerminalProgress {
    pub(crate) fn set_percent(&mut self, percent: u8) {
        self.percent = percent.min(100);
        if let Some(progress_bar) = &self.progress_bar {
            progress_bar.set_position(u64::from(self.percent));
        }
    }

    pub(crate) fn message(&self, message: &str) {
        match &self.progress_bar {
            Some(progress_bar) => progress_bar.set_message(message.to_string()),
            None => println!("{message}"),
        }
    }

    pub(crate) fn warning(&self, message: &str) {
        let line = render_status_line(self.style, "warn", message);
        match &self.progress_bar {
            Some(progress_bar) => progress_bar.println(line),
            None => println!("{line}"),
        }
    }

    pub(crate) fn finish_success(mut self) {
        let Some(progress_bar) = self.progress_bar.take() else {
            return;
        };

        progress_bar.finish_and_clear();
        println!(
            "{}",
            render_progress_summary(&self.label, self.percent, self.started_at.elapsed())
        );
    }

    pub(crate) fn finish_abandon(mut self) {
        if let Some(progress_bar) = self.progress_bar.take() {
            progress_bar.abandon();
        }
    }
}

pub(crate) fn render_status_line(style: OutputStyle, status: &str, message: &str) -> String {
    match style {
        OutputStyle::Plain => message.to_string(),
        OutputStyle::Rich => format!("{} {message}", status_badge(status)),
    }
}

fn status_badge(status: &str) -> &'static str {
    match status {
        "ok" => "[OK]",
        "warn" => "[WARN]",
        "err" => "[ERR]",
        _ => "[INFO]",
    }
}

fn render_progress_summary(label: &str, percent: u8, elapsed: Duration) -> String {
    format!(
        "{} {percent:>3}% complete in {}",
        colorize(progress_label_style(), label),
        format_elapsed(elapsed)
    )
}

pub(crate) fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    let millis = elapsed.subsec_millis();
    format!("{secs}.{millis:03}s")
}

pub(crate) fn action_label(action: InstallAction) -> &'static str {
    match action {
        InstallAction::FreshInstall => "install",
        InstallAction::UpdateExisting => "update",
        InstallAction::RepairExisting => "repair",
    }
}

pub(crate) fn format_status_lines(status: &InstallationStatus) -> Vec<String> {
    let installed = if status.installed {
        format!("yes ({})", status.installed_version)
    } else {
        "no".to_string()
    };
    vec![
        format!("installed: {installed}"),
        format!("available version: {}", status.available_version),
        format!("install path: {}", status.install_path.display()),
        format!("update available: {}", yes_no(status.update_available)),
        format!("repair available: {}", yes_no(status.repair_available)),
        format!("recommended action: {}", action_label(status.recommended_action)),
    ]
}

pub(crate) fn format_layout_lines(layout: &SetupLayout, available_version: &str) -> Vec<String> {
    vec![
        format!("payload: {}", layout.payload_dir().display()),
        format!("state file: {}", layout.state_file().display()),
        format!(
            "default install path: {}",
            layout.default_install_path().display()
        ),
        format!("available version: {available_version}"),
    ]
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn section_style() -> Style {
    Style::new()
        .fg_color(Some(AnsiColor::BrightBlue.into()))
        .effects(Effects::BOLD)
}

fn progress_label_style() -> Style {
    Style::new()
        .fg_color(Some(AnsiColor::BrightCyan.into()))
        .effects(Effects::BOLD)
}

fn colorize(style: Style, text: &str) -> String {
    format!("{}{}{}", style.render(), text, style.render_reset())
}
