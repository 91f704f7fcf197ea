use std::path::Path;

use {
    anyhow::Result,
    clap::Subcommand,
    regina_config::{ReginaConfig, Severity, ValidationResult},
};

use crate::settings;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration with secrets redacted.
    Show,
    /// Validate the effective configuration and report errors/warnings.
    Check,
}

pub fn handle_config(
    action: ConfigAction,
    config: &ReginaConfig,
    source: Option<&Path>,
) -> Result<()> {
    match action {
        ConfigAction::Show => show(config, source),
        ConfigAction::Check => check(config),
    }
}

/// ANSI color codes.
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn show(config: &ReginaConfig, source: Option<&Path>) -> Result<()> {
    match source
        .map(Path::to_path_buf)
        .or_else(regina_config::find_config_file)
    {
        Some(path) => eprintln!("# base file: {}", path.display()),
        None => eprintln!("# no config file found; defaults plus overrides"),
    }
    print!("{}", toml::to_string_pretty(&settings::redacted(config))?);
    Ok(())
}

fn check(config: &ReginaConfig) -> Result<()> {
    let result = regina_config::validate(config);
    for line in render(&result) {
        eprintln!("{line}");
    }
    if result.has_errors() {
        std::process::exit(1);
    }
    Ok(())
}

fn render(result: &ValidationResult) -> Vec<String> {
    let mut lines: Vec<String> = result
        .diagnostics
        .iter()
        .map(|d| {
            let color = match d.severity {
                Severity::Error => RED,
                Severity::Warning => YELLOW,
            };
            format!("  {BOLD}{color}{}{RESET} {}: {}", d.severity, d.path, d.message)
        })
        .collect();

    let errors = result.count(Severity::Error);
    let warnings = result.count(Severity::Warning);
    if errors == 0 && warnings == 0 {
        lines.push("No issues found.".into());
    } else {
        lines.push(String::new());
        lines.push(format!("{errors} error(s), {warnings} warning(s)"));
    }
    lines
}
