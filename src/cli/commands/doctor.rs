//! Doctor command - verify system requirements and configuration.

use crate::config::Settings;
use crate::openai::is_api_key_configured;
use console::style;
use std::process::Command;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);
        if let Some(hint) = &self.hint {
            println!("      {}", style(hint).dim());
        }
    }
}

/// Run all system checks and print a report.
pub fn run_doctor(settings: &Settings) -> crate::error::Result<()> {
    println!("\n{}", style("Sanse system check").bold().underlined());
    println!();

    let checks = vec![
        check_api_key(),
        check_tool("ffmpeg", "required for audio extraction and frame sampling"),
        check_tool("ffprobe", "required for duration probing"),
        check_tool("yt-dlp", "required for remote video links"),
        check_temp_dir(settings),
        check_config_file(),
    ];

    for check in &checks {
        check.print();
    }

    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks
        .iter()
        .filter(|c| c.status == CheckStatus::Warning)
        .count();

    if errors > 0 {
        println!(
            "{} {} check(s) failed",
            style(">>").red().bold(),
            errors
        );
    } else if warnings > 0 {
        println!(
            "{} All required checks passed ({} warning(s))",
            style(">>").yellow().bold(),
            warnings
        );
    } else {
        println!("{} All checks passed", style(">>").green().bold());
    }

    Ok(())
}

fn check_api_key() -> CheckResult {
    if is_api_key_configured() {
        CheckResult::ok("OPENAI_API_KEY", "configured")
    } else {
        CheckResult::error(
            "OPENAI_API_KEY",
            "not set",
            "export OPENAI_API_KEY='sk-...'",
        )
    }
}

fn check_tool(name: &str, purpose: &str) -> CheckResult {
    let version_arg = match name {
        "ffmpeg" | "ffprobe" => "-version",
        _ => "--version",
    };

    match Command::new(name).arg(version_arg).output() {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout)
                .lines()
                .next()
                .unwrap_or("unknown version")
                .to_string();
            CheckResult::ok(name, &version)
        }
        Ok(_) => CheckResult::error(
            name,
            "installed but not working correctly",
            &format!("reinstall {}", name),
        ),
        Err(_) => CheckResult::error(
            name,
            "not found in PATH",
            &format!("install {} ({})", name, purpose),
        ),
    }
}

fn check_temp_dir(settings: &Settings) -> CheckResult {
    let temp_dir = settings.temp_dir();
    match std::fs::create_dir_all(&temp_dir) {
        Ok(()) => CheckResult::ok("temp dir", &temp_dir.to_string_lossy()),
        Err(e) => CheckResult::error(
            "temp dir",
            &format!("cannot create {}: {}", temp_dir.display(), e),
            "set general.temp_dir to a writable location",
        ),
    }
}

fn check_config_file() -> CheckResult {
    let path = Settings::default_config_path();
    if path.exists() {
        CheckResult::ok("config", &path.to_string_lossy())
    } else {
        CheckResult::warning(
            "config",
            "no config file found, using defaults",
            &format!("create {} to customize", path.display()),
        )
    }
}
