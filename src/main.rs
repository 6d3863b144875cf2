//! Provis CLI - sequential host-provisioning pipeline
//!
//! Usage: provis [COMMAND]
//!
//! Commands:
//!   provision  Run the three provisioning stages (default)
//!   check      Validate the host without changing it
//!
//! Running `provis` with no arguments provisions the current directory:
//! frontend install, backend install, image pull, in that order, stopping
//! at the first failure.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};

use provis::pipeline::PipelineEvent;
use provis::{ui, Config, Pipeline, ProvisionOptions, CONFIG_FILE};

/// Provis - sequential host-provisioning pipeline
#[derive(Parser, Debug)]
#[command(name = "provis")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Run 'provis' without arguments to provision the current directory.")]
struct Cli {
    /// Output format for CI
    #[arg(long, global = true)]
    json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the provisioning stages (default when no command is given)
    Provision {
        /// Project root containing the frontend directory and image script
        #[arg(short, long, default_value = ".")]
        root: PathBuf,

        /// Print the stage plan without running anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate the host before provisioning (exits non-zero on errors)
    Check {
        /// Project root containing the frontend directory and image script
        #[arg(short, long, default_value = ".")]
        root: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None => cmd_provision(Path::new("."), false, cli.json),
        Some(Commands::Provision { root, dry_run }) => cmd_provision(&root, dry_run, cli.json),
        Some(Commands::Check { root }) => cmd_check(&root, cli.json),
    }
}

fn cmd_provision(root: &Path, dry_run: bool, json: bool) -> Result<()> {
    let config = Config::load(&root.join(CONFIG_FILE))?;
    let pipeline = Pipeline::new(root.to_path_buf(), config);

    if !json {
        println!("{} Provis", ui::glyph("📦", ">"));
        println!("Root: {}", root.display());
        println!();
    }

    if dry_run {
        if json {
            let output = serde_json::json!({
                "event": "plan",
                "stages": pipeline.plan(),
            });
            println!("{}", serde_json::to_string(&output)?);
        } else {
            println!("Plan:");
            for line in pipeline.plan() {
                println!("  {}", line);
            }
        }
        return Ok(());
    }

    let options = ProvisionOptions { quiet: json };
    let total = provis::Stage::ALL.len();

    let report = pipeline.run(&options, |event| {
        if json {
            println!("{}", event.to_json());
            return;
        }
        match event {
            PipelineEvent::StageStarted { stage, command } => {
                println!(
                    "{} [{}/{}] {}: {}",
                    ui::glyph("→", "->"),
                    stage.index() + 1,
                    total,
                    stage,
                    command
                );
            }
            PipelineEvent::StageCompleted { stage, duration_ms } => {
                println!(
                    "{} {} ({})",
                    ui::glyph("✓", "ok"),
                    stage,
                    ui::format_duration(duration_ms)
                );
            }
            PipelineEvent::StageFailed { message, .. } => {
                eprintln!("{} {}", ui::glyph("✗", "x"), message);
            }
        }
    })?;

    if json {
        let output = match report.failed_stage() {
            None => serde_json::json!({
                "event": "provision",
                "status": "success",
                "stages": report.stages.len(),
                "duration_ms": report.total_duration_ms(),
            }),
            Some(failed) => serde_json::json!({
                "event": "provision",
                "status": "failed",
                "stage": failed.stage,
                "code": failed.exit_code,
            }),
        };
        println!("{}", serde_json::to_string(&output)?);
    } else if report.is_success() {
        println!();
        println!(
            "{} Provisioned: {} stages in {}",
            ui::glyph("📊", "done"),
            report.stages.len(),
            ui::format_duration(report.total_duration_ms())
        );
    }

    if !report.is_success() {
        std::process::exit(report.exit_code());
    }

    Ok(())
}

fn cmd_check(root: &Path, json: bool) -> Result<()> {
    use provis::{run_preflight, CheckStatus};

    let config = Config::load(&root.join(CONFIG_FILE))?;

    if !json {
        println!("{} Provis Check", ui::glyph("🩺", ">"));
        println!("Root: {}", root.display());
        println!();
    }

    let report = run_preflight(root, &config);

    if json {
        let output = serde_json::json!({
            "event": "check",
            "passes": report.passes(),
            "warnings": report.warnings(),
            "errors": report.errors(),
            "success": report.is_success(),
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        for check in &report.checks {
            let icon = match check.status {
                CheckStatus::Pass => ui::glyph("✓", "ok"),
                CheckStatus::Warning => ui::glyph("⚠", "warn"),
                CheckStatus::Error => ui::glyph("✗", "x"),
            };
            println!("  {} {} - {}", icon, check.name, check.message);
            if let Some(rec) = &check.recommendation {
                println!("    {} {}", ui::glyph("↳", ">"), rec);
            }
        }

        println!();
        println!(
            "Summary: {} passed, {} warnings, {} errors",
            report.passes(),
            report.warnings(),
            report.errors()
        );
    }

    if !report.is_success() {
        std::process::exit(1);
    }

    Ok(())
}
