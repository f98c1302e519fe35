//! overprint CLI - drive the console logger from a shell.
//!
//! Commands:
//! - `say` - Log one record
//! - `progress` - Render an in-place progress indicator
//! - `demo` - Show every severity and a shrinking multi-line overwrite

#![forbid(unsafe_code)]

use std::process::ExitCode;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use overprint::logging::ConsoleLogBridge;
use overprint::{ConsoleConfig, ConsoleLogger, OutputTarget, Severity};

/// overprint - queued console output with in-place updates.
#[derive(Parser)]
#[command(name = "overprint")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(flatten)]
    output: OutputArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct OutputArgs {
    /// Force plain, append-only output.
    #[arg(long, global = true, conflicts_with = "force_color")]
    plain: bool,

    /// Force colors and in-place updates even when not on a terminal.
    #[arg(long, global = true)]
    force_color: bool,

    /// Write to stdout instead of stderr.
    #[arg(long, global = true)]
    stdout: bool,

    /// Minimum severity to render (trace, debug, info, warn, error, critical).
    #[arg(long, global = true, env = "OVERPRINT_LOG")]
    min_level: Option<Severity>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log one record.
    Say {
        /// Words of the message; joined with spaces.
        #[arg(required = true)]
        text: Vec<String>,

        /// Severity of the record.
        #[arg(long, short = 'l', default_value = "info")]
        level: Severity,

        /// Replace the previously rendered record.
        #[arg(long, short = 'r')]
        replace: bool,
    },

    /// Render an in-place progress indicator.
    Progress {
        /// Number of steps to count through.
        #[arg(long, short = 'n', default_value = "20")]
        steps: u32,

        /// Delay between steps in milliseconds.
        #[arg(long, short = 'd', default_value = "50")]
        delay_ms: u64,

        /// Label shown in front of the percentage.
        #[arg(long, default_value = "Loading...")]
        label: String,
    },

    /// Show every severity and a shrinking multi-line overwrite.
    Demo {
        /// Delay between frames in milliseconds.
        #[arg(long, short = 'd', default_value = "300")]
        delay_ms: u64,
    },
}

impl OutputArgs {
    fn to_config(&self) -> ConsoleConfig {
        let mut config = ConsoleConfig::from_env();
        if self.plain {
            config = config.plain_mode();
        }
        if self.force_color {
            config = config.force_color(true);
        }
        if self.stdout {
            config = config.with_target(OutputTarget::Stdout);
        }
        if let Some(level) = self.min_level {
            config = config.with_min_level(level);
        }
        config
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let console = match ConsoleLogger::try_new(cli.output.to_config()) {
        Ok(console) => Arc::new(console),
        Err(err) => {
            eprintln!("overprint: {err}");
            return ExitCode::FAILURE;
        }
    };
    ConsoleLogBridge::try_init(Arc::clone(&console), log::Level::Info);

    match cli.command {
        Commands::Say {
            text,
            level,
            replace,
        } => cmd_say(&console, &text.join(" "), level, replace),
        Commands::Progress {
            steps,
            delay_ms,
            label,
        } => cmd_progress(&console, steps, Duration::from_millis(delay_ms), &label),
        Commands::Demo { delay_ms } => cmd_demo(&console, Duration::from_millis(delay_ms)),
    }

    console.shutdown();
    if console.failed_count() > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn cmd_say(console: &ConsoleLogger, text: &str, level: Severity, replace: bool) {
    console.log(text, level, replace);
}

fn cmd_progress(console: &ConsoleLogger, steps: u32, delay: Duration, label: &str) {
    let steps = steps.max(1);
    console.info(format!("{label} 0%"));
    for step in 1..=steps {
        thread::sleep(delay);
        let pct = u64::from(step) * 100 / u64::from(steps);
        console.progress(format!("{label} {pct}%"));
    }
    console.progress("Done");
}

fn cmd_demo(console: &ConsoleLogger, delay: Duration) {
    for level in Severity::ALL {
        console.log(format!("{level:<5} sample record"), level, false);
    }
    log::warn!("this line came through the log facade");

    console.log_lines(
        ["Resolving packages", "  fetching index", "  comparing versions"],
        Severity::Info,
        false,
    );
    thread::sleep(delay);
    console.log_lines(
        ["Resolving packages", "  writing lockfile"],
        Severity::Info,
        true,
    );
    thread::sleep(delay);
    console.log("Resolved 42 packages", Severity::Info, true);
    console.log_value::<String>(None, Severity::Debug, false);
}
