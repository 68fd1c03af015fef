// santa - draw gift-exchange assignments from a group file

mod draw;
mod exit_codes;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use secretsanta_matching::MatchingError;

use exit_codes::{matching_exit_code, EXIT_INFEASIBLE, EXIT_IO, EXIT_SUCCESS};

#[derive(Parser)]
#[command(name = "santa")]
#[command(about = "Secret Santa draws with couples and forbidden pairs")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Log engine decisions to stderr (same as RUST_LOG=debug)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw a complete set of assignments
    #[command(after_help = "\
Examples:
  santa draw family.group.toml
  santa draw family.group.toml --seed 2026-xmas --json
  santa draw family.group.toml --output draw.json")]
    Draw {
        /// Path to the .group.toml file
        group: std::path::PathBuf,

        /// Seed to draw with (a fresh one is generated when omitted)
        #[arg(long)]
        seed: Option<String>,

        /// Output the draw record as JSON to stdout
        #[arg(long)]
        json: bool,

        /// Write the draw record JSON to file
        #[arg(long)]
        output: Option<std::path::PathBuf>,
    },

    /// Redraw some givers of an existing draw, keeping everyone else
    #[command(after_help = "\
Examples:
  santa rematch family.group.toml --assignments draw.json --giver alice
  santa rematch family.group.toml --assignments draw.json --giver alice --giver emma --json")]
    Rematch {
        /// Path to the .group.toml file
        group: std::path::PathBuf,

        /// Existing draw (draw record JSON or a {giver: receiver} object)
        #[arg(long)]
        assignments: std::path::PathBuf,

        /// Giver to redraw. Repeatable.
        #[arg(long = "giver", value_name = "ID", required = true)]
        givers: Vec<String>,

        /// Seed to redraw with (a fresh one is generated when omitted)
        #[arg(long)]
        seed: Option<String>,

        /// Output the draw record as JSON to stdout
        #[arg(long)]
        json: bool,

        /// Write the draw record JSON to file
        #[arg(long)]
        output: Option<std::path::PathBuf>,
    },

    /// Check stored assignments against the group's rules
    #[command(after_help = "\
Examples:
  santa verify family.group.toml --assignments draw.json")]
    Verify {
        /// Path to the .group.toml file
        group: std::path::PathBuf,

        /// Draw record JSON or a {giver: receiver} object
        #[arg(long)]
        assignments: std::path::PathBuf,

        /// Output the result as JSON to stdout
        #[arg(long)]
        json: bool,
    },

    /// Validate a group file without drawing
    Validate {
        /// Path to the .group.toml file
        group: std::path::PathBuf,
    },

    /// Print a fresh random seed
    Seed,
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  secretsanta-matching ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("TARGET"),
    )
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Draw { group, seed, json, output } => draw::cmd_draw(group, seed, json, output),
        Commands::Rematch { group, assignments, givers, seed, json, output } => {
            draw::cmd_rematch(group, assignments, givers, seed, json, output)
        }
        Commands::Verify { group, assignments, json } => draw::cmd_verify(group, assignments, json),
        Commands::Validate { group } => draw::cmd_validate(group),
        Commands::Seed => draw::cmd_seed(),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

/// Logs go to stderr so stdout stays machine-readable. RUST_LOG wins over --verbose.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    pub fn infeasible(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_INFEASIBLE,
            message: msg.into(),
            hint: Some("relax forbidden pairs or couple keys, or add members".to_string()),
        }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<MatchingError> for CliError {
    fn from(err: MatchingError) -> Self {
        Self { code: matching_exit_code(&err), message: err.to_string(), hint: None }
    }
}
