mod paths;
mod session;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "teachstack",
    about = "Student roster manager — add, edit, group, archive, and query students",
    version,
    propagate_version = true
)]
struct Cli {
    /// Roster file (default: ~/.teachstack/roster.json)
    #[arg(long, global = true, env = "TEACHSTACK_DATA")]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one roster command and exit, e.g. `teachstack exec add n/Alice ...`
    Exec {
        /// The command line, e.g. `add n/Alice id/A0123456A e/a@b.com gr/A`
        #[arg(required = true, trailing_var_arg = true)]
        line: Vec<String>,

        /// Print the outcome and the resulting roster as JSON
        #[arg(long, short = 'j')]
        json: bool,
    },

    /// Interactive shell (the default when no subcommand is given)
    Shell,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let result = paths::resolve_data_path(cli.data.as_deref()).and_then(|data| match cli.command {
        Some(Commands::Exec { line, json }) => session::exec_line(&data, &line.join(" "), json),
        Some(Commands::Shell) | None => session::run_shell(&data),
    });

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
