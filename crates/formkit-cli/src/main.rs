//! # formkit CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use std::process::ExitCode;

use clap::Parser;

/// formkit: read form snapshots into validated JSON records.
#[derive(Parser, Debug)]
#[command(name = "formkit", version, about)]
struct Cli {
    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Extract, post-process and validate a form snapshot.
    Parse(formkit_cli::parse::ParseArgs),
    /// Run a smart parser over one input.
    Smart(formkit_cli::smart::SmartArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    match cli.command {
        Commands::Parse(args) => {
            let outcome = formkit_cli::parse::run_parse(&args).await?;
            if outcome.exit_code() == 0 {
                println!("{}", outcome.render());
            } else {
                eprintln!("{}", outcome.render());
            }
            Ok(ExitCode::from(outcome.exit_code()))
        }
        Commands::Smart(args) => {
            println!("{}", formkit_cli::smart::run_smart(&args));
            Ok(ExitCode::SUCCESS)
        }
    }
}
