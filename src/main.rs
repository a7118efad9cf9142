use clap::Parser;
use colored::*;
use env_logger::{Builder, Env, Target};
use rlocate::cli::Cli;
use rlocate::error::{LocateError, Result as LocateResult};
use std::fs;
use std::process;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = setup_logging(&cli) {
        eprintln!("{} {e}", "Error:".red());
        process::exit(1);
    }

    if let Err(e) = rlocate::app::run(cli) {
        eprintln!("{} {e}", "Error:".red());
        process::exit(1);
    }
}

fn setup_logging(cli: &Cli) -> LocateResult<()> {
    let default_level = if cli.verbose { "info" } else { "warn" };
    let mut builder = Builder::from_env(Env::default().default_filter_or(default_level));

    builder.format(|buf, record| {
        use std::io::Write;
        writeln!(
            buf,
            "{} [{}] [{}] {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.module_path().unwrap_or("unknown"),
            record.args()
        )
    });

    if let Some(log_path) = &cli.log {
        if let Some(parent_dir) = log_path.parent() {
            if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
                fs::create_dir_all(parent_dir)?;
            }
        }
        let log_file = fs::File::create(log_path)?;
        builder.target(Target::Pipe(Box::new(log_file)));
    } else {
        builder.target(Target::Stderr);
    }

    builder
        .try_init()
        .map_err(|e| LocateError::Other(e.to_string()))?;
    Ok(())
}
