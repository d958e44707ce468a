mod app;
mod commands;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "recall",
    about = "Adaptive spaced-repetition trainer for vocabulary and word roots",
    version
)]
struct Cli {
    /// Item table JSON file (default: the per-user data directory)
    #[arg(long, global = true)]
    file: Option<PathBuf>,

    /// Answer time limit in seconds
    #[arg(long, global = true, default_value_t = 5.0)]
    time_limit: f64,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Convert an item table between JSON and CSV
    Convert {
        /// Input file; the sibling format is written next to it
        file: PathBuf,
    },

    /// Fill missing translations and example sentences from the dictionary
    Fill,

    /// Print study statistics and exit
    Stats,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && stdout_is_tty();

    match cli.command {
        None => {
            // No subcommand: open the interactive review session
            let Some((store, items)) = app::open_table(cli.file)? else {
                return Ok(());
            };
            let app = app::App::new(store, items, cli.time_limit, use_color);
            commands::quiz::run(app)?;
        }
        Some(Command::Convert { file }) => {
            commands::convert::run(&file)?;
        }
        Some(Command::Fill) => {
            commands::fill::run(cli.file)?;
        }
        Some(Command::Stats) => {
            let Some((_, items)) = app::open_table(cli.file)? else {
                return Ok(());
            };
            commands::stats::show(&items, use_color);
        }
    }

    Ok(())
}

/// Check if stdout is a terminal (for color support)
fn stdout_is_tty() -> bool {
    unsafe { libc_isatty(1) != 0 }
}

extern "C" {
    #[link_name = "isatty"]
    fn libc_isatty(fd: i32) -> i32;
}
