use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use gameshelf_core::catalog::CatalogClient;
use gameshelf_core::config::Config;
use gameshelf_core::process::{FolderProcessor, RunStats};
use gameshelf_core::resolve::Console;

#[derive(Parser)]
#[command(name = "gameshelf")]
#[command(about = "Game folder renamer - canonical Title (Year) naming from the IGDB catalog")]
struct Cli {
    /// Directory containing game folders (defaults to GAMES_FOLDER, then /games)
    path: Option<PathBuf>,

    /// Preview renames without touching the filesystem (or set DRY_RUN=true)
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::from_env()
        .context("Set the CLIENT_ID and CLIENT_SECRET environment variables")?;

    let root = cli.path.unwrap_or_else(|| config.games_folder.clone());
    let dry_run = cli.dry_run || config.dry_run;

    let mut catalog = CatalogClient::new(config.client_id, config.client_secret);
    let mut console = Terminal;

    let stats = FolderProcessor::new(&mut catalog, dry_run).run(&root, &mut console)?;
    print_summary(&stats, dry_run);
    Ok(())
}

/// Interactive prompt over stdin/stdout.
struct Terminal;

impl Console for Terminal {
    fn print(&mut self, line: &str) {
        println!("{line}");
    }

    fn read_line(&mut self) -> Option<String> {
        print!("> ");
        let _ = io::stdout().flush();
        let mut input = String::new();
        match io::stdin().lock().read_line(&mut input) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(input),
        }
    }
}

fn print_summary(stats: &RunStats, dry_run: bool) {
    println!("\nRename complete!{}", if dry_run { " (dry run)" } else { "" });
    println!("Found:   {} folders", stats.total);
    println!("Renamed: {} folders", stats.renamed);
    println!("Skipped: {} folders", stats.skipped);
    if stats.errors > 0 {
        println!("Errors:  {} folders", stats.errors);
    }
}
