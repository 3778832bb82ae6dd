mod curriculum;
mod db;
mod importer;
mod parser;
mod server;
mod settings;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use curriculum::Curriculum;
use importer::ImportError;
use settings::Settings;

#[derive(Parser)]
#[command(name = "hanja_import", about = "Hanja curriculum importer")]
struct Cli {
    /// SQLite database path (overrides HANJA_DB_PATH)
    #[arg(long, global = true)]
    db: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP import service
    Serve {
        /// Port to listen on (overrides HANJA_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Import one day, or every curriculum day, from a markdown file
    Import(ImportArgs),
    /// Print the stored roots and words of a day
    Show {
        #[arg(short, long)]
        day: u32,
    },
    /// Show row counts
    Stats,
}

#[derive(Args)]
struct ImportArgs {
    /// Markdown source file
    #[arg(short, long)]
    file: PathBuf,
    /// Day number to import
    #[arg(short, long, conflicts_with = "all", required_unless_present = "all")]
    day: Option<u32>,
    /// Import every day of the curriculum found in the file
    #[arg(long)]
    all: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let mut settings = Settings::load()?;
    if let Some(path) = cli.db {
        settings.db_path = path;
    }
    let curriculum = Curriculum::load().context("Built-in curriculum is incomplete")?;

    let conn = db::connect(&settings.db_path)?;
    db::init_schema(&conn)?;

    let result = match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                settings.port = port;
            }
            let state = server::state::State::new(curriculum, conn);
            server::start_server(&settings.address(), state).await
        }
        Commands::Import(args) => {
            let markdown = std::fs::read_to_string(&args.file)
                .with_context(|| format!("Failed to read {}", args.file.display()))?;
            match args.day {
                Some(day) => match importer::import_day(&conn, &curriculum, &markdown, day) {
                    Ok(s) => {
                        println!(
                            "Day {}: saved {} roots, {} words.",
                            s.day_number, s.roots_count, s.words_count
                        );
                        Ok(())
                    }
                    Err(ImportError::NotFound { day, lines_scanned }) => {
                        println!("Day {} not found ({} lines scanned).", day, lines_scanned);
                        Ok(())
                    }
                    Err(e) => Err(e.into()),
                },
                None => import_all(&conn, &curriculum, &markdown),
            }
        }
        Commands::Show { day } => {
            match db::fetch_day(&conn, day)? {
                None => println!("Day {} has not been imported.", day),
                Some(d) => {
                    println!(
                        "Day {} · {} (Unit {} · {})",
                        d.day_number, d.topic, d.unit_number, d.unit_title
                    );
                    println!("{}", "-".repeat(60));
                    for r in &d.roots {
                        println!(
                            "{:>2}. {} {} {}  [{}]",
                            r.display_order + 1,
                            r.hanja_character,
                            r.reading,
                            r.native_meaning,
                            truncate(&r.meaning_en, 30)
                        );
                        for w in &r.words {
                            println!("      {:<10} {}", w.word, truncate(&w.meaning_en, 40));
                        }
                    }
                }
            }
            Ok(())
        }
        Commands::Stats => {
            let s = db::get_stats(&conn)?;
            println!("Units: {}", s.units);
            println!("Days:  {}", s.days);
            println!("Roots: {}", s.roots);
            println!("Words: {}", s.words);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

/// Import every curriculum day found in the file, with a progress bar over
/// the parallel parse.
fn import_all(
    conn: &rusqlite::Connection,
    curriculum: &Curriculum,
    markdown: &str,
) -> anyhow::Result<()> {
    use indicatif::{ProgressBar, ProgressStyle};

    let total = curriculum.day_numbers().count();
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} days")?
            .progress_chars("#>-"),
    );

    let batch = importer::import_all(conn, curriculum, markdown, || pb.inc(1))?;
    pb.finish_and_clear();

    if !batch.missing.is_empty() {
        println!("Not found: days {:?}", batch.missing);
    }
    println!(
        "Imported {} of {} days: {} roots, {} words.",
        batch.imported.len(),
        total,
        batch.roots_count(),
        batch.words_count()
    );
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
