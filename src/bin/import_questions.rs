// src/bin/import_questions.rs

use std::path::PathBuf;

use clap::Parser;
use quizbank::config::Config;
use quizbank::importer::Importer;
use quizbank::store::{self, QuestionRepository};
use tracing_subscriber::EnvFilter;

/// Loads questions from a text file into the quiz database.
///
/// The file holds one question per five lines: the question, options A, B and
/// C (append " Y" to the correct one), and a separator line.
#[derive(Parser, Debug)]
#[command(name = "import_questions")]
#[command(version, about, long_about = None)]
struct Args {
    /// Question file to import.
    #[arg(value_name = "FILE", default_value = "questions.txt")]
    file: PathBuf,

    /// Overrides DATABASE_URL.
    #[arg(short, long)]
    database_url: Option<String>,

    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&args.log_level))
        .with_target(false)
        .init();

    let config = Config::from_env();
    let database_url = args.database_url.unwrap_or(config.database_url);

    let pool = store::open_pool(&database_url, 1).await?;
    store::run_migrations(&pool).await?;

    let repo = QuestionRepository::new(pool.clone());
    let result = Importer::new(&repo).import_file(&args.file).await;
    pool.close().await;

    let report = result?;
    if !report.warnings.is_empty() {
        tracing::warn!("{} block(s) need review", report.warnings.len());
    }
    println!("{} questions added to the database.", report.inserted);

    Ok(())
}
