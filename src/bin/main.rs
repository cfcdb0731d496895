use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;
use walletsense::{
    backend::{HttpBackend, Session},
    chat::ChatReply,
    config::Config,
    export,
    state::{AppState, CategorizeOutcome},
    views::text::{format_summaries, render_dashboard},
};

#[derive(Parser)]
#[command(name = "walletsense", about = "Personal-finance dashboard over an uploaded MCP record set.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render every dashboard panel for a record-set file.
    Dashboard {
        /// Path to the MCP JSON file
        file: PathBuf,
        /// Show the full activity list instead of the first three
        #[arg(long)]
        all: bool,
    },
    /// Export CSV files.
    Export {
        #[command(subcommand)]
        command: ExportCommands,
    },
    /// Ask the AI assistant a question.
    Ask {
        /// Question text
        #[arg(required = true)]
        prompt: Vec<String>,
    },
    /// Fetch AI summary points.
    Summaries,
    /// Re-categorize the transactions in a record-set file.
    Categorize {
        file: PathBuf,
        /// Write the re-categorized record set here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum ExportCommands {
    /// Date, merchant and amount per transaction.
    Receipts {
        file: Option<PathBuf>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Summary, goal, spending and summaries sheet.
    Report {
        file: Option<PathBuf>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

async fn load(app: &AppState, file: &Path) -> CliResult {
    let text = std::fs::read_to_string(file)?;
    let summary = app.upload(&text).await?;
    info!(
        file = %file.display(),
        transactions = summary.transactions,
        "Loaded record set"
    );
    Ok(())
}

fn emit(out: Option<&Path>, contents: &str) -> CliResult {
    match out {
        Some(path) => {
            export::write_export(path, contents)?;
            println!("Wrote {}", path.display());
        }
        None => print!("{}", contents),
    }
    Ok(())
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

#[tokio::main]
async fn main() -> CliResult {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let app = AppState::new(Session::from(&config));

    match cli.command {
        Commands::Dashboard { file, all } => {
            load(&app, &file).await?;
            println!("{}", render_dashboard(&app.dashboard(today(), all).await));
        }
        Commands::Export { command } => match command {
            ExportCommands::Receipts { file, out } => {
                if let Some(file) = &file {
                    load(&app, file).await?;
                }
                let loaded = app.records().await;
                let csv = export::receipts_csv(loaded.as_ref().map(|l| l.records.as_ref()))?;
                emit(out.as_deref(), &csv)?;
            }
            ExportCommands::Report { file, out } => {
                if let Some(file) = &file {
                    load(&app, file).await?;
                }
                let csv = export::report_csv(&app.dashboard(today(), true).await)?;
                emit(out.as_deref(), &csv)?;
            }
        },
        Commands::Ask { prompt } => {
            let backend = HttpBackend::from_config(&config)?;
            match app.chat().send(&backend, &prompt.join(" ")).await? {
                ChatReply::Answered(answer) => println!("{}", answer),
                ChatReply::Ignored => eprintln!("Nothing to ask."),
                ChatReply::Superseded => eprintln!("Answer was superseded by a newer question."),
            }
        }
        Commands::Summaries => {
            let backend = HttpBackend::from_config(&config)?;
            if let Some(summaries) = app.refresh_summaries(&backend).await? {
                print!("{}", format_summaries(&summaries));
            }
        }
        Commands::Categorize { file, out } => {
            load(&app, &file).await?;
            let backend = HttpBackend::from_config(&config)?;
            match app.categorize(&backend).await? {
                CategorizeOutcome::Applied { updated, .. } => {
                    eprintln!("Updated {} transaction categories", updated);
                    if let Some(loaded) = app.records().await {
                        let json = serde_json::to_string_pretty(loaded.records.as_ref())?;
                        emit(out.as_deref(), &format!("{}\n", json))?;
                    }
                }
                CategorizeOutcome::NothingToCategorize => eprintln!("No transactions to categorize."),
                CategorizeOutcome::Stale => eprintln!("Categorization was superseded."),
            }
        }
    }

    Ok(())
}
