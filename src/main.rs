use std::error::Error;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use medsafe_lib::config::Settings;
use medsafe_lib::db;
use medsafe_lib::models::AnalysisRequest;

const ENVIRONMENT_HELP: &str = "\
Environment:
  MEDSAFE_INTERACTIONS  interaction dataset (.csv, or an imported .db)
  MEDSAFE_SYNONYMS      JSON synonym table replacing the built-in one
  MEDSAFE_DB            SQLite database for imports and saved reports
  RUST_LOG              log filter";

#[derive(Parser)]
#[command(name = "medsafe")]
#[command(version)]
#[command(about = "Medication safety triage: interactions, contraindications and risk")]
#[command(after_help = ENVIRONMENT_HELP)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one triage request and print the result as JSON
    Analyze {
        /// Request JSON file, or - for stdin
        input: String,

        /// Store the result in the report database
        #[arg(long)]
        save: bool,
    },

    /// Import an interaction CSV into SQLite
    Import {
        /// CSV with "Drug 1", "Drug 2" and "Interaction Description" columns
        csv: PathBuf,

        /// Target database (defaults to MEDSAFE_DB)
        database: Option<PathBuf>,
    },

    /// List the most recent saved reports
    Reports {
        /// Number of reports to show
        #[arg(short, long, default_value_t = 20)]
        limit: u32,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    medsafe_lib::init_tracing();
    let settings = Settings::from_env();

    let outcome = match cli.command {
        Commands::Analyze { input, save } => analyze(&settings, &input, save),
        Commands::Import { csv, database } => import(&settings, &csv, database),
        Commands::Reports { limit } => reports(&settings, limit),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn analyze(settings: &Settings, input: &str, save: bool) -> Result<(), Box<dyn Error>> {
    let raw = if input == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(input)?
    };
    let request: AnalysisRequest = serde_json::from_str(&raw)?;

    let engine = medsafe_lib::engine_from_settings(settings);
    let result = engine.analyze_request(&request);

    if save {
        let conn = db::open_database(&settings.database_path)?;
        let report = db::save_report(&conn, &result)?;
        tracing::info!(id = %report.id, path = %settings.database_path.display(), "Report saved");
    }

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn import(
    settings: &Settings,
    csv_path: &Path,
    database: Option<PathBuf>,
) -> Result<(), Box<dyn Error>> {
    let db_path = database.unwrap_or_else(|| settings.database_path.clone());

    let synonyms = medsafe_lib::load_synonyms(settings);
    let mut conn = db::open_database(&db_path)?;
    let stats = db::import_csv(&mut conn, csv_path, &synonyms)?;

    println!(
        "Imported {} interactions into {} ({} skipped, {} replaced)",
        stats.imported,
        db_path.display(),
        stats.skipped,
        stats.replaced,
    );
    for (severity, count) in &stats.by_severity {
        println!("  {severity}: {count}");
    }
    Ok(())
}

fn reports(settings: &Settings, limit: u32) -> Result<(), Box<dyn Error>> {
    let conn = db::open_database(&settings.database_path)?;
    for report in db::list_recent_reports(&conn, limit)? {
        println!(
            "{}  {}  {:<8}  {}",
            report.id,
            report.created_at,
            report.risk_level.as_str(),
            report.medication
        );
    }
    Ok(())
}
