//! sqlite-mongo-migrate CLI - SQLite to MongoDB migration.

use clap::Parser;
use sqlite_mongo_migrate::{
    Config, MigrateError, Orchestrator, OutputConfig, SourceConfig, TargetConfig,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, Level};
use tracing_subscriber::fmt::format::FmtSpan;

#[derive(Parser)]
#[command(name = "sqlite-mongo-migrate")]
#[command(about = "Migrate every table of a SQLite database into MongoDB")]
#[command(version)]
struct Cli {
    /// Path to the SQLite database file
    source_path: PathBuf,

    /// Destination MongoDB database name
    database: String,

    /// MongoDB host
    #[arg(default_value = "localhost")]
    host: String,

    /// MongoDB port
    #[arg(default_value_t = 27017)]
    port: u16,

    /// Directory receiving one text dump file per table
    #[arg(long, default_value = "outFiles")]
    out_dir: PathBuf,

    /// Output JSON result to stdout
    #[arg(long)]
    output_json: bool,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "info")]
    verbosity: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run() -> Result<(), MigrateError> {
    let cli = Cli::parse();

    setup_logging(&cli.verbosity, &cli.log_format)
        .map_err(MigrateError::Config)?;

    // Fail on a missing source before any destination connection is made.
    if !cli.source_path.is_file() {
        return Err(MigrateError::Config(format!(
            "Database file not found: {}",
            cli.source_path.display()
        )));
    }

    // The engine expects the dump directory to exist; creating it is the
    // CLI's concern.
    std::fs::create_dir_all(&cli.out_dir)?;

    let config = Config {
        source: SourceConfig {
            path: cli.source_path,
        },
        target: TargetConfig {
            database: cli.database,
            host: cli.host,
            port: cli.port,
        },
        output: OutputConfig { dir: cli.out_dir },
    };
    info!(
        "Migrating {} into mongodb://{}:{}/{}",
        config.source.path.display(),
        config.target.host,
        config.target.port,
        config.target.database
    );

    let orchestrator = Orchestrator::connect(config).await?;
    let result = orchestrator.run().await?;

    if cli.output_json {
        println!("{}", result.to_json()?);
    } else {
        println!("\nMigration completed!");
        println!("  Run ID: {}", result.run_id);
        println!("  Duration: {:.2}s", result.duration_seconds);
        println!("  Tables: {}", result.tables_total);
        println!("  Documents: {}", result.documents_transferred);
        println!(
            "  Throughput: {:.0} documents/sec",
            result.documents_per_second
        );
    }

    Ok(())
}

fn setup_logging(verbosity: &str, format: &str) -> Result<(), String> {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false);

    if format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    Ok(())
}
