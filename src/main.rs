use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use csv_delimiter_normalizer::detection::DEFAULT_SAMPLE_SIZE;
use csv_delimiter_normalizer::normalize::{
    normalize_directory, CompositeObserver, ConsoleObserver, FileObserver, NormalizeObserver, NormalizeOptions,
    TracingObserver, DEFAULT_BACKUP_SUFFIX, DEFAULT_EXTENSION,
};
use csv_delimiter_normalizer::NormalizeError;

#[derive(Parser)]
#[command(
    name = "csv-normalize",
    version,
    about = "Rewrite tab/semicolon/pipe-delimited files as comma-delimited, keeping a backup"
)]
struct Cli {
    /// Directory to scan.
    #[arg(default_value = "Data")]
    dir: PathBuf,

    /// Candidate file extension (without the dot).
    #[arg(long, default_value = DEFAULT_EXTENSION)]
    extension: String,

    /// Bytes read from the start of each file to detect its delimiter.
    #[arg(long, default_value_t = DEFAULT_SAMPLE_SIZE)]
    sample_size: usize,

    /// Suffix appended to a file name to form its backup name.
    #[arg(long, default_value = DEFAULT_BACKUP_SUFFIX, value_parser = non_empty)]
    backup_suffix: String,

    /// Also append JSON-lines events to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

// An empty suffix would make the backup path the file itself.
fn non_empty(s: &str) -> Result<String, String> {
    if s.is_empty() {
        Err("must not be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

fn main() -> Result<(), NormalizeError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut observers: Vec<Arc<dyn NormalizeObserver>> = vec![Arc::new(ConsoleObserver), Arc::new(TracingObserver)];
    if let Some(path) = &cli.log_file {
        observers.push(Arc::new(FileObserver::new(path)));
    }

    let opts = NormalizeOptions {
        extension: cli.extension,
        sample_size: cli.sample_size,
        backup_suffix: cli.backup_suffix,
        observer: Some(Arc::new(CompositeObserver::new(observers))),
        ..Default::default()
    };

    let summary = match normalize_directory(&cli.dir, &opts) {
        Ok(summary) => summary,
        Err(err @ NormalizeError::DirectoryNotFound { .. }) => {
            println!("{err}");
            return Ok(());
        }
        Err(err) => return Err(err),
    };

    println!();
    println!("{summary}");
    Ok(())
}
